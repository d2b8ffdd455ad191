//! minic parser: builds function declarations from a token stream.
pub mod parser;

pub use parser::{Parser, MAX_NESTING};

#[cfg(test)]
mod tests {
    use super::*;
    use minic_lexer::Lexer;
    use minic_syntax::ast::*;
    use minic_syntax::error::{Error, ErrorKind};
    use minic_syntax::token::TokenKind;

    fn parse_expr_str(input: &str) -> Expr {
        let mut lexer = Lexer::new(input);
        let tokens = lexer.tokenize().expect("Lexing should succeed");
        let mut parser = Parser::new(tokens);
        parser.parse_expr().expect("Parsing should succeed")
    }

    fn parse_program_str(input: &str) -> Program {
        let mut lexer = Lexer::new(input);
        let tokens = lexer.tokenize().expect("Lexing should succeed");
        let mut parser = Parser::new(tokens);
        parser.parse_program().expect("Parsing should succeed")
    }

    fn parse_error(input: &str) -> Error {
        let tokens = Lexer::new(input).tokenize().expect("Lexing should succeed");
        Parser::new(tokens)
            .parse_program()
            .expect_err("Parsing should fail")
    }

    /// Body of the single function in `int f() { <body> }`.
    fn parse_body_str(body: &str) -> Vec<Stmt> {
        let program = parse_program_str(&format!("int f() {{ {} }}", body));
        program.functions[0].body.clone()
    }

    fn ident(name: &str) -> Box<Expr> {
        Box::new(Expr::Ident(name.to_string()))
    }

    #[test]
    fn test_literal_expressions() {
        assert_eq!(parse_expr_str("42"), Expr::Int(42));
        assert_eq!(parse_expr_str("2.5"), Expr::Float(2.5));
        assert_eq!(parse_expr_str("prev2"), Expr::Ident("prev2".into()));
    }

    #[test]
    fn test_binary_arithmetic() {
        assert!(matches!(parse_expr_str("1 + 2"), Expr::Binary { op: BinaryOp::Add, .. }));
        assert!(matches!(parse_expr_str("5 - 3"), Expr::Binary { op: BinaryOp::Sub, .. }));
        assert!(matches!(parse_expr_str("4 * 6"), Expr::Binary { op: BinaryOp::Mul, .. }));
        assert!(matches!(parse_expr_str("8 / 2"), Expr::Binary { op: BinaryOp::Div, .. }));
        assert!(matches!(parse_expr_str("8 % 3"), Expr::Binary { op: BinaryOp::Rem, .. }));
    }

    #[test]
    fn test_operator_precedence() {
        assert_eq!(
            parse_expr_str("a + b * c"),
            Expr::Binary {
                op: BinaryOp::Add,
                lhs: ident("a"),
                rhs: Box::new(Expr::Binary { op: BinaryOp::Mul, lhs: ident("b"), rhs: ident("c") }),
            }
        );
        assert_eq!(
            parse_expr_str("(a + b) * c"),
            Expr::Binary {
                op: BinaryOp::Mul,
                lhs: Box::new(Expr::Binary { op: BinaryOp::Add, lhs: ident("a"), rhs: ident("b") }),
                rhs: ident("c"),
            }
        );
        assert!(matches!(parse_expr_str("i < n && n != 0"), Expr::Binary { op: BinaryOp::And, .. }));
        assert!(matches!(parse_expr_str("a || b && c"), Expr::Binary { op: BinaryOp::Or, .. }));
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(
            parse_expr_str("a - b - c"),
            Expr::Binary {
                op: BinaryOp::Sub,
                lhs: Box::new(Expr::Binary { op: BinaryOp::Sub, lhs: ident("a"), rhs: ident("b") }),
                rhs: ident("c"),
            }
        );
    }

    #[test]
    fn test_unary_operators() {
        assert_eq!(parse_expr_str("-x"), Expr::unary(UnaryOp::Neg, Expr::Ident("x".into())));
        assert_eq!(
            parse_expr_str("!!x"),
            Expr::unary(UnaryOp::Not, Expr::unary(UnaryOp::Not, Expr::Ident("x".into())))
        );
    }

    #[test]
    fn test_function_calls() {
        assert_eq!(parse_expr_str("main()"), Expr::Call { name: "main".into(), args: vec![] });
        if let Expr::Call { name, args } = parse_expr_str("fdiv(400, 3)") {
            assert_eq!(name, "fdiv");
            assert_eq!(args, vec![Expr::Int(400), Expr::Int(3)]);
        } else {
            panic!("Expected Call");
        }
    }

    #[test]
    fn test_function_declarations() {
        let program = parse_program_str(
            "int fib(int n) { return n; }\n double fdiv(double a, double b) { return a / b; }\n double main() { return fdiv(400, 3); }",
        );
        let names: Vec<&str> = program.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["fib", "fdiv", "main"]);

        let fdiv = &program.functions[1];
        assert_eq!(fdiv.return_type, Type::Double);
        assert_eq!(
            fdiv.params,
            vec![
                Param { name: "a".into(), ty: Type::Double },
                Param { name: "b".into(), ty: Type::Double },
            ]
        );
        assert!(program.functions[2].params.is_empty());
    }

    #[test]
    fn test_empty_program() {
        assert!(parse_program_str("").functions.is_empty());
        assert!(parse_program_str("// nothing here\n").functions.is_empty());
    }

    #[test]
    fn test_declarations_and_assignments() {
        assert_eq!(
            parse_body_str("int x = 1; double y; x = x + 2;"),
            vec![
                Stmt::VarDecl { name: "x".into(), ty: Type::Int, init: Some(Expr::Int(1)) },
                Stmt::VarDecl { name: "y".into(), ty: Type::Double, init: None },
                Stmt::Assign {
                    name: "x".into(),
                    expr: Expr::binary(BinaryOp::Add, Expr::Ident("x".into()), Expr::Int(2)),
                },
            ]
        );
    }

    #[test]
    fn test_increments_desugar_to_assignments() {
        let inc = Stmt::Assign {
            name: "i".into(),
            expr: Expr::binary(BinaryOp::Add, Expr::Ident("i".into()), Expr::Int(1)),
        };
        let dec = Stmt::Assign {
            name: "i".into(),
            expr: Expr::binary(BinaryOp::Sub, Expr::Ident("i".into()), Expr::Int(1)),
        };
        assert_eq!(parse_body_str("++i; i++; --i; i--;"), vec![inc.clone(), inc, dec.clone(), dec]);
        assert_eq!(
            parse_body_str("x *= 3;"),
            vec![Stmt::Assign {
                name: "x".into(),
                expr: Expr::binary(BinaryOp::Mul, Expr::Ident("x".into()), Expr::Int(3)),
            }]
        );
    }

    #[test]
    fn test_for_loop() {
        let body = parse_body_str("for (int i = 0; i < n; ++i) { curr = prev + prev2; }");
        match &body[0] {
            Stmt::For { init, cond, step, body } => {
                assert!(matches!(init.as_deref(), Some(Stmt::VarDecl { name, ty: Type::Int, .. }) if name == "i"));
                assert!(matches!(cond, Some(Expr::Binary { op: BinaryOp::Lt, .. })));
                assert!(matches!(step.as_deref(), Some(Stmt::Assign { name, .. }) if name == "i"));
                assert_eq!(body.len(), 1);
            }
            other => panic!("Expected For, got {:?}", other),
        }

        let body = parse_body_str("for (;;) break;");
        assert_eq!(
            body,
            vec![Stmt::For { init: None, cond: None, step: None, body: vec![Stmt::Break] }]
        );
    }

    #[test]
    fn test_other_control_flow() {
        let body = parse_body_str("while (x) { x--; } if (x) return 1; else { return 2; } { int y; }");
        assert!(matches!(body[0], Stmt::While { .. }));
        assert!(matches!(&body[1], Stmt::If { else_body: Some(e), .. } if e.len() == 1));
        assert!(matches!(&body[2], Stmt::Block(b) if b.len() == 1));
    }

    #[test]
    fn test_missing_semicolon() {
        let err = parse_error("int main() {\n  return 1\n}");
        assert_eq!(
            err.kind,
            ErrorKind::Parse { expected: "';'".into(), found: TokenKind::RBrace }
        );
        assert_eq!((err.line, err.col), (Some(3), Some(1)));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_error("main() { }").kind, ErrorKind::Parse { .. }));
        assert!(matches!(parse_error("int main( { }").kind, ErrorKind::Parse { .. }));
        assert!(matches!(parse_error("int main() { return 1;").kind, ErrorKind::Parse { found: TokenKind::Eof, .. }));
        assert!(matches!(parse_error("int main() { return ; }").kind, ErrorKind::Parse { .. }));
        assert!(matches!(parse_error("int main() { int = 3; }").kind, ErrorKind::Parse { .. }));
        assert!(matches!(parse_error("int f(int) { return 0; }").kind, ErrorKind::Parse { .. }));
    }

    #[test]
    fn test_break_outside_loop() {
        let err = parse_error("int main() { break; }");
        assert_eq!(
            err.kind,
            ErrorKind::Parse { expected: "statement inside a loop".into(), found: TokenKind::Break }
        );
        parse_program_str("int main() { while (1) { if (1) break; } return 0; }");
    }

    #[test]
    fn test_first_error_aborts() {
        // Only the first problem is reported.
        let err = parse_error("int a() { return 1 }\nint b() { return }");
        assert_eq!(err.line, Some(1));
    }

    #[test]
    fn test_nesting_limit() {
        let nested_parse_error = |expected: &str, found: TokenKind| ErrorKind::Parse {
            expected: expected.into(),
            found,
        };

        let bangs = format!("int main() {{ return {}1; }}", "!".repeat(200_000));
        assert_eq!(
            parse_error(&bangs).kind,
            nested_parse_error("expression nested less deeply", TokenKind::Bang)
        );

        let parens = format!("int main() {{ return {}1{}; }}", "(".repeat(200), ")".repeat(200));
        assert_eq!(
            parse_error(&parens).kind,
            nested_parse_error("expression nested less deeply", TokenKind::LParen)
        );

        let chain = format!("int main() {{ return {}; }}", vec!["1"; 10_000].join(" + "));
        assert_eq!(
            parse_error(&chain).kind,
            nested_parse_error("expression nested less deeply", TokenKind::Int(1))
        );

        let blocks = format!("int main() {{ {}{} return 0; }}", "{ ".repeat(200), "} ".repeat(200));
        assert_eq!(
            parse_error(&blocks).kind,
            nested_parse_error("block nested less deeply", TokenKind::LBrace)
        );

        // Deep but within bounds, and the counter unwinds between statements.
        let depth = MAX_NESTING - 8;
        let ok = format!(
            "int main() {{ int x = {}1{}; x = {}; return x; }}",
            "(".repeat(depth),
            ")".repeat(depth),
            vec!["x"; depth].join(" - ")
        );
        parse_program_str(&ok);
    }
}
