//! Recursive-descent parser over a token vector.
//!
//! The parser walks the tokens with an explicit cursor and stops at the
//! first error. Each grammar rule is one method; binary operators are
//! handled by one method per precedence level, lowest first.

use minic_syntax::ast::*;
use minic_syntax::error::{Error, ErrorKind, Result};
use minic_syntax::token::{Token, TokenKind};
use tracing::trace;

/// Deepest nesting of blocks and sub-expressions the parser accepts. Every
/// later pass walks the tree recursively, so this also bounds their stack.
pub const MAX_NESTING: usize = 128;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Number of enclosing loops, for `break` and `continue`.
    loop_depth: usize,
    /// Number of enclosing blocks and unfinished sub-expressions.
    nesting: usize,
}

impl Parser {
    /// Create a parser over `tokens`. A trailing `Eof` is added if the
    /// stream does not already end with one.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| &t.kind) != Some(&TokenKind::Eof) {
            let (line, col) = tokens.last().map(|t| (t.line, t.col)).unwrap_or((1, 1));
            tokens.push(Token {
                kind: TokenKind::Eof,
                line,
                col,
            });
        }
        Self {
            tokens,
            pos: 0,
            loop_depth: 0,
            nesting: 0,
        }
    }

    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + offset).min(last)]
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn unexpected<T>(&self, expected: impl Into<String>) -> Result<T> {
        let tok = self.peek();
        Err(Error::with_span(
            ErrorKind::Parse {
                expected: expected.into(),
                found: tok.kind.clone(),
            },
            tok.line,
            tok.col,
        ))
    }

    /// Step one level deeper, failing at the current token past [`MAX_NESTING`].
    fn enter(&mut self, what: &str) -> Result<()> {
        if self.nesting >= MAX_NESTING {
            return self.unexpected(format!("{} nested less deeply", what));
        }
        self.nesting += 1;
        Ok(())
    }

    fn leave(&mut self, levels: usize) {
        self.nesting -= levels;
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            self.unexpected(kind.to_string())
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => self.unexpected("identifier"),
        }
    }

    /// Parse a whole compilation unit: function definitions until end of input.
    pub fn parse_program(&mut self) -> Result<Program> {
        let mut functions = Vec::new();
        while !self.check(&TokenKind::Eof) {
            let func = self.parse_function()?;
            trace!(name = %func.name, params = func.params.len(), "parsed function");
            functions.push(func);
        }
        Ok(Program { functions })
    }

    fn parse_type(&mut self) -> Result<Type> {
        let ty = match self.peek().kind {
            TokenKind::IntKw => Type::Int,
            TokenKind::DoubleKw => Type::Double,
            _ => return self.unexpected("type name"),
        };
        self.advance();
        Ok(ty)
    }

    fn parse_function(&mut self) -> Result<Function> {
        let return_type = self.parse_type()?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                let ty = self.parse_type()?;
                let name = self.expect_ident()?;
                params.push(Param { name, ty });
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;
        Ok(Function {
            name,
            params,
            return_type,
            body,
        })
    }

    fn parse_block(&mut self) -> Result<Vec<Stmt>> {
        self.expect(TokenKind::LBrace)?;
        self.enter("block")?;
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.check(&TokenKind::Eof) {
                return self.unexpected(TokenKind::RBrace.to_string());
            }
            stmts.push(self.parse_stmt()?);
        }
        self.advance();
        self.leave(1);
        Ok(stmts)
    }

    /// Loop and branch bodies: a braced block or a single statement.
    fn parse_body(&mut self) -> Result<Vec<Stmt>> {
        if self.check(&TokenKind::LBrace) {
            self.parse_block()
        } else {
            self.enter("block")?;
            let stmt = self.parse_stmt()?;
            self.leave(1);
            Ok(vec![stmt])
        }
    }

    fn parse_loop_body(&mut self) -> Result<Vec<Stmt>> {
        self.loop_depth += 1;
        let body = self.parse_body();
        self.loop_depth -= 1;
        body
    }

    fn parse_stmt(&mut self) -> Result<Stmt> {
        if self.peek().kind.is_type_keyword() {
            let decl = self.parse_var_decl()?;
            self.expect(TokenKind::Semicolon)?;
            return Ok(decl);
        }
        match self.peek().kind {
            TokenKind::Return => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(Stmt::Return(expr))
            }
            TokenKind::For => self.parse_for(),
            TokenKind::While => {
                self.advance();
                self.expect(TokenKind::LParen)?;
                let cond = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                let body = self.parse_loop_body()?;
                Ok(Stmt::While { cond, body })
            }
            TokenKind::If => {
                self.advance();
                self.expect(TokenKind::LParen)?;
                let cond = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                let then_body = self.parse_body()?;
                let else_body = if self.eat(&TokenKind::Else) {
                    Some(self.parse_body()?)
                } else {
                    None
                };
                Ok(Stmt::If {
                    cond,
                    then_body,
                    else_body,
                })
            }
            TokenKind::Break | TokenKind::Continue => {
                if self.loop_depth == 0 {
                    return self.unexpected("statement inside a loop");
                }
                let stmt = if self.advance().kind == TokenKind::Break {
                    Stmt::Break
                } else {
                    Stmt::Continue
                };
                self.expect(TokenKind::Semicolon)?;
                Ok(stmt)
            }
            TokenKind::LBrace => Ok(Stmt::Block(self.parse_block()?)),
            _ => {
                let stmt = self.parse_simple()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(stmt)
            }
        }
    }

    fn parse_var_decl(&mut self) -> Result<Stmt> {
        let ty = self.parse_type()?;
        let name = self.expect_ident()?;
        let init = if self.eat(&TokenKind::Equal) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        Ok(Stmt::VarDecl { name, ty, init })
    }

    fn parse_for(&mut self) -> Result<Stmt> {
        self.expect(TokenKind::For)?;
        self.expect(TokenKind::LParen)?;
        let init = if self.check(&TokenKind::Semicolon) {
            None
        } else if self.peek().kind.is_type_keyword() {
            Some(Box::new(self.parse_var_decl()?))
        } else {
            Some(Box::new(self.parse_simple()?))
        };
        self.expect(TokenKind::Semicolon)?;
        let cond = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semicolon)?;
        let step = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(Box::new(self.parse_simple()?))
        };
        self.expect(TokenKind::RParen)?;
        let body = self.parse_loop_body()?;
        Ok(Stmt::For {
            init,
            cond,
            step,
            body,
        })
    }

    /// Assignments, increments and expression statements, without the
    /// terminating `;` (they also appear in `for` headers).
    fn parse_simple(&mut self) -> Result<Stmt> {
        if matches!(self.peek().kind, TokenKind::PlusPlus | TokenKind::MinusMinus) {
            let op = if self.advance().kind == TokenKind::PlusPlus {
                BinaryOp::Add
            } else {
                BinaryOp::Sub
            };
            let name = self.expect_ident()?;
            return Ok(increment(name, op));
        }

        if let TokenKind::Ident(name) = &self.peek().kind {
            let name = name.clone();
            let compound = match self.peek_at(1).kind {
                TokenKind::Equal => None,
                TokenKind::PlusEq => Some(BinaryOp::Add),
                TokenKind::MinusEq => Some(BinaryOp::Sub),
                TokenKind::StarEq => Some(BinaryOp::Mul),
                TokenKind::SlashEq => Some(BinaryOp::Div),
                TokenKind::PercentEq => Some(BinaryOp::Rem),
                TokenKind::PlusPlus => {
                    self.advance();
                    self.advance();
                    return Ok(increment(name, BinaryOp::Add));
                }
                TokenKind::MinusMinus => {
                    self.advance();
                    self.advance();
                    return Ok(increment(name, BinaryOp::Sub));
                }
                _ => return Ok(Stmt::Expr(self.parse_expr()?)),
            };
            self.advance();
            self.advance();
            let rhs = self.parse_expr()?;
            let expr = match compound {
                Some(op) => Expr::binary(op, Expr::Ident(name.clone()), rhs),
                None => rhs,
            };
            return Ok(Stmt::Assign { name, expr });
        }

        Ok(Stmt::Expr(self.parse_expr()?))
    }

    /// Parse one expression starting at the cursor.
    pub fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_and()?;
        let mut folds = 0;
        while self.eat(&TokenKind::OrOr) {
            self.enter("expression")?;
            folds += 1;
            let rhs = self.parse_and()?;
            lhs = Expr::binary(BinaryOp::Or, lhs, rhs);
        }
        self.leave(folds);
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_equality()?;
        let mut folds = 0;
        while self.eat(&TokenKind::AndAnd) {
            self.enter("expression")?;
            folds += 1;
            let rhs = self.parse_equality()?;
            lhs = Expr::binary(BinaryOp::And, lhs, rhs);
        }
        self.leave(folds);
        Ok(lhs)
    }

    fn parse_equality(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_comparison()?;
        let mut folds = 0;
        loop {
            let op = match self.peek().kind {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::Ne,
                _ => break,
            };
            self.advance();
            self.enter("expression")?;
            folds += 1;
            let rhs = self.parse_comparison()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        self.leave(folds);
        Ok(lhs)
    }

    fn parse_comparison(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_additive()?;
        let mut folds = 0;
        loop {
            let op = match self.peek().kind {
                TokenKind::Less => BinaryOp::Lt,
                TokenKind::LessEq => BinaryOp::Le,
                TokenKind::Greater => BinaryOp::Gt,
                TokenKind::GreaterEq => BinaryOp::Ge,
                _ => break,
            };
            self.advance();
            self.enter("expression")?;
            folds += 1;
            let rhs = self.parse_additive()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        self.leave(folds);
        Ok(lhs)
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_term()?;
        let mut folds = 0;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            self.enter("expression")?;
            folds += 1;
            let rhs = self.parse_term()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        self.leave(folds);
        Ok(lhs)
    }

    fn parse_term(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_unary()?;
        let mut folds = 0;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Rem,
                _ => break,
            };
            self.advance();
            self.enter("expression")?;
            folds += 1;
            let rhs = self.parse_unary()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        self.leave(folds);
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        let op = match self.peek().kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Bang => UnaryOp::Not,
            _ => return self.parse_primary(),
        };
        self.advance();
        self.enter("expression")?;
        let operand = self.parse_unary()?;
        self.leave(1);
        Ok(Expr::unary(op, operand))
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        match self.peek().kind.clone() {
            TokenKind::Int(n) => {
                self.advance();
                Ok(Expr::Int(n))
            }
            TokenKind::Float(x) => {
                self.advance();
                Ok(Expr::Float(x))
            }
            TokenKind::Ident(name) => {
                self.advance();
                if self.eat(&TokenKind::LParen) {
                    self.enter("expression")?;
                    let mut args = Vec::new();
                    if !self.check(&TokenKind::RParen) {
                        loop {
                            args.push(self.parse_expr()?);
                            if !self.eat(&TokenKind::Comma) {
                                break;
                            }
                        }
                    }
                    self.expect(TokenKind::RParen)?;
                    self.leave(1);
                    Ok(Expr::Call { name, args })
                } else {
                    Ok(Expr::Ident(name))
                }
            }
            TokenKind::LParen => {
                self.advance();
                self.enter("expression")?;
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                self.leave(1);
                Ok(expr)
            }
            _ => self.unexpected("expression"),
        }
    }
}

/// `x++` / `++x` / `x--` / `--x` as `x = x ± 1`.
fn increment(name: String, op: BinaryOp) -> Stmt {
    Stmt::Assign {
        expr: Expr::binary(op, Expr::Ident(name.clone()), Expr::Int(1)),
        name,
    }
}
