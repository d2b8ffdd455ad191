//! Canonical source printer for minic programs.
//!
//! The output re-parses to the same AST: operands that are not atoms are
//! parenthesised and float literals always keep a decimal point.

use minic_syntax::ast::*;

const INDENT: usize = 4;

pub fn format_program(p: &Program) -> String {
    let mut out = String::new();
    for (i, f) in p.functions.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format_function(f));
    }
    out
}

pub fn format_function(f: &Function) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} {}(", f.return_type, f.name));
    for (i, p) in f.params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&format!("{} {}", p.ty, p.name));
    }
    out.push_str(") {\n");
    for s in &f.body {
        out.push_str(&format_stmt(s, INDENT));
    }
    out.push_str("}\n");
    out
}

fn format_block(body: &[Stmt], indent: usize) -> String {
    let mut out = String::from("{\n");
    for st in body {
        out.push_str(&format_stmt(st, indent + INDENT));
    }
    out.push_str(&" ".repeat(indent));
    out.push('}');
    out
}

/// Statements that also fit in a `for` header, without the `;`.
fn format_simple(s: &Stmt) -> String {
    match s {
        Stmt::VarDecl { name, ty, init } => match init {
            Some(e) => format!("{} {} = {}", ty, name, format_expr(e)),
            None => format!("{} {}", ty, name),
        },
        Stmt::Assign { name, expr } => format!("{} = {}", name, format_expr(expr)),
        Stmt::Expr(e) => format_expr(e),
        // Not produced by the parser inside headers; print as a block.
        other => format!("{{ {} }}", format_stmt(other, 0).trim_end()),
    }
}

pub fn format_stmt(s: &Stmt, indent: usize) -> String {
    let pad = " ".repeat(indent);
    match s {
        Stmt::VarDecl { .. } | Stmt::Assign { .. } | Stmt::Expr(_) => {
            format!("{}{};\n", pad, format_simple(s))
        }
        Stmt::Return(e) => format!("{}return {};\n", pad, format_expr(e)),
        Stmt::Break => format!("{}break;\n", pad),
        Stmt::Continue => format!("{}continue;\n", pad),
        Stmt::Block(body) => format!("{}{}\n", pad, format_block(body, indent)),
        Stmt::For {
            init,
            cond,
            step,
            body,
        } => {
            let init = init.as_deref().map(format_simple).unwrap_or_default();
            let cond = cond.as_ref().map(format_expr).unwrap_or_default();
            let step = step.as_deref().map(format_simple).unwrap_or_default();
            let mut header = format!("for ({};", init);
            if !cond.is_empty() {
                header.push(' ');
                header.push_str(&cond);
            }
            header.push(';');
            if !step.is_empty() {
                header.push(' ');
                header.push_str(&step);
            }
            header.push(')');
            format!("{}{} {}\n", pad, header, format_block(body, indent))
        }
        Stmt::While { cond, body } => format!(
            "{}while ({}) {}\n",
            pad,
            format_expr(cond),
            format_block(body, indent)
        ),
        Stmt::If {
            cond,
            then_body,
            else_body,
        } => {
            let mut out = format!("{}if ({}) {}", pad, format_expr(cond), format_block(then_body, indent));
            if let Some(b) = else_body {
                out.push_str(" else ");
                out.push_str(&format_block(b, indent));
            }
            out.push('\n');
            out
        }
    }
}

pub fn format_expr(e: &Expr) -> String {
    match e {
        Expr::Int(n) => n.to_string(),
        Expr::Float(x) => format_float(*x),
        Expr::Ident(s) => s.clone(),
        Expr::Unary { op, operand } => format!("{}{}", op.symbol(), wrap(operand)),
        Expr::Binary { op, lhs, rhs } => format!("{} {} {}", wrap(lhs), op.symbol(), wrap(rhs)),
        Expr::Call { name, args } => {
            let args: Vec<String> = args.iter().map(format_expr).collect();
            format!("{}({})", name, args.join(", "))
        }
    }
}

fn format_float(x: f64) -> String {
    let s = x.to_string();
    if s.contains('.') {
        s
    } else {
        format!("{}.0", s)
    }
}

fn wrap(e: &Expr) -> String {
    match e {
        Expr::Int(_) | Expr::Float(_) | Expr::Ident(_) | Expr::Call { .. } => format_expr(e),
        _ => format!("({})", format_expr(e)),
    }
}
