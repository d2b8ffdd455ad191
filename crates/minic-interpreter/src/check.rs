//! Static checks run before evaluation.
//!
//! Walks every function with the same scope rules the interpreter uses and
//! rejects programs that would certainly fail on a name: duplicate
//! functions, undeclared or redeclared variables, unknown callees and
//! wrong argument counts.

use std::collections::{HashMap, HashSet};

use minic_syntax::ast::*;
use minic_syntax::error::{error, Error, ErrorKind, Result};
use tracing::debug;

pub(crate) fn undefined_function(name: &str) -> Error {
    Error::new(ErrorKind::TypeMismatch(format!(
        "call to undefined function '{}'",
        name
    )))
}

pub(crate) fn arity_mismatch(name: &str, expected: usize, got: usize) -> Error {
    Error::new(ErrorKind::TypeMismatch(format!(
        "function '{}' expects {} argument(s), got {}",
        name, expected, got
    )))
}

/// Check a whole program. The first problem found is returned.
pub fn check_program(program: &Program) -> Result<()> {
    let mut arities: HashMap<&str, usize> = HashMap::new();
    for f in &program.functions {
        if arities.insert(f.name.as_str(), f.params.len()).is_some() {
            return error(ErrorKind::DuplicateFunction(f.name.clone()));
        }
    }
    for f in &program.functions {
        let mut checker = Checker {
            arities: &arities,
            scopes: vec![HashSet::new()],
        };
        checker.check_function(f)?;
    }
    debug!(functions = program.functions.len(), "program checked");
    Ok(())
}

struct Checker<'a> {
    arities: &'a HashMap<&'a str, usize>,
    scopes: Vec<HashSet<&'a str>>,
}

impl<'a> Checker<'a> {
    fn declare(&mut self, name: &'a str) -> Result<()> {
        // Never empty: the function scope is pushed first and never popped.
        let Some(scope) = self.scopes.last_mut() else {
            return error(ErrorKind::UnboundVariable(name.to_string()));
        };
        if !scope.insert(name) {
            return error(ErrorKind::RedeclaredVariable(name.to_string()));
        }
        Ok(())
    }

    fn resolve(&self, name: &str) -> Result<()> {
        if self.scopes.iter().any(|s| s.contains(name)) {
            Ok(())
        } else {
            error(ErrorKind::UnboundVariable(name.to_string()))
        }
    }

    fn in_scope(&mut self, f: impl FnOnce(&mut Self) -> Result<()>) -> Result<()> {
        self.scopes.push(HashSet::new());
        let result = f(self);
        self.scopes.pop();
        result
    }

    fn check_function(&mut self, func: &'a Function) -> Result<()> {
        for p in &func.params {
            self.declare(&p.name)?;
        }
        self.check_stmts(&func.body)
    }

    fn check_stmts(&mut self, body: &'a [Stmt]) -> Result<()> {
        body.iter().try_for_each(|s| self.check_stmt(s))
    }

    fn check_block(&mut self, body: &'a [Stmt]) -> Result<()> {
        self.in_scope(|c| c.check_stmts(body))
    }

    fn check_stmt(&mut self, stmt: &'a Stmt) -> Result<()> {
        match stmt {
            Stmt::VarDecl { name, init, .. } => {
                if let Some(e) = init {
                    self.check_expr(e)?;
                }
                self.declare(name)
            }
            Stmt::Assign { name, expr } => {
                self.check_expr(expr)?;
                self.resolve(name)
            }
            Stmt::For {
                init,
                cond,
                step,
                body,
            } => self.in_scope(|c| {
                if let Some(s) = init {
                    c.check_stmt(s)?;
                }
                if let Some(e) = cond {
                    c.check_expr(e)?;
                }
                c.check_block(body)?;
                if let Some(s) = step {
                    c.check_stmt(s)?;
                }
                Ok(())
            }),
            Stmt::While { cond, body } => {
                self.check_expr(cond)?;
                self.check_block(body)
            }
            Stmt::If {
                cond,
                then_body,
                else_body,
            } => {
                self.check_expr(cond)?;
                self.check_block(then_body)?;
                match else_body {
                    Some(b) => self.check_block(b),
                    None => Ok(()),
                }
            }
            Stmt::Block(body) => self.check_block(body),
            Stmt::Return(e) | Stmt::Expr(e) => self.check_expr(e),
            Stmt::Break | Stmt::Continue => Ok(()),
        }
    }

    fn check_expr(&mut self, expr: &'a Expr) -> Result<()> {
        match expr {
            Expr::Int(_) | Expr::Float(_) => Ok(()),
            Expr::Ident(name) => self.resolve(name),
            Expr::Unary { operand, .. } => self.check_expr(operand),
            Expr::Binary { lhs, rhs, .. } => {
                self.check_expr(lhs)?;
                self.check_expr(rhs)
            }
            Expr::Call { name, args } => {
                let expected = *self
                    .arities
                    .get(name.as_str())
                    .ok_or_else(|| undefined_function(name))?;
                if expected != args.len() {
                    return Err(arity_mismatch(name, expected, args.len()));
                }
                args.iter().try_for_each(|a| self.check_expr(a))
            }
        }
    }
}
