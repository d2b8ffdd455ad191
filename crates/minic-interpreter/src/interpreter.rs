//! Main interpreter engine.

use std::collections::HashMap;
use std::{panic, thread};

use crate::check::{arity_mismatch, undefined_function};
use crate::config::Config;
use crate::env::Env;
use crate::flow::Flow;
use crate::value::Value;
use minic_syntax::ast::*;
use minic_syntax::error::{error, ErrorKind, Result};
use tracing::{debug, warn};

/// Result of running a program's entry function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    /// What the entry function returned, in its declared type
    pub value: Value,
    /// The int result truncated to 32 bits; 0 for a `double` entry
    pub exit_code: i32,
}

/// Tree-walking evaluator over a borrowed [`Program`].
pub struct Interpreter<'p> {
    functions: HashMap<&'p str, &'p Function>,
    config: Config,
    /// Number of active calls
    depth: usize,
}

impl<'p> Interpreter<'p> {
    pub fn new(program: &'p Program) -> Result<Self> {
        Self::with_config(program, Config::default())
    }

    pub fn with_config(program: &'p Program, config: Config) -> Result<Self> {
        let mut functions = HashMap::with_capacity(program.functions.len());
        for f in &program.functions {
            if functions.insert(f.name.as_str(), f).is_some() {
                return error(ErrorKind::DuplicateFunction(f.name.clone()));
            }
        }
        debug!(functions = functions.len(), entry = %config.entry, "interpreter ready");
        Ok(Self {
            functions,
            config,
            depth: 0,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Call the configured entry function (no arguments) and derive the
    /// exit code from its result.
    pub fn run_entry(&mut self) -> Result<Outcome> {
        self.on_eval_stack(|interp| interp.run_entry_here())
    }

    fn run_entry_here(&mut self) -> Result<Outcome> {
        let func = self.lookup(&self.config.entry)?;
        if !func.params.is_empty() {
            return error(ErrorKind::TypeMismatch(format!(
                "entry function '{}' must not take parameters",
                func.name
            )));
        }
        let value = self.invoke(func, Vec::new())?;
        let exit_code = match (func.return_type, value) {
            (Type::Int, Value::Int(n)) => n as i32,
            (Type::Int, Value::Float(x)) => x as i32,
            (Type::Double, _) => 0,
        };
        Ok(Outcome { value, exit_code })
    }

    /// Call a function by name.
    pub fn call(&mut self, name: &str, args: Vec<Value>) -> Result<Value> {
        let func = self.lookup(name)?;
        self.on_eval_stack(move |interp| interp.invoke(func, args))
    }

    /// Run `f` on a thread whose stack fits `max_call_depth` nested calls,
    /// so the depth limit trips before the host stack overflows.
    fn on_eval_stack<T, F>(&mut self, f: F) -> Result<T>
    where
        T: Send,
        F: FnOnce(&mut Self) -> Result<T> + Send,
    {
        let limit = self.config.max_call_depth;
        let stack_size = self.config.eval_stack_size();
        thread::scope(|scope| {
            let spawned = thread::Builder::new()
                .name("minic-eval".to_string())
                .stack_size(stack_size)
                .spawn_scoped(scope, move || f(self));
            match spawned {
                Ok(handle) => handle
                    .join()
                    .unwrap_or_else(|payload| panic::resume_unwind(payload)),
                Err(e) => {
                    warn!(stack_size, error = %e, "cannot reserve evaluation stack");
                    error(ErrorKind::CallDepthExceeded(limit))
                }
            }
        })
    }

    fn lookup(&self, name: &str) -> Result<&'p Function> {
        self.functions
            .get(name)
            .copied()
            .ok_or_else(|| undefined_function(name))
    }

    /// Run `func` in a fresh environment with `args` bound to its
    /// parameters, until it returns. Runs on the caller's stack; [`call`]
    /// and [`run_entry`] provide one sized for the depth limit.
    ///
    /// [`call`]: Interpreter::call
    /// [`run_entry`]: Interpreter::run_entry
    pub fn invoke(&mut self, func: &Function, args: Vec<Value>) -> Result<Value> {
        if func.params.len() != args.len() {
            return Err(arity_mismatch(&func.name, func.params.len(), args.len()));
        }
        if self.depth >= self.config.max_call_depth {
            return error(ErrorKind::CallDepthExceeded(self.config.max_call_depth));
        }
        self.depth += 1;
        debug!(function = %func.name, depth = self.depth, "call");
        let result = self.invoke_frame(func, args);
        self.depth -= 1;
        if let Ok(v) = &result {
            debug!(function = %func.name, value = %v, "return");
        }
        result
    }

    fn invoke_frame(&mut self, func: &Function, args: Vec<Value>) -> Result<Value> {
        let mut env = Env::new();
        for (p, v) in func.params.iter().zip(args) {
            env.define(&p.name, v, p.ty)?;
        }
        match self.exec_stmts(&mut env, &func.body)? {
            Flow::Return(v) => Ok(v.convert(func.return_type)),
            Flow::Normal => error(ErrorKind::MissingReturn(func.name.clone())),
            Flow::Break => error(ErrorKind::TypeMismatch("'break' outside of a loop".into())),
            Flow::Continue => error(ErrorKind::TypeMismatch(
                "'continue' outside of a loop".into(),
            )),
        }
    }

    /// Run statements in the current scope, stopping at the first one that
    /// does not fall through.
    fn exec_stmts(&mut self, env: &mut Env, body: &[Stmt]) -> Result<Flow> {
        for s in body {
            match self.exec_stmt(env, s)? {
                Flow::Normal => {}
                other => return Ok(other),
            }
        }
        Ok(Flow::Normal)
    }

    /// Run statements in a new scope.
    pub(crate) fn exec_block(&mut self, env: &mut Env, body: &[Stmt]) -> Result<Flow> {
        env.push_scope();
        let flow = self.exec_stmts(env, body);
        env.pop_scope();
        flow
    }

    pub(crate) fn exec_stmt(&mut self, env: &mut Env, stmt: &Stmt) -> Result<Flow> {
        match stmt {
            Stmt::VarDecl { name, ty, init } => {
                let v = match init {
                    Some(e) => self.eval_expr(env, e)?,
                    None => Value::zero(*ty),
                };
                env.define(name, v, *ty)?;
                Ok(Flow::Normal)
            }
            Stmt::Assign { name, expr } => {
                let v = self.eval_expr(env, expr)?;
                env.assign(name, v)?;
                Ok(Flow::Normal)
            }
            Stmt::For {
                init,
                cond,
                step,
                body,
            } => self.exec_for(env, init.as_deref(), cond.as_ref(), step.as_deref(), body),
            Stmt::While { cond, body } => {
                while self.eval_expr(env, cond)?.truthy()? {
                    match self.exec_block(env, body)? {
                        Flow::Normal | Flow::Continue => {}
                        Flow::Break => break,
                        Flow::Return(v) => return Ok(Flow::Return(v)),
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::If {
                cond,
                then_body,
                else_body,
            } => {
                if self.eval_expr(env, cond)?.truthy()? {
                    self.exec_block(env, then_body)
                } else if let Some(b) = else_body {
                    self.exec_block(env, b)
                } else {
                    Ok(Flow::Normal)
                }
            }
            Stmt::Block(body) => self.exec_block(env, body),
            Stmt::Return(e) => Ok(Flow::Return(self.eval_expr(env, e)?)),
            Stmt::Break => Ok(Flow::Break),
            Stmt::Continue => Ok(Flow::Continue),
            Stmt::Expr(e) => {
                self.eval_expr(env, e)?;
                Ok(Flow::Normal)
            }
        }
    }

    pub(crate) fn eval_expr(&mut self, env: &Env, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Int(n) => Ok(Value::Int(*n)),
            Expr::Float(x) => Ok(Value::Float(*x)),
            Expr::Ident(name) => match env.get(name) {
                Some(b) => Ok(b.value),
                None => error(ErrorKind::UnboundVariable(name.clone())),
            },
            Expr::Unary { op, operand } => {
                let v = self.eval_expr(env, operand)?;
                match (op, v) {
                    (UnaryOp::Neg, Value::Int(n)) => Ok(Value::Int(n.wrapping_neg())),
                    (UnaryOp::Neg, Value::Float(x)) => Ok(Value::Float(-x)),
                    (UnaryOp::Not, v) => Ok(Value::Int(!v.truthy()? as i64)),
                }
            }
            Expr::Binary {
                op: BinaryOp::And,
                lhs,
                rhs,
            } => {
                let result = self.eval_expr(env, lhs)?.truthy()? && self.eval_expr(env, rhs)?.truthy()?;
                Ok(Value::Int(result as i64))
            }
            Expr::Binary {
                op: BinaryOp::Or,
                lhs,
                rhs,
            } => {
                let result = self.eval_expr(env, lhs)?.truthy()? || self.eval_expr(env, rhs)?.truthy()?;
                Ok(Value::Int(result as i64))
            }
            Expr::Binary { op, lhs, rhs } => {
                let a = self.eval_expr(env, lhs)?;
                let b = self.eval_expr(env, rhs)?;
                binary(*op, a, b)
            }
            Expr::Call { name, args } => {
                let func = self.lookup(name)?;
                let mut evaluated = Vec::with_capacity(args.len());
                for a in args {
                    evaluated.push(self.eval_expr(env, a)?);
                }
                self.invoke(func, evaluated)
            }
        }
    }
}

/// Apply a binary operator. Mixed int/double operands are promoted to
/// double; comparisons and logic yield `Int(0 | 1)`.
pub fn binary(op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => int_binary(op, a, b),
        (a, b) => float_binary(op, a.as_f64(), b.as_f64()),
    }
}

fn int_binary(op: BinaryOp, a: i64, b: i64) -> Result<Value> {
    let v = match op {
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Sub => a.wrapping_sub(b),
        BinaryOp::Mul => a.wrapping_mul(b),
        BinaryOp::Div | BinaryOp::Rem if b == 0 => return error(ErrorKind::DivisionByZero),
        BinaryOp::Div => a.wrapping_div(b),
        BinaryOp::Rem => a.wrapping_rem(b),
        BinaryOp::Lt => (a < b) as i64,
        BinaryOp::Le => (a <= b) as i64,
        BinaryOp::Gt => (a > b) as i64,
        BinaryOp::Ge => (a >= b) as i64,
        BinaryOp::Eq => (a == b) as i64,
        BinaryOp::Ne => (a != b) as i64,
        BinaryOp::And => (a != 0 && b != 0) as i64,
        BinaryOp::Or => (a != 0 || b != 0) as i64,
    };
    Ok(Value::Int(v))
}

fn float_binary(op: BinaryOp, a: f64, b: f64) -> Result<Value> {
    let cmp = |c: bool| -> Result<Value> { Ok(Value::Int(c as i64)) };
    match op {
        BinaryOp::Add => Ok(Value::Float(a + b)),
        BinaryOp::Sub => Ok(Value::Float(a - b)),
        BinaryOp::Mul => Ok(Value::Float(a * b)),
        BinaryOp::Div => Ok(Value::Float(a / b)),
        BinaryOp::Lt => cmp(a < b),
        BinaryOp::Le => cmp(a <= b),
        BinaryOp::Gt => cmp(a > b),
        BinaryOp::Ge => cmp(a >= b),
        BinaryOp::Eq => cmp(a == b),
        BinaryOp::Ne => cmp(a != b),
        BinaryOp::Rem | BinaryOp::And | BinaryOp::Or => error(ErrorKind::TypeMismatch(format!(
            "'{}' requires int operands",
            op.symbol()
        ))),
    }
}
