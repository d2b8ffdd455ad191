//! Value types for the minic interpreter.

use std::fmt;

use minic_syntax::ast::Type;
use minic_syntax::error::{error, ErrorKind, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// A 64-bit signed integer; arithmetic wraps on overflow
    Int(i64),
    /// An IEEE-754 double
    Float(f64),
}

impl Value {
    /// The zero value a declaration without initializer starts from.
    pub fn zero(ty: Type) -> Self {
        match ty {
            Type::Int => Value::Int(0),
            Type::Double => Value::Float(0.0),
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Value::Int(n) => n as f64,
            Value::Float(x) => x,
        }
    }

    /// Convert to a declared type the way C does implicitly: ints widen,
    /// doubles truncate toward zero (saturating, NaN becomes 0).
    pub fn convert(self, ty: Type) -> Self {
        match (self, ty) {
            (Value::Int(n), Type::Double) => Value::Float(n as f64),
            (Value::Float(x), Type::Int) => Value::Int(x as i64),
            (v, _) => v,
        }
    }

    /// Conditions must be ints: zero is false, anything else true.
    pub fn truthy(self) -> Result<bool> {
        match self {
            Value::Int(n) => Ok(n != 0),
            Value::Float(x) => error(ErrorKind::TypeMismatch(format!(
                "condition must be an int, got double {}",
                x
            ))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
        }
    }
}
