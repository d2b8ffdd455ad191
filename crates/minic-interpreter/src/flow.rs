//! Control flow for the interpreter.

use crate::value::Value;

#[derive(Debug)]
pub(crate) enum Flow {
    /// Fall through to the next statement
    Normal,
    /// Unwind the current function with the given value
    Return(Value),
    /// Leave the innermost loop
    Break,
    /// Skip to the innermost loop's step
    Continue,
}
