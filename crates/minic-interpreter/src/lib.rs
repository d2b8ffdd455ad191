//! minic interpreter: checks and evaluates parsed programs with a
//! tree-walking interpreter.
//!
//! [`check_program`] rejects name errors before anything runs;
//! [`Interpreter`] then executes functions over a borrowed [`Program`],
//! one [`Env`] per call.
//!
//! [`Program`]: minic_syntax::ast::Program

pub mod check;
pub mod config;
pub mod env;
mod flow;
mod for_loop;
pub mod interpreter;
pub mod value;

pub use check::check_program;
pub use config::Config;
pub use env::{Binding, Env};
pub use interpreter::{Interpreter, Outcome};
pub use value::Value;
