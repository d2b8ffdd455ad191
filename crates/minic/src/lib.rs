//! Run minic programs from source text.
//!
//! This crate wires the pipeline together: [`Lexer`] feeds [`Parser`],
//! the parsed [`Program`] goes through [`check_program`], and the
//! [`Interpreter`] evaluates the entry function. Every stage reports
//! through the same [`Error`] type.
//!
//! ```rust
//! use minic::{run_program, Value};
//!
//! let outcome = run_program("int main() { return 6 * 7; }").unwrap();
//! assert_eq!(outcome.value, Value::Int(42));
//! assert_eq!(outcome.exit_code, 42);
//! ```

pub use minic_fmt::{format_expr, format_program};
pub use minic_interpreter::{check_program, Config, Env, Interpreter, Outcome, Value};
pub use minic_lexer::Lexer;
pub use minic_parser::Parser;
pub use minic_syntax::ast::{self, Program};
pub use minic_syntax::error::{Error, ErrorKind, Result};
pub use minic_syntax::token::{Token, TokenKind};

use tracing::debug;

/// Lex and parse `source` without checking it.
pub fn parse(source: &str) -> Result<Program> {
    let tokens = Lexer::new(source).tokenize()?;
    debug!(tokens = tokens.len(), "lexed");
    Parser::new(tokens).parse_program()
}

/// Run the front end: lex, parse and statically check `source`.
pub fn compile(source: &str) -> Result<Program> {
    let program = parse(source)?;
    check_program(&program)?;
    Ok(program)
}

/// Compile `source` and evaluate its `main` function.
pub fn run_program(source: &str) -> Result<Outcome> {
    run_program_with_config(source, &Config::default())
}

/// Compile `source` and evaluate the entry function named by `config`.
pub fn run_program_with_config(source: &str, config: &Config) -> Result<Outcome> {
    let program = compile(source)?;
    let mut interp = Interpreter::with_config(&program, config.clone())?;
    let outcome = interp.run_entry()?;
    debug!(entry = %interp.config().entry, value = %outcome.value, exit_code = outcome.exit_code, "program finished");
    Ok(outcome)
}
