//! Error types shared by every stage of the minic pipeline.
//!
//! A single [`Error`] type travels from the lexer through the parser, the
//! static checker and the interpreter, so the caller of the top-level
//! `run_program` sees one discriminated result. The [`ErrorKind`] says what
//! went wrong; the optional line and column say where, when that is known.
//!
//! # Examples
//!
//! ```rust
//! use minic_syntax::error::{Error, ErrorKind, Result, error, error_at};
//!
//! fn divide(a: i64, b: i64) -> Result<i64> {
//!     if b == 0 {
//!         error(ErrorKind::DivisionByZero)
//!     } else {
//!         Ok(a / b)
//!     }
//! }
//!
//! assert!(divide(1, 0).unwrap_err().is(&ErrorKind::DivisionByZero));
//!
//! let located: Result<()> = error_at(3, 7, ErrorKind::Lex { reason: "unexpected character '$'".into() });
//! assert_eq!(located.unwrap_err().to_string(), "unexpected character '$' at 3:7");
//! ```

use std::fmt;

use crate::token::TokenKind;

/// What went wrong.
///
/// The variants are closed: every consumer matches them exhaustively.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ErrorKind {
    /// The lexer met text it cannot turn into a token.
    #[error("{reason}")]
    Lex { reason: String },

    /// The parser expected one kind of token and found another.
    #[error("expected {expected}, found {found}")]
    Parse { expected: String, found: TokenKind },

    /// A name was read or assigned without a visible declaration.
    #[error("undefined variable '{0}'")]
    UnboundVariable(String),

    /// A name was declared twice in the same scope.
    #[error("variable '{0}' is already declared in this scope")]
    RedeclaredVariable(String),

    /// Integer division or remainder by zero.
    #[error("integer division by zero")]
    DivisionByZero,

    /// Operand, condition or call shape does not fit: unknown function,
    /// wrong arity, float condition and so on.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// Two functions share one name.
    #[error("function '{0}' is defined more than once")]
    DuplicateFunction(String),

    /// Control reached the end of a function body without `return`.
    #[error("function '{0}' finished without returning a value")]
    MissingReturn(String),

    /// Nested calls went deeper than the configured limit.
    #[error("call depth exceeded the limit of {0}")]
    CallDepthExceeded(usize),
}

/// An error that occurred while processing a minic program.
///
/// Lex and parse errors always carry a 1-based line and column; runtime
/// errors usually do not, since the AST does not keep positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// What went wrong
    pub kind: ErrorKind,

    /// Optional line number in source text (1-based)
    pub line: Option<usize>,

    /// Optional column number in source text (1-based)
    pub col: Option<usize>,
}

impl Error {
    /// Creates an error without source location.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            line: None,
            col: None,
        }
    }

    /// Creates an error located at `line:col`.
    pub fn with_span(kind: ErrorKind, line: usize, col: usize) -> Self {
        Self {
            kind,
            line: Some(line),
            col: Some(col),
        }
    }

    /// Returns `true` if this error is of the given kind.
    pub fn is(&self, kind: &ErrorKind) -> bool {
        &self.kind == kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(l), Some(c)) = (self.line, self.col) {
            write!(f, "{} at {}:{}", self.kind, l, c)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

/// A specialized `Result` type for minic operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Shorthand for `Err(Error::new(kind))`.
pub fn error<T>(kind: ErrorKind) -> Result<T> {
    Err(Error::new(kind))
}

/// Shorthand for `Err(Error::with_span(kind, line, col))`.
pub fn error_at<T>(line: usize, col: usize, kind: ErrorKind) -> Result<T> {
    Err(Error::with_span(kind, line, col))
}
