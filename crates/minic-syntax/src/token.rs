//! Token definitions for the minic language.
//!
//! Tokens are the smallest meaningful units of minic source code. The lexer
//! produces them lazily; the parser consumes them through a cursor.
//!
//! # Token Categories
//!
//! - **Identifiers**: variable and function names (`fib`, `prev2`)
//! - **Literals**: integer and floating-point numbers (`42`, `3.5`)
//! - **Keywords**: type names and control flow (`int`, `double`, `for`, `return`)
//! - **Operators**: arithmetic, comparison, logical and assignment operators
//! - **Punctuation**: `(`, `)`, `{`, `}`, `,`, `;`
//! - **Special**: end-of-input marker
//!
//! # Examples
//!
//! ```rust
//! use minic_syntax::{Token, TokenKind};
//!
//! let keyword = Token { kind: TokenKind::IntKw, line: 1, col: 1 };
//! let name = Token { kind: TokenKind::Ident("fib".to_string()), line: 1, col: 5 };
//! let literal = Token { kind: TokenKind::Float(3.5), line: 2, col: 12 };
//!
//! assert!(keyword.kind.is_type_keyword());
//! assert_eq!(name.kind.to_string(), "identifier 'fib'");
//! assert_eq!(literal.kind.to_string(), "float literal 3.5");
//! ```

use std::fmt;

/// Token types that can be produced by the minic lexer.
///
/// Literal and identifier variants carry their payload; every other
/// variant is a fixed spelling.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // === Literals ===
    /// An identifier (variable or function name)
    Ident(String),

    /// An integer literal (no decimal point)
    ///
    /// Examples: `0`, `400`, `10946`
    Int(i64),

    /// A floating-point literal (contains a decimal point)
    ///
    /// Examples: `0.5`, `3.`, `133.25`
    Float(f64),

    // === Keywords ===
    /// The `int` type keyword
    IntKw,

    /// The `double` type keyword
    DoubleKw,

    /// The `for` keyword
    For,

    /// The `while` keyword
    While,

    /// The `if` keyword
    If,

    /// The `else` keyword
    Else,

    /// The `return` keyword
    Return,

    /// The `break` keyword
    Break,

    /// The `continue` keyword
    Continue,

    // === Punctuation ===
    /// Left parenthesis `(`
    LParen,

    /// Right parenthesis `)`
    RParen,

    /// Left brace `{`
    LBrace,

    /// Right brace `}`
    RBrace,

    /// Comma separator `,`
    Comma,

    /// Statement terminator `;`
    Semicolon,

    // === Operators ===
    /// Assignment operator `=`
    Equal,

    /// `+=`
    PlusEq,

    /// `-=`
    MinusEq,

    /// `*=`
    StarEq,

    /// `/=`
    SlashEq,

    /// `%=`
    PercentEq,

    /// Increment operator `++`
    PlusPlus,

    /// Decrement operator `--`
    MinusMinus,

    /// Addition operator `+`
    Plus,

    /// Subtraction or negation operator `-`
    Minus,

    /// Multiplication operator `*`
    Star,

    /// Division operator `/`
    Slash,

    /// Remainder operator `%`
    Percent,

    /// Equality comparison `==`
    EqEq,

    /// Inequality comparison `!=`
    NotEq,

    /// `<`
    Less,

    /// `<=`
    LessEq,

    /// `>`
    Greater,

    /// `>=`
    GreaterEq,

    /// Logical AND `&&`
    AndAnd,

    /// Logical OR `||`
    OrOr,

    /// Logical NOT `!`
    Bang,

    /// End-of-input marker, always the last token of a stream
    Eof,
}

impl TokenKind {
    /// Returns `true` for the keywords that name a type (`int`, `double`).
    pub fn is_type_keyword(&self) -> bool {
        matches!(self, TokenKind::IntKw | TokenKind::DoubleKw)
    }

    /// The fixed source spelling of this token, if it has one.
    pub fn symbol(&self) -> Option<&'static str> {
        let s = match self {
            TokenKind::Ident(_) | TokenKind::Int(_) | TokenKind::Float(_) | TokenKind::Eof => {
                return None
            }
            TokenKind::IntKw => "int",
            TokenKind::DoubleKw => "double",
            TokenKind::For => "for",
            TokenKind::While => "while",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::Return => "return",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Equal => "=",
            TokenKind::PlusEq => "+=",
            TokenKind::MinusEq => "-=",
            TokenKind::StarEq => "*=",
            TokenKind::SlashEq => "/=",
            TokenKind::PercentEq => "%=",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Less => "<",
            TokenKind::LessEq => "<=",
            TokenKind::Greater => ">",
            TokenKind::GreaterEq => ">=",
            TokenKind::AndAnd => "&&",
            TokenKind::OrOr => "||",
            TokenKind::Bang => "!",
        };
        Some(s)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident(name) => write!(f, "identifier '{}'", name),
            TokenKind::Int(n) => write!(f, "integer literal {}", n),
            TokenKind::Float(x) => write!(f, "float literal {}", x),
            TokenKind::Eof => write!(f, "end of input"),
            other => match other.symbol() {
                Some(s) => write!(f, "'{}'", s),
                None => write!(f, "{:?}", other),
            },
        }
    }
}

/// A token with its source location.
///
/// Lines and columns are 1-based and point at the first character of the
/// token. They flow into [`Error`](crate::Error) so lex and parse failures
/// can be reported precisely.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The type and semantic content of this token
    pub kind: TokenKind,

    /// Line number in the source text (1-based)
    pub line: usize,

    /// Column number in the source text (1-based)
    pub col: usize,
}
