//! minic lexer: converts source text into tokens.
//!
//! [`Lexer`] is an iterator, so tokens are produced on demand. The stream
//! always ends with a single [`TokenKind::Eof`] token; after that, or after
//! the first error, the iterator yields `None`.
use minic_syntax::error::{error_at, ErrorKind, Result};
use minic_syntax::token::{Token, TokenKind};

/// Character scanner that produces tokens with positions.
#[derive(Debug, Clone)]
pub struct Lexer {
    src: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
    done: bool,
}

impl Lexer {
    /// Create a new lexer over the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            src: input.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
            done: false,
        }
    }

    /// Rewind to the start of the source so the stream can be replayed.
    pub fn reset(&mut self) {
        self.pos = 0;
        self.line = 1;
        self.col = 1;
        self.done = false;
    }

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }
    fn peek_next(&self) -> Option<char> {
        self.src.get(self.pos + 1).copied()
    }
    fn advance(&mut self) -> Option<char> {
        let ch = self.src.get(self.pos).copied();
        if let Some(c) = ch {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        ch
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else if c == '/' && self.peek_next() == Some('/') {
                while let Some(c2) = self.peek() {
                    if c2 == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self, line: usize, col: usize) -> Result<TokenKind> {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if self.peek() == Some('.') {
            s.push('.');
            self.advance();
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    s.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
            return match s.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(TokenKind::Float(v)),
                _ => error_at(
                    line,
                    col,
                    ErrorKind::Lex {
                        reason: format!("float literal '{}' is out of range", s),
                    },
                ),
            };
        }
        match s.parse::<i64>() {
            Ok(v) => Ok(TokenKind::Int(v)),
            Err(_) => error_at(
                line,
                col,
                ErrorKind::Lex {
                    reason: format!("integer literal '{}' is out of range", s),
                },
            ),
        }
    }

    fn read_ident_or_keyword(&mut self) -> TokenKind {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        match s.as_str() {
            "int" => TokenKind::IntKw,
            "double" => TokenKind::DoubleKw,
            "for" => TokenKind::For,
            "while" => TokenKind::While,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "return" => TokenKind::Return,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            _ => TokenKind::Ident(s),
        }
    }

    /// Consume the current character and pick `double` if the next one is
    /// `second`, otherwise `single`.
    fn one_or_two(&mut self, second: char, double: TokenKind, single: TokenKind) -> TokenKind {
        self.advance();
        if self.peek() == Some(second) {
            self.advance();
            double
        } else {
            single
        }
    }

    /// Scan the next token. Returns `Eof` at the end of input, repeatedly.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();
        let line = self.line;
        let col = self.col;
        let kind = match self.peek() {
            None => TokenKind::Eof,
            Some('(') => {
                self.advance();
                TokenKind::LParen
            }
            Some(')') => {
                self.advance();
                TokenKind::RParen
            }
            Some('{') => {
                self.advance();
                TokenKind::LBrace
            }
            Some('}') => {
                self.advance();
                TokenKind::RBrace
            }
            Some(',') => {
                self.advance();
                TokenKind::Comma
            }
            Some(';') => {
                self.advance();
                TokenKind::Semicolon
            }
            Some('=') => self.one_or_two('=', TokenKind::EqEq, TokenKind::Equal),
            Some('!') => self.one_or_two('=', TokenKind::NotEq, TokenKind::Bang),
            Some('<') => self.one_or_two('=', TokenKind::LessEq, TokenKind::Less),
            Some('>') => self.one_or_two('=', TokenKind::GreaterEq, TokenKind::Greater),
            Some('*') => self.one_or_two('=', TokenKind::StarEq, TokenKind::Star),
            Some('/') => self.one_or_two('=', TokenKind::SlashEq, TokenKind::Slash),
            Some('%') => self.one_or_two('=', TokenKind::PercentEq, TokenKind::Percent),
            Some('+') => match self.peek_next() {
                Some('+') => {
                    self.advance();
                    self.advance();
                    TokenKind::PlusPlus
                }
                _ => self.one_or_two('=', TokenKind::PlusEq, TokenKind::Plus),
            },
            Some('-') => match self.peek_next() {
                Some('-') => {
                    self.advance();
                    self.advance();
                    TokenKind::MinusMinus
                }
                _ => self.one_or_two('=', TokenKind::MinusEq, TokenKind::Minus),
            },
            Some('&') => {
                if self.peek_next() == Some('&') {
                    self.advance();
                    self.advance();
                    TokenKind::AndAnd
                } else {
                    return error_at(
                        line,
                        col,
                        ErrorKind::Lex {
                            reason: "unexpected '&' (did you mean '&&'?)".into(),
                        },
                    );
                }
            }
            Some('|') => {
                if self.peek_next() == Some('|') {
                    self.advance();
                    self.advance();
                    TokenKind::OrOr
                } else {
                    return error_at(
                        line,
                        col,
                        ErrorKind::Lex {
                            reason: "unexpected '|' (did you mean '||'?)".into(),
                        },
                    );
                }
            }
            Some(c) if c.is_ascii_digit() => self.read_number(line, col)?,
            Some(c) if c.is_ascii_alphabetic() || c == '_' => self.read_ident_or_keyword(),
            Some(other) => {
                return error_at(
                    line,
                    col,
                    ErrorKind::Lex {
                        reason: format!("unexpected character '{}'", other),
                    },
                );
            }
        };
        Ok(Token { kind, line, col })
    }

    /// Tokenize the entire input into a vector of tokens ending with Eof.
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        self.collect()
    }
}

impl Iterator for Lexer {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let tok = self.next_token();
        match &tok {
            Ok(t) if t.kind == TokenKind::Eof => self.done = true,
            Err(_) => self.done = true,
            Ok(_) => {}
        }
        Some(tok)
    }
}

impl std::iter::FusedIterator for Lexer {}
