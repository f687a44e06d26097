//! Token definitions for the ELK JSON graph format.
//!
//! Trivia (whitespace and comments) never becomes a token. Malformed input
//! becomes a [`Token::Error`] carrying the problem, so the lexer never
//! stops early and the parser decides how to proceed.

use std::fmt;

use thiserror::Error;

use crate::{Span, error::ErrorCode};

/// The quote character that delimits a string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quote {
    Double,
    Single,
}

impl Quote {
    pub fn as_char(self) -> char {
        match self {
            Quote::Double => '"',
            Quote::Single => '\'',
        }
    }
}

/// A malformed token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LexError {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
}

impl LexError {
    pub(crate) fn new(code: ErrorCode, message: &'static str, help: Option<&'static str>) -> Self {
        Self {
            code,
            message,
            help,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    pub fn help(&self) -> Option<&'static str> {
        self.help
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token<'src> {
    /// A quoted string.
    ///
    /// `raw` is the text between the quotes exactly as written; `value` has
    /// escapes processed.
    String {
        raw: &'src str,
        value: String,
        quote: Quote,
    },
    /// A bare identifier. `name` excludes the `^` escape prefix.
    Identifier { name: &'src str, escaped: bool },
    /// An integer literal without decimal point or exponent.
    Integer(i64),
    /// A number with a decimal point or an exponent.
    Float(f64),

    True,
    False,
    Null,

    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Colon,
    Comma,

    /// A malformed token.
    Error(LexError),
}

impl Token<'_> {
    pub fn is_error(&self) -> bool {
        matches!(self, Token::Error(_))
    }

    /// The closing punctuation matching an opening brace or bracket.
    pub fn is_closer(&self) -> bool {
        matches!(self, Token::RightBrace | Token::RightBracket)
    }

    pub fn is_opener(&self) -> bool {
        matches!(self, Token::LeftBrace | Token::LeftBracket)
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::String { raw, quote, .. } => {
                let quote = quote.as_char();
                write!(f, "string `{quote}{raw}{quote}`")
            }
            Token::Identifier { name, escaped } => {
                let caret = if *escaped { "^" } else { "" };
                write!(f, "identifier `{caret}{name}`")
            }
            Token::Integer(value) => write!(f, "number `{value}`"),
            Token::Float(value) => write!(f, "number `{value:?}`"),
            Token::True => write!(f, "`true`"),
            Token::False => write!(f, "`false`"),
            Token::Null => write!(f, "`null`"),
            Token::LeftBrace => write!(f, "`{{`"),
            Token::RightBrace => write!(f, "`}}`"),
            Token::LeftBracket => write!(f, "`[`"),
            Token::RightBracket => write!(f, "`]`"),
            Token::Colon => write!(f, "`:`"),
            Token::Comma => write!(f, "`,`"),
            Token::Error(error) => write!(f, "invalid token ({})", error.code().description()),
        }
    }
}

/// A token with its location in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span) -> Self {
        Self { token, span }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_display() {
        let string = Token::String {
            raw: "a\\nb",
            value: "a\nb".to_string(),
            quote: Quote::Single,
        };
        assert_eq!(string.to_string(), "string `'a\\nb'`");
        assert_eq!(
            Token::Identifier {
                name: "children",
                escaped: true
            }
            .to_string(),
            "identifier `^children`"
        );
        assert_eq!(Token::Float(3.0).to_string(), "number `3.0`");
        assert_eq!(Token::LeftBrace.to_string(), "`{`");
    }
}
