//! Lexical analyzer for ELK JSON graph text.
//!
//! The lexer converts source text into a stream of [`Token`]s. Whitespace,
//! `//` line comments and `/* */` block comments are skipped. Malformed input
//! never stops the lexer: it produces a [`Token::Error`] spanning the bad
//! text and resumes at the next plausible token boundary.
//!
//! [`Lexer`] yields tokens on demand; [`tokenize`] collects a whole document.

use log::debug;
use winnow::{
    Parser as _,
    ascii::{digit1, multispace1},
    combinator::{alt, cut_err, fail, opt, preceded, repeat, terminated},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{any, none_of, one_of, take_till, take_until, take_while},
};

use crate::{
    Span,
    error::{Diagnostic, ErrorCode},
    tokens::{LexError, PositionedToken, Quote, Token},
};

/// Diagnostic information attached to winnow errors via `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
}

impl From<&LexerDiagnostic> for LexError {
    fn from(diagnostic: &LexerDiagnostic) -> Self {
        LexError::new(diagnostic.code, diagnostic.message, diagnostic.help)
    }
}

const UNTERMINATED_STRING: LexerDiagnostic = LexerDiagnostic {
    code: ErrorCode::E001,
    message: "unterminated string literal",
    help: Some("add the closing quote"),
};

const UNEXPECTED_CHARACTER: LexerDiagnostic = LexerDiagnostic {
    code: ErrorCode::E002,
    message: "unexpected character",
    help: None,
};

const INVALID_ESCAPE: LexerDiagnostic = LexerDiagnostic {
    code: ErrorCode::E003,
    message: "invalid escape sequence",
    help: Some(
        "valid escapes: `\\b`, `\\t`, `\\n`, `\\f`, `\\r`, `\\\"`, `\\'`, `\\\\`, `\\/`, `\\uXXXX`",
    ),
};

const INVALID_UNICODE_ESCAPE: LexerDiagnostic = LexerDiagnostic {
    code: ErrorCode::E004,
    message: "invalid unicode escape",
    help: Some("use `\\u` followed by exactly four hex digits"),
};

const INVALID_CODEPOINT: LexerDiagnostic = LexerDiagnostic {
    code: ErrorCode::E005,
    message: "invalid unicode codepoint",
    help: Some("surrogates must come in pairs: `\\uD83D\\uDE00`"),
};

const UNTERMINATED_COMMENT: LexerDiagnostic = LexerDiagnostic {
    code: ErrorCode::E006,
    message: "unterminated block comment",
    help: Some("close the comment with `*/`"),
};

const INTEGER_OUT_OF_RANGE: LexerDiagnostic = LexerDiagnostic {
    code: ErrorCode::E007,
    message: "integer literal out of range",
    help: Some("integers must fit in a signed 64-bit value; write a decimal point to use a float"),
};

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<LexerDiagnostic>>;

/// Parse four hex digits of a `\u` escape.
fn hex4(input: &mut &str) -> IResult<u32> {
    take_while(4, |c: char| c.is_ascii_hexdigit())
        .try_map(|hex: &str| u32::from_str_radix(hex, 16))
        .context(INVALID_UNICODE_ESCAPE)
        .parse_next(input)
}

fn codepoint(input: &mut &str, code: u32) -> IResult<char> {
    match char::from_u32(code) {
        Some(ch) => Ok(ch),
        None => fail.context(INVALID_CODEPOINT).parse_next(input),
    }
}

/// Parse the part of a unicode escape after `\u`.
///
/// A high surrogate must be followed by `\u` and a low surrogate.
fn unicode_escape(input: &mut &str) -> IResult<char> {
    let high = hex4.parse_next(input)?;
    if !(0xD800..=0xDBFF).contains(&high) {
        return codepoint(input, high);
    }

    let low = preceded("\\u", hex4)
        .verify(|low: &u32| (0xDC00..=0xDFFF).contains(low))
        .context(INVALID_CODEPOINT)
        .parse_next(input)?;
    codepoint(input, 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00))
}

/// Parse an escape sequence starting with backslash.
fn escape(input: &mut &str) -> IResult<char> {
    '\\'.parse_next(input)?;

    cut_err(alt((
        one_of(['b', 't', 'n', 'f', 'r', '"', '\'', '\\', '/']).map(|c| match c {
            'b' => '\u{08}',
            't' => '\t',
            'n' => '\n',
            'f' => '\u{0C}',
            'r' => '\r',
            other => other,
        }),
        preceded('u', cut_err(unicode_escape)),
    )))
    .context(INVALID_ESCAPE)
    .parse_next(input)
}

/// Process the escapes of a string literal's raw content.
fn unescape(raw: &str) -> Result<String, LexError> {
    let mut input = raw;
    repeat(0.., alt((escape, none_of('\\'))))
        .fold(String::new, |mut acc, ch| {
            acc.push(ch);
            acc
        })
        .parse_next(&mut input)
        .map_err(|err| LexError::from(first_context(&err).unwrap_or(&INVALID_ESCAPE)))
}

/// Parse a string literal in double or single quotes.
///
/// Any character may follow a backslash and line breaks are allowed, so the
/// extent of the literal is known before its escapes are checked. A literal
/// with a bad escape becomes a single error token.
fn string_literal<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let quote = alt(('"'.value(Quote::Double), '\''.value(Quote::Single))).parse_next(input)?;
    let closing = quote.as_char();

    let content = repeat::<_, _, (), _, _>(
        0..,
        alt((
            preceded('\\', any).void(),
            none_of([closing, '\\']).void(),
        )),
    )
    .take();

    let raw = cut_err(terminated(content, closing))
        .context(UNTERMINATED_STRING)
        .parse_next(input)?;

    Ok(match unescape(raw) {
        Ok(value) => Token::String { raw, value, quote },
        Err(error) => Token::Error(error),
    })
}

/// Parse a signed integer or a float.
///
/// Anything with a decimal point or an exponent is a float. Digits are
/// required on both sides of the decimal point.
fn number<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let text = (
        opt(one_of(['+', '-'])),
        digit1,
        opt(('.', digit1)),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
    )
        .take()
        .parse_next(input)?;

    let token = if text.contains(['.', 'e', 'E']) {
        text.parse::<f64>()
            .map_or_else(|_| Token::Error((&INTEGER_OUT_OF_RANGE).into()), Token::Float)
    } else {
        text.parse::<i64>()
            .map_or_else(|_| Token::Error((&INTEGER_OUT_OF_RANGE).into()), Token::Integer)
    };
    Ok(token)
}

/// Parse an identifier or one of the keywords `true`, `false` and `null`.
///
/// A leading `^` marks an escaped identifier, which is never a keyword.
fn word<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let escaped = opt('^').parse_next(input)?.is_some();
    let name = (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)?;

    Ok(match (escaped, name) {
        (false, "true") => Token::True,
        (false, "false") => Token::False,
        (false, "null") => Token::Null,
        _ => Token::Identifier { name, escaped },
    })
}

fn punctuation<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        '{'.value(Token::LeftBrace),
        '}'.value(Token::RightBrace),
        '['.value(Token::LeftBracket),
        ']'.value(Token::RightBracket),
        ':'.value(Token::Colon),
        ','.value(Token::Comma),
    ))
    .parse_next(input)
}

fn token<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((punctuation, string_literal, number, word)).parse_next(input)
}

fn line_comment(input: &mut Input<'_>) -> IResult<()> {
    ("//", take_till(0.., ['\n', '\r'])).void().parse_next(input)
}

fn block_comment(input: &mut Input<'_>) -> IResult<()> {
    "/*".parse_next(input)?;
    cut_err(terminated(take_until(0.., "*/"), "*/"))
        .context(UNTERMINATED_COMMENT)
        .void()
        .parse_next(input)
}

fn trivia(input: &mut Input<'_>) -> IResult<()> {
    alt((multispace1.void(), line_comment, block_comment)).parse_next(input)
}

fn first_context(err: &ErrMode<ContextError<LexerDiagnostic>>) -> Option<&LexerDiagnostic> {
    match err {
        ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx.context().next(),
        ErrMode::Incomplete(_) => None,
    }
}

/// An on-demand tokenizer over one document.
///
/// ```
/// # use elkjson_parser::lexer::Lexer;
/// # use elkjson_parser::tokens::Token;
/// let tokens: Vec<_> = Lexer::new("{ x: 1 } // done").map(|t| t.token).collect();
/// assert_eq!(tokens.len(), 5);
/// assert_eq!(tokens[3], Token::Integer(1));
/// ```
#[derive(Debug, Clone)]
pub struct Lexer<'src> {
    input: Input<'src>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            input: LocatingSlice::new(source),
        }
    }

    /// Produce the next token, or `None` at the end of the input.
    pub fn next_token(&mut self) -> Option<PositionedToken<'src>> {
        if let Some(error) = self.skip_trivia() {
            return Some(error);
        }
        if self.input.eof_offset() == 0 {
            return None;
        }

        let start = self.input.current_token_start();
        let checkpoint = self.input.checkpoint();
        let token = match token(&mut self.input) {
            Ok(token) => token,
            Err(err) => {
                self.input.reset(&checkpoint);
                self.recover(&err)
            }
        };
        let end = self.input.current_token_start();

        Some(PositionedToken::new(token, Span::new(start..end)))
    }

    /// Skip trivia. Returns an error token for an unterminated block comment,
    /// which swallows the rest of the input.
    fn skip_trivia(&mut self) -> Option<PositionedToken<'src>> {
        loop {
            let start = self.input.current_token_start();
            let checkpoint = self.input.checkpoint();
            match trivia(&mut self.input) {
                Ok(()) => {}
                Err(err @ ErrMode::Cut(_)) => {
                    let diagnostic = first_context(&err).unwrap_or(&UNTERMINATED_COMMENT);
                    self.skip_while(|_| true);
                    let end = self.input.current_token_start();
                    return Some(PositionedToken::new(
                        Token::Error(diagnostic.into()),
                        Span::new(start..end),
                    ));
                }
                Err(_) => {
                    self.input.reset(&checkpoint);
                    return None;
                }
            }
        }
    }

    /// Build the error token for a failed token and move past the bad text.
    ///
    /// An unterminated string covers the rest of its line; anything else
    /// skips a single character.
    fn recover(&mut self, err: &ErrMode<ContextError<LexerDiagnostic>>) -> Token<'src> {
        match first_context(err) {
            Some(diagnostic) if diagnostic.code == ErrorCode::E001 => {
                self.skip_while(|c| c != '\n' && c != '\r');
                Token::Error(diagnostic.into())
            }
            _ => {
                self.input.next_token();
                Token::Error((&UNEXPECTED_CHARACTER).into())
            }
        }
    }

    fn skip_while(&mut self, predicate: impl Fn(char) -> bool) {
        let _: IResult<&str> = take_while(0.., predicate).parse_next(&mut self.input);
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = PositionedToken<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Tokenize a whole document. Error tokens stay in the stream.
pub fn tokenize(source: &str) -> Vec<PositionedToken<'_>> {
    let tokens: Vec<_> = Lexer::new(source).collect();
    debug!(
        tokens = tokens.len(),
        errors = tokens.iter().filter(|t| t.token.is_error()).count();
        "Tokenized source"
    );
    tokens
}

/// One diagnostic per error token, in source order.
pub(crate) fn lexical_diagnostics(tokens: &[PositionedToken<'_>]) -> Vec<Diagnostic> {
    tokens
        .iter()
        .filter_map(|positioned| match &positioned.token {
            Token::Error(error) => {
                let mut diagnostic = Diagnostic::error(error.message())
                    .with_code(error.code())
                    .with_label(positioned.span, error.code().description());
                if let Some(help) = error.help() {
                    diagnostic = diagnostic.with_help(help);
                }
                Some(diagnostic)
            }
            _ => None,
        })
        .collect()
}
