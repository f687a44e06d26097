//! Recursive-descent parser for ELK JSON graph text.
//!
//! This module turns the token stream from the [`lexer`](super::lexer) into
//! a [`Document`] by driving the [`ModelBuilder`] as productions complete.
//! There is one parsing function per grammar production: element objects
//! (node, port, label, edge), their member lists, layout options, endpoint
//! lists, and the generic JSON value used for every key without structural
//! meaning.
//!
//! Token-level matching uses winnow over a [`TokenSlice`]. A recoverable
//! syntax error is an [`ErrMode::Backtrack`] whose context lists what would
//! have been accepted; the enclosing list reports it and synchronises on the
//! next `,`, or on a closing `}` or `]` at its own depth. An
//! [`ErrMode::Cut`] ends the parse: its diagnostic has already been emitted.

use log::debug;
use winnow::{
    Parser as _,
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use elkjson_core::{
    model::{Document, EdgeId, ElementRef, NodeId},
    value::{JsonMember, JsonValue, Number, Property},
};

use crate::{
    Span, Spanned,
    builder::ModelBuilder,
    config::{ParseOptions, RecoveryMode},
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    keys::{self, ElementKind, KeyMatch, ReservedKey},
    tokens::{PositionedToken, Token},
};

/// Context attached to parser errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Something that would have been accepted at the error position.
    Expected(&'static str),
}

type Input<'src> = TokenSlice<'src, PositionedToken<'src>>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;

/// The two bracketed constructs of the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    Object,
    Array,
}

impl Delimiter {
    fn opener(self) -> &'static str {
        match self {
            Delimiter::Object => "`{`",
            Delimiter::Array => "`[`",
        }
    }

    fn closer(self) -> &'static str {
        match self {
            Delimiter::Object => "`}`",
            Delimiter::Array => "`]`",
        }
    }

    /// What a value opened by this delimiter is called in messages.
    fn value_name(self) -> &'static str {
        match self {
            Delimiter::Object => "an object",
            Delimiter::Array => "an array",
        }
    }

    fn opens(self, token: &Token<'_>) -> bool {
        matches!(
            (self, token),
            (Delimiter::Object, Token::LeftBrace) | (Delimiter::Array, Token::LeftBracket)
        )
    }

    fn closes(self, token: &Token<'_>) -> bool {
        matches!(
            (self, token),
            (Delimiter::Object, Token::RightBrace) | (Delimiter::Array, Token::RightBracket)
        )
    }

    fn closed_by(token: &Token<'_>) -> Option<Delimiter> {
        match token {
            Token::RightBrace => Some(Delimiter::Object),
            Token::RightBracket => Some(Delimiter::Array),
            _ => None,
        }
    }
}

/// What follows a list item.
enum Separator {
    Comma,
    Closed,
}

/// Where synchronisation after a syntax error stopped.
enum Recovery {
    /// A `,` was consumed; parse the next item.
    Continue,
    /// The list's own closer was consumed.
    Closed,
    /// A closer of an enclosing construct is next; it is left for that
    /// construct to consume.
    Exit,
}

fn syntax_error(expected: &[&'static str]) -> ErrMode<ContextError<Context>> {
    let mut error = ContextError::new();
    for label in expected {
        error.push(Context::Expected(*label));
    }
    ErrMode::Backtrack(error)
}

/// An error that ends the parse. Its diagnostic is emitted by the caller.
fn halt() -> ErrMode<ContextError<Context>> {
    ErrMode::Cut(ContextError::new())
}

/// Render the expected set of an error as `a, b or c`.
fn describe_expected(error: &ContextError<Context>) -> String {
    let mut labels: Vec<&str> = Vec::new();
    for Context::Expected(label) in error.context() {
        if !labels.contains(label) {
            labels.push(*label);
        }
    }
    match labels.as_slice() {
        [] => "a value".to_string(),
        [single] => (*single).to_string(),
        [init @ .., last] => format!("{} or {last}", init.join(", ")),
    }
}

fn starts_value(token: &Token<'_>) -> bool {
    matches!(
        token,
        Token::String { .. }
            | Token::Integer(_)
            | Token::Float(_)
            | Token::True
            | Token::False
            | Token::Null
            | Token::LeftBrace
            | Token::LeftBracket
    )
}

// ============================================================================
// Token-level matchers
// ============================================================================

fn opening<'src>(input: &mut Input<'src>, delimiter: Delimiter) -> IResult<Span> {
    any.verify_map(|token: &PositionedToken<'_>| delimiter.opens(&token.token).then_some(token.span))
        .context(Context::Expected(delimiter.opener()))
        .parse_next(input)
}

fn colon<'src>(input: &mut Input<'src>) -> IResult<()> {
    any.verify(|token: &&PositionedToken<'_>| matches!(token.token, Token::Colon))
        .void()
        .context(Context::Expected("`:`"))
        .parse_next(input)
}

/// Parse a member key: a string or an identifier.
fn member_key<'src>(input: &mut Input<'src>) -> IResult<&'src PositionedToken<'src>> {
    any.verify(|token: &&PositionedToken<'_>| {
        matches!(token.token, Token::String { .. } | Token::Identifier { .. })
    })
    .context(Context::Expected("a member key"))
    .parse_next(input)
}

/// Parse a string, number, boolean or `null`.
fn json_scalar<'src>(input: &mut Input<'src>) -> IResult<Spanned<JsonValue>> {
    any.verify_map(|token: &PositionedToken<'_>| {
        let value = match &token.token {
            Token::String { value, .. } => JsonValue::String(value.clone()),
            Token::Integer(value) => JsonValue::Number(Number::Int(*value)),
            Token::Float(value) => JsonValue::Number(Number::Float(*value)),
            Token::True => JsonValue::Bool(true),
            Token::False => JsonValue::Bool(false),
            Token::Null => JsonValue::Null,
            _ => return None,
        };
        Some(Spanned::new(value, token.span))
    })
    .context(Context::Expected("a value"))
    .parse_next(input)
}

// ============================================================================
// Grammar
// ============================================================================

/// Result of parsing a token stream.
#[derive(Debug)]
pub(crate) struct GrammarOutput {
    /// `None` when the parse was ended by a fatal error, or by the first
    /// error in abort mode.
    pub document: Option<Document>,
    pub diagnostics: Vec<Diagnostic>,
}

struct GrammarParser<'src> {
    tokens: &'src [PositionedToken<'src>],
    source_len: usize,
    options: ParseOptions,
    builder: ModelBuilder,
    diagnostics: DiagnosticCollector,
    /// Constructs opened and not yet closed, innermost last.
    open: Vec<(Delimiter, Span)>,
}

impl<'src> GrammarParser<'src> {
    fn new(tokens: &'src [PositionedToken<'src>], source_len: usize, options: ParseOptions) -> Self {
        Self {
            tokens,
            source_len,
            options,
            builder: ModelBuilder::new(),
            diagnostics: DiagnosticCollector::new(),
            open: Vec::new(),
        }
    }

    // ============================================================================
    // Stream helpers
    // ============================================================================

    fn position(&self, input: &Input<'src>) -> usize {
        self.tokens.len() - input.eof_offset()
    }

    fn peek(&self, input: &Input<'src>) -> Option<&'src PositionedToken<'src>> {
        self.tokens.get(self.position(input))
    }

    fn peek_second(&self, input: &Input<'src>) -> Option<&'src PositionedToken<'src>> {
        self.tokens.get(self.position(input) + 1)
    }

    /// Span of the last consumed token.
    fn previous_span(&self, input: &Input<'src>) -> Span {
        self.position(input)
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
            .map(|token| token.span)
            .unwrap_or_default()
    }

    fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.emit(diagnostic);
    }

    /// Report a problem whose offending value is consumed anyway. Parsing
    /// continues unless recovery is disabled.
    fn reject(&mut self, diagnostic: Diagnostic) -> IResult<()> {
        self.emit(diagnostic);
        match self.options.recovery() {
            RecoveryMode::Recover => Ok(()),
            RecoveryMode::Abort => Err(halt()),
        }
    }

    // ============================================================================
    // Document
    // ============================================================================

    fn document(&mut self, input: &mut Input<'src>) -> IResult<()> {
        let Some(first) = self.peek(input) else {
            let end = Span::new(self.source_len..self.source_len);
            return self.reject(
                Diagnostic::error("expected a root node `{`, found end of input")
                    .with_code(ErrorCode::E100)
                    .with_label(end, "empty document")
                    .with_help("a document is a single node object such as `{ \"id\": \"root\" }`"),
            );
        };

        if !matches!(first.token, Token::LeftBrace) {
            if first.token.is_error() {
                return self.reject_silently();
            }
            return self.reject(
                Diagnostic::error(format!("expected a root node `{{`, found {}", first.token))
                    .with_code(ErrorCode::E100)
                    .with_label(first.span, "not a node object")
                    .with_help("a document is a single node object such as `{ \"id\": \"root\" }`"),
            );
        }

        let root = ElementRef::Node(self.builder.root());
        let open = self.open(input, Delimiter::Object)?;
        self.element_body(input, root, open)?;
        self.trailing_content(input)
    }

    /// Stop in abort mode without a diagnostic of our own; a lexical error
    /// has already been reported for the current token.
    fn reject_silently(&mut self) -> IResult<()> {
        match self.options.recovery() {
            RecoveryMode::Recover => Ok(()),
            RecoveryMode::Abort => Err(halt()),
        }
    }

    fn trailing_content(&mut self, input: &mut Input<'src>) -> IResult<()> {
        let rest = &self.tokens[self.position(input)..];
        if rest.iter().all(|token| token.token.is_error()) {
            return Ok(());
        }
        let (Some(first), Some(last)) = (rest.first(), rest.last()) else {
            return Ok(());
        };
        self.reject(
            Diagnostic::error(format!("unexpected {} after the root node", first.token))
                .with_code(ErrorCode::E106)
                .with_label(first.span.union(last.span), "trailing content")
                .with_help("a document holds exactly one root node"),
        )
    }

    // ============================================================================
    // Lists and recovery
    // ============================================================================

    /// Consume an opening delimiter and enter its nesting level.
    fn open(&mut self, input: &mut Input<'src>, delimiter: Delimiter) -> IResult<Span> {
        let span = opening(input, delimiter)?;
        let max_depth = self.options.max_depth();
        if self.open.len() >= max_depth {
            self.emit(
                Diagnostic::error(format!("nesting exceeds the limit of {max_depth} levels"))
                    .with_code(ErrorCode::E103)
                    .with_label(span, "too deeply nested")
                    .with_help("flatten the document or raise `max_depth`"),
            );
            return Err(halt());
        }
        self.open.push((delimiter, span));
        Ok(span)
    }

    /// Parse the items of an opened list up to its closer, allowing a
    /// trailing comma. Returns the span of the last consumed token.
    fn list_body<F>(&mut self, input: &mut Input<'src>, delimiter: Delimiter, mut item: F) -> IResult<Span>
    where
        F: FnMut(&mut Self, &mut Input<'src>) -> IResult<()>,
    {
        let result = self.list_items(input, delimiter, &mut item);
        self.open.pop();
        result.map(|()| self.previous_span(input))
    }

    fn list_items<F>(&mut self, input: &mut Input<'src>, delimiter: Delimiter, item: &mut F) -> IResult<()>
    where
        F: FnMut(&mut Self, &mut Input<'src>) -> IResult<()>,
    {
        // `{,}` and `[,]` are empty lists.
        let lone_comma = self
            .peek(input)
            .is_some_and(|token| matches!(token.token, Token::Comma))
            && self
                .peek_second(input)
                .is_some_and(|token| delimiter.closes(&token.token));
        if lone_comma {
            input.next_token();
            input.next_token();
            return Ok(());
        }

        loop {
            if self
                .peek(input)
                .is_some_and(|token| delimiter.closes(&token.token))
            {
                input.next_token();
                return Ok(());
            }

            let result = item(self, input).and_then(|()| self.separator(input, delimiter));
            match result {
                Ok(Separator::Comma) => {}
                Ok(Separator::Closed) => return Ok(()),
                Err(ErrMode::Backtrack(error)) => match self.recover(input, &error, delimiter)? {
                    Recovery::Continue => {}
                    Recovery::Closed | Recovery::Exit => return Ok(()),
                },
                Err(error) => return Err(error),
            }
        }
    }

    fn separator(&mut self, input: &mut Input<'src>, delimiter: Delimiter) -> IResult<Separator> {
        match self.peek(input).map(|token| &token.token) {
            Some(Token::Comma) => {
                input.next_token();
                Ok(Separator::Comma)
            }
            Some(token) if delimiter.closes(token) => {
                input.next_token();
                Ok(Separator::Closed)
            }
            _ => Err(syntax_error(&["`,`", delimiter.closer()])),
        }
    }

    /// Report a syntax error at the current token and synchronise.
    ///
    /// No syntax diagnostic is emitted when the current token is an error
    /// token: the lexical diagnostic already covers it.
    fn recover(
        &mut self,
        input: &mut Input<'src>,
        error: &ContextError<Context>,
        delimiter: Delimiter,
    ) -> IResult<Recovery> {
        let Some(found) = self.peek(input) else {
            return Err(self.unexpected_end());
        };

        if !found.token.is_error() {
            let expected = describe_expected(error);
            let mut diagnostic = Diagnostic::error(format!("expected {expected}, found {}", found.token))
                .with_code(ErrorCode::E100)
                .with_label(found.span, "unexpected token");
            if expected.contains("`,`") && !found.token.is_closer() {
                diagnostic = diagnostic.with_help("separate list items and members with `,`");
            }
            self.emit(diagnostic);
        }

        if self.options.recovery() == RecoveryMode::Abort {
            return Err(halt());
        }
        self.synchronize(input, delimiter)
    }

    /// Skip tokens up to the next `,` or closer at the current depth.
    ///
    /// Brackets opened while skipping are skipped as a whole. A closer that
    /// belongs to an enclosing construct is not consumed; a closer that
    /// matches nothing open is skipped.
    fn synchronize(&mut self, input: &mut Input<'src>, delimiter: Delimiter) -> IResult<Recovery> {
        let mut nested = 0usize;
        loop {
            let Some(positioned) = self.peek(input) else {
                return Err(self.unexpected_end());
            };
            let token = &positioned.token;

            if nested == 0 {
                if matches!(token, Token::Comma) {
                    input.next_token();
                    return Ok(Recovery::Continue);
                }
                if delimiter.closes(token) {
                    input.next_token();
                    return Ok(Recovery::Closed);
                }
                let enclosing = Delimiter::closed_by(token)
                    .is_some_and(|closed| self.open.iter().any(|(open, _)| *open == closed));
                if enclosing {
                    return Ok(Recovery::Exit);
                }
            }

            if token.is_opener() {
                nested += 1;
            } else if token.is_closer() && nested > 0 {
                nested -= 1;
            }
            input.next_token();
        }
    }

    /// Emit the fatal end-of-input diagnostic.
    fn unexpected_end(&mut self) -> ErrMode<ContextError<Context>> {
        let end = Span::new(self.source_len..self.source_len);
        let mut diagnostic = Diagnostic::error("unexpected end of input")
            .with_code(ErrorCode::E101)
            .with_label(end, "input ends here");
        if let Some((delimiter, span)) = self.open.last() {
            diagnostic = diagnostic
                .with_secondary_label(*span, format!("this {} is never closed", delimiter.opener()))
                .with_help(format!("add the missing {}", delimiter.closer()));
        }
        self.emit(diagnostic);
        halt()
    }

    // ============================================================================
    // Graph elements
    // ============================================================================

    /// Parse the members of an element object whose `{` is consumed.
    fn element_body(&mut self, input: &mut Input<'src>, element: ElementRef, open: Span) -> IResult<()> {
        let close = self.list_body(input, Delimiter::Object, |parser, input| {
            parser.element_member(input, element)
        })?;
        self.builder.close(element, open.union(close));
        Ok(())
    }

    fn node(&mut self, input: &mut Input<'src>, parent: NodeId) -> IResult<()> {
        let open = self.open(input, Delimiter::Object)?;
        let node = self.builder.open_node(parent, open);
        self.element_body(input, ElementRef::Node(node), open)
    }

    fn port(&mut self, input: &mut Input<'src>, node: NodeId) -> IResult<()> {
        let open = self.open(input, Delimiter::Object)?;
        let port = self.builder.open_port(node, open);
        self.element_body(input, ElementRef::Port(port), open)
    }

    fn label(&mut self, input: &mut Input<'src>, owner: ElementRef) -> IResult<()> {
        let open = self.open(input, Delimiter::Object)?;
        let label = self.builder.open_label(owner, open);
        self.element_body(input, ElementRef::Label(label), open)
    }

    fn edge(&mut self, input: &mut Input<'src>, node: NodeId) -> IResult<()> {
        let open = self.open(input, Delimiter::Object)?;
        let edge = self.builder.open_edge(node, open);
        self.element_body(input, ElementRef::Edge(edge), open)
    }

    /// Parse one `key: value` member of an element object.
    ///
    /// Reserved keys admitted by the element drive the builder; a reserved
    /// key the element does not admit is an error; any other key becomes a
    /// generic member.
    fn element_member(&mut self, input: &mut Input<'src>, element: ElementRef) -> IResult<()> {
        let key = member_key(input)?;
        colon(input)?;

        let kind = element.kind();
        match keys::match_key(&key.token) {
            Some(KeyMatch { key: reserved, .. }) if reserved.allowed_in(kind) => {
                self.reserved_member(input, element, reserved)
            }
            Some(KeyMatch { key: reserved, .. }) => {
                let allowed: Vec<String> = keys::allowed_keys(kind)
                    .map(|key| format!("`{key}`"))
                    .collect();
                self.reject(
                    Diagnostic::error(format!("`{reserved}` is not allowed in a {kind}"))
                        .with_code(ErrorCode::E104)
                        .with_label(key.span, format!("not a {kind} key"))
                        .with_help(format!("a {kind} accepts {}", allowed.join(", "))),
                )?;
                self.json_value(input).map(drop)
            }
            None => {
                let name = keys::key_text(&key.token).unwrap_or_default();
                let value = self.json_value(input)?;
                self.builder
                    .add_member(element, JsonMember::new(name, value.into_inner()));
                Ok(())
            }
        }
    }

    fn reserved_member(
        &mut self,
        input: &mut Input<'src>,
        element: ElementRef,
        key: ReservedKey,
    ) -> IResult<()> {
        match (key, element) {
            (ReservedKey::Id, _) => {
                if let Some(identifier) = self.string_value(input, key)? {
                    self.builder.set_identifier(element, identifier);
                }
            }
            (ReservedKey::X | ReservedKey::Y | ReservedKey::Width | ReservedKey::Height, _) => {
                if let Some(value) = self.number_value(input, key)? {
                    self.builder.set_geometry(element, key, value);
                }
            }
            (ReservedKey::Text, ElementRef::Label(label)) => {
                if let Some(text) = self.string_value(input, key)? {
                    self.builder.set_text(label, text.into_inner());
                }
            }
            (ReservedKey::Children, ElementRef::Node(node)) => {
                self.list_value(input, key, |parser, input| parser.node(input, node))?;
            }
            (ReservedKey::Ports, ElementRef::Node(node)) => {
                self.list_value(input, key, |parser, input| parser.port(input, node))?;
            }
            (ReservedKey::Edges, ElementRef::Node(node)) => {
                self.list_value(input, key, |parser, input| parser.edge(input, node))?;
            }
            (ReservedKey::Labels, _) => {
                self.list_value(input, key, |parser, input| parser.label(input, element))?;
            }
            (ReservedKey::LayoutOptions, _) => {
                self.layout_options(input, element)?;
            }
            (ReservedKey::Sources | ReservedKey::Targets, ElementRef::Edge(edge)) => {
                self.list_value(input, key, |parser, input| parser.endpoint(input, edge, key))?;
            }
            // Keys outside their element are rejected before reaching here.
            _ => {
                self.json_value(input)?;
            }
        }
        Ok(())
    }

    // ============================================================================
    // Values of reserved keys
    // ============================================================================

    fn wrong_kind(&mut self, key: ReservedKey, expected: &str, found: &JsonValue, span: Span) -> IResult<()> {
        self.reject(
            Diagnostic::error(format!(
                "invalid value for `{key}`: expected {expected}, found {}",
                found.kind_name()
            ))
            .with_code(ErrorCode::E102)
            .with_label(span, format!("expected {expected}")),
        )
    }

    fn string_value(&mut self, input: &mut Input<'src>, key: ReservedKey) -> IResult<Option<Spanned<String>>> {
        let value = self.json_value(input)?;
        let span = value.span();
        match value.into_inner() {
            JsonValue::String(text) => Ok(Some(Spanned::new(text, span))),
            other => {
                self.wrong_kind(key, "a string", &other, span)?;
                Ok(None)
            }
        }
    }

    fn number_value(&mut self, input: &mut Input<'src>, key: ReservedKey) -> IResult<Option<f64>> {
        let value = self.json_value(input)?;
        match value.inner() {
            JsonValue::Number(number) => Ok(Some(number.as_f64())),
            other => {
                self.wrong_kind(key, "a number", other, value.span())?;
                Ok(None)
            }
        }
    }

    /// Check that the value ahead opens `delimiter`.
    ///
    /// A complete value of another kind is consumed and reported; the result
    /// is then `false`. Anything that is not a value at all is left for the
    /// opening matcher to report as a syntax error.
    fn check_value(&mut self, input: &mut Input<'src>, key: ReservedKey, delimiter: Delimiter) -> IResult<bool> {
        let Some(token) = self.peek(input) else {
            return Ok(true);
        };
        if delimiter.opens(&token.token) || !starts_value(&token.token) {
            return Ok(true);
        }
        let value = self.json_value(input)?;
        self.wrong_kind(key, delimiter.value_name(), value.inner(), value.span())?;
        Ok(false)
    }

    fn list_value<F>(&mut self, input: &mut Input<'src>, key: ReservedKey, item: F) -> IResult<()>
    where
        F: FnMut(&mut Self, &mut Input<'src>) -> IResult<()>,
    {
        if !self.check_value(input, key, Delimiter::Array)? {
            return Ok(());
        }
        self.open(input, Delimiter::Array)?;
        self.list_body(input, Delimiter::Array, item).map(drop)
    }

    fn endpoint(&mut self, input: &mut Input<'src>, edge: EdgeId, key: ReservedKey) -> IResult<()> {
        if let Some(identifier) = self.string_value(input, key)? {
            self.builder.add_endpoint(edge, key, identifier);
        }
        Ok(())
    }

    fn layout_options(&mut self, input: &mut Input<'src>, element: ElementRef) -> IResult<()> {
        if !self.check_value(input, ReservedKey::LayoutOptions, Delimiter::Object)? {
            return Ok(());
        }
        self.open(input, Delimiter::Object)?;
        self.list_body(input, Delimiter::Object, |parser, input| {
            parser.property(input, element)
        })
        .map(drop)
    }

    /// Parse one layout option. Every key is an ordinary string here.
    fn property(&mut self, input: &mut Input<'src>, element: ElementRef) -> IResult<()> {
        let key = member_key(input)?;
        colon(input)?;
        let value = self.json_value(input)?;
        let name = keys::key_text(&key.token).unwrap_or_default();

        if value.is_property_value() {
            self.builder
                .add_property(element, Property::new(name, value.into_inner()));
            return Ok(());
        }
        self.reject(
            Diagnostic::error(format!(
                "layout option `{name}` must be a string, number or boolean, found {}",
                value.kind_name()
            ))
            .with_code(ErrorCode::E105)
            .with_label(value.span(), "unsupported value")
            .with_help("store structured data under a key outside `layoutOptions`"),
        )
    }

    // ============================================================================
    // Generic JSON
    // ============================================================================

    fn json_value(&mut self, input: &mut Input<'src>) -> IResult<Spanned<JsonValue>> {
        match self.peek(input).map(|token| &token.token) {
            Some(Token::LeftBrace) => self.json_object(input),
            Some(Token::LeftBracket) => self.json_array(input),
            _ => json_scalar(input),
        }
    }

    fn json_object(&mut self, input: &mut Input<'src>) -> IResult<Spanned<JsonValue>> {
        let open = self.open(input, Delimiter::Object)?;
        let mut members = Vec::new();
        let close = self.list_body(input, Delimiter::Object, |parser, input| {
            let key = member_key(input)?;
            colon(input)?;
            let value = parser.json_value(input)?;
            let name = keys::key_text(&key.token).unwrap_or_default();
            members.push(JsonMember::new(name, value.into_inner()));
            Ok(())
        })?;
        Ok(Spanned::new(JsonValue::Object(members), open.union(close)))
    }

    fn json_array(&mut self, input: &mut Input<'src>) -> IResult<Spanned<JsonValue>> {
        let open = self.open(input, Delimiter::Array)?;
        let mut values = Vec::new();
        let close = self.list_body(input, Delimiter::Array, |parser, input| {
            values.push(parser.json_value(input)?.into_inner());
            Ok(())
        })?;
        Ok(Spanned::new(JsonValue::Array(values), open.union(close)))
    }
}

/// Parse a token stream into a document.
///
/// `source_len` locates end-of-input diagnostics.
pub(crate) fn parse_tokens(
    tokens: &[PositionedToken<'_>],
    source_len: usize,
    options: &ParseOptions,
) -> GrammarOutput {
    let mut parser = GrammarParser::new(tokens, source_len, *options);
    let mut input = TokenSlice::new(tokens);

    let completed = parser.document(&mut input).is_ok();
    let diagnostics = parser.diagnostics.finish();
    debug!(
        tokens = tokens.len(),
        completed,
        diagnostics = diagnostics.len();
        "Parsed token stream"
    );

    GrammarOutput {
        document: completed.then(|| parser.builder.finish()),
        diagnostics,
    }
}
