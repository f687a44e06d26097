//! Member keys with structural meaning.
//!
//! A reserved key may be written in three spellings: double-quoted,
//! single-quoted, or as a bare identifier. All three mean the same thing.
//! The `^` escape turns a keyword into a plain identifier, so `^children`
//! is an ordinary member key and never a reserved one.

use std::fmt;

pub use elkjson_core::model::ElementKind;

use crate::tokens::{Quote, Token};

/// A key the model builder interprets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservedKey {
    Children,
    Ports,
    Labels,
    Edges,
    /// `layoutOptions`, or its alias `properties`.
    LayoutOptions,
    Id,
    X,
    Y,
    Width,
    Height,
    Sources,
    Targets,
    Text,
}

/// How a key was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeySpelling {
    DoubleQuoted,
    SingleQuoted,
    Bare,
}

/// The reserved keys an object of `kind` accepts.
pub fn allowed_keys(kind: ElementKind) -> impl Iterator<Item = ReservedKey> {
    ALL_KEYS.into_iter().filter(move |key| key.allowed_in(kind))
}

/// A reserved key recognised in the token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMatch {
    pub key: ReservedKey,
    pub spelling: KeySpelling,
}

const ALL_KEYS: [ReservedKey; 13] = [
    ReservedKey::Children,
    ReservedKey::Ports,
    ReservedKey::Labels,
    ReservedKey::Edges,
    ReservedKey::LayoutOptions,
    ReservedKey::Id,
    ReservedKey::X,
    ReservedKey::Y,
    ReservedKey::Width,
    ReservedKey::Height,
    ReservedKey::Sources,
    ReservedKey::Targets,
    ReservedKey::Text,
];

impl ReservedKey {
    /// Every reserved key.
    pub fn all() -> &'static [ReservedKey] {
        &ALL_KEYS
    }

    /// The canonical name.
    pub fn name(self) -> &'static str {
        match self {
            ReservedKey::Children => "children",
            ReservedKey::Ports => "ports",
            ReservedKey::Labels => "labels",
            ReservedKey::Edges => "edges",
            ReservedKey::LayoutOptions => "layoutOptions",
            ReservedKey::Id => "id",
            ReservedKey::X => "x",
            ReservedKey::Y => "y",
            ReservedKey::Width => "width",
            ReservedKey::Height => "height",
            ReservedKey::Sources => "sources",
            ReservedKey::Targets => "targets",
            ReservedKey::Text => "text",
        }
    }

    /// Look up a reserved key by exact, case-sensitive name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "properties" => Some(ReservedKey::LayoutOptions),
            _ => ALL_KEYS.iter().copied().find(|key| key.name() == name),
        }
    }

    /// Whether an object of `kind` may contain this key.
    pub fn allowed_in(self, kind: ElementKind) -> bool {
        use ReservedKey::*;
        match self {
            Id | Labels | LayoutOptions => true,
            X | Y | Width | Height => kind != ElementKind::Edge,
            Children | Ports | Edges => kind == ElementKind::Node,
            Sources | Targets => kind == ElementKind::Edge,
            Text => kind == ElementKind::Label,
        }
    }
}

impl fmt::Display for ReservedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Match a key token against the reserved keys.
///
/// Strings match on their raw text between the quotes, so an escape inside
/// the quotes makes the key generic. Identifiers match only when written
/// without `^`.
pub fn match_key(token: &Token<'_>) -> Option<KeyMatch> {
    let (name, spelling) = match token {
        Token::String { raw, quote, .. } => {
            let spelling = match quote {
                Quote::Double => KeySpelling::DoubleQuoted,
                Quote::Single => KeySpelling::SingleQuoted,
            };
            (*raw, spelling)
        }
        Token::Identifier {
            name,
            escaped: false,
        } => (*name, KeySpelling::Bare),
        _ => return None,
    };
    ReservedKey::from_name(name).map(|key| KeyMatch { key, spelling })
}

/// The member key text of a key token: the processed string value, or the
/// identifier name without `^`.
pub fn key_text(token: &Token<'_>) -> Option<String> {
    match token {
        Token::String { value, .. } => Some(value.clone()),
        Token::Identifier { name, .. } => Some((*name).to_string()),
        _ => None,
    }
}
