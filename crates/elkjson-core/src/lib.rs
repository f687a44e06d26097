//! ELK JSON Core Types
//!
//! This crate provides the in-memory model that the ELK JSON parser builds
//! and that downstream layout code walks. It includes:
//!
//! - **Spans**: Source locations attached to elements ([`span::Span`], [`span::Spanned`])
//! - **Model**: The arena-owned graph ([`model::Document`]) with typed element ids
//! - **Values**: The JSON value space of layout options and generic members ([`value`] module)
//! - **Queries**: Hierarchy and incidence queries ([`query`] module)
//! - **Identifiers**: Identifier validation and generation ([`identifier`] module)

pub mod error;
pub mod identifier;
pub mod model;
pub mod query;
pub mod span;
pub mod value;

pub use error::GraphError;
