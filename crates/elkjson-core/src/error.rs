//! Error type for graph queries that need more than the document guarantees.

use thiserror::Error;

use crate::model::EdgeId;

/// Errors returned by [`query`](crate::query) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("{0} has no sources or targets")]
    NoIncidentShapes(EdgeId),

    #[error("{0} has an endpoint that is not resolved to a shape")]
    UnresolvedEndpoint(EdgeId),

    #[error("{0} is not a simple edge: it needs exactly one source and one target")]
    NotSimpleEdge(EdgeId),
}

/// A type alias for `Result<T, GraphError>`.
pub type Result<T> = std::result::Result<T, GraphError>;
