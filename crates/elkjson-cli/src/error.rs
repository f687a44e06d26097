//! Error type of the CLI.

use thiserror::Error;

use elkjson_parser::error::ParseError;

use crate::config::ConfigError;

/// Failures of a CLI run.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The document has errors. `src` is kept for rendering source snippets.
    #[error("Parse error: {err}")]
    Parse { err: ParseError, src: String },
}

impl CliError {
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        CliError::Parse {
            err,
            src: src.into(),
        }
    }
}
