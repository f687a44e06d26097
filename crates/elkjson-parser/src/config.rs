//! Options controlling a parse.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! configuration file. Missing fields take their defaults.
//!
//! # Example
//!
//! ```
//! # use elkjson_parser::config::{DuplicateIdPolicy, ParseOptions, RecoveryMode};
//! let options = ParseOptions::default();
//! assert_eq!(options.recovery(), RecoveryMode::Recover);
//! assert_eq!(options.duplicate_ids(), DuplicateIdPolicy::Warn);
//! assert_eq!(options.max_depth(), 256);
//! ```

use serde::Deserialize;

/// Maximum nesting of objects and arrays accepted by default.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// What the parser does after a lexical or syntax error.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryMode {
    /// Skip to the next `,`, `}` or `]` at the current depth and continue,
    /// so one parse reports every independent error.
    #[default]
    Recover,
    /// Stop at the first error. No document is returned.
    Abort,
}

/// How two shapes with the same identifier are reported.
///
/// Resolution always uses the first declaration; the policy only decides
/// the diagnostic.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateIdPolicy {
    /// No diagnostic.
    Ignore,
    /// A warning pointing at both declarations.
    #[default]
    Warn,
    /// An error pointing at both declarations.
    Error,
}

/// Options for reference resolution.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    duplicate_ids: DuplicateIdPolicy,
}

impl ResolveOptions {
    pub fn new(duplicate_ids: DuplicateIdPolicy) -> Self {
        Self { duplicate_ids }
    }

    pub fn duplicate_ids(&self) -> DuplicateIdPolicy {
        self.duplicate_ids
    }
}

/// Options for [`parse_with`](crate::parse_with).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ParseOptions {
    /// Error recovery behaviour.
    #[serde(default)]
    recovery: RecoveryMode,

    /// Reporting of duplicate shape identifiers.
    #[serde(default)]
    duplicate_ids: DuplicateIdPolicy,

    /// Maximum nesting of objects and arrays.
    #[serde(default = "default_max_depth")]
    max_depth: usize,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            recovery: RecoveryMode::default(),
            duplicate_ids: DuplicateIdPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    /// Creates a new [`ParseOptions`].
    ///
    /// # Arguments
    ///
    /// * `recovery` - Behaviour after a lexical or syntax error.
    /// * `duplicate_ids` - Reporting of duplicate shape identifiers.
    /// * `max_depth` - Maximum nesting of objects and arrays.
    pub fn new(recovery: RecoveryMode, duplicate_ids: DuplicateIdPolicy, max_depth: usize) -> Self {
        Self {
            recovery,
            duplicate_ids,
            max_depth,
        }
    }

    pub fn recovery(&self) -> RecoveryMode {
        self.recovery
    }

    pub fn duplicate_ids(&self) -> DuplicateIdPolicy {
        self.duplicate_ids
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns a copy with a different recovery mode.
    pub fn with_recovery(mut self, recovery: RecoveryMode) -> Self {
        self.recovery = recovery;
        self
    }

    /// Returns a copy with a different duplicate identifier policy.
    pub fn with_duplicate_ids(mut self, duplicate_ids: DuplicateIdPolicy) -> Self {
        self.duplicate_ids = duplicate_ids;
        self
    }

    /// Returns a copy with a different nesting limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The subset of options used by reference resolution.
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions::new(self.duplicate_ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ParseOptions::default();

        assert_eq!(options.recovery(), RecoveryMode::Recover);
        assert_eq!(options.duplicate_ids(), DuplicateIdPolicy::Warn);
        assert_eq!(options.max_depth(), DEFAULT_MAX_DEPTH);
        assert_eq!(
            options.resolve_options().duplicate_ids(),
            DuplicateIdPolicy::Warn
        );
    }

    #[test]
    fn test_builders() {
        let options = ParseOptions::default()
            .with_recovery(RecoveryMode::Abort)
            .with_duplicate_ids(DuplicateIdPolicy::Error)
            .with_max_depth(8);

        assert_eq!(
            options,
            ParseOptions::new(RecoveryMode::Abort, DuplicateIdPolicy::Error, 8)
        );
    }
}
