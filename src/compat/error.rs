//! Error type for context construction, node building and aggregation

use thiserror::Error;

/// Result type alias using [`DiffError`]
pub type Result<T> = std::result::Result<T, DiffError>;

#[derive(Debug, Error)]
pub enum DiffError {
    /// A configuration entry names a rule the registry does not know
    #[error("unknown compatibility rule '{key}'")]
    UnknownRule { key: String },

    #[error("unknown rule category '{id}'")]
    UnknownCategory { id: String },

    /// The same rule is forced to different severities by two entries
    #[error("conflicting overrides for rule '{rule}'")]
    ConflictingOverride { rule: String },

    /// A builder was finished without a child its node kind requires
    #[error("{node} diff is missing required child '{child}'")]
    MissingChild {
        node: &'static str,
        child: &'static str,
    },

    /// The depth limit must admit at least the root node
    #[error("invalid max_depth {depth}: must be at least 1")]
    InvalidMaxDepth { depth: usize },

    #[error("diff tree deeper than {limit} levels at {kind} node (cycle or overflow)")]
    DepthExceeded { limit: usize, kind: &'static str },

    #[error("cycle detected: {kind} node reached twice on one aggregation path")]
    Cycle { kind: &'static str },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_yaml::Error),
}
