//! Change classification core
//!
//! Rules, the run context they are evaluated against, the `Changed` node
//! capability and the aggregation engine that folds a diff tree into one
//! verdict.

pub mod categories;
pub mod changed;
pub mod context;
pub mod engine;
pub mod error;
pub mod rules;
pub mod types;

pub use categories::RuleCategory;
pub use changed::Changed;
pub use context::{CompatibilityConfig, DiffContext, DiffContextBuilder, RuleOverride};
pub use engine::{ClassifiedChange, CompatibilityReport};
pub use error::{DiffError, Result};
pub use rules::CompatibilityRule;
pub use types::{DiffResult, OwnChange};
