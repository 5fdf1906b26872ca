//! Rule-driven classification of API contract changes.
//!
//! Upstream comparison logic builds a tree of diff nodes (see [`diff`]) that
//! share one [`DiffContext`]. Each node classifies its own changes against
//! the context's rule policy, and the aggregation engine folds the tree into
//! one [`DiffResult`]:
//!
//! ```
//! use contract_compat::{Changed, DiffContext, DiffResult};
//! use contract_compat::diff::OAuthFlowDiff;
//!
//! let context = DiffContext::new().shared();
//! let flow = OAuthFlowDiff::builder(None, None, &context)
//!     .authorization_url(true)
//!     .build();
//!
//! assert_eq!(flow.overall_verdict().unwrap(), DiffResult::Incompatible);
//! ```

pub mod compat;
pub mod diff;
pub mod model;

pub use compat::{
    Changed, CompatibilityConfig, CompatibilityReport, CompatibilityRule, DiffContext, DiffError,
    DiffResult, RuleCategory, RuleOverride,
};
