//! Concrete diff node types
//!
//! One node type per compared contract element. Each is built once with a
//! builder (or a `compare` constructor for leaves) and read-only afterwards.

pub mod api;
pub mod extensions;
pub mod list;
pub mod metadata;
pub mod oauth;
pub mod operation;
pub mod parameter;
pub mod schema;
pub mod security;

pub use api::{ApiDiff, ApiDiffBuilder};
pub use extensions::ExtensionsDiff;
pub use list::ListDiff;
pub use metadata::MetadataDiff;
pub use oauth::{OAuthFlowDiff, OAuthFlowDiffBuilder, OAuthFlowsDiff, OAuthFlowsDiffBuilder};
pub use operation::{OperationDiff, OperationDiffBuilder};
pub use parameter::{ParameterDiff, ParameterDiffBuilder, ParametersDiff};
pub use schema::{Direction, LimitChange, SchemaDiff, SchemaDiffBuilder};
pub use security::{SecuritySchemeDiff, SecuritySchemeDiffBuilder};
