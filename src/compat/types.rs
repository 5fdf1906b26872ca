//! Core types for change classification

use crate::compat::context::DiffContext;
use crate::compat::rules::CompatibilityRule;
use serde::{Deserialize, Serialize};

/// Severity of a diff, totally ordered from no change to breaking change.
///
/// Combining verdicts always takes the maximum.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DiffResult {
    /// No observable difference
    #[default]
    NoChanges,
    /// Only descriptive fields (summary, description) differ
    Metadata,
    /// A difference that policy does not treat as breaking
    Compatible,
    /// A difference that policy treats as breaking
    Incompatible,
}

impl DiffResult {
    pub fn is_unchanged(self) -> bool {
        self == DiffResult::NoChanges
    }

    pub fn is_different(self) -> bool {
        self != DiffResult::NoChanges
    }

    pub fn is_metadata_only(self) -> bool {
        self == DiffResult::Metadata
    }

    /// True for everything short of a breaking change, including no change
    pub fn is_compatible(self) -> bool {
        self < DiffResult::Incompatible
    }

    pub fn is_incompatible(self) -> bool {
        self == DiffResult::Incompatible
    }

    /// Combine two verdicts into the more severe one
    pub fn combine(self, other: DiffResult) -> DiffResult {
        self.max(other)
    }

    pub fn id(self) -> &'static str {
        match self {
            DiffResult::NoChanges => "no_changes",
            DiffResult::Metadata => "metadata",
            DiffResult::Compatible => "compatible",
            DiffResult::Incompatible => "incompatible",
        }
    }
}

impl std::fmt::Display for DiffResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// One field-level change a node observed in its own snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct OwnChange {
    /// Name of the changed field, e.g. `authorizationUrl`
    pub field: &'static str,
    /// Rule deciding the change's severity; `None` means always compatible
    pub rule: Option<CompatibilityRule>,
}

impl OwnChange {
    pub fn guarded(field: &'static str, rule: CompatibilityRule) -> Self {
        Self {
            field,
            rule: Some(rule),
        }
    }

    /// A change no rule can escalate
    pub fn unguarded(field: &'static str) -> Self {
        Self { field, rule: None }
    }

    pub fn is_breaking(&self, context: &DiffContext) -> bool {
        self.rule.is_some_and(|rule| rule.enabled(context))
    }
}

/// Collect the own changes whose flag is set
///
/// Each entry pairs a change flag with the change it stands for.
pub fn flagged(entries: &[(bool, OwnChange)]) -> Vec<OwnChange> {
    entries
        .iter()
        .filter(|(changed, _)| *changed)
        .map(|(_, change)| *change)
        .collect()
}

/// Classify a node's own changes.
///
/// No change gives `NoChanges`; any change whose rule is enabled gives
/// `Incompatible`; any other change gives `Compatible`.
pub fn classify(context: &DiffContext, changes: &[OwnChange]) -> DiffResult {
    if changes.is_empty() {
        DiffResult::NoChanges
    } else if changes.iter().any(|change| change.is_breaking(context)) {
        DiffResult::Incompatible
    } else {
        DiffResult::Compatible
    }
}
