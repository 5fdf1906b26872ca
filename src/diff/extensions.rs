//! Vendor extension differences

use crate::compat::changed::Changed;
use crate::compat::context::DiffContext;
use crate::compat::rules::CompatibilityRule;
use crate::compat::types::{OwnChange, flagged};
use crate::model::Extensions;
use std::sync::Arc;

/// Differences between the `x-*` extension maps of one object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtensionsDiff {
    old: Extensions,
    new: Extensions,
    context: Arc<DiffContext>,
    added: Vec<String>,
    removed: Vec<String>,
    changed: Vec<String>,
}

impl ExtensionsDiff {
    /// Compare two extension maps; `None` when they are equal
    pub fn compare(
        old: &Extensions,
        new: &Extensions,
        context: &Arc<DiffContext>,
    ) -> Option<Self> {
        let added: Vec<String> = new
            .keys()
            .filter(|key| !old.contains_key(*key))
            .cloned()
            .collect();
        let removed: Vec<String> = old
            .keys()
            .filter(|key| !new.contains_key(*key))
            .cloned()
            .collect();
        let changed: Vec<String> = old
            .iter()
            .filter(|(key, value)| new.get(*key).is_some_and(|other| other != *value))
            .map(|(key, _)| key.clone())
            .collect();

        if added.is_empty() && removed.is_empty() && changed.is_empty() {
            return None;
        }
        Some(Self {
            old: old.clone(),
            new: new.clone(),
            context: Arc::clone(context),
            added,
            removed,
            changed,
        })
    }

    pub fn old_extensions(&self) -> &Extensions {
        &self.old
    }

    pub fn new_extensions(&self) -> &Extensions {
        &self.new
    }

    pub fn added(&self) -> &[String] {
        &self.added
    }

    pub fn removed(&self) -> &[String] {
        &self.removed
    }

    pub fn changed(&self) -> &[String] {
        &self.changed
    }
}

impl Changed for ExtensionsDiff {
    fn kind(&self) -> &'static str {
        "extensions"
    }

    fn context(&self) -> &DiffContext {
        &self.context
    }

    fn own_changes(&self) -> Vec<OwnChange> {
        flagged(&[
            (!self.added.is_empty(), OwnChange::unguarded("added")),
            (
                !self.removed.is_empty(),
                OwnChange::guarded("removed", CompatibilityRule::ExtensionRemoved),
            ),
            (
                !self.changed.is_empty(),
                OwnChange::guarded("changed", CompatibilityRule::ExtensionChanged),
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::context::RuleOverride;
    use crate::compat::types::DiffResult;
    use serde_json::json;

    fn extensions(entries: &[(&str, serde_json::Value)]) -> Extensions {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_equal_maps_have_no_diff() {
        let context = DiffContext::new().shared();
        let map = extensions(&[("x-a", json!(1))]);
        assert!(ExtensionsDiff::compare(&map, &map, &context).is_none());
    }

    #[test]
    fn test_removed_extension_is_compatible_by_default() {
        let context = DiffContext::new().shared();
        let old = extensions(&[("x-a", json!(1)), ("x-b", json!("b"))]);
        let new = extensions(&[("x-a", json!(2)), ("x-c", json!(true))]);

        let diff = ExtensionsDiff::compare(&old, &new, &context).unwrap();
        assert_eq!(diff.added(), &["x-c".to_string()]);
        assert_eq!(diff.removed(), &["x-b".to_string()]);
        assert_eq!(diff.changed(), &["x-a".to_string()]);
        assert_eq!(diff.core_verdict(), DiffResult::Compatible);
    }

    #[test]
    fn test_removed_extension_breaking_when_forced() {
        let context = DiffContext::builder()
            .rule(CompatibilityRule::ExtensionRemoved, RuleOverride::Breaking)
            .build()
            .unwrap()
            .shared();
        let old = extensions(&[("x-b", json!("b"))]);

        let diff = ExtensionsDiff::compare(&old, &Extensions::new(), &context).unwrap();
        assert_eq!(diff.core_verdict(), DiffResult::Incompatible);
    }
}
