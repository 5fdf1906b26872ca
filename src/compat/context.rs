//! Run-scoped diff context and its configuration
//!
//! A [`DiffContext`] is built once per comparison from a
//! [`CompatibilityConfig`] and then shared read-only by every node of the
//! diff tree. All configuration problems surface here.

use crate::compat::categories::RuleCategory;
use crate::compat::error::{DiffError, Result};
use crate::compat::rules::CompatibilityRule;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Per-rule severity override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOverride {
    /// Use the rule's registry default
    #[default]
    Default,
    /// Never treat the change as breaking
    Compatible,
    /// Always treat the change as breaking
    Breaking,
}

impl RuleOverride {
    fn resolve(self, rule: CompatibilityRule) -> bool {
        match self {
            RuleOverride::Default => rule.enabled_by_default(),
            RuleOverride::Compatible => false,
            RuleOverride::Breaking => true,
        }
    }
}

/// Configuration for compatibility classification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompatibilityConfig {
    /// Severity overrides keyed by rule identifier or dotted rule key
    #[serde(default)]
    pub rules: BTreeMap<String, RuleOverride>,
    /// Rules to force compatible
    #[serde(default)]
    pub except_rules: Vec<String>,
    /// Categories whose rules are all forced compatible
    #[serde(default)]
    pub except_categories: Vec<String>,
    /// Aggregation depth limit
    #[serde(default)]
    pub max_depth: Option<usize>,
}

impl CompatibilityConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))
    }

    /// Load configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        #[derive(serde::Deserialize)]
        #[serde(deny_unknown_fields)]
        struct ConfigFile {
            #[serde(default)]
            #[allow(dead_code)]
            version: Option<String>,
            compatibility: Option<CompatibilityConfig>,
        }

        let config_file: ConfigFile = serde_yaml::from_str(yaml)?;
        Ok(config_file.compatibility.unwrap_or_default())
    }
}

/// Immutable policy context consulted by every rule during one comparison
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiffContext {
    enablement: BTreeMap<CompatibilityRule, bool>,
    max_depth: usize,
    left_location: Option<String>,
    right_location: Option<String>,
}

impl DiffContext {
    pub const DEFAULT_MAX_DEPTH: usize = 256;

    /// Context with every rule at its registry default
    pub fn new() -> Self {
        Self {
            enablement: BTreeMap::new(),
            max_depth: Self::DEFAULT_MAX_DEPTH,
            left_location: None,
            right_location: None,
        }
    }

    pub fn builder() -> DiffContextBuilder {
        DiffContextBuilder::default()
    }

    /// Build a context from configuration, rejecting unknown or conflicting entries
    pub fn from_config(config: &CompatibilityConfig) -> Result<Self> {
        let mut builder = Self::builder();

        for id in &config.except_categories {
            let category = RuleCategory::from_id(id).ok_or_else(|| {
                warn!(category = %id, "unknown category in configuration");
                DiffError::UnknownCategory { id: id.clone() }
            })?;
            builder = builder.category(category, RuleOverride::Compatible);
        }

        for (key, value) in &config.rules {
            builder = builder.rule(lookup_rule(key)?, *value);
        }
        for key in &config.except_rules {
            builder = builder.rule(lookup_rule(key)?, RuleOverride::Compatible);
        }

        if let Some(depth) = config.max_depth {
            builder = builder.max_depth(depth);
        }
        builder.build()
    }

    /// Wrap the context for sharing across a diff tree
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Whether changes guarded by `rule` are breaking in this run
    pub fn is_enabled(&self, rule: CompatibilityRule) -> bool {
        self.enablement
            .get(&rule)
            .copied()
            .unwrap_or_else(|| rule.enabled_by_default())
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn left_location(&self) -> Option<&str> {
        self.left_location.as_deref()
    }

    pub fn right_location(&self) -> Option<&str> {
        self.right_location.as_deref()
    }

    /// Rules whose enablement differs from the registry default
    pub fn overridden_rules(&self) -> impl Iterator<Item = (CompatibilityRule, bool)> + '_ {
        self.enablement
            .iter()
            .filter(|(rule, enabled)| rule.enabled_by_default() != **enabled)
            .map(|(rule, enabled)| (*rule, *enabled))
    }
}

impl Default for DiffContext {
    fn default() -> Self {
        Self::new()
    }
}

fn lookup_rule(key: &str) -> Result<CompatibilityRule> {
    CompatibilityRule::from_id(key).ok_or_else(|| {
        warn!(rule = %key, "unknown rule in configuration");
        DiffError::UnknownRule {
            key: key.to_string(),
        }
    })
}

/// Collects overrides and validates them into a [`DiffContext`]
#[derive(Debug, Clone, Default)]
pub struct DiffContextBuilder {
    categories: Vec<(RuleCategory, RuleOverride)>,
    rules: Vec<(CompatibilityRule, RuleOverride)>,
    max_depth: Option<usize>,
    left_location: Option<String>,
    right_location: Option<String>,
}

impl DiffContextBuilder {
    pub fn rule(mut self, rule: CompatibilityRule, value: RuleOverride) -> Self {
        self.rules.push((rule, value));
        self
    }

    pub fn category(mut self, category: RuleCategory, value: RuleOverride) -> Self {
        self.categories.push((category, value));
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Record where the old and new contracts were loaded from
    pub fn locations(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.left_location = Some(left.into());
        self.right_location = Some(right.into());
        self
    }

    /// Resolve overrides; per-rule entries win over category entries
    pub fn build(self) -> Result<DiffContext> {
        if self.max_depth == Some(0) {
            warn!("max_depth of 0 leaves no room for the root node");
            return Err(DiffError::InvalidMaxDepth { depth: 0 });
        }

        let category_values = collapse(
            self.categories
                .iter()
                .flat_map(|(category, value)| {
                    CompatibilityRule::in_category(*category).map(move |rule| (rule, *value))
                }),
        )?;
        let rule_values = collapse(self.rules.iter().copied())?;

        let mut enablement = BTreeMap::new();
        for (rule, value) in category_values.into_iter().chain(rule_values) {
            enablement.insert(rule, value.resolve(rule));
        }

        let context = DiffContext {
            enablement,
            max_depth: self.max_depth.unwrap_or(DiffContext::DEFAULT_MAX_DEPTH),
            left_location: self.left_location,
            right_location: self.right_location,
        };
        debug!(
            overrides = context.overridden_rules().count(),
            max_depth = context.max_depth,
            "diff context created"
        );
        Ok(context)
    }
}

/// Merge entries for the same rule; two different non-default values conflict
fn collapse(
    entries: impl Iterator<Item = (CompatibilityRule, RuleOverride)>,
) -> Result<BTreeMap<CompatibilityRule, RuleOverride>> {
    let mut merged: BTreeMap<CompatibilityRule, RuleOverride> = BTreeMap::new();
    for (rule, value) in entries {
        match merged.get(&rule).copied() {
            Some(existing) if existing == value || value == RuleOverride::Default => {}
            Some(RuleOverride::Default) | None => {
                merged.insert(rule, value);
            }
            Some(_) => {
                warn!(rule = %rule, "conflicting overrides in configuration");
                return Err(DiffError::ConflictingOverride {
                    rule: rule.id().to_string(),
                });
            }
        }
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context_uses_registry_defaults() {
        let context = DiffContext::new();
        for rule in CompatibilityRule::all() {
            assert_eq!(context.is_enabled(*rule), rule.enabled_by_default());
        }
        assert_eq!(context.max_depth(), DiffContext::DEFAULT_MAX_DEPTH);
        assert_eq!(context.overridden_rules().count(), 0);
    }

    #[test]
    fn test_rule_override_wins_over_category() {
        let context = DiffContext::builder()
            .rule(
                CompatibilityRule::SecuritySchemeOauth2AuthUrlChanged,
                RuleOverride::Breaking,
            )
            .category(RuleCategory::Security, RuleOverride::Compatible)
            .build()
            .unwrap();

        assert!(context.is_enabled(CompatibilityRule::SecuritySchemeOauth2AuthUrlChanged));
        assert!(!context.is_enabled(CompatibilityRule::SecuritySchemeOauth2TokenUrlChanged));
        assert!(context.is_enabled(CompatibilityRule::SchemaTypeChanged));
    }

    #[test]
    fn test_conflicting_rule_overrides_rejected() {
        let result = DiffContext::builder()
            .rule(CompatibilityRule::SchemaTypeChanged, RuleOverride::Compatible)
            .rule(CompatibilityRule::SchemaTypeChanged, RuleOverride::Breaking)
            .build();

        assert!(matches!(
            result,
            Err(DiffError::ConflictingOverride { ref rule }) if rule == "SCHEMA_TYPE_CHANGED"
        ));
    }

    #[test]
    fn test_repeated_and_default_entries_do_not_conflict() {
        let context = DiffContext::builder()
            .rule(CompatibilityRule::SchemaTypeChanged, RuleOverride::Compatible)
            .rule(CompatibilityRule::SchemaTypeChanged, RuleOverride::Default)
            .rule(CompatibilityRule::SchemaTypeChanged, RuleOverride::Compatible)
            .build()
            .unwrap();

        assert!(!context.is_enabled(CompatibilityRule::SchemaTypeChanged));
    }

    #[test]
    fn test_unknown_rule_key_fails_at_construction() {
        let mut config = CompatibilityConfig::default();
        config
            .rules
            .insert("incompatible.nothing.changed".to_string(), RuleOverride::Compatible);

        let err = DiffContext::from_config(&config).unwrap_err();
        let DiffError::UnknownRule { key } = err else {
            panic!("expected unknown rule, got {err:?}");
        };
        assert_eq!(key, "incompatible.nothing.changed");
    }

    #[test]
    fn test_unknown_category_fails_at_construction() {
        let config = CompatibilityConfig {
            except_categories: vec!["WIRE".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            DiffContext::from_config(&config),
            Err(DiffError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn test_except_rules_conflicting_with_rules_map() {
        let mut config = CompatibilityConfig::default();
        config
            .rules
            .insert("REQUEST_PARAM_STYLE_CHANGED".to_string(), RuleOverride::Breaking);
        config.except_rules.push("incompatible.request.param.style.changed".to_string());

        assert!(matches!(
            DiffContext::from_config(&config),
            Err(DiffError::ConflictingOverride { .. })
        ));
    }
}
