//! Request parameter differences

use crate::compat::changed::{Changed, as_changed, present};
use crate::compat::context::DiffContext;
use crate::compat::rules::CompatibilityRule;
use crate::compat::types::{OwnChange, flagged};
use crate::diff::extensions::ExtensionsDiff;
use crate::diff::metadata::MetadataDiff;
use crate::diff::schema::SchemaDiff;
use crate::model::Parameter;
use std::sync::Arc;

/// Differences between two versions of one parameter, identified by name and location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterDiff {
    name: String,
    location: String,
    old: Option<Parameter>,
    new: Option<Parameter>,
    context: Arc<DiffContext>,
    /// Optional parameter became required
    changed_required: bool,
    deprecated: bool,
    changed_style: bool,
    changed_explode: bool,
    /// Empty values were allowed and no longer are
    changed_allow_empty_value: bool,
    description: Option<MetadataDiff>,
    schema: Option<SchemaDiff>,
    extensions: Option<ExtensionsDiff>,
}

impl ParameterDiff {
    pub fn builder(
        name: impl Into<String>,
        location: impl Into<String>,
        old: Option<Parameter>,
        new: Option<Parameter>,
        context: &Arc<DiffContext>,
    ) -> ParameterDiffBuilder {
        ParameterDiffBuilder {
            diff: ParameterDiff {
                name: name.into(),
                location: location.into(),
                old,
                new,
                context: Arc::clone(context),
                changed_required: false,
                deprecated: false,
                changed_style: false,
                changed_explode: false,
                changed_allow_empty_value: false,
                description: None,
                schema: None,
                extensions: None,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn old_parameter(&self) -> Option<&Parameter> {
        self.old.as_ref()
    }

    pub fn new_parameter(&self) -> Option<&Parameter> {
        self.new.as_ref()
    }

    pub fn is_changed_required(&self) -> bool {
        self.changed_required
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    pub fn is_changed_style(&self) -> bool {
        self.changed_style
    }

    pub fn is_changed_explode(&self) -> bool {
        self.changed_explode
    }

    pub fn is_changed_allow_empty_value(&self) -> bool {
        self.changed_allow_empty_value
    }

    pub fn description(&self) -> Option<&MetadataDiff> {
        self.description.as_ref()
    }

    pub fn schema(&self) -> Option<&SchemaDiff> {
        self.schema.as_ref()
    }

    pub fn extensions(&self) -> Option<&ExtensionsDiff> {
        self.extensions.as_ref()
    }
}

impl Changed for ParameterDiff {
    fn kind(&self) -> &'static str {
        "parameter"
    }

    fn context(&self) -> &DiffContext {
        &self.context
    }

    fn own_changes(&self) -> Vec<OwnChange> {
        flagged(&[
            (
                self.changed_required,
                OwnChange::guarded("required", CompatibilityRule::RequestParamsRequiredIncreased),
            ),
            (self.deprecated, OwnChange::unguarded("deprecated")),
            (
                self.changed_style,
                OwnChange::guarded("style", CompatibilityRule::RequestParamStyleChanged),
            ),
            (
                self.changed_explode,
                OwnChange::guarded("explode", CompatibilityRule::RequestParamExplodeChanged),
            ),
            (
                self.changed_allow_empty_value,
                OwnChange::guarded(
                    "allowEmptyValue",
                    CompatibilityRule::RequestParamAllowemptyDecreased,
                ),
            ),
        ])
    }

    fn children(&self) -> Vec<&dyn Changed> {
        present([
            as_changed(&self.description),
            as_changed(&self.schema),
            as_changed(&self.extensions),
        ])
    }
}

#[derive(Debug, Clone)]
pub struct ParameterDiffBuilder {
    diff: ParameterDiff,
}

impl ParameterDiffBuilder {
    pub fn changed_required(mut self, changed: bool) -> Self {
        self.diff.changed_required = changed;
        self
    }

    pub fn deprecated(mut self, changed: bool) -> Self {
        self.diff.deprecated = changed;
        self
    }

    pub fn changed_style(mut self, changed: bool) -> Self {
        self.diff.changed_style = changed;
        self
    }

    pub fn changed_explode(mut self, changed: bool) -> Self {
        self.diff.changed_explode = changed;
        self
    }

    pub fn changed_allow_empty_value(mut self, changed: bool) -> Self {
        self.diff.changed_allow_empty_value = changed;
        self
    }

    pub fn description(mut self, description: Option<MetadataDiff>) -> Self {
        self.diff.description = description;
        self
    }

    pub fn schema(mut self, schema: Option<SchemaDiff>) -> Self {
        self.diff.schema = schema;
        self
    }

    pub fn extensions(mut self, extensions: Option<ExtensionsDiff>) -> Self {
        self.diff.extensions = extensions;
        self
    }

    pub fn build(self) -> ParameterDiff {
        self.diff
    }
}

/// Differences between the parameter lists of two operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParametersDiff {
    old: Vec<Parameter>,
    new: Vec<Parameter>,
    context: Arc<DiffContext>,
    increased: Vec<Parameter>,
    missing: Vec<Parameter>,
    changed: Vec<ParameterDiff>,
}

impl ParametersDiff {
    pub fn new(
        old: Vec<Parameter>,
        new: Vec<Parameter>,
        increased: Vec<Parameter>,
        missing: Vec<Parameter>,
        changed: Vec<ParameterDiff>,
        context: &Arc<DiffContext>,
    ) -> Self {
        Self {
            old,
            new,
            context: Arc::clone(context),
            increased,
            missing,
            changed,
        }
    }

    /// Parameter lists that compared equal
    pub fn unchanged(parameters: Vec<Parameter>, context: &Arc<DiffContext>) -> Self {
        Self::new(
            parameters.clone(),
            parameters,
            Vec::new(),
            Vec::new(),
            Vec::new(),
            context,
        )
    }

    pub fn old_parameters(&self) -> &[Parameter] {
        &self.old
    }

    pub fn new_parameters(&self) -> &[Parameter] {
        &self.new
    }

    pub fn increased(&self) -> &[Parameter] {
        &self.increased
    }

    pub fn missing(&self) -> &[Parameter] {
        &self.missing
    }

    pub fn changed(&self) -> &[ParameterDiff] {
        &self.changed
    }
}

impl Changed for ParametersDiff {
    fn kind(&self) -> &'static str {
        "parameters"
    }

    fn context(&self) -> &DiffContext {
        &self.context
    }

    fn own_changes(&self) -> Vec<OwnChange> {
        let added_required = self.increased.iter().any(|parameter| parameter.required);
        let added_optional = self.increased.iter().any(|parameter| !parameter.required);

        flagged(&[
            (
                !self.missing.is_empty(),
                OwnChange::guarded("missing", CompatibilityRule::RequestParamsDecreased),
            ),
            (
                added_required,
                OwnChange::guarded("increased", CompatibilityRule::RequestParamsRequiredIncreased),
            ),
            (added_optional, OwnChange::unguarded("increased")),
        ])
    }

    fn children(&self) -> Vec<&dyn Changed> {
        self.changed
            .iter()
            .map(|parameter| parameter as &dyn Changed)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::context::RuleOverride;
    use crate::compat::types::DiffResult;

    fn parameter(name: &str, required: bool) -> Parameter {
        Parameter {
            name: name.to_string(),
            location: "query".to_string(),
            required,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_optional_parameter_is_compatible() {
        let context = DiffContext::new().shared();
        let diff = ParametersDiff::new(
            vec![],
            vec![parameter("limit", false)],
            vec![parameter("limit", false)],
            vec![],
            vec![],
            &context,
        );

        assert_eq!(diff.overall_verdict().unwrap(), DiffResult::Compatible);
    }

    #[test]
    fn test_new_required_parameter_is_incompatible() {
        let context = DiffContext::new().shared();
        let diff = ParametersDiff::new(
            vec![],
            vec![parameter("tenant", true)],
            vec![parameter("tenant", true)],
            vec![],
            vec![],
            &context,
        );

        assert_eq!(diff.core_verdict(), DiffResult::Incompatible);
    }

    #[test]
    fn test_style_change_relaxed_by_policy() {
        let context = DiffContext::builder()
            .rule(CompatibilityRule::RequestParamStyleChanged, RuleOverride::Compatible)
            .build()
            .unwrap()
            .shared();
        let changed = ParameterDiff::builder("tags", "query", None, None, &context)
            .changed_style(true)
            .build();
        let diff = ParametersDiff::new(vec![], vec![], vec![], vec![], vec![changed], &context);

        assert_eq!(diff.core_verdict(), DiffResult::NoChanges);
        assert_eq!(diff.overall_verdict().unwrap(), DiffResult::Compatible);
    }

    #[test]
    fn test_deprecation_is_compatible() {
        let context = DiffContext::new().shared();
        let diff = ParameterDiff::builder("q", "query", None, None, &context)
            .deprecated(true)
            .build();

        assert_eq!(diff.core_verdict(), DiffResult::Compatible);
        assert_eq!(diff.name(), "q");
    }
}
