//! Schema differences
//!
//! Whether a schema change breaks clients depends on which way the data
//! flows: narrowing what a request may contain breaks old clients, while
//! widening what a response may contain does. Every [`SchemaDiff`] therefore
//! carries the [`Direction`] it was compared in.

use crate::compat::changed::{Changed, as_changed, present};
use crate::compat::context::DiffContext;
use crate::compat::rules::CompatibilityRule;
use crate::compat::types::{OwnChange, flagged};
use crate::diff::extensions::ExtensionsDiff;
use crate::diff::list::ListDiff;
use crate::diff::metadata::MetadataDiff;
use crate::model::Schema;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Data sent by the client
    Request,
    /// Data returned by the server
    Response,
}

/// Old and new value of an upper bound; `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LimitChange {
    pub old: Option<u64>,
    pub new: Option<u64>,
}

impl LimitChange {
    pub fn new(old: Option<u64>, new: Option<u64>) -> Self {
        Self { old, new }
    }

    /// The new bound admits fewer values than the old one
    pub fn is_narrowed(&self) -> bool {
        match (self.old, self.new) {
            (None, Some(_)) => true,
            (Some(old), Some(new)) => new < old,
            _ => false,
        }
    }

    /// The new bound admits more values than the old one
    pub fn is_widened(&self) -> bool {
        match (self.old, self.new) {
            (Some(_), None) => true,
            (Some(old), Some(new)) => new > old,
            _ => false,
        }
    }

    pub fn is_unchanged(&self) -> bool {
        self.old == self.new
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaDiff {
    old: Option<Schema>,
    new: Option<Schema>,
    context: Arc<DiffContext>,
    direction: Direction,
    changed_type: bool,
    discriminator_changed: bool,
    max_length: Option<LimitChange>,
    enum_values: Option<ListDiff<serde_json::Value>>,
    required: Option<ListDiff<String>>,
    increased_properties: Vec<String>,
    missing_properties: Vec<String>,
    description: Option<MetadataDiff>,
    properties: BTreeMap<String, SchemaDiff>,
    items: Option<Box<SchemaDiff>>,
    extensions: Option<ExtensionsDiff>,
}

impl SchemaDiff {
    pub fn builder(
        old: Option<Schema>,
        new: Option<Schema>,
        direction: Direction,
        context: &Arc<DiffContext>,
    ) -> SchemaDiffBuilder {
        SchemaDiffBuilder {
            diff: SchemaDiff {
                old,
                new,
                context: Arc::clone(context),
                direction,
                changed_type: false,
                discriminator_changed: false,
                max_length: None,
                enum_values: None,
                required: None,
                increased_properties: Vec::new(),
                missing_properties: Vec::new(),
                description: None,
                properties: BTreeMap::new(),
                items: None,
                extensions: None,
            },
        }
    }

    pub fn old_schema(&self) -> Option<&Schema> {
        self.old.as_ref()
    }

    pub fn new_schema(&self) -> Option<&Schema> {
        self.new.as_ref()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_changed_type(&self) -> bool {
        self.changed_type
    }

    pub fn is_discriminator_changed(&self) -> bool {
        self.discriminator_changed
    }

    pub fn max_length(&self) -> Option<&LimitChange> {
        self.max_length.as_ref()
    }

    pub fn enum_values(&self) -> Option<&ListDiff<serde_json::Value>> {
        self.enum_values.as_ref()
    }

    pub fn required(&self) -> Option<&ListDiff<String>> {
        self.required.as_ref()
    }

    pub fn increased_properties(&self) -> &[String] {
        &self.increased_properties
    }

    pub fn missing_properties(&self) -> &[String] {
        &self.missing_properties
    }

    pub fn description(&self) -> Option<&MetadataDiff> {
        self.description.as_ref()
    }

    pub fn properties(&self) -> &BTreeMap<String, SchemaDiff> {
        &self.properties
    }

    pub fn items(&self) -> Option<&SchemaDiff> {
        self.items.as_deref()
    }

    pub fn extensions(&self) -> Option<&ExtensionsDiff> {
        self.extensions.as_ref()
    }

    fn max_length_change(&self) -> Option<OwnChange> {
        let limit = self.max_length.filter(|limit| !limit.is_unchanged())?;
        let change = match self.direction {
            Direction::Request if limit.is_narrowed() => {
                OwnChange::guarded("maxLength", CompatibilityRule::RequestMaxLengthDecreased)
            }
            Direction::Response if limit.is_widened() => {
                OwnChange::guarded("maxLength", CompatibilityRule::ResponseMaxLengthIncreased)
            }
            _ => OwnChange::unguarded("maxLength"),
        };
        Some(change)
    }

    fn enum_change(&self) -> Option<OwnChange> {
        let values = self.enum_values.as_ref().filter(|values| !values.is_unchanged())?;
        let change = match self.direction {
            Direction::Request if !values.removed().is_empty() => {
                OwnChange::guarded("enum", CompatibilityRule::RequestEnumDecreased)
            }
            Direction::Response if !values.added().is_empty() => {
                OwnChange::guarded("enum", CompatibilityRule::ResponseEnumIncreased)
            }
            _ => OwnChange::unguarded("enum"),
        };
        Some(change)
    }

    fn required_change(&self) -> Option<OwnChange> {
        let required = self.required.as_ref().filter(|required| !required.is_unchanged())?;
        let change = match self.direction {
            Direction::Request if !required.added().is_empty() => {
                OwnChange::guarded("required", CompatibilityRule::RequestRequiredIncreased)
            }
            Direction::Response if !required.removed().is_empty() => {
                OwnChange::guarded("required", CompatibilityRule::ResponseRequiredDecreased)
            }
            _ => OwnChange::unguarded("required"),
        };
        Some(change)
    }

    fn properties_change(&self) -> Vec<OwnChange> {
        let missing = if self.direction == Direction::Response {
            OwnChange::guarded("properties", CompatibilityRule::ResponsePropertiesDecreased)
        } else {
            OwnChange::unguarded("properties")
        };
        flagged(&[
            (!self.missing_properties.is_empty(), missing),
            (
                !self.increased_properties.is_empty(),
                OwnChange::unguarded("properties"),
            ),
        ])
    }
}

impl Changed for SchemaDiff {
    fn kind(&self) -> &'static str {
        "schema"
    }

    fn context(&self) -> &DiffContext {
        &self.context
    }

    fn own_changes(&self) -> Vec<OwnChange> {
        let mut changes = flagged(&[
            (
                self.changed_type,
                OwnChange::guarded("type", CompatibilityRule::SchemaTypeChanged),
            ),
            (
                self.discriminator_changed,
                OwnChange::guarded("discriminator", CompatibilityRule::SchemaDiscriminatorChanged),
            ),
        ]);
        changes.extend(self.max_length_change());
        changes.extend(self.enum_change());
        changes.extend(self.required_change());
        changes.extend(self.properties_change());
        changes
    }

    fn children(&self) -> Vec<&dyn Changed> {
        let mut children = present([as_changed(&self.description)]);
        children.extend(self.properties.values().map(|property| property as &dyn Changed));
        children.extend(present([
            self.items.as_deref().map(|items| items as &dyn Changed),
            as_changed(&self.extensions),
        ]));
        children
    }
}

#[derive(Debug, Clone)]
pub struct SchemaDiffBuilder {
    diff: SchemaDiff,
}

impl SchemaDiffBuilder {
    pub fn changed_type(mut self, changed: bool) -> Self {
        self.diff.changed_type = changed;
        self
    }

    pub fn discriminator_changed(mut self, changed: bool) -> Self {
        self.diff.discriminator_changed = changed;
        self
    }

    pub fn max_length(mut self, limit: Option<LimitChange>) -> Self {
        self.diff.max_length = limit;
        self
    }

    pub fn enum_values(mut self, values: Option<ListDiff<serde_json::Value>>) -> Self {
        self.diff.enum_values = values;
        self
    }

    pub fn required(mut self, required: Option<ListDiff<String>>) -> Self {
        self.diff.required = required;
        self
    }

    pub fn increased_properties(mut self, names: Vec<String>) -> Self {
        self.diff.increased_properties = names;
        self
    }

    pub fn missing_properties(mut self, names: Vec<String>) -> Self {
        self.diff.missing_properties = names;
        self
    }

    pub fn description(mut self, description: Option<MetadataDiff>) -> Self {
        self.diff.description = description;
        self
    }

    /// Add the diff of one property present in both versions
    pub fn property(mut self, name: impl Into<String>, diff: SchemaDiff) -> Self {
        self.diff.properties.insert(name.into(), diff);
        self
    }

    pub fn items(mut self, items: Option<SchemaDiff>) -> Self {
        self.diff.items = items.map(Box::new);
        self
    }

    pub fn extensions(mut self, extensions: Option<ExtensionsDiff>) -> Self {
        self.diff.extensions = extensions;
        self
    }

    pub fn build(self) -> SchemaDiff {
        self.diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::types::DiffResult;
    use serde_json::json;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn test_limit_change_directions() {
        assert!(LimitChange::new(None, Some(10)).is_narrowed());
        assert!(LimitChange::new(Some(10), Some(5)).is_narrowed());
        assert!(LimitChange::new(Some(10), None).is_widened());
        assert!(!LimitChange::new(Some(10), Some(10)).is_widened());
    }

    #[test]
    fn test_enum_removal_breaks_requests_only() {
        let context = DiffContext::new().shared();
        let values = ListDiff::between(&[json!("cat"), json!("dog")], &[json!("cat")]);

        let request = SchemaDiff::builder(None, None, Direction::Request, &context)
            .enum_values(Some(values.clone()))
            .build();
        let response = SchemaDiff::builder(None, None, Direction::Response, &context)
            .enum_values(Some(values))
            .build();

        assert_eq!(request.core_verdict(), DiffResult::Incompatible);
        assert_eq!(response.core_verdict(), DiffResult::Compatible);
    }

    #[test]
    fn test_max_length_widening_breaks_responses_only() {
        let context = DiffContext::new().shared();
        let limit = Some(LimitChange::new(Some(10), Some(20)));

        let request = SchemaDiff::builder(None, None, Direction::Request, &context)
            .max_length(limit)
            .build();
        let response = SchemaDiff::builder(None, None, Direction::Response, &context)
            .max_length(limit)
            .build();

        assert_eq!(request.core_verdict(), DiffResult::Compatible);
        assert_eq!(response.core_verdict(), DiffResult::Incompatible);
    }

    #[test]
    fn test_required_changes_follow_direction() {
        let context = DiffContext::new().shared();
        let added = ListDiff::between(&strings(&["id"]), &strings(&["id", "name"]));

        let request = SchemaDiff::builder(None, None, Direction::Request, &context)
            .required(Some(added.clone()))
            .build();
        let response = SchemaDiff::builder(None, None, Direction::Response, &context)
            .required(Some(added))
            .build();

        assert_eq!(request.core_verdict(), DiffResult::Incompatible);
        assert_eq!(response.core_verdict(), DiffResult::Compatible);
    }

    #[test]
    fn test_missing_response_property() {
        let context = DiffContext::new().shared();
        let diff = SchemaDiff::builder(None, None, Direction::Response, &context)
            .missing_properties(strings(&["nickname"]))
            .build();

        assert_eq!(diff.core_verdict(), DiffResult::Incompatible);
    }

    #[test]
    fn test_nested_property_and_items_aggregate() {
        let context = DiffContext::new().shared();
        let tag = SchemaDiff::builder(None, None, Direction::Response, &context)
            .changed_type(true)
            .build();
        let items = SchemaDiff::builder(None, None, Direction::Response, &context)
            .property("tag", tag)
            .build();
        let root = SchemaDiff::builder(None, None, Direction::Response, &context)
            .items(Some(items))
            .build();

        assert_eq!(root.core_verdict(), DiffResult::NoChanges);
        assert_eq!(root.children().len(), 1);
        assert_eq!(root.overall_verdict().unwrap(), DiffResult::Incompatible);
        assert!(root.items().is_some_and(|items| items.properties().contains_key("tag")));
    }

    #[test]
    fn test_unchanged_lists_are_ignored() {
        let context = DiffContext::new().shared();
        let diff = SchemaDiff::builder(None, None, Direction::Request, &context)
            .required(Some(ListDiff::between(&strings(&["a"]), &strings(&["a"]))))
            .max_length(Some(LimitChange::new(Some(4), Some(4))))
            .build();

        assert!(diff.own_changes().is_empty());
        assert_eq!(diff.core_verdict(), DiffResult::NoChanges);
    }
}
