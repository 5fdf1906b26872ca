//! Operation differences

use crate::compat::changed::{Changed, as_changed, present};
use crate::compat::context::DiffContext;
use crate::compat::error::{DiffError, Result};
use crate::compat::rules::CompatibilityRule;
use crate::compat::types::{OwnChange, flagged};
use crate::diff::extensions::ExtensionsDiff;
use crate::diff::metadata::MetadataDiff;
use crate::diff::parameter::ParametersDiff;
use crate::diff::schema::SchemaDiff;
use crate::model::{Endpoint, Operation};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Differences between two versions of one operation.
///
/// The parameter diff is always present, even when the lists compared equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationDiff {
    endpoint: Endpoint,
    old: Option<Operation>,
    new: Option<Operation>,
    context: Arc<DiffContext>,
    deprecated: bool,
    request_body_deleted: bool,
    increased_responses: Vec<String>,
    missing_responses: Vec<String>,
    summary: Option<MetadataDiff>,
    description: Option<MetadataDiff>,
    parameters: ParametersDiff,
    request_body: Option<SchemaDiff>,
    responses: BTreeMap<String, SchemaDiff>,
    extensions: Option<ExtensionsDiff>,
}

impl OperationDiff {
    pub fn builder(
        endpoint: Endpoint,
        old: Option<Operation>,
        new: Option<Operation>,
        context: &Arc<DiffContext>,
    ) -> OperationDiffBuilder {
        OperationDiffBuilder {
            endpoint,
            old,
            new,
            context: Arc::clone(context),
            deprecated: false,
            request_body_deleted: false,
            increased_responses: Vec::new(),
            missing_responses: Vec::new(),
            summary: None,
            description: None,
            parameters: None,
            request_body: None,
            responses: BTreeMap::new(),
            extensions: None,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn old_operation(&self) -> Option<&Operation> {
        self.old.as_ref()
    }

    pub fn new_operation(&self) -> Option<&Operation> {
        self.new.as_ref()
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    pub fn is_request_body_deleted(&self) -> bool {
        self.request_body_deleted
    }

    /// Status codes only the new version declares
    pub fn increased_responses(&self) -> &[String] {
        &self.increased_responses
    }

    /// Status codes only the old version declares
    pub fn missing_responses(&self) -> &[String] {
        &self.missing_responses
    }

    pub fn summary(&self) -> Option<&MetadataDiff> {
        self.summary.as_ref()
    }

    pub fn description(&self) -> Option<&MetadataDiff> {
        self.description.as_ref()
    }

    pub fn parameters(&self) -> &ParametersDiff {
        &self.parameters
    }

    pub fn request_body(&self) -> Option<&SchemaDiff> {
        self.request_body.as_ref()
    }

    /// Changed response bodies keyed by status code
    pub fn responses(&self) -> &BTreeMap<String, SchemaDiff> {
        &self.responses
    }

    pub fn extensions(&self) -> Option<&ExtensionsDiff> {
        self.extensions.as_ref()
    }
}

impl Changed for OperationDiff {
    fn kind(&self) -> &'static str {
        "operation"
    }

    fn context(&self) -> &DiffContext {
        &self.context
    }

    fn own_changes(&self) -> Vec<OwnChange> {
        flagged(&[
            (self.deprecated, OwnChange::unguarded("deprecated")),
            (
                self.request_body_deleted,
                OwnChange::guarded("requestBody", CompatibilityRule::RequestBodyDeleted),
            ),
            (
                !self.missing_responses.is_empty(),
                OwnChange::guarded("responses", CompatibilityRule::ResponseResponsesDecreased),
            ),
            (
                !self.increased_responses.is_empty(),
                OwnChange::unguarded("responses"),
            ),
        ])
    }

    fn children(&self) -> Vec<&dyn Changed> {
        let mut children = present([
            as_changed(&self.summary),
            as_changed(&self.description),
            Some(&self.parameters as &dyn Changed),
            as_changed(&self.request_body),
        ]);
        children.extend(self.responses.values().map(|response| response as &dyn Changed));
        children.extend(as_changed(&self.extensions));
        children
    }
}

#[derive(Debug, Clone)]
pub struct OperationDiffBuilder {
    endpoint: Endpoint,
    old: Option<Operation>,
    new: Option<Operation>,
    context: Arc<DiffContext>,
    deprecated: bool,
    request_body_deleted: bool,
    increased_responses: Vec<String>,
    missing_responses: Vec<String>,
    summary: Option<MetadataDiff>,
    description: Option<MetadataDiff>,
    parameters: Option<ParametersDiff>,
    request_body: Option<SchemaDiff>,
    responses: BTreeMap<String, SchemaDiff>,
    extensions: Option<ExtensionsDiff>,
}

impl OperationDiffBuilder {
    pub fn deprecated(mut self, changed: bool) -> Self {
        self.deprecated = changed;
        self
    }

    pub fn request_body_deleted(mut self, deleted: bool) -> Self {
        self.request_body_deleted = deleted;
        self
    }

    pub fn increased_responses(mut self, codes: Vec<String>) -> Self {
        self.increased_responses = codes;
        self
    }

    pub fn missing_responses(mut self, codes: Vec<String>) -> Self {
        self.missing_responses = codes;
        self
    }

    pub fn summary(mut self, summary: Option<MetadataDiff>) -> Self {
        self.summary = summary;
        self
    }

    pub fn description(mut self, description: Option<MetadataDiff>) -> Self {
        self.description = description;
        self
    }

    pub fn parameters(mut self, parameters: ParametersDiff) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn request_body(mut self, body: Option<SchemaDiff>) -> Self {
        self.request_body = body;
        self
    }

    /// Add the diff of a response body declared by both versions
    pub fn response(mut self, status: impl Into<String>, diff: SchemaDiff) -> Self {
        self.responses.insert(status.into(), diff);
        self
    }

    pub fn extensions(mut self, extensions: Option<ExtensionsDiff>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Finish the node; fails when the parameter diff was never supplied
    pub fn build(self) -> Result<OperationDiff> {
        let parameters = self.parameters.ok_or(DiffError::MissingChild {
            node: "operation",
            child: "parameters",
        })?;

        Ok(OperationDiff {
            endpoint: self.endpoint,
            old: self.old,
            new: self.new,
            context: self.context,
            deprecated: self.deprecated,
            request_body_deleted: self.request_body_deleted,
            increased_responses: self.increased_responses,
            missing_responses: self.missing_responses,
            summary: self.summary,
            description: self.description,
            parameters,
            request_body: self.request_body,
            responses: self.responses,
            extensions: self.extensions,
        })
    }
}
