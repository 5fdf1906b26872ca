//! Whole-contract differences, the root of a diff tree

use crate::compat::changed::{Changed, as_changed};
use crate::compat::context::DiffContext;
use crate::compat::rules::CompatibilityRule;
use crate::compat::types::{OwnChange, flagged};
use crate::diff::extensions::ExtensionsDiff;
use crate::diff::operation::OperationDiff;
use crate::diff::security::SecuritySchemeDiff;
use crate::model::Endpoint;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiDiff {
    context: Arc<DiffContext>,
    new_endpoints: Vec<Endpoint>,
    missing_endpoints: Vec<Endpoint>,
    changed_operations: Vec<OperationDiff>,
    changed_security_schemes: BTreeMap<String, SecuritySchemeDiff>,
    extensions: Option<ExtensionsDiff>,
}

impl ApiDiff {
    pub fn builder(context: &Arc<DiffContext>) -> ApiDiffBuilder {
        ApiDiffBuilder {
            diff: ApiDiff {
                context: Arc::clone(context),
                new_endpoints: Vec::new(),
                missing_endpoints: Vec::new(),
                changed_operations: Vec::new(),
                changed_security_schemes: BTreeMap::new(),
                extensions: None,
            },
        }
    }

    pub fn new_endpoints(&self) -> &[Endpoint] {
        &self.new_endpoints
    }

    pub fn missing_endpoints(&self) -> &[Endpoint] {
        &self.missing_endpoints
    }

    pub fn changed_operations(&self) -> &[OperationDiff] {
        &self.changed_operations
    }

    pub fn changed_security_schemes(&self) -> &BTreeMap<String, SecuritySchemeDiff> {
        &self.changed_security_schemes
    }

    pub fn extensions(&self) -> Option<&ExtensionsDiff> {
        self.extensions.as_ref()
    }
}

impl Changed for ApiDiff {
    fn kind(&self) -> &'static str {
        "api"
    }

    fn context(&self) -> &DiffContext {
        &self.context
    }

    fn own_changes(&self) -> Vec<OwnChange> {
        flagged(&[
            (
                !self.missing_endpoints.is_empty(),
                OwnChange::guarded("endpoints", CompatibilityRule::OpenapiEndpointsDecreased),
            ),
            (
                !self.new_endpoints.is_empty(),
                OwnChange::unguarded("endpoints"),
            ),
        ])
    }

    fn children(&self) -> Vec<&dyn Changed> {
        let mut children: Vec<&dyn Changed> = self
            .changed_operations
            .iter()
            .map(|operation| operation as &dyn Changed)
            .collect();
        children.extend(
            self.changed_security_schemes
                .values()
                .map(|scheme| scheme as &dyn Changed),
        );
        children.extend(as_changed(&self.extensions));
        children
    }
}

#[derive(Debug, Clone)]
pub struct ApiDiffBuilder {
    diff: ApiDiff,
}

impl ApiDiffBuilder {
    pub fn new_endpoints(mut self, endpoints: Vec<Endpoint>) -> Self {
        self.diff.new_endpoints = endpoints;
        self
    }

    pub fn missing_endpoints(mut self, endpoints: Vec<Endpoint>) -> Self {
        self.diff.missing_endpoints = endpoints;
        self
    }

    pub fn changed_operation(mut self, operation: OperationDiff) -> Self {
        self.diff.changed_operations.push(operation);
        self
    }

    pub fn changed_security_scheme(mut self, scheme: SecuritySchemeDiff) -> Self {
        self.diff
            .changed_security_schemes
            .insert(scheme.name().to_string(), scheme);
        self
    }

    pub fn extensions(mut self, extensions: Option<ExtensionsDiff>) -> Self {
        self.diff.extensions = extensions;
        self
    }

    pub fn build(self) -> ApiDiff {
        self.diff
    }
}
