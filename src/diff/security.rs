//! Security scheme differences

use crate::compat::changed::{Changed, as_changed, present};
use crate::compat::context::DiffContext;
use crate::compat::rules::CompatibilityRule;
use crate::compat::types::{OwnChange, flagged};
use crate::diff::extensions::ExtensionsDiff;
use crate::diff::list::ListDiff;
use crate::diff::metadata::MetadataDiff;
use crate::diff::oauth::OAuthFlowsDiff;
use crate::model::SecurityScheme;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecuritySchemeDiff {
    name: String,
    old: Option<SecurityScheme>,
    new: Option<SecurityScheme>,
    context: Arc<DiffContext>,
    changed_type: bool,
    changed_in: bool,
    changed_scheme: bool,
    changed_bearer_format: bool,
    changed_open_id_connect_url: bool,
    /// Scopes demanded by the security requirements referencing this scheme
    scopes: Option<ListDiff<String>>,
    description: Option<MetadataDiff>,
    oauth_flows: Option<OAuthFlowsDiff>,
    extensions: Option<ExtensionsDiff>,
}

impl SecuritySchemeDiff {
    pub fn builder(
        name: impl Into<String>,
        old: Option<SecurityScheme>,
        new: Option<SecurityScheme>,
        context: &Arc<DiffContext>,
    ) -> SecuritySchemeDiffBuilder {
        SecuritySchemeDiffBuilder {
            diff: SecuritySchemeDiff {
                name: name.into(),
                old,
                new,
                context: Arc::clone(context),
                changed_type: false,
                changed_in: false,
                changed_scheme: false,
                changed_bearer_format: false,
                changed_open_id_connect_url: false,
                scopes: None,
                description: None,
                oauth_flows: None,
                extensions: None,
            },
        }
    }

    /// Name the scheme is registered under in the components section
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn old_scheme(&self) -> Option<&SecurityScheme> {
        self.old.as_ref()
    }

    pub fn new_scheme(&self) -> Option<&SecurityScheme> {
        self.new.as_ref()
    }

    pub fn is_changed_type(&self) -> bool {
        self.changed_type
    }

    pub fn is_changed_in(&self) -> bool {
        self.changed_in
    }

    pub fn is_changed_scheme(&self) -> bool {
        self.changed_scheme
    }

    pub fn is_changed_bearer_format(&self) -> bool {
        self.changed_bearer_format
    }

    pub fn is_changed_open_id_connect_url(&self) -> bool {
        self.changed_open_id_connect_url
    }

    pub fn scopes(&self) -> Option<&ListDiff<String>> {
        self.scopes.as_ref()
    }

    pub fn description(&self) -> Option<&MetadataDiff> {
        self.description.as_ref()
    }

    pub fn oauth_flows(&self) -> Option<&OAuthFlowsDiff> {
        self.oauth_flows.as_ref()
    }

    pub fn extensions(&self) -> Option<&ExtensionsDiff> {
        self.extensions.as_ref()
    }
}

impl Changed for SecuritySchemeDiff {
    fn kind(&self) -> &'static str {
        "security_scheme"
    }

    fn context(&self) -> &DiffContext {
        &self.context
    }

    fn own_changes(&self) -> Vec<OwnChange> {
        let scopes_added = self.scopes.as_ref().is_some_and(|s| !s.added().is_empty());
        let scopes_removed = self.scopes.as_ref().is_some_and(|s| !s.removed().is_empty());

        flagged(&[
            (
                self.changed_type,
                OwnChange::guarded("type", CompatibilityRule::SecuritySchemeTypeChanged),
            ),
            (
                self.changed_in,
                OwnChange::guarded("in", CompatibilityRule::SecuritySchemeInChanged),
            ),
            (
                self.changed_scheme,
                OwnChange::guarded("scheme", CompatibilityRule::SecuritySchemeSchemeChanged),
            ),
            (
                self.changed_bearer_format,
                OwnChange::guarded(
                    "bearerFormat",
                    CompatibilityRule::SecuritySchemeBearerFormatChanged,
                ),
            ),
            (
                self.changed_open_id_connect_url,
                OwnChange::guarded(
                    "openIdConnectUrl",
                    CompatibilityRule::SecuritySchemeOpenidconnectUrlChanged,
                ),
            ),
            (
                scopes_added,
                OwnChange::guarded("scopes", CompatibilityRule::SecuritySchemeScopesIncreased),
            ),
            (scopes_removed, OwnChange::unguarded("scopes")),
        ])
    }

    fn children(&self) -> Vec<&dyn Changed> {
        present([
            as_changed(&self.description),
            as_changed(&self.oauth_flows),
            as_changed(&self.extensions),
        ])
    }
}

#[derive(Debug, Clone)]
pub struct SecuritySchemeDiffBuilder {
    diff: SecuritySchemeDiff,
}

impl SecuritySchemeDiffBuilder {
    pub fn changed_type(mut self, changed: bool) -> Self {
        self.diff.changed_type = changed;
        self
    }

    pub fn changed_in(mut self, changed: bool) -> Self {
        self.diff.changed_in = changed;
        self
    }

    pub fn changed_scheme(mut self, changed: bool) -> Self {
        self.diff.changed_scheme = changed;
        self
    }

    pub fn changed_bearer_format(mut self, changed: bool) -> Self {
        self.diff.changed_bearer_format = changed;
        self
    }

    pub fn changed_open_id_connect_url(mut self, changed: bool) -> Self {
        self.diff.changed_open_id_connect_url = changed;
        self
    }

    pub fn scopes(mut self, scopes: Option<ListDiff<String>>) -> Self {
        self.diff.scopes = scopes;
        self
    }

    pub fn description(mut self, description: Option<MetadataDiff>) -> Self {
        self.diff.description = description;
        self
    }

    pub fn oauth_flows(mut self, flows: Option<OAuthFlowsDiff>) -> Self {
        self.diff.oauth_flows = flows;
        self
    }

    pub fn extensions(mut self, extensions: Option<ExtensionsDiff>) -> Self {
        self.diff.extensions = extensions;
        self
    }

    pub fn build(self) -> SecuritySchemeDiff {
        self.diff
    }
}
