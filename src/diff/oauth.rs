//! OAuth2 flow differences

use crate::compat::changed::{Changed, as_changed, present};
use crate::compat::context::DiffContext;
use crate::compat::rules::CompatibilityRule;
use crate::compat::types::{OwnChange, flagged};
use crate::diff::extensions::ExtensionsDiff;
use crate::model::{OAuthFlow, OAuthFlows};
use std::sync::Arc;

/// Differences between two versions of one OAuth2 flow.
///
/// Each URL flag is bound to its own rule; the snapshots are kept for
/// reporting only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OAuthFlowDiff {
    old: Option<OAuthFlow>,
    new: Option<OAuthFlow>,
    context: Arc<DiffContext>,
    authorization_url: bool,
    token_url: bool,
    refresh_url: bool,
    extensions: Option<ExtensionsDiff>,
}

impl OAuthFlowDiff {
    pub fn builder(
        old: Option<OAuthFlow>,
        new: Option<OAuthFlow>,
        context: &Arc<DiffContext>,
    ) -> OAuthFlowDiffBuilder {
        OAuthFlowDiffBuilder {
            diff: OAuthFlowDiff {
                old,
                new,
                context: Arc::clone(context),
                authorization_url: false,
                token_url: false,
                refresh_url: false,
                extensions: None,
            },
        }
    }

    pub fn old_flow(&self) -> Option<&OAuthFlow> {
        self.old.as_ref()
    }

    pub fn new_flow(&self) -> Option<&OAuthFlow> {
        self.new.as_ref()
    }

    pub fn is_authorization_url(&self) -> bool {
        self.authorization_url
    }

    pub fn is_token_url(&self) -> bool {
        self.token_url
    }

    pub fn is_refresh_url(&self) -> bool {
        self.refresh_url
    }

    pub fn extensions(&self) -> Option<&ExtensionsDiff> {
        self.extensions.as_ref()
    }
}

impl Changed for OAuthFlowDiff {
    fn kind(&self) -> &'static str {
        "oauth_flow"
    }

    fn context(&self) -> &DiffContext {
        &self.context
    }

    fn own_changes(&self) -> Vec<OwnChange> {
        flagged(&[
            (
                self.authorization_url,
                OwnChange::guarded(
                    "authorizationUrl",
                    CompatibilityRule::SecuritySchemeOauth2AuthUrlChanged,
                ),
            ),
            (
                self.token_url,
                OwnChange::guarded(
                    "tokenUrl",
                    CompatibilityRule::SecuritySchemeOauth2TokenUrlChanged,
                ),
            ),
            (
                self.refresh_url,
                OwnChange::guarded(
                    "refreshUrl",
                    CompatibilityRule::SecuritySchemeOauth2RefreshUrlChanged,
                ),
            ),
        ])
    }

    fn children(&self) -> Vec<&dyn Changed> {
        present([as_changed(&self.extensions)])
    }
}

#[derive(Debug, Clone)]
pub struct OAuthFlowDiffBuilder {
    diff: OAuthFlowDiff,
}

impl OAuthFlowDiffBuilder {
    pub fn authorization_url(mut self, changed: bool) -> Self {
        self.diff.authorization_url = changed;
        self
    }

    pub fn token_url(mut self, changed: bool) -> Self {
        self.diff.token_url = changed;
        self
    }

    pub fn refresh_url(mut self, changed: bool) -> Self {
        self.diff.refresh_url = changed;
        self
    }

    pub fn extensions(mut self, extensions: Option<ExtensionsDiff>) -> Self {
        self.diff.extensions = extensions;
        self
    }

    pub fn build(self) -> OAuthFlowDiff {
        self.diff
    }
}

/// Differences between the flow sets of two OAuth2 security schemes.
///
/// Carries no own changes; its verdict comes entirely from the flows.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OAuthFlowsDiff {
    old: Option<OAuthFlows>,
    new: Option<OAuthFlows>,
    context: Arc<DiffContext>,
    implicit: Option<OAuthFlowDiff>,
    password: Option<OAuthFlowDiff>,
    client_credentials: Option<OAuthFlowDiff>,
    authorization_code: Option<OAuthFlowDiff>,
    extensions: Option<ExtensionsDiff>,
}

impl OAuthFlowsDiff {
    pub fn builder(
        old: Option<OAuthFlows>,
        new: Option<OAuthFlows>,
        context: &Arc<DiffContext>,
    ) -> OAuthFlowsDiffBuilder {
        OAuthFlowsDiffBuilder {
            diff: OAuthFlowsDiff {
                old,
                new,
                context: Arc::clone(context),
                implicit: None,
                password: None,
                client_credentials: None,
                authorization_code: None,
                extensions: None,
            },
        }
    }

    pub fn old_flows(&self) -> Option<&OAuthFlows> {
        self.old.as_ref()
    }

    pub fn new_flows(&self) -> Option<&OAuthFlows> {
        self.new.as_ref()
    }

    pub fn implicit(&self) -> Option<&OAuthFlowDiff> {
        self.implicit.as_ref()
    }

    pub fn password(&self) -> Option<&OAuthFlowDiff> {
        self.password.as_ref()
    }

    pub fn client_credentials(&self) -> Option<&OAuthFlowDiff> {
        self.client_credentials.as_ref()
    }

    pub fn authorization_code(&self) -> Option<&OAuthFlowDiff> {
        self.authorization_code.as_ref()
    }

    pub fn extensions(&self) -> Option<&ExtensionsDiff> {
        self.extensions.as_ref()
    }
}

impl Changed for OAuthFlowsDiff {
    fn kind(&self) -> &'static str {
        "oauth_flows"
    }

    fn context(&self) -> &DiffContext {
        &self.context
    }

    fn own_changes(&self) -> Vec<OwnChange> {
        Vec::new()
    }

    fn children(&self) -> Vec<&dyn Changed> {
        present([
            as_changed(&self.implicit),
            as_changed(&self.password),
            as_changed(&self.client_credentials),
            as_changed(&self.authorization_code),
            as_changed(&self.extensions),
        ])
    }
}

#[derive(Debug, Clone)]
pub struct OAuthFlowsDiffBuilder {
    diff: OAuthFlowsDiff,
}

impl OAuthFlowsDiffBuilder {
    pub fn implicit(mut self, flow: Option<OAuthFlowDiff>) -> Self {
        self.diff.implicit = flow;
        self
    }

    pub fn password(mut self, flow: Option<OAuthFlowDiff>) -> Self {
        self.diff.password = flow;
        self
    }

    pub fn client_credentials(mut self, flow: Option<OAuthFlowDiff>) -> Self {
        self.diff.client_credentials = flow;
        self
    }

    pub fn authorization_code(mut self, flow: Option<OAuthFlowDiff>) -> Self {
        self.diff.authorization_code = flow;
        self
    }

    pub fn extensions(mut self, extensions: Option<ExtensionsDiff>) -> Self {
        self.diff.extensions = extensions;
        self
    }

    pub fn build(self) -> OAuthFlowsDiff {
        self.diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::types::DiffResult;

    fn flow(url: &str) -> OAuthFlow {
        OAuthFlow {
            token_url: Some(url.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_token_url_change_is_incompatible() {
        let context = DiffContext::new().shared();
        let diff = OAuthFlowDiff::builder(
            Some(flow("https://a.example.com/token")),
            Some(flow("https://b.example.com/token")),
            &context,
        )
        .token_url(true)
        .build();

        assert_eq!(diff.core_verdict(), DiffResult::Incompatible);
        assert_eq!(
            diff.own_changes(),
            vec![OwnChange::guarded(
                "tokenUrl",
                CompatibilityRule::SecuritySchemeOauth2TokenUrlChanged
            )]
        );
        assert_eq!(
            diff.new_flow().and_then(|f| f.token_url.as_deref()),
            Some("https://b.example.com/token")
        );
    }

    #[test]
    fn test_flows_without_children_are_unchanged() {
        let context = DiffContext::new().shared();
        let diff = OAuthFlowsDiff::builder(None, None, &context).build();

        assert!(diff.children().is_empty());
        assert_eq!(diff.overall_verdict().unwrap(), DiffResult::NoChanges);
    }

    #[test]
    fn test_flows_take_worst_flow() {
        let context = DiffContext::new().shared();
        let refresh = OAuthFlowDiff::builder(None, None, &context).refresh_url(true).build();
        let diff = OAuthFlowsDiff::builder(None, None, &context)
            .password(Some(refresh))
            .build();

        assert_eq!(diff.core_verdict(), DiffResult::NoChanges);
        assert_eq!(diff.overall_verdict().unwrap(), DiffResult::Incompatible);
        assert!(diff.password().is_some());
    }
}
