//! Compatibility rule registry
//!
//! Every rule is plain data: a stable identifier, a dotted configuration key,
//! a category and a default enablement. Whether a rule is enabled for a run is
//! answered by the [`DiffContext`] it is evaluated against.

use crate::compat::categories::RuleCategory;
use crate::compat::context::DiffContext;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ========================================
// Rule table generation
// ========================================

macro_rules! compatibility_rules {
    (
        $(
            $variant:ident => ($id:literal, $key:literal, $category:ident, $default:literal, $desc:literal)
        ),* $(,)?
    ) => {
        /// Named rule deciding whether one class of change is backward-incompatible.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum CompatibilityRule {
            $(
                #[doc = $desc]
                $variant,
            )*
        }

        const ALL_RULES: &[CompatibilityRule] = &[
            $( CompatibilityRule::$variant, )*
        ];

        impl CompatibilityRule {
            /// Stable rule identifier, e.g. `SCHEMA_TYPE_CHANGED`
            pub fn id(&self) -> &'static str {
                match self {
                    $( CompatibilityRule::$variant => $id, )*
                }
            }

            /// Dotted configuration key, e.g. `incompatible.schema.type.changed`
            pub fn key(&self) -> &'static str {
                match self {
                    $( CompatibilityRule::$variant => $key, )*
                }
            }

            pub fn category(&self) -> RuleCategory {
                match self {
                    $( CompatibilityRule::$variant => RuleCategory::$category, )*
                }
            }

            /// Whether the rule treats its change as breaking when no override applies
            pub fn enabled_by_default(&self) -> bool {
                match self {
                    $( CompatibilityRule::$variant => $default, )*
                }
            }

            pub fn description(&self) -> &'static str {
                match self {
                    $( CompatibilityRule::$variant => $desc, )*
                }
            }
        }
    };
}

compatibility_rules! {
    // ENDPOINT rules
    OpenapiEndpointsDecreased => ("OPENAPI_ENDPOINTS_DECREASED", "incompatible.openapi.endpoints.decreased", Endpoint, true,
        "An endpoint present in the old contract is missing."),

    // REQUEST rules
    RequestBodyDeleted => ("REQUEST_BODY_DELETED", "incompatible.request.body.deleted", Request, true,
        "A request body was removed from an operation."),
    RequestParamsDecreased => ("REQUEST_PARAMS_DECREASED", "incompatible.request.params.decreased", Request, true,
        "A request parameter was removed."),
    RequestParamsRequiredIncreased => ("REQUEST_PARAMS_REQUIRED_INCREASED", "incompatible.request.params.required.increased", Request, true,
        "A request parameter became required or a new required parameter was added."),
    RequestParamAllowemptyDecreased => ("REQUEST_PARAM_ALLOWEMPTY_DECREASED", "incompatible.request.param.allowempty.decreased", Request, true,
        "A request parameter no longer allows empty values."),
    RequestParamExplodeChanged => ("REQUEST_PARAM_EXPLODE_CHANGED", "incompatible.request.param.explode.changed", Request, true,
        "The explode setting of a request parameter changed."),
    RequestParamStyleChanged => ("REQUEST_PARAM_STYLE_CHANGED", "incompatible.request.param.style.changed", Request, true,
        "The serialization style of a request parameter changed."),
    RequestEnumDecreased => ("REQUEST_ENUM_DECREASED", "incompatible.request.enum.decreased", Request, true,
        "An enum value accepted in requests was removed."),
    RequestMaxLengthDecreased => ("REQUEST_MAX_LENGTH_DECREASED", "incompatible.request.max.length.decreased", Request, true,
        "The maximum length of a request value decreased."),
    RequestRequiredIncreased => ("REQUEST_REQUIRED_INCREASED", "incompatible.request.required.increased", Request, true,
        "A request schema property became required."),

    // RESPONSE rules
    ResponseResponsesDecreased => ("RESPONSE_RESPONSES_DECREASED", "incompatible.response.responses.decreased", Response, true,
        "A response status code was removed from an operation."),
    ResponseEnumIncreased => ("RESPONSE_ENUM_INCREASED", "incompatible.response.enum.increased", Response, true,
        "A response enum gained a value old clients do not know."),
    ResponseMaxLengthIncreased => ("RESPONSE_MAX_LENGTH_INCREASED", "incompatible.response.max.length.increased", Response, true,
        "The maximum length of a response value increased."),
    ResponseRequiredDecreased => ("RESPONSE_REQUIRED_DECREASED", "incompatible.response.required.decreased", Response, true,
        "A response schema property is no longer required."),
    ResponsePropertiesDecreased => ("RESPONSE_PROPERTIES_DECREASED", "incompatible.response.properties.decreased", Response, true,
        "A response schema property was removed."),

    // SCHEMA rules
    SchemaDiscriminatorChanged => ("SCHEMA_DISCRIMINATOR_CHANGED", "incompatible.schema.discriminator.changed", Schema, true,
        "The discriminator of a schema changed."),
    SchemaTypeChanged => ("SCHEMA_TYPE_CHANGED", "incompatible.schema.type.changed", Schema, true,
        "The type of a schema changed."),

    // SECURITY rules
    SecuritySchemeTypeChanged => ("SECURITY_SCHEME_TYPE_CHANGED", "incompatible.security.scheme.type.changed", Security, true,
        "The type of a security scheme changed."),
    SecuritySchemeInChanged => ("SECURITY_SCHEME_IN_CHANGED", "incompatible.security.scheme.in.changed", Security, true,
        "The location of an API key security scheme changed."),
    SecuritySchemeSchemeChanged => ("SECURITY_SCHEME_SCHEME_CHANGED", "incompatible.security.scheme.scheme.changed", Security, true,
        "The HTTP authentication scheme changed."),
    SecuritySchemeBearerFormatChanged => ("SECURITY_SCHEME_BEARER_FORMAT_CHANGED", "incompatible.security.scheme.bearer.format.changed", Security, true,
        "The bearer token format changed."),
    SecuritySchemeOpenidconnectUrlChanged => ("SECURITY_SCHEME_OPENIDCONNECT_URL_CHANGED", "incompatible.security.scheme.openid.connect.url.changed", Security, true,
        "The OpenID Connect discovery URL changed."),
    SecuritySchemeScopesIncreased => ("SECURITY_SCHEME_SCOPES_INCREASED", "incompatible.security.scheme.scopes.increased", Security, true,
        "A security requirement demands additional scopes."),
    SecuritySchemeOauth2AuthUrlChanged => ("SECURITY_SCHEME_OAUTH2_AUTH_URL_CHANGED", "incompatible.security.scheme.oauth2.auth.url.changed", Security, true,
        "The OAuth2 authorization URL changed."),
    SecuritySchemeOauth2TokenUrlChanged => ("SECURITY_SCHEME_OAUTH2_TOKEN_URL_CHANGED", "incompatible.security.scheme.oauth2.token.url.changed", Security, true,
        "The OAuth2 token URL changed."),
    SecuritySchemeOauth2RefreshUrlChanged => ("SECURITY_SCHEME_OAUTH2_REFRESH_URL_CHANGED", "incompatible.security.scheme.oauth2.refresh.url.changed", Security, true,
        "The OAuth2 refresh URL changed."),

    // EXTENSION rules
    ExtensionRemoved => ("EXTENSION_REMOVED", "incompatible.extension.removed", Extension, false,
        "A vendor extension was removed."),
    ExtensionChanged => ("EXTENSION_CHANGED", "incompatible.extension.changed", Extension, false,
        "The value of a vendor extension changed."),
}

impl CompatibilityRule {
    /// Get every registered rule, in registry order
    pub fn all() -> &'static [CompatibilityRule] {
        ALL_RULES
    }

    /// Look a rule up by identifier or by dotted configuration key
    pub fn from_id(id: &str) -> Option<Self> {
        ALL_RULES
            .iter()
            .copied()
            .find(|rule| rule.id() == id || rule.key() == id)
    }

    /// Get all rules belonging to a category
    pub fn in_category(category: RuleCategory) -> impl Iterator<Item = CompatibilityRule> {
        ALL_RULES
            .iter()
            .copied()
            .filter(move |rule| rule.category() == category)
    }

    /// Whether a change guarded by this rule is breaking under `context`
    pub fn enabled(&self, context: &DiffContext) -> bool {
        context.is_enabled(*self)
    }
}

impl std::fmt::Display for CompatibilityRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl std::str::FromStr for CompatibilityRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| format!("Unknown compatibility rule: {s}"))
    }
}

/// Check that ids and keys are unique and every key carries the `incompatible.` prefix
pub fn verify_rules() -> Result<(), String> {
    let mut seen_ids = HashSet::new();
    let mut seen_keys = HashSet::new();
    for rule in ALL_RULES {
        if !seen_ids.insert(rule.id()) {
            return Err(format!("Duplicate rule ID: {}", rule.id()));
        }
        if !seen_keys.insert(rule.key()) {
            return Err(format!("Duplicate rule key: {}", rule.key()));
        }
        if !rule.key().starts_with("incompatible.") {
            return Err(format!("Rule key without prefix: {}", rule.key()));
        }
    }
    Ok(())
}
