//! Rule categories used to group related compatibility rules

use serde::{Deserialize, Serialize};

/// Categories that group compatibility rules by the part of the contract they guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RuleCategory {
    /// ENDPOINT category - removal of whole operations
    Endpoint,
    /// REQUEST category - changes that reject requests old clients still send
    Request,
    /// RESPONSE category - changes that return data old clients cannot read
    Response,
    /// SCHEMA category - shape changes that break both directions
    Schema,
    /// SECURITY category - security scheme and OAuth2 flow changes
    Security,
    /// EXTENSION category - vendor extension (`x-*`) changes
    Extension,
}

impl RuleCategory {
    /// Get the string identifier for this category
    pub fn id(&self) -> &'static str {
        match self {
            RuleCategory::Endpoint => "ENDPOINT",
            RuleCategory::Request => "REQUEST",
            RuleCategory::Response => "RESPONSE",
            RuleCategory::Schema => "SCHEMA",
            RuleCategory::Security => "SECURITY",
            RuleCategory::Extension => "EXTENSION",
        }
    }

    /// Get the description for this category
    pub fn description(&self) -> &'static str {
        match self {
            RuleCategory::Endpoint => "Checks that no endpoint of the old contract disappears.",
            RuleCategory::Request => {
                "Checks that requests valid against the old contract stay valid."
            }
            RuleCategory::Response => {
                "Checks that responses stay readable by clients of the old contract."
            }
            RuleCategory::Schema => "Checks that schema types and discriminators stay the same.",
            RuleCategory::Security => {
                "Checks that security schemes and OAuth2 endpoints stay the same."
            }
            RuleCategory::Extension => "Checks vendor extensions for removals and changes.",
        }
    }

    /// Parse category from string ID
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "ENDPOINT" => Some(RuleCategory::Endpoint),
            "REQUEST" => Some(RuleCategory::Request),
            "RESPONSE" => Some(RuleCategory::Response),
            "SCHEMA" => Some(RuleCategory::Schema),
            "SECURITY" => Some(RuleCategory::Security),
            "EXTENSION" => Some(RuleCategory::Extension),
            _ => None,
        }
    }

    /// Get all available categories
    pub fn all() -> Vec<Self> {
        vec![
            RuleCategory::Endpoint,
            RuleCategory::Request,
            RuleCategory::Response,
            RuleCategory::Schema,
            RuleCategory::Security,
            RuleCategory::Extension,
        ]
    }
}

impl std::fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl std::str::FromStr for RuleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| format!("Unknown rule category: {s}"))
    }
}
