//! Capability tokens carried from a template to every host call.

use serde::{Deserialize, Serialize};

/// How much of a host's symbol table a token may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessScope {
    /// Public members only.
    #[default]
    Public,
    /// Public and private members.
    Trusted,
}

/// Access-control context for lookups.
///
/// The resolution engine passes it through unchanged; only hosts interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapabilityToken {
    label: String,
    scope: AccessScope,
}

impl CapabilityToken {
    /// Token that can only see public members.
    pub fn public() -> Self {
        Self {
            label: "public".to_string(),
            scope: AccessScope::Public,
        }
    }

    /// Token with full access, tagged with `label` for diagnostics.
    pub fn trusted(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            scope: AccessScope::Trusted,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn scope(&self) -> AccessScope {
        self.scope
    }
}

impl Default for CapabilityToken {
    fn default() -> Self {
        Self::public()
    }
}
