//! Resolved handles and their introspection record.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::signature::Signature;
use crate::symbol::Owner;

/// Identity of a handle inside the host that minted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HandleId {
    /// Identifies the minting host instance.
    pub host: u64,
    /// Slot within that host's handle registry.
    pub slot: u64,
}

/// What a handle does when invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleKind {
    Static,
    Virtual,
    Special,
    Bound,
    Getter,
    StaticGetter,
    Setter,
    StaticSetter,
    Constructor,
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HandleKind::Static => "static",
            HandleKind::Virtual => "virtual",
            HandleKind::Special => "special",
            HandleKind::Bound => "bound",
            HandleKind::Getter => "getter",
            HandleKind::StaticGetter => "static getter",
            HandleKind::Setter => "setter",
            HandleKind::StaticSetter => "static setter",
            HandleKind::Constructor => "constructor",
        };
        f.write_str(s)
    }
}

/// Opaque, directly invocable reference to a resolved symbol.
///
/// Cloning is cheap and clones compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handle {
    id: HandleId,
    signature: Signature,
}

impl Handle {
    pub fn new(id: HandleId, signature: Signature) -> Self {
        Self { id, signature }
    }

    pub fn id(&self) -> HandleId {
        self.id
    }

    /// The handle's own type, compared against a template's declared signature.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handle#{}:{} {}", self.id.host, self.id.slot, self.signature)
    }
}

/// What a host reports about a handle it minted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandleInfo {
    pub kind: HandleKind,
    pub owner: Owner,
    /// `None` for constructors.
    pub name: Option<String>,
    pub signature: Signature,
}
