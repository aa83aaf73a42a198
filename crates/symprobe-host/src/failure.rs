//! Failure classification for host lookups.
//!
//! A host call fails in one of two ways:
//!
//! - [`LookupFailure`]: the ordinary, expected outcomes of a fallible lookup
//!   (not found, access denied, type mismatch, unresolvable location). A
//!   fallback chain absorbs these and moves on to the next candidate.
//! - [`FatalFailure`]: the host itself is in trouble (resource exhaustion,
//!   internal corruption). These always escape the chain.
//!
//! [`HostFailure`] is the sum of the two and is what every [`HostResolver`]
//! method returns on error.
//!
//! [`HostResolver`]: crate::resolver::HostResolver

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse category of a recoverable lookup failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NotFound,
    AccessDenied,
    TypeMismatch,
    LocationUnresolvable,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::NotFound => "not-found",
            FailureKind::AccessDenied => "access-denied",
            FailureKind::TypeMismatch => "type-mismatch",
            FailureKind::LocationUnresolvable => "location-unresolvable",
        };
        f.write_str(s)
    }
}

/// A recoverable lookup failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupFailure {
    #[error("no such symbol {owner}::{name}: {detail}")]
    NotFound {
        owner: String,
        name: String,
        detail: String,
    },

    #[error("access denied to {owner}::{name}: {detail}")]
    AccessDenied {
        owner: String,
        name: String,
        detail: String,
    },

    #[error("type mismatch for {owner}::{name}: expected {expected}, found {found}")]
    TypeMismatch {
        owner: String,
        name: String,
        expected: String,
        found: String,
    },

    #[error("cannot resolve location '{reference}'")]
    LocationUnresolvable { reference: String },
}

impl LookupFailure {
    pub fn not_found(
        owner: impl fmt::Display,
        name: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        LookupFailure::NotFound {
            owner: owner.to_string(),
            name: name.into(),
            detail: detail.into(),
        }
    }

    pub fn access_denied(
        owner: impl fmt::Display,
        name: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        LookupFailure::AccessDenied {
            owner: owner.to_string(),
            name: name.into(),
            detail: detail.into(),
        }
    }

    pub fn unresolvable(reference: impl Into<String>) -> Self {
        LookupFailure::LocationUnresolvable {
            reference: reference.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            LookupFailure::NotFound { .. } => FailureKind::NotFound,
            LookupFailure::AccessDenied { .. } => FailureKind::AccessDenied,
            LookupFailure::TypeMismatch { .. } => FailureKind::TypeMismatch,
            LookupFailure::LocationUnresolvable { .. } => FailureKind::LocationUnresolvable,
        }
    }

    /// Failures that point at a mistake in the caller's declaration rather than at
    /// a missing symbol. These keep their identity when a chain is exhausted.
    pub fn is_logic_error(&self) -> bool {
        matches!(self, LookupFailure::TypeMismatch { .. })
    }
}

/// A failure outside the fallible-lookup contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FatalFailure {
    #[error("host exhausted {resource} (limit {limit})")]
    ResourceExhausted { resource: String, limit: usize },

    #[error("host failure: {reason}")]
    Internal { reason: String },
}

/// Error returned by every host call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostFailure {
    #[error(transparent)]
    Lookup(#[from] LookupFailure),

    #[error(transparent)]
    Fatal(#[from] FatalFailure),
}

impl HostFailure {
    /// Whether a fallback chain may absorb this failure and continue.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, HostFailure::Lookup(_))
    }
}

pub type HostResult<T> = Result<T, HostFailure>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let lookup: HostFailure = LookupFailure::unresolvable("a.B").into();
        assert!(lookup.is_recoverable());

        let fatal: HostFailure = FatalFailure::ResourceExhausted {
            resource: "handle registry".into(),
            limit: 4,
        }
        .into();
        assert!(!fatal.is_recoverable());
        assert_eq!(fatal.to_string(), "host exhausted handle registry (limit 4)");
    }

    #[test]
    fn test_kinds_and_logic_errors() {
        let nf = LookupFailure::not_found("a.B", "f", "no such method");
        assert_eq!(nf.kind(), FailureKind::NotFound);
        assert!(!nf.is_logic_error());
        assert_eq!(nf.to_string(), "no such symbol a.B::f: no such method");

        let tm = LookupFailure::TypeMismatch {
            owner: "a.B".into(),
            name: "f".into(),
            expected: "()->int".into(),
            found: "()->long".into(),
        };
        assert_eq!(tm.kind(), FailureKind::TypeMismatch);
        assert!(tm.is_logic_error());
        assert_eq!(FailureKind::AccessDenied.to_string(), "access-denied");
    }
}
