//! Errors surfaced by templates and finders.
//!
//! Recoverable lookup failures never show up here while a chain is still
//! running; they are absorbed by the [`Finder`](crate::finder::Finder). What
//! does surface:
//!
//! | Class | Variants | When |
//! |-------|----------|------|
//! | `InvalidName` | [`FinderError::InvalidName`] | candidate name contains a qualifier separator |
//! | `InvalidArgument` | signature mismatch, unrevealable handle, missing defaults, wrong owner kind, strategy mismatch, empty plan | caller programming errors |
//! | `Unrecoverable` | [`FinderError::Unrecoverable`] | the host failed outside the lookup contract |
//! | `Lookup` | [`FinderError::Lookup`] | chain exhausted and the last failure was itself a logic error |
//! | `Unresolved` | [`FinderError::Unresolved`] | chain exhausted, last failure wrapped |

use std::fmt;

use thiserror::Error;

use symprobe_host::{FatalFailure, LookupFailure};
use symprobe_types::{Handle, InvalidSymbolName, OwnerRef, Signature};

use crate::strategy::Strategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    InvalidName,
    InvalidArgument,
    Lookup,
    Unrecoverable,
    Unresolved,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorClass::InvalidName => "invalid-name",
            ErrorClass::InvalidArgument => "invalid-argument",
            ErrorClass::Lookup => "lookup",
            ErrorClass::Unrecoverable => "unrecoverable",
            ErrorClass::Unresolved => "unresolved",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FinderError {
    #[error(transparent)]
    InvalidName(#[from] InvalidSymbolName),

    #[error("handle signature {actual} does not match expected {expected}")]
    SignatureMismatch {
        expected: Signature,
        actual: Signature,
    },

    #[error("cannot introspect {handle}: {source}")]
    UnrevealableHandle {
        handle: Handle,
        #[source]
        source: LookupFailure,
    },

    #[error("{strategy} lookups need a {what}, but the candidate has none and the template has no default")]
    MissingDefault {
        strategy: Strategy,
        what: &'static str,
    },

    #[error("{strategy} lookups need a receiver instance, got '{owner}'")]
    ReceiverRequired { strategy: Strategy, owner: OwnerRef },

    #[error("{strategy} cannot build a {expected} template")]
    StrategyMismatch {
        strategy: Strategy,
        expected: &'static str,
    },

    #[error("probe plan has no candidates")]
    EmptyPlan,

    #[error(transparent)]
    Unrecoverable(#[from] FatalFailure),

    /// Last failure of an exhausted chain, re-raised with its own identity.
    #[error(transparent)]
    Lookup(LookupFailure),

    /// Last failure of an exhausted chain, wrapped.
    #[error("no candidate resolved (last tried {last_tried}): {source}")]
    Unresolved {
        last_tried: String,
        #[source]
        source: LookupFailure,
    },
}

impl FinderError {
    pub fn class(&self) -> ErrorClass {
        match self {
            FinderError::InvalidName(_) => ErrorClass::InvalidName,
            FinderError::SignatureMismatch { .. }
            | FinderError::UnrevealableHandle { .. }
            | FinderError::MissingDefault { .. }
            | FinderError::ReceiverRequired { .. }
            | FinderError::StrategyMismatch { .. }
            | FinderError::EmptyPlan => ErrorClass::InvalidArgument,
            FinderError::Unrecoverable(_) => ErrorClass::Unrecoverable,
            FinderError::Lookup(_) => ErrorClass::Lookup,
            FinderError::Unresolved { .. } => ErrorClass::Unresolved,
        }
    }

    /// The lookup failure an exhausted chain ended on, if that is what this is.
    pub fn last_failure(&self) -> Option<&LookupFailure> {
        match self {
            FinderError::Lookup(f) | FinderError::Unresolved { source: f, .. } => Some(f),
            _ => None,
        }
    }

    /// Reduce an exhausted chain's last failure: logic errors keep their identity,
    /// everything else is wrapped.
    pub(crate) fn exhausted(last_tried: String, failure: LookupFailure) -> Self {
        if failure.is_logic_error() {
            FinderError::Lookup(failure)
        } else {
            FinderError::Unresolved {
                last_tried,
                source: failure,
            }
        }
    }
}

/// `owner::name`, or just `owner` when there is no name.
pub(crate) fn describe_target(owner: Option<&OwnerRef>, name: Option<&str>) -> String {
    match (owner, name) {
        (Some(o), Some(n)) => format!("{o}::{n}"),
        (Some(o), None) => o.to_string(),
        (None, Some(n)) => n.to_string(),
        (None, None) => "<nothing>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_wraps_ordinary_failures() {
        let f = LookupFailure::not_found("a.B", "f", "no such method");
        let err = FinderError::exhausted("a.B::f".into(), f.clone());
        assert_eq!(err.class(), ErrorClass::Unresolved);
        assert_eq!(err.last_failure(), Some(&f));
        assert_eq!(
            err.to_string(),
            "no candidate resolved (last tried a.B::f): no such symbol a.B::f: no such method"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_exhausted_keeps_logic_errors() {
        let f = LookupFailure::TypeMismatch {
            owner: "a.B".into(),
            name: "x".into(),
            expected: "int".into(),
            found: "long".into(),
        };
        let err = FinderError::exhausted("a.B::x".into(), f.clone());
        assert_eq!(err, FinderError::Lookup(f.clone()));
        assert_eq!(err.to_string(), f.to_string());
    }

    #[test]
    fn test_describe_target() {
        let owner = OwnerRef::from("a.B");
        assert_eq!(describe_target(Some(&owner), Some("f")), "a.B::f");
        assert_eq!(describe_target(Some(&owner), None), "a.B");
    }
}
