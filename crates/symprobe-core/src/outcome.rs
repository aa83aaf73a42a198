//! Terminal result of a fallback chain.

use symprobe_host::LookupFailure;
use symprobe_types::{Handle, OwnerRef};

use crate::error::{describe_target, FinderError};

/// What a chain ended on: the resolved handle with its owner and name, or the
/// last failure together with the last owner and name that were attempted.
///
/// Building an `Outcome` never raises; the failure only surfaces through
/// [`Outcome::into_handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    owner: Option<OwnerRef>,
    name: Option<String>,
    result: Result<Handle, LookupFailure>,
}

impl Outcome {
    pub(crate) fn found(owner: OwnerRef, name: Option<String>, handle: Handle) -> Self {
        Self {
            owner: Some(owner),
            name,
            result: Ok(handle),
        }
    }

    pub(crate) fn failed(
        owner: Option<OwnerRef>,
        name: Option<String>,
        failure: LookupFailure,
    ) -> Self {
        Self {
            owner,
            name,
            result: Err(failure),
        }
    }

    pub fn is_found(&self) -> bool {
        self.result.is_ok()
    }

    /// For a resolved outcome this is the owner the handle was found through.
    pub fn owner(&self) -> Option<&OwnerRef> {
        self.owner.as_ref()
    }

    /// `None` for constructors.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn handle(&self) -> Option<&Handle> {
        self.result.as_ref().ok()
    }

    pub fn failure(&self) -> Option<&LookupFailure> {
        self.result.as_ref().err()
    }

    pub fn as_result(&self) -> Result<&Handle, &LookupFailure> {
        self.result.as_ref()
    }

    /// The handle, or the recorded failure: logic errors re-raised as
    /// [`FinderError::Lookup`], anything else wrapped in [`FinderError::Unresolved`].
    pub fn into_handle(self) -> Result<Handle, FinderError> {
        match self.result {
            Ok(handle) => Ok(handle),
            Err(failure) => Err(FinderError::exhausted(
                describe_target(self.owner.as_ref(), self.name.as_deref()),
                failure,
            )),
        }
    }

    pub fn into_result(self) -> Result<Handle, LookupFailure> {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;
    use symprobe_types::{HandleId, Signature};

    fn handle() -> Handle {
        Handle::new(HandleId { host: 1, slot: 0 }, "()->int".parse::<Signature>().unwrap())
    }

    #[test]
    fn test_found_outcome() {
        let outcome = Outcome::found("a.B".into(), Some("f".into()), handle());
        assert!(outcome.is_found());
        assert_eq!(outcome.owner(), Some(&OwnerRef::from("a.B")));
        assert_eq!(outcome.name(), Some("f"));
        assert!(outcome.failure().is_none());
        assert_eq!(outcome.into_handle().unwrap(), handle());
    }

    #[test]
    fn test_failed_outcome_wraps_on_extraction() {
        let failure = LookupFailure::not_found("a.C", "g", "no such field");
        let outcome = Outcome::failed(Some("a.C".into()), Some("g".into()), failure.clone());
        assert!(!outcome.is_found());
        assert_eq!(outcome.failure(), Some(&failure));
        assert_eq!(outcome.handle(), None);

        let err = outcome.into_handle().unwrap_err();
        assert_eq!(err.class(), ErrorClass::Unresolved);
        assert!(err.to_string().contains("a.C::g"));
    }

    #[test]
    fn test_logic_error_keeps_identity() {
        let failure = LookupFailure::TypeMismatch {
            owner: "a.C".into(),
            name: "g".into(),
            expected: "()->int".into(),
            found: "()->long".into(),
        };
        let outcome = Outcome::failed(None, None, failure.clone());
        assert_eq!(outcome.into_handle(), Err(FinderError::Lookup(failure)));
    }
}
