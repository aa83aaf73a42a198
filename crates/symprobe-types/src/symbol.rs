//! Owning locations, receivers and symbol names.
//!
//! A *location* is the live representation of an owning type, as handed out by
//! a host. An [`OwnerRef`] is what a caller proposes as a candidate: either a
//! textual reference the host still has to resolve, an already-resolved
//! [`Location`], or a [`Receiver`] instance for bind lookups.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator between a qualifier and a member name. Member names must not contain it.
pub const QUALIFIER_SEPARATOR: char = '.';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("illegal symbol name '{name}': must not contain '.'")]
pub struct InvalidSymbolName {
    pub name: String,
}

/// Reject member names that carry a qualifier.
pub fn validate_symbol_name(name: &str) -> Result<(), InvalidSymbolName> {
    if name.contains(QUALIFIER_SEPARATOR) {
        return Err(InvalidSymbolName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Live representation of an owning type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(String);

impl Location {
    /// Hosts mint locations; callers normally obtain them from a resolver.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A live instance a method can be bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Receiver {
    id: u64,
    location: Location,
}

impl Receiver {
    pub fn new(id: u64, location: Location) -> Self {
        Self { id, location }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// The runtime type of the instance.
    pub fn location(&self) -> &Location {
        &self.location
    }
}

impl fmt::Display for Receiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.location, self.id)
    }
}

/// The resolved owner of a handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Owner {
    Location(Location),
    Receiver(Receiver),
}

impl Owner {
    pub fn location(&self) -> &Location {
        match self {
            Owner::Location(loc) => loc,
            Owner::Receiver(r) => r.location(),
        }
    }

    pub fn receiver(&self) -> Option<&Receiver> {
        match self {
            Owner::Receiver(r) => Some(r),
            Owner::Location(_) => None,
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Location(loc) => write!(f, "{}", loc),
            Owner::Receiver(r) => write!(f, "{}", r),
        }
    }
}

/// A candidate owner as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerRef {
    /// Textual reference, resolved through the host's location resolver.
    Named(String),
    Location(Location),
    Receiver(Receiver),
}

impl OwnerRef {
    pub fn is_receiver(&self) -> bool {
        matches!(self, OwnerRef::Receiver(_))
    }
}

impl fmt::Display for OwnerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerRef::Named(name) => f.write_str(name),
            OwnerRef::Location(loc) => write!(f, "{}", loc),
            OwnerRef::Receiver(r) => write!(f, "{}", r),
        }
    }
}

impl From<&str> for OwnerRef {
    fn from(value: &str) -> Self {
        OwnerRef::Named(value.to_string())
    }
}

impl From<String> for OwnerRef {
    fn from(value: String) -> Self {
        OwnerRef::Named(value)
    }
}

impl From<&String> for OwnerRef {
    fn from(value: &String) -> Self {
        OwnerRef::Named(value.clone())
    }
}

impl From<Location> for OwnerRef {
    fn from(value: Location) -> Self {
        OwnerRef::Location(value)
    }
}

impl From<Receiver> for OwnerRef {
    fn from(value: Receiver) -> Self {
        OwnerRef::Receiver(value)
    }
}

impl From<Owner> for OwnerRef {
    fn from(value: Owner) -> Self {
        match value {
            Owner::Location(loc) => OwnerRef::Location(loc),
            Owner::Receiver(r) => OwnerRef::Receiver(r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_symbol_name() {
        assert!(validate_symbol_name("getCallerClass").is_ok());
        assert!(validate_symbol_name("<init>").is_ok());
        let err = validate_symbol_name("Reflection.getCallerClass").unwrap_err();
        assert_eq!(err.name, "Reflection.getCallerClass");
        assert!(err.to_string().contains("must not contain '.'"));
    }

    #[test]
    fn test_owner_ref_conversions() {
        assert_eq!(OwnerRef::from("a.B"), OwnerRef::Named("a.B".into()));
        let loc = Location::new("a.B");
        assert_eq!(OwnerRef::from(loc.clone()), OwnerRef::Location(loc.clone()));
        let recv = Receiver::new(7, loc.clone());
        assert!(OwnerRef::from(recv.clone()).is_receiver());
        assert_eq!(
            OwnerRef::from(Owner::Receiver(recv)),
            OwnerRef::Receiver(Receiver::new(7, loc))
        );
    }

    #[test]
    fn test_owner_location() {
        let loc = Location::new("a.B");
        let owner = Owner::Receiver(Receiver::new(1, loc.clone()));
        assert_eq!(owner.location(), &loc);
        assert_eq!(owner.to_string(), "a.B@1");
        assert!(Owner::Location(loc).receiver().is_none());
    }
}
