//! Lookup disciplines.
//!
//! A [`Strategy`] picks which [`HostResolver`] method a probe goes through and
//! which arguments it needs:
//!
//! | Strategy | Owner | Name | Extra | Host call |
//! |----------|-------|------|-------|-----------|
//! | `static` | type | yes | | `find_static` |
//! | `virtual` | type | yes | | `find_virtual` |
//! | `special` | type | yes | caller context | `find_special` |
//! | `bind` | receiver | yes | | `bind` |
//! | `getter` / `static_getter` | type | yes | value kind | `find_getter` / `find_static_getter` |
//! | `setter` / `static_setter` | type | yes | value kind | `find_setter` / `find_static_setter` |
//! | `constructor` | type | no | | `find_constructor` |
//!
//! A receiver passed where a type is expected stands for its runtime type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use symprobe_host::{HostResolver, HostResult, LookupFailure};
use symprobe_types::{
    CapabilityToken, Handle, HandleKind, Location, Owner, OwnerRef, Signature, ValueKind,
};

/// Name recorded for constructor targets; never passed to the host.
pub(crate) const CONSTRUCTOR_NAME: &str = "<init>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    #[serde(rename = "static")]
    StaticCall,
    #[serde(rename = "virtual")]
    VirtualCall,
    #[serde(rename = "special")]
    SpecialCall,
    #[serde(rename = "bind")]
    Bind,
    #[serde(rename = "getter")]
    FieldGetter,
    #[serde(rename = "static_getter")]
    StaticFieldGetter,
    #[serde(rename = "setter")]
    FieldSetter,
    #[serde(rename = "static_setter")]
    StaticFieldSetter,
    #[serde(rename = "constructor")]
    Constructor,
}

impl Strategy {
    pub const ALL: [Strategy; 9] = [
        Strategy::StaticCall,
        Strategy::VirtualCall,
        Strategy::SpecialCall,
        Strategy::Bind,
        Strategy::FieldGetter,
        Strategy::StaticFieldGetter,
        Strategy::FieldSetter,
        Strategy::StaticFieldSetter,
        Strategy::Constructor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::StaticCall => "static",
            Strategy::VirtualCall => "virtual",
            Strategy::SpecialCall => "special",
            Strategy::Bind => "bind",
            Strategy::FieldGetter => "getter",
            Strategy::StaticFieldGetter => "static_getter",
            Strategy::FieldSetter => "setter",
            Strategy::StaticFieldSetter => "static_setter",
            Strategy::Constructor => "constructor",
        }
    }

    /// Field accessors are typed by a value kind rather than a full signature.
    pub fn is_accessor(self) -> bool {
        matches!(
            self,
            Strategy::FieldGetter
                | Strategy::StaticFieldGetter
                | Strategy::FieldSetter
                | Strategy::StaticFieldSetter
        )
    }

    pub fn uses_name(self) -> bool {
        self != Strategy::Constructor
    }

    pub fn needs_receiver(self) -> bool {
        self == Strategy::Bind
    }

    pub fn needs_caller(self) -> bool {
        self == Strategy::SpecialCall
    }

    /// Handle signature an accessor over `value` produces; `None` for call strategies.
    pub fn accessor_signature(self, value: ValueKind) -> Option<Signature> {
        match self {
            Strategy::FieldGetter | Strategy::StaticFieldGetter => Some(Signature::getter(value)),
            Strategy::FieldSetter | Strategy::StaticFieldSetter => Some(Signature::setter(value)),
            _ => None,
        }
    }

    /// Kind of handle a successful probe yields.
    pub fn handle_kind(self) -> HandleKind {
        match self {
            Strategy::StaticCall => HandleKind::Static,
            Strategy::VirtualCall => HandleKind::Virtual,
            Strategy::SpecialCall => HandleKind::Special,
            Strategy::Bind => HandleKind::Bound,
            Strategy::FieldGetter => HandleKind::Getter,
            Strategy::StaticFieldGetter => HandleKind::StaticGetter,
            Strategy::FieldSetter => HandleKind::Setter,
            Strategy::StaticFieldSetter => HandleKind::StaticSetter,
            Strategy::Constructor => HandleKind::Constructor,
        }
    }

    /// Run one lookup against the host, returning the owner the handle was
    /// found through along with the handle.
    pub(crate) fn invoke(
        self,
        host: &dyn HostResolver,
        token: &CapabilityToken,
        lookup: &Lookup<'_>,
        target: &Target,
    ) -> HostResult<(Owner, Handle)> {
        let name = target.name.as_str();
        // A receiver owner locates without a host call.
        let owner = locate(host, &target.owner)?;
        let value = lookup.value_type;
        let handle = match self {
            Strategy::StaticCall => host.find_static(token, &owner, name, lookup.signature)?,
            Strategy::VirtualCall => host.find_virtual(token, &owner, name, lookup.signature)?,
            Strategy::SpecialCall => {
                let caller = match &target.caller {
                    Some(caller) => locate(host, caller)?,
                    None => owner.clone(),
                };
                host.find_special(token, &owner, name, lookup.signature, &caller)?
            }
            Strategy::Bind => {
                let OwnerRef::Receiver(receiver) = &target.owner else {
                    return Err(LookupFailure::TypeMismatch {
                        owner: target.owner.to_string(),
                        name: name.to_string(),
                        expected: "receiver instance".to_string(),
                        found: "type".to_string(),
                    }
                    .into());
                };
                let handle = host.bind(token, receiver, name, lookup.signature)?;
                return Ok((Owner::Receiver(receiver.clone()), handle));
            }
            Strategy::FieldGetter => host.find_getter(token, &owner, name, value)?,
            Strategy::StaticFieldGetter => host.find_static_getter(token, &owner, name, value)?,
            Strategy::FieldSetter => host.find_setter(token, &owner, name, value)?,
            Strategy::StaticFieldSetter => host.find_static_setter(token, &owner, name, value)?,
            Strategy::Constructor => host.find_constructor(token, &owner, lookup.signature)?,
        };
        Ok((Owner::Location(owner), handle))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "static" | "static_call" => Ok(Strategy::StaticCall),
            "virtual" | "virtual_call" => Ok(Strategy::VirtualCall),
            "special" | "special_call" => Ok(Strategy::SpecialCall),
            "bind" => Ok(Strategy::Bind),
            "getter" | "field_getter" => Ok(Strategy::FieldGetter),
            "static_getter" | "static_field_getter" => Ok(Strategy::StaticFieldGetter),
            "setter" | "field_setter" => Ok(Strategy::FieldSetter),
            "static_setter" | "static_field_setter" => Ok(Strategy::StaticFieldSetter),
            "constructor" | "ctor" => Ok(Strategy::Constructor),
            _ => Err(format!("unknown strategy '{}'", s)),
        }
    }
}

/// Template-fixed part of a lookup.
pub(crate) struct Lookup<'a> {
    pub signature: &'a Signature,
    pub value_type: &'a ValueKind,
}

/// A candidate with template defaults applied and validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Target {
    pub owner: OwnerRef,
    /// [`CONSTRUCTOR_NAME`] for constructors.
    pub name: String,
    /// Only set for `SpecialCall`.
    pub caller: Option<OwnerRef>,
}

fn locate(host: &dyn HostResolver, owner: &OwnerRef) -> HostResult<Location> {
    match owner {
        OwnerRef::Named(reference) => host.resolve_location(reference),
        OwnerRef::Location(location) => Ok(location.clone()),
        OwnerRef::Receiver(receiver) => Ok(receiver.location().clone()),
    }
}
