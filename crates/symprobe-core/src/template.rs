//! # Resolution Templates
//!
//! A [`Template`] fixes everything about a lookup except where to look: the
//! host, the capability token, the [`Strategy`] and the expected [`Signature`].
//! It is immutable and cheap to clone, and spawns any number of independent
//! [`Finder`]s.
//!
//! ## Defaults
//!
//! Three optional default axes let probes omit parts of a [`Candidate`]:
//!
//! ```text
//! candidate.owner  ──or──▶ default owner / receiver
//! candidate.name   ──or──▶ default name
//! candidate.caller ──or──▶ default caller      (SpecialCall only)
//! ```
//!
//! The `with_default_*` builders return new views that share the template core;
//! they never mutate the template they were called on.

use std::fmt;
use std::sync::Arc;

use symprobe_host::{HostResolver, HostResult};
use symprobe_types::{
    validate_symbol_name, CapabilityToken, Handle, HandleInfo, Owner, OwnerRef, Receiver,
    Signature, ValueKind,
};

use crate::error::FinderError;
use crate::finder::Finder;
use crate::strategy::{Lookup, Strategy, Target, CONSTRUCTOR_NAME};

/// One place to look: owner, symbol name and (for special calls) caller context.
///
/// Missing parts fall back to the template's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
    owner: Option<OwnerRef>,
    name: Option<String>,
    caller: Option<OwnerRef>,
}

impl Candidate {
    pub fn new(owner: impl Into<OwnerRef>, name: impl Into<String>) -> Self {
        Self {
            owner: Some(owner.into()),
            name: Some(name.into()),
            caller: None,
        }
    }

    /// Owner only; the name comes from the template default.
    pub fn in_owner(owner: impl Into<OwnerRef>) -> Self {
        Self {
            owner: Some(owner.into()),
            ..Self::default()
        }
    }

    /// Name only; the owner comes from the template default.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_caller(mut self, caller: impl Into<OwnerRef>) -> Self {
        self.caller = Some(caller.into());
        self
    }

    pub fn owner(&self) -> Option<&OwnerRef> {
        self.owner.as_ref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn caller(&self) -> Option<&OwnerRef> {
        self.caller.as_ref()
    }
}

impl<O: Into<OwnerRef>, N: Into<String>> From<(O, N)> for Candidate {
    fn from((owner, name): (O, N)) -> Self {
        Candidate::new(owner, name)
    }
}

impl<O: Into<OwnerRef>, N: Into<String>, C: Into<OwnerRef>> From<(O, N, C)> for Candidate {
    fn from((owner, name, caller): (O, N, C)) -> Self {
        Candidate::new(owner, name).with_caller(caller)
    }
}

impl From<Receiver> for Candidate {
    fn from(receiver: Receiver) -> Self {
        Candidate::in_owner(receiver)
    }
}

struct TemplateCore {
    host: Arc<dyn HostResolver>,
    token: CapabilityToken,
    strategy: Strategy,
    signature: Signature,
    /// Declared value kind for accessors, the return kind otherwise.
    value_type: ValueKind,
}

#[derive(Debug, Clone, Default)]
struct Defaults {
    owner: Option<OwnerRef>,
    name: Option<String>,
    caller: Option<OwnerRef>,
}

#[derive(Clone)]
pub struct Template {
    core: Arc<TemplateCore>,
    defaults: Defaults,
}

impl Template {
    /// Template for a call or constructor strategy with a declared signature.
    pub fn new(
        host: Arc<dyn HostResolver>,
        strategy: Strategy,
        signature: Signature,
    ) -> Result<Self, FinderError> {
        if strategy.is_accessor() {
            return Err(FinderError::StrategyMismatch {
                strategy,
                expected: "signature",
            });
        }
        let value_type = signature.ret().clone();
        Ok(Self::from_core(TemplateCore {
            host,
            token: CapabilityToken::public(),
            strategy,
            signature,
            value_type,
        }))
    }

    /// Template for a field accessor; the signature is derived from `value_type`.
    pub fn field(
        host: Arc<dyn HostResolver>,
        strategy: Strategy,
        value_type: ValueKind,
    ) -> Result<Self, FinderError> {
        let signature = strategy
            .accessor_signature(value_type.clone())
            .ok_or(FinderError::StrategyMismatch {
                strategy,
                expected: "field accessor",
            })?;
        Ok(Self::from_core(TemplateCore {
            host,
            token: CapabilityToken::public(),
            strategy,
            signature,
            value_type,
        }))
    }

    fn from_core(core: TemplateCore) -> Self {
        Self {
            core: Arc::new(core),
            defaults: Defaults::default(),
        }
    }

    /// Same lookup under a different capability token. Defaults are kept.
    pub fn with_capability(&self, token: CapabilityToken) -> Self {
        Self {
            core: Arc::new(TemplateCore {
                host: Arc::clone(&self.core.host),
                token,
                strategy: self.core.strategy,
                signature: self.core.signature.clone(),
                value_type: self.core.value_type.clone(),
            }),
            defaults: self.defaults.clone(),
        }
    }

    pub fn with_default_name(&self, name: impl Into<String>) -> Self {
        let mut view = self.clone();
        view.defaults.name = Some(name.into());
        view
    }

    pub fn with_default_owner(&self, owner: impl Into<OwnerRef>) -> Self {
        let mut view = self.clone();
        view.defaults.owner = Some(owner.into());
        view
    }

    /// Default owner for `Bind` templates.
    pub fn with_default_receiver(&self, receiver: Receiver) -> Self {
        self.with_default_owner(receiver)
    }

    /// Default caller context for `SpecialCall` templates.
    pub fn with_default_caller(&self, caller: impl Into<OwnerRef>) -> Self {
        let mut view = self.clone();
        view.defaults.caller = Some(caller.into());
        view
    }

    pub fn strategy(&self) -> Strategy {
        self.core.strategy
    }

    pub fn signature(&self) -> &Signature {
        &self.core.signature
    }

    pub fn value_type(&self) -> &ValueKind {
        &self.core.value_type
    }

    pub fn capability(&self) -> &CapabilityToken {
        &self.core.token
    }

    pub fn default_name(&self) -> Option<&str> {
        self.defaults.name.as_deref()
    }

    pub fn default_owner(&self) -> Option<&OwnerRef> {
        self.defaults.owner.as_ref()
    }

    pub fn default_caller(&self) -> Option<&OwnerRef> {
        self.defaults.caller.as_ref()
    }

    /// Spawn a finder and probe `candidate` straight away.
    pub fn start(&self, candidate: impl Into<Candidate>) -> Result<Finder<'_>, FinderError> {
        Finder::begin(self, candidate.into())
    }

    /// Validate the name the candidate would probe, if it has one.
    pub(crate) fn check_name(&self, candidate: &Candidate) -> Result<(), FinderError> {
        if !self.core.strategy.uses_name() {
            return Ok(());
        }
        match candidate.name.as_ref().or(self.defaults.name.as_ref()) {
            Some(name) => Ok(validate_symbol_name(name)?),
            None => Ok(()),
        }
    }

    /// Apply defaults and check that the candidate carries what the strategy needs.
    pub(crate) fn target(&self, candidate: Candidate) -> Result<Target, FinderError> {
        let strategy = self.core.strategy;

        let name = if strategy.uses_name() {
            let name = candidate
                .name
                .or_else(|| self.defaults.name.clone())
                .ok_or(FinderError::MissingDefault {
                    strategy,
                    what: "symbol name",
                })?;
            validate_symbol_name(&name)?;
            name
        } else {
            CONSTRUCTOR_NAME.to_string()
        };

        let owner = candidate
            .owner
            .or_else(|| self.defaults.owner.clone())
            .ok_or(FinderError::MissingDefault {
                strategy,
                what: if strategy.needs_receiver() {
                    "receiver"
                } else {
                    "owner"
                },
            })?;
        if strategy.needs_receiver() && !owner.is_receiver() {
            return Err(FinderError::ReceiverRequired { strategy, owner });
        }

        let caller = if strategy.needs_caller() {
            let caller = candidate
                .caller
                .or_else(|| self.defaults.caller.clone())
                .ok_or(FinderError::MissingDefault {
                    strategy,
                    what: "caller context",
                })?;
            Some(caller)
        } else {
            None
        };

        Ok(Target {
            owner,
            name,
            caller,
        })
    }

    pub(crate) fn invoke(&self, target: &Target) -> HostResult<(Owner, Handle)> {
        let lookup = Lookup {
            signature: &self.core.signature,
            value_type: &self.core.value_type,
        };
        self.core
            .strategy
            .invoke(self.core.host.as_ref(), &self.core.token, &lookup, target)
    }

    pub(crate) fn reveal(&self, handle: &Handle) -> HostResult<HandleInfo> {
        self.core.host.reveal(&self.core.token, handle)
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("strategy", &self.core.strategy)
            .field("signature", &self.core.signature)
            .field("token", &self.core.token)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}
