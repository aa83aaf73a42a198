//! # Host Resolver Contract
//!
//! The resolution engine never looks symbols up itself. It asks a
//! [`HostResolver`], one method per lookup discipline, and classifies the
//! answer through [`HostFailure`].
//!
//! ## Contract
//!
//! | Method | Looks for | Handle signature |
//! |--------|-----------|------------------|
//! | [`find_static`](HostResolver::find_static) | static method `name` with `signature` on `owner` or a supertype | `signature` |
//! | [`find_virtual`](HostResolver::find_virtual) | instance method, dispatched through overrides | `signature` |
//! | [`find_special`](HostResolver::find_special) | instance method declared on `owner`, invoked as if from `caller` | `signature` |
//! | [`bind`](HostResolver::bind) | instance method of the receiver's type, pre-bound to it | `signature` |
//! | [`find_getter`](HostResolver::find_getter) / [`find_static_getter`](HostResolver::find_static_getter) | field `name` of kind `value` | `()->value` |
//! | [`find_setter`](HostResolver::find_setter) / [`find_static_setter`](HostResolver::find_static_setter) | mutable field `name` of kind `value` | `(value)->void` |
//! | [`find_constructor`](HostResolver::find_constructor) | constructor taking `signature`'s parameters | `signature` |
//!
//! Every call receives the caller's [`CapabilityToken`] unchanged. Implementations
//! must return [`HostFailure::Lookup`] for ordinary misses and reserve
//! [`HostFailure::Fatal`] for failures of the host itself.
//!
//! Implementations are `Send + Sync` so a template can be shared across threads.

use symprobe_types::{
    CapabilityToken, Handle, HandleInfo, Location, Receiver, Signature, ValueKind,
};

use crate::failure::HostResult;

pub trait HostResolver: Send + Sync {
    /// Resolve a textual owner reference to its live location.
    ///
    /// Unknown references fail with `LocationUnresolvable`.
    fn resolve_location(&self, reference: &str) -> HostResult<Location>;

    fn find_static(
        &self,
        token: &CapabilityToken,
        owner: &Location,
        name: &str,
        signature: &Signature,
    ) -> HostResult<Handle>;

    fn find_virtual(
        &self,
        token: &CapabilityToken,
        owner: &Location,
        name: &str,
        signature: &Signature,
    ) -> HostResult<Handle>;

    /// Non-virtual lookup of an instance method scoped to `caller`.
    fn find_special(
        &self,
        token: &CapabilityToken,
        owner: &Location,
        name: &str,
        signature: &Signature,
        caller: &Location,
    ) -> HostResult<Handle>;

    /// Handle to an instance method already bound to `receiver`.
    fn bind(
        &self,
        token: &CapabilityToken,
        receiver: &Receiver,
        name: &str,
        signature: &Signature,
    ) -> HostResult<Handle>;

    fn find_getter(
        &self,
        token: &CapabilityToken,
        owner: &Location,
        name: &str,
        value: &ValueKind,
    ) -> HostResult<Handle>;

    fn find_static_getter(
        &self,
        token: &CapabilityToken,
        owner: &Location,
        name: &str,
        value: &ValueKind,
    ) -> HostResult<Handle>;

    fn find_setter(
        &self,
        token: &CapabilityToken,
        owner: &Location,
        name: &str,
        value: &ValueKind,
    ) -> HostResult<Handle>;

    fn find_static_setter(
        &self,
        token: &CapabilityToken,
        owner: &Location,
        name: &str,
        value: &ValueKind,
    ) -> HostResult<Handle>;

    fn find_constructor(
        &self,
        token: &CapabilityToken,
        owner: &Location,
        signature: &Signature,
    ) -> HostResult<Handle>;

    /// Report what a handle refers to: declaring owner, name, kind and signature.
    fn reveal(&self, token: &CapabilityToken, handle: &Handle) -> HostResult<HandleInfo>;
}
