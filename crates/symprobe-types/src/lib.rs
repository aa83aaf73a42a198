//! Shared types for the symprobe workspace.
//!
//! This crate holds the data model every other crate speaks:
//!
//! - [`signature`]: [`ValueKind`] and [`Signature`], with the text form `(int)->Class`
//! - [`symbol`]: owning [`Location`]s, bind [`Receiver`]s, candidate [`OwnerRef`]s and
//!   member name validation
//! - [`handle`]: resolved [`Handle`]s and the [`HandleInfo`] a host reveals about them
//! - [`capability`]: the [`CapabilityToken`] threaded through every host call
//! - [`env_utils`]: environment-driven settings

pub mod capability;
pub mod env_utils;
pub mod handle;
pub mod signature;
pub mod symbol;

pub use capability::{AccessScope, CapabilityToken};
pub use handle::{Handle, HandleId, HandleInfo, HandleKind};
pub use signature::{Signature, SignatureParseError, ValueKind};
pub use symbol::{
    validate_symbol_name, InvalidSymbolName, Location, Owner, OwnerRef, Receiver,
    QUALIFIER_SEPARATOR,
};
