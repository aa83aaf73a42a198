//! Symprobe Host
//!
//! The boundary between the resolution engine and the runtime whose symbols
//! it probes.
//!
//! This crate provides:
//! - [`resolver`]: the [`HostResolver`] trait, one method per lookup discipline
//! - [`failure`]: the recoverable/fatal split ([`LookupFailure`], [`FatalFailure`],
//!   [`HostFailure`]) that the engine consults when deciding whether to keep probing
//! - [`table`]: [`SymbolTable`], an in-memory host over declared types
//! - [`model`]: the serde declarations a [`SymbolTable`] is built from

pub mod failure;
pub mod model;
pub mod resolver;
pub mod table;

pub use failure::{FailureKind, FatalFailure, HostFailure, HostResult, LookupFailure};
pub use model::{ConstructorDef, FieldDef, MethodDef, TableDocument, TypeDef, Visibility};
pub use resolver::HostResolver;
pub use table::{SymbolTable, TableConfig, TableError, DEFAULT_MAX_HANDLES};
