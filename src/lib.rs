//! Symprobe
//!
//! Resolve a method, field accessor or constructor when its owning type or
//! name differs between versions of the host program: declare the calling
//! convention once, then try candidates in priority order until one resolves.
//!
//! ```text
//! Template::new(host, Strategy::StaticCall, "(int)->Class")
//!     .start(("sun.reflect.Reflection", "getCallerClass"))   // priority 1
//!     .or_else(("com.example.Callers", "getCallerClass"))    // priority 2
//!     .fallback(("com.example.CallersSlow", "getCallerClass")) // lowest
//! ```
//!
//! This crate re-exports the workspace crates and adds:
//!
//! - [`plan`]: JSON probe plans run against a symbol table
//! - [`demo`]: the bundled walkthrough behind `symprobe demo`
//! - [`logging`]: subscriber setup for the CLI

pub mod demo;
pub mod logging;
pub mod plan;

pub use symprobe_core::{
    resolve_all, resolve_each, run_plan as run_probe_plan, Candidate, ErrorClass, Finder,
    FinderError, FinderPhase, Outcome, ProbePlan, ProbeStatus, Strategy, Template,
};
pub use symprobe_host::{
    FailureKind, FatalFailure, HostFailure, HostResolver, HostResult, LookupFailure, SymbolTable,
    TableConfig, TableError,
};
pub use symprobe_types::{
    CapabilityToken, Handle, HandleInfo, HandleKind, Location, Owner, OwnerRef, Receiver,
    Signature, ValueKind,
};
