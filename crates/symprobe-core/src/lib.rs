//! Symprobe Core
//!
//! Fallback-chain resolution of methods, field accessors and constructors
//! against a [`HostResolver`](symprobe_host::HostResolver).
//!
//! ```text
//! Template ──start──▶ Finder ──probe / or_else / accept_literal──▶ Finder
//!                                     │
//!                      into_handle ◀──┴──▶ into_outcome / fallback ──▶ Outcome
//! ```
//!
//! - [`strategy`]: the nine lookup disciplines
//! - [`template`]: immutable lookup descriptors and their default views
//! - [`finder`]: the SEARCHING/RESOLVED cursor
//! - [`outcome`]: terminal results
//! - [`error`]: [`FinderError`] and its [`ErrorClass`]
//! - [`matrix`]: many plans resolved in parallel

pub mod error;
pub mod finder;
pub mod matrix;
pub mod outcome;
pub mod strategy;
pub mod template;

pub use error::{ErrorClass, FinderError};
pub use finder::{Finder, FinderPhase, ProbeStatus};
pub use matrix::{resolve_all, resolve_each, run_plan, ProbePlan};
pub use outcome::Outcome;
pub use strategy::Strategy;
pub use template::{Candidate, Template};
