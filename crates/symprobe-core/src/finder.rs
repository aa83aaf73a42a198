//! # Fallback-Chain Finder
//!
//! A [`Finder`] is a single-use cursor over one [`Template`]. It probes
//! candidates in call order and stops at the first success:
//!
//! ```text
//!              probe: miss (absorbed, last failure overwritten)
//!                 ┌──────┐
//!                 ▼      │
//!  start ──▶ [ SEARCHING ]──── probe: hit / accept_literal ───▶ [ RESOLVED ]
//!                 │                                                 │
//!                 │ fatal host failure, invalid name,               │ probe: skipped,
//!                 │ bad literal: returned as Err, state unchanged   │ no host call
//!                 ▼                                                 ▼
//!        into_handle / into_outcome                       into_handle / into_outcome
//! ```
//!
//! Only recoverable [`LookupFailure`]s are absorbed. Everything else comes
//! back as a [`FinderError`] without touching the finder's state.
//!
//! Chaining is by value (`or_else`, `fallback`) or through `&mut self`
//! (`probe`, `accept_literal`) when the candidates come from a loop.

use tracing::{debug, info, trace, warn};

use symprobe_host::{HostFailure, LookupFailure};
use symprobe_types::{Handle, Owner, OwnerRef};

use crate::error::{describe_target, FinderError};
use crate::outcome::Outcome;
use crate::strategy::Target;
use crate::template::{Candidate, Template};

/// What a single probe did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    /// This probe resolved the finder.
    Resolved,
    /// The probe missed; its failure is now the last failure.
    Absorbed,
    /// The finder was already resolved; nothing was asked of the host.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinderPhase {
    Searching,
    Resolved,
}

#[derive(Debug, Clone)]
struct Resolution {
    owner: Owner,
    name: Option<String>,
    handle: Handle,
}

#[derive(Debug, Clone)]
struct Attempt {
    owner: OwnerRef,
    name: Option<String>,
}

#[derive(Debug, Clone)]
enum FinderState {
    Searching {
        attempt: Attempt,
        failure: LookupFailure,
    },
    Resolved {
        resolution: Resolution,
        /// Failure of the probe before the successful one, if any.
        last_failure: Option<LookupFailure>,
    },
}

#[derive(Debug)]
pub struct Finder<'t> {
    template: &'t Template,
    state: FinderState,
}

impl<'t> Finder<'t> {
    pub(crate) fn begin(template: &'t Template, candidate: Candidate) -> Result<Self, FinderError> {
        let target = template.target(candidate)?;
        let state = match attempt(template, &target)? {
            Ok(resolution) => FinderState::Resolved {
                resolution,
                last_failure: None,
            },
            Err(failure) => FinderState::Searching {
                attempt: attempt_of(template, target),
                failure,
            },
        };
        Ok(Self { template, state })
    }

    /// Probe one more candidate unless already resolved.
    ///
    /// The candidate name is validated before anything else, so an invalid name
    /// is an error even on a resolved finder. Defaults are applied only while
    /// searching.
    pub fn probe(&mut self, candidate: impl Into<Candidate>) -> Result<ProbeStatus, FinderError> {
        let candidate = candidate.into();
        self.template.check_name(&candidate)?;

        let FinderState::Searching { failure, .. } = &self.state else {
            trace!(
                strategy = %self.template.strategy(),
                name = candidate.name().unwrap_or("-"),
                "finder already resolved, skipping probe"
            );
            return Ok(ProbeStatus::Skipped);
        };
        let target = self.template.target(candidate)?;

        match attempt(self.template, &target)? {
            Ok(resolution) => {
                self.state = FinderState::Resolved {
                    resolution,
                    last_failure: Some(failure.clone()),
                };
                Ok(ProbeStatus::Resolved)
            }
            Err(failure) => {
                self.state = FinderState::Searching {
                    attempt: attempt_of(self.template, target),
                    failure,
                };
                Ok(ProbeStatus::Absorbed)
            }
        }
    }

    /// Resolve to a handle obtained elsewhere.
    ///
    /// The handle's signature must equal the template's, whatever the state.
    /// On a searching finder its owner, name and signature are taken from the
    /// host's introspection of the handle, and the introspected signature must
    /// match as well.
    pub fn accept_literal(&mut self, handle: Handle) -> Result<ProbeStatus, FinderError> {
        let expected = self.template.signature();
        if handle.signature() != expected {
            return Err(FinderError::SignatureMismatch {
                expected: expected.clone(),
                actual: handle.signature().clone(),
            });
        }

        let FinderState::Searching { failure, .. } = &self.state else {
            trace!(%handle, "finder already resolved, ignoring literal handle");
            return Ok(ProbeStatus::Skipped);
        };

        let info = match self.template.reveal(&handle) {
            Ok(info) => info,
            Err(HostFailure::Lookup(source)) => {
                return Err(FinderError::UnrevealableHandle { handle, source })
            }
            Err(HostFailure::Fatal(fatal)) => {
                warn!(%handle, error = %fatal, "host failed while revealing literal handle");
                return Err(FinderError::Unrecoverable(fatal));
            }
        };
        // The host's record is authoritative; the handle's own label can be rewritten.
        if info.signature != *expected {
            return Err(FinderError::SignatureMismatch {
                expected: expected.clone(),
                actual: info.signature,
            });
        }

        info!(
            owner = %info.owner,
            name = info.name.as_deref().unwrap_or("-"),
            %handle,
            "finder resolved to literal handle"
        );
        self.state = FinderState::Resolved {
            resolution: Resolution {
                owner: info.owner,
                name: info.name,
                handle,
            },
            last_failure: Some(failure.clone()),
        };
        Ok(ProbeStatus::Resolved)
    }

    /// `probe`, returning the finder for further chaining.
    pub fn or_else(mut self, candidate: impl Into<Candidate>) -> Result<Self, FinderError> {
        self.probe(candidate)?;
        Ok(self)
    }

    /// `accept_literal`, returning the finder for further chaining.
    pub fn or_literal(mut self, handle: Handle) -> Result<Self, FinderError> {
        self.accept_literal(handle)?;
        Ok(self)
    }

    /// Probe one last candidate and reduce to an [`Outcome`].
    pub fn fallback(mut self, candidate: impl Into<Candidate>) -> Result<Outcome, FinderError> {
        self.probe(candidate)?;
        Ok(self.into_outcome())
    }

    /// Accept a literal handle as the last resort and reduce to an [`Outcome`].
    pub fn fallback_handle(mut self, handle: Handle) -> Result<Outcome, FinderError> {
        self.accept_literal(handle)?;
        Ok(self.into_outcome())
    }

    /// The resolved handle, or the last failure as an error.
    ///
    /// Logic errors such as a type mismatch come back as
    /// [`FinderError::Lookup`]; other failures are wrapped in
    /// [`FinderError::Unresolved`].
    pub fn into_handle(self) -> Result<Handle, FinderError> {
        self.into_outcome().into_handle()
    }

    pub fn into_outcome(self) -> Outcome {
        match self.state {
            FinderState::Resolved { resolution, .. } => Outcome::found(
                resolution.owner.into(),
                resolution.name,
                resolution.handle,
            ),
            FinderState::Searching { attempt, failure } => {
                Outcome::failed(Some(attempt.owner), attempt.name, failure)
            }
        }
    }

    pub fn phase(&self) -> FinderPhase {
        match self.state {
            FinderState::Searching { .. } => FinderPhase::Searching,
            FinderState::Resolved { .. } => FinderPhase::Resolved,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.phase() == FinderPhase::Resolved
    }

    pub fn template(&self) -> &'t Template {
        self.template
    }

    pub fn found(&self) -> Option<&Handle> {
        self.resolution().map(|r| &r.handle)
    }

    pub fn found_owner(&self) -> Option<&Owner> {
        self.resolution().map(|r| &r.owner)
    }

    /// `None` until resolved, and always for constructors.
    pub fn found_name(&self) -> Option<&str> {
        self.resolution().and_then(|r| r.name.as_deref())
    }

    /// Failure of the most recent missed probe.
    pub fn last_failure(&self) -> Option<&LookupFailure> {
        match &self.state {
            FinderState::Searching { failure, .. } => Some(failure),
            FinderState::Resolved { last_failure, .. } => last_failure.as_ref(),
        }
    }

    /// Owner and name of the most recent missed probe, while still searching.
    pub fn last_attempt(&self) -> Option<(&OwnerRef, Option<&str>)> {
        match &self.state {
            FinderState::Searching { attempt, .. } => Some((&attempt.owner, attempt.name.as_deref())),
            FinderState::Resolved { .. } => None,
        }
    }

    fn resolution(&self) -> Option<&Resolution> {
        match &self.state {
            FinderState::Resolved { resolution, .. } => Some(resolution),
            FinderState::Searching { .. } => None,
        }
    }
}

/// Run one probe: `Ok(Ok(_))` on a hit, `Ok(Err(_))` on an absorbable miss,
/// `Err(_)` when the host failed outright.
fn attempt(
    template: &Template,
    target: &Target,
) -> Result<Result<Resolution, LookupFailure>, FinderError> {
    let strategy = template.strategy();
    debug!(
        %strategy,
        owner = %target.owner,
        name = %target.name,
        signature = %template.signature(),
        "probing candidate"
    );

    match template.invoke(target) {
        Ok((owner, handle)) => {
            info!(%strategy, %owner, name = %target.name, %handle, "finder resolved");
            Ok(Ok(Resolution {
                owner,
                name: strategy.uses_name().then(|| target.name.clone()),
                handle,
            }))
        }
        Err(HostFailure::Lookup(failure)) => {
            debug!(
                %strategy,
                kind = %failure.kind(),
                error = %failure,
                "candidate missed"
            );
            Ok(Err(failure))
        }
        Err(HostFailure::Fatal(fatal)) => {
            warn!(
                %strategy,
                target = %describe_target(Some(&target.owner), Some(&target.name)),
                error = %fatal,
                "unrecoverable host failure"
            );
            Err(FinderError::Unrecoverable(fatal))
        }
    }
}

fn attempt_of(template: &Template, target: Target) -> Attempt {
    Attempt {
        name: template.strategy().uses_name().then_some(target.name),
        owner: target.owner,
    }
}
