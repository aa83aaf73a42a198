//! Compatibility matrices: many independent chains resolved in parallel.
//!
//! Each [`ProbePlan`] gets its own [`Finder`](crate::Finder) and runs
//! sequentially on one rayon worker; only whole plans run concurrently. Results
//! come back in input order.

use rayon::prelude::*;

use symprobe_types::Handle;

use crate::error::FinderError;
use crate::outcome::Outcome;
use crate::template::{Candidate, Template};

/// Ordered candidates plus an optional literal handle tried last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbePlan {
    candidates: Vec<Candidate>,
    literal: Option<Handle>,
}

impl ProbePlan {
    pub fn new<C: Into<Candidate>>(candidates: impl IntoIterator<Item = C>) -> Self {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
            literal: None,
        }
    }

    pub fn then(mut self, candidate: impl Into<Candidate>) -> Self {
        self.candidates.push(candidate.into());
        self
    }

    pub fn with_literal(mut self, handle: Handle) -> Self {
        self.literal = Some(handle);
        self
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn literal(&self) -> Option<&Handle> {
        self.literal.as_ref()
    }
}

/// Run one plan to its [`Outcome`].
pub fn run_plan(template: &Template, plan: &ProbePlan) -> Result<Outcome, FinderError> {
    let mut candidates = plan.candidates.iter().cloned();
    let first = candidates.next().ok_or(FinderError::EmptyPlan)?;

    let mut finder = template.start(first)?;
    for candidate in candidates {
        finder.probe(candidate)?;
    }
    match &plan.literal {
        Some(handle) => finder.fallback_handle(handle.clone()),
        None => Ok(finder.into_outcome()),
    }
}

/// Run every plan against the same template.
pub fn resolve_all(template: &Template, plans: &[ProbePlan]) -> Vec<Result<Outcome, FinderError>> {
    plans.par_iter().map(|plan| run_plan(template, plan)).collect()
}

/// Run plans that each bring their own template.
pub fn resolve_each(jobs: &[(Template, ProbePlan)]) -> Vec<Result<Outcome, FinderError>> {
    jobs.par_iter()
        .map(|(template, plan)| run_plan(template, plan))
        .collect()
}
