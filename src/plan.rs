//! Probe plan files.
//!
//! A plan lists independent lookups to run against one symbol table:
//!
//! ```json
//! {
//!   "entries": [
//!     {
//!       "label": "caller-class",
//!       "strategy": "static",
//!       "signature": "(int)->Class",
//!       "default_name": "getCallerClass",
//!       "candidates": [
//!         { "owner": "sun.reflect.Reflection" },
//!         { "owner": "com.example.Callers" }
//!       ]
//!     },
//!     {
//!       "label": "queue-size",
//!       "strategy": "bind",
//!       "signature": "()->int",
//!       "candidates": [ { "receiver": "com.example.PriorityQueue", "name": "size" } ]
//!     }
//!   ]
//! }
//! ```
//!
//! Accessor entries give `value_type` instead of `signature`. An optional
//! `literal` candidate is resolved up front and offered as the final literal
//! handle fallback. Entries run in parallel; the report keeps plan order.

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

use symprobe_core::{resolve_each, Candidate, FinderError, Outcome, ProbePlan, Strategy, Template};
use symprobe_host::SymbolTable;
use symprobe_types::{CapabilityToken, OwnerRef, Signature, ValueKind};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDocument {
    pub entries: Vec<PlanEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanEntry {
    pub label: String,
    pub strategy: Strategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<ValueKind>,
    /// Label of a trusted capability; public when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capability: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_owner: Option<String>,
    /// Type to instantiate as the default bind receiver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_receiver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_caller: Option<String>,
    #[serde(default)]
    pub candidates: Vec<PlanCandidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literal: Option<PlanCandidate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanCandidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Type to instantiate; takes the place of `owner` for bind lookups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller: Option<String>,
}

impl PlanDocument {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse probe plan")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read probe plan {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("in {}", path.display()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Resolved,
    Unresolved,
    Error,
}

/// Result of one plan entry, flattened for display and JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryReport {
    pub label: String,
    pub strategy: Strategy,
    pub signature: String,
    pub status: EntryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EntryReport {
    fn new(label: &str, template: &Template, result: Result<Outcome, FinderError>) -> Self {
        let mut report = Self {
            label: label.to_string(),
            strategy: template.strategy(),
            signature: template.signature().to_string(),
            status: EntryStatus::Error,
            owner: None,
            name: None,
            handle: None,
            failure_kind: None,
            error_class: None,
            message: None,
        };
        match result {
            Ok(outcome) => {
                report.owner = outcome.owner().map(ToString::to_string);
                report.name = outcome.name().map(str::to_string);
                match outcome.as_result() {
                    Ok(handle) => {
                        report.status = EntryStatus::Resolved;
                        report.handle = Some(handle.to_string());
                    }
                    Err(failure) => {
                        report.status = EntryStatus::Unresolved;
                        report.failure_kind = Some(failure.kind().to_string());
                        report.message = Some(failure.to_string());
                    }
                }
            }
            Err(err) => {
                report.error_class = Some(err.class().to_string());
                report.message = Some(err.to_string());
            }
        }
        report
    }

    pub fn is_resolved(&self) -> bool {
        self.status == EntryStatus::Resolved
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlanReport {
    pub entries: Vec<EntryReport>,
}

impl PlanReport {
    pub fn resolved_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_resolved()).count()
    }

    pub fn all_resolved(&self) -> bool {
        self.entries.iter().all(EntryReport::is_resolved)
    }
}

/// Build every entry's template and plan, then resolve them all in parallel.
pub fn run_plan(table: Arc<SymbolTable>, doc: &PlanDocument) -> Result<PlanReport> {
    let jobs = doc
        .entries
        .iter()
        .map(|entry| {
            build_job(&table, entry).with_context(|| format!("plan entry '{}'", entry.label))
        })
        .collect::<Result<Vec<_>>>()?;

    let results = resolve_each(&jobs);
    let entries = doc
        .entries
        .iter()
        .zip(jobs.iter())
        .zip(results)
        .map(|((entry, (template, _)), result)| EntryReport::new(&entry.label, template, result))
        .collect();
    Ok(PlanReport { entries })
}

fn build_job(table: &Arc<SymbolTable>, entry: &PlanEntry) -> Result<(Template, ProbePlan)> {
    let template = build_template(table, entry)?;

    let mut plan = ProbePlan::default();
    for candidate in &entry.candidates {
        plan = plan.then(build_candidate(table, candidate)?);
    }

    if let Some(literal) = &entry.literal {
        let handle = template
            .start(build_candidate(table, literal)?)
            .and_then(|finder| finder.into_handle())
            .context("failed to resolve literal fallback handle")?;
        plan = plan.with_literal(handle);
    }
    Ok((template, plan))
}

fn build_template(table: &Arc<SymbolTable>, entry: &PlanEntry) -> Result<Template> {
    let host = Arc::clone(table);
    let mut template = match (&entry.signature, &entry.value_type) {
        (Some(signature), None) => Template::new(host, entry.strategy, signature.clone())?,
        (None, Some(value_type)) => Template::field(host, entry.strategy, value_type.clone())?,
        (Some(_), Some(_)) => bail!("give either 'signature' or 'value_type', not both"),
        (None, None) => bail!("missing 'signature' (or 'value_type' for field accessors)"),
    };

    if let Some(label) = &entry.capability {
        template = template.with_capability(CapabilityToken::trusted(label.as_str()));
    }
    if let Some(name) = &entry.default_name {
        template = template.with_default_name(name.as_str());
    }
    if let Some(owner) = &entry.default_owner {
        template = template.with_default_owner(owner.as_str());
    }
    if let Some(ty) = &entry.default_receiver {
        template = template.with_default_receiver(table.instantiate(ty)?);
    }
    if let Some(caller) = &entry.default_caller {
        template = template.with_default_caller(caller.as_str());
    }
    Ok(template)
}

fn build_candidate(table: &SymbolTable, candidate: &PlanCandidate) -> Result<Candidate> {
    let owner: Option<OwnerRef> = match (&candidate.owner, &candidate.receiver) {
        (Some(_), Some(_)) => {
            return Err(anyhow!("candidate gives both 'owner' and 'receiver'"));
        }
        (Some(owner), None) => Some(owner.as_str().into()),
        (None, Some(ty)) => Some(table.instantiate(ty)?.into()),
        (None, None) => None,
    };

    let mut built = match (owner, &candidate.name) {
        (Some(owner), Some(name)) => Candidate::new(owner, name.as_str()),
        (Some(owner), None) => Candidate::in_owner(owner),
        (None, Some(name)) => Candidate::named(name.as_str()),
        (None, None) => Candidate::default(),
    };
    if let Some(caller) = &candidate.caller {
        built = built.with_caller(caller.as_str());
    }
    Ok(built)
}
