//! Output formatting for the symprobe CLI

use serde_json::{json, Value};

use symprobe::plan::{EntryReport, EntryStatus, PlanReport};
use symprobe::Outcome;

fn target(owner: Option<&str>, name: Option<&str>) -> String {
    match (owner, name) {
        (Some(o), Some(n)) => format!("{o}::{n}"),
        (Some(o), None) => o.to_string(),
        (None, Some(n)) => n.to_string(),
        (None, None) => "-".to_string(),
    }
}

pub fn format_entry(entry: &EntryReport) -> String {
    let at = target(entry.owner.as_deref(), entry.name.as_deref());
    let message = entry.message.as_deref().unwrap_or("");
    match entry.status {
        EntryStatus::Resolved => format!(
            "✓ {} [{} {}] {} ({})",
            entry.label,
            entry.strategy,
            entry.signature,
            at,
            entry.handle.as_deref().unwrap_or("-")
        ),
        EntryStatus::Unresolved => format!(
            "✗ {} [{} {}] last tried {}: {}",
            entry.label, entry.strategy, entry.signature, at, message
        ),
        EntryStatus::Error => format!(
            "! {} [{} {}] {}: {}",
            entry.label,
            entry.strategy,
            entry.signature,
            entry.error_class.as_deref().unwrap_or("error"),
            message
        ),
    }
}

pub fn format_report(report: &PlanReport) -> String {
    let mut out = String::new();
    for entry in &report.entries {
        out.push_str(&format_entry(entry));
        out.push('\n');
    }
    out.push_str(&format!(
        "\n{}/{} resolved\n",
        report.resolved_count(),
        report.entries.len()
    ));
    out
}

pub fn format_outcome(title: &str, outcome: &Outcome) -> String {
    let owner = outcome.owner().map(ToString::to_string);
    let at = target(owner.as_deref(), outcome.name());
    match outcome.as_result() {
        Ok(handle) => format!("✓ {title}: {at} ({handle})"),
        Err(failure) => format!("✗ {title}: {failure}"),
    }
}

pub fn outcome_json(title: &str, outcome: &Outcome) -> Value {
    json!({
        "title": title,
        "resolved": outcome.is_found(),
        "owner": outcome.owner().map(ToString::to_string),
        "name": outcome.name(),
        "handle": outcome.handle().map(ToString::to_string),
        "failure": outcome.failure().map(ToString::to_string),
        "failure_kind": outcome.failure().map(|f| f.kind().to_string()),
    })
}
