//! The `symprobe demo` walkthrough against a bundled symbol table.
//!
//! The table has no `sun.reflect.Reflection`, so the caller-class chains fall
//! through to `com.example.Callers`.

use std::sync::Arc;

use anyhow::{Context, Result};

use symprobe_core::{Candidate, Outcome, Strategy, Template};
use symprobe_host::SymbolTable;
use symprobe_types::{Signature, ValueKind};

pub const DEMO_TABLE: &str = include_str!("../data/demo_table.json");

pub fn demo_table() -> Result<Arc<SymbolTable>> {
    let table = SymbolTable::from_json_str(DEMO_TABLE).context("bundled demo table is invalid")?;
    Ok(Arc::new(table))
}

/// One step of the walkthrough.
#[derive(Debug, Clone)]
pub struct DemoStep {
    pub title: &'static str,
    pub outcome: Outcome,
}

pub fn run_demo() -> Result<Vec<DemoStep>> {
    let table = demo_table()?;
    let caller_sig: Signature = "(int)->Class".parse()?;
    let callers = Template::new(table.clone(), Strategy::StaticCall, caller_sig)?;

    let mut steps = Vec::new();

    let outcome = callers
        .start(("sun.reflect.Reflection", "getCallerClass"))?
        .or_else(("com.example.Callers", "getCallerClass"))?
        .fallback(("com.example.CallersSlow", "getCallerClass"))?;
    steps.push(DemoStep {
        title: "caller class, explicit names",
        outcome,
    });

    let by_owner = callers.with_default_name("getCallerClass");
    let outcome = by_owner
        .start(Candidate::in_owner("sun.reflect.Reflection"))?
        .or_else(Candidate::in_owner("com.example.Callers"))?
        .fallback(Candidate::in_owner("com.example.CallersSlow"))?;
    steps.push(DemoStep {
        title: "caller class, default name",
        outcome,
    });

    let receiver = table.instantiate("com.example.PriorityQueue")?;
    let size = Template::new(table.clone(), Strategy::Bind, "()->int".parse::<Signature>()?)?
        .with_default_receiver(receiver);
    let outcome = size
        .start(Candidate::named("length"))?
        .fallback(Candidate::named("size"))?;
    steps.push(DemoStep {
        title: "bound queue size",
        outcome,
    });

    let limit = Template::field(table, Strategy::StaticFieldSetter, ValueKind::Int)?;
    let outcome = limit
        .start(("com.example.Config", "LIMIT"))?
        .into_outcome();
    steps.push(DemoStep {
        title: "write a final static field",
        outcome,
    });

    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use symprobe_host::FailureKind;

    #[test]
    fn test_demo_steps() {
        let steps = run_demo().unwrap();
        assert_eq!(steps.len(), 4);

        assert!(steps[0].outcome.is_found());
        assert_eq!(
            steps[0].outcome.owner().map(ToString::to_string).as_deref(),
            Some("com.example.Callers")
        );
        assert_eq!(steps[0].outcome, steps[1].outcome);

        assert_eq!(steps[2].outcome.name(), Some("size"));
        assert_eq!(
            steps[3].outcome.failure().map(|f| f.kind()),
            Some(FailureKind::AccessDenied)
        );
    }
}
