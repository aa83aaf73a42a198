//! Run command - resolve every entry of a probe plan

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::info;

use symprobe::plan::{run_plan, PlanDocument};

use super::{load_table, output};

#[derive(Parser, Debug)]
pub struct RunCmd {
    /// Symbol table JSON
    #[arg(long)]
    pub table: PathBuf,

    /// Probe plan JSON
    #[arg(long)]
    pub plan: PathBuf,
}

impl RunCmd {
    pub fn execute(&self, json: bool) -> Result<()> {
        let table = load_table(&self.table)?;
        let doc = PlanDocument::from_path(&self.plan)?;
        info!(entries = doc.entries.len(), types = table.type_count(), "running probe plan");

        let report = run_plan(table, &doc)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print!("{}", output::format_report(&report));
        }

        if !report.all_resolved() {
            bail!(
                "{} of {} entries unresolved",
                report.entries.len() - report.resolved_count(),
                report.entries.len()
            );
        }
        Ok(())
    }
}
