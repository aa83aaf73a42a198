//! Demo command - the bundled caller-class walkthrough

use anyhow::Result;
use clap::Parser;

use symprobe::demo::run_demo;

use super::output;

#[derive(Parser, Debug)]
pub struct DemoCmd {}

impl DemoCmd {
    pub fn execute(&self, json: bool) -> Result<()> {
        let steps = run_demo()?;
        if json {
            let rows: Vec<_> = steps
                .iter()
                .map(|step| output::outcome_json(step.title, &step.outcome))
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        } else {
            for step in &steps {
                println!("{}", output::format_outcome(step.title, &step.outcome));
            }
        }
        Ok(())
    }
}
