//! Check command - load and validate a symbol table

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;

use super::load_table;

#[derive(Parser, Debug)]
pub struct CheckCmd {
    /// Symbol table JSON
    #[arg(long)]
    pub table: PathBuf,
}

#[derive(Serialize)]
struct CheckJson<'a> {
    valid: bool,
    types: Vec<&'a str>,
    max_handles: usize,
}

impl CheckCmd {
    pub fn execute(&self, json: bool) -> Result<()> {
        let table = load_table(&self.table)?;
        if json {
            let report = CheckJson {
                valid: true,
                types: table.type_names().collect(),
                max_handles: table.config().max_handles,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!(
                "✓ {}: {} types (handle capacity {})",
                self.table.display(),
                table.type_count(),
                table.config().max_handles
            );
        }
        Ok(())
    }
}
