//! Subcommands of the `symprobe` binary.

pub mod check;
pub mod demo;
pub mod output;
pub mod run;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use symprobe::SymbolTable;

/// Load a table; its handle capacity comes from `SYMPROBE_MAX_HANDLES`.
pub fn load_table(path: &Path) -> Result<Arc<SymbolTable>> {
    let table = SymbolTable::from_path(path)
        .with_context(|| format!("failed to load symbol table {}", path.display()))?;
    Ok(Arc::new(table))
}
