//! symprobe: resolve symbols through prioritized fallback chains
//!
//! ## Commands
//!
//! - **run**: run a JSON probe plan against a symbol table
//! - **check**: load and validate a symbol table
//! - **demo**: the caller-class walkthrough against a bundled table
//!
//! ## Example Usage
//!
//! ```bash
//! symprobe check --table types.json
//! symprobe run --table types.json --plan plan.json --json
//! RUST_LOG=symprobe_core=debug symprobe demo
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

mod symprobe_cli;

use symprobe::logging::{init_logging, LogFormat};
use symprobe_types::env_utils::{env_bool, LOG_JSON_VAR};
use symprobe_cli::{check::CheckCmd, demo::DemoCmd, run::RunCmd};

#[derive(Parser)]
#[command(
    name = "symprobe",
    author,
    version,
    about = "Fallback-chain symbol resolution",
    long_about = "Declare a calling convention once, then probe candidate owners and names\n\
                  in priority order until one resolves."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    json: bool,

    /// Log probes at debug level (overridden by RUST_LOG / SYMPROBE_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines on stderr (also SYMPROBE_LOG_JSON=1)
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a probe plan against a symbol table
    Run(RunCmd),

    /// Load and validate a symbol table
    Check(CheckCmd),

    /// Run the bundled demonstration chains
    Demo(DemoCmd),
}

fn main() -> Result<()> {
    let Cli {
        command,
        json,
        verbose,
        log_json,
    } = Cli::parse();

    let format = if log_json || env_bool(LOG_JSON_VAR) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    init_logging(verbose, format);

    match command {
        Commands::Run(cmd) => cmd.execute(json),
        Commands::Check(cmd) => cmd.execute(json),
        Commands::Demo(cmd) => cmd.execute(json),
    }
}
