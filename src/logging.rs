//! Subscriber setup for the CLI.
//!
//! Filter precedence: `RUST_LOG`, then `SYMPROBE_LOG`, then `--verbose`
//! (`debug`) or `warn`. Output goes to stderr so reports on stdout stay
//! machine-readable.

use std::io::IsTerminal;
use std::sync::OnceLock;

use tracing_subscriber::{fmt, EnvFilter};

use symprobe_types::env_utils::{env_string, LOG_VAR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

fn default_directive(verbose: bool) -> String {
    env_string(LOG_VAR).unwrap_or_else(|| if verbose { "debug" } else { "warn" }.to_string())
}

/// Install the global subscriber once; later calls are ignored.
pub fn init_logging(verbose: bool, format: LogFormat) {
    static INITIALISED: OnceLock<()> = OnceLock::new();

    INITIALISED.get_or_init(|| {
        let use_ansi = std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

        let builder = fmt::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(use_ansi)
            .with_target(true);

        let _ = match format {
            LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
            LogFormat::Compact => {
                tracing::subscriber::set_global_default(builder.compact().finish())
            }
        };
    });
}
