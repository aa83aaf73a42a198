//! Environment variable helpers for symprobe settings.
//!
//! Settings read from the environment:
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `SYMPROBE_MAX_HANDLES` | capacity of an in-memory host's handle registry |
//! | `SYMPROBE_LOG` | log filter used by the CLI when `RUST_LOG` is unset |
//! | `SYMPROBE_LOG_JSON` | CLI logs as JSON lines, same as `--log-json` |
//!
//! ```
//! use symprobe_types::env_utils::{env_bool, env_var_or};
//!
//! let capacity: usize = env_var_or("SYMPROBE_MAX_HANDLES", 65_536);
//! let json_logs = env_bool("SYMPROBE_LOG_JSON");
//! # let _ = (capacity, json_logs);
//! ```

use std::str::FromStr;

pub const MAX_HANDLES_VAR: &str = "SYMPROBE_MAX_HANDLES";
pub const LOG_VAR: &str = "SYMPROBE_LOG";
pub const LOG_JSON_VAR: &str = "SYMPROBE_LOG_JSON";

/// Parse a variable, `None` when unset or unparsable.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Parse a variable, falling back to `default`.
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

/// `true` for "1", "true", "yes" or "on" (any case).
pub fn env_bool(key: &str) -> bool {
    std::env::var(key)
        .map(|v| is_truthy(&v))
        .unwrap_or(false)
}

/// Non-empty string value of a variable.
pub fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_or() {
        std::env::set_var("SYMPROBE_TEST_CAPACITY", " 12 ");
        let val: usize = env_var_or("SYMPROBE_TEST_CAPACITY", 3);
        assert_eq!(val, 12);

        std::env::set_var("SYMPROBE_TEST_CAPACITY", "lots");
        let val: usize = env_var_or("SYMPROBE_TEST_CAPACITY", 3);
        assert_eq!(val, 3);

        std::env::remove_var("SYMPROBE_TEST_CAPACITY");
        assert_eq!(env_var::<usize>("SYMPROBE_TEST_CAPACITY"), None);
    }

    #[test]
    fn test_env_bool() {
        std::env::set_var("SYMPROBE_TEST_FLAG", "On");
        assert!(env_bool("SYMPROBE_TEST_FLAG"));
        std::env::set_var("SYMPROBE_TEST_FLAG", "0");
        assert!(!env_bool("SYMPROBE_TEST_FLAG"));
        std::env::remove_var("SYMPROBE_TEST_FLAG");
        assert!(!env_bool("SYMPROBE_TEST_FLAG"));
    }

    #[test]
    fn test_env_string_skips_blank() {
        std::env::set_var("SYMPROBE_TEST_STRING", "  ");
        assert_eq!(env_string("SYMPROBE_TEST_STRING"), None);
        std::env::set_var("SYMPROBE_TEST_STRING", "debug");
        assert_eq!(env_string("SYMPROBE_TEST_STRING").as_deref(), Some("debug"));
        std::env::remove_var("SYMPROBE_TEST_STRING");
    }
}
