//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `SKETCHREPO_LOG` environment variable (e.g. "info", "debug")
//! 3. default to `info`
//!
//! Logs go to stderr so `show` and `order` output can be piped.

use tracing::Level;
use tracing_subscriber::fmt;

/// Environment variable consulted when no level is passed.
pub const ENV_VAR: &str = "SKETCHREPO_LOG";

/// Initialise the global logging subscriber. Call once at startup.
pub fn init(cli_level: Option<Level>) {
    let level = cli_level
        .or_else(|| std::env::var(ENV_VAR).ok().and_then(|s| parse_level(&s)))
        .unwrap_or(Level::INFO);

    fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Parse a level name, case-insensitively. `warning` is accepted for `warn`.
pub fn parse_level(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}
