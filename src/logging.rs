//! Tracing subscriber setup.
//!
//! Filtering follows `RUST_LOG` and falls back to `info`. Output is plain
//! text unless JSON lines are requested with `--log-json` or by setting
//! `REPAIR_SITE_LOG_JSON`.

use std::env;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment switch for JSON log lines.
pub const LOG_JSON_ENV: &str = "REPAIR_SITE_LOG_JSON";

/// Parse a boolean environment value. Unrecognised values yield `None`.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    }
}

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| parse_bool(&v))
        .unwrap_or(default)
}

/// Install the global subscriber. `json` forces JSON output; otherwise the
/// environment decides.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_json = json || env_bool(LOG_JSON_ENV, false);
    let registry = tracing_subscriber::registry().with(filter);
    let installed = if log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
