//! Tracing subscriber setup.
//!
//! The engine crates only emit `tracing` events; an embedding binary or
//! test calls [`init_tracing`] once to route them somewhere. `RUST_LOG`
//! overrides the default `info` filter.

use std::str::FromStr;

use tracing_subscriber::EnvFilter;
use trustlock_types::EscrowError;

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = EscrowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(EscrowError::Configuration(format!(
                "unknown log format: {other}"
            ))),
        }
    }
}

/// Install the global subscriber. Returns `false` if one was already set,
/// so repeated calls from tests are harmless.
pub fn init_tracing(format: LogFormat) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    let result = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.is_ok()
}
