use crate::Result;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const OPTIONS_ENV: &str = "FERROBRIDGE_OPTIONS";
pub const TRACE_ARGS_ENV: &str = "FERROBRIDGE_TRACE_ARGS";
pub const DISPLAY_LIMIT_ENV: &str = "FERROBRIDGE_DISPLAY_LIMIT";

/// Process-wide knobs for the bridge. None of them change conversion or call
/// semantics; they only affect what gets rendered into logs and display forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeOptions {
    /// Render marshalled argument values into call trace events.
    pub trace_arguments: bool,
    /// Maximum number of elements shown when displaying sequences and arrays.
    pub display_limit: usize,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            trace_arguments: false,
            display_limit: 16,
        }
    }
}

impl BridgeOptions {
    pub fn from_json(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// `FERROBRIDGE_OPTIONS` (JSON) first, then the individual variables on top.
    pub fn from_env() -> Result<Self> {
        let mut options = match std::env::var(OPTIONS_ENV) {
            Ok(json) if !json.trim().is_empty() => Self::from_json(&json)?,
            _ => Self::default(),
        };
        if let Some(trace) = env_true(TRACE_ARGS_ENV) {
            options.trace_arguments = trace;
        }
        if let Ok(limit) = std::env::var(DISPLAY_LIMIT_ENV) {
            options.display_limit = limit.trim().parse().map_err(|_| {
                crate::Error::from(format!("{DISPLAY_LIMIT_ENV} must be an integer, got {limit:?}"))
            })?;
        }
        Ok(options)
    }
}

fn env_true(key: &str) -> Option<bool> {
    std::env::var(key).ok().map(|val| {
        let trimmed = val.trim();
        !trimmed.is_empty() && !matches!(trimmed, "0" | "false" | "FALSE" | "False")
    })
}

/// Options for this process, read from the environment on first use.
/// A malformed environment falls back to the defaults with a warning.
pub fn options() -> &'static BridgeOptions {
    static OPTIONS: OnceLock<BridgeOptions> = OnceLock::new();
    OPTIONS.get_or_init(|| {
        BridgeOptions::from_env().unwrap_or_else(|err| {
            warn!("ignoring bridge options from environment: {}", err);
            BridgeOptions::default()
        })
    })
}
