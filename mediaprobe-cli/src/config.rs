// mediaprobe-cli/src/config.rs
//
// Turns command-line/environment settings into a validated ProbeConfig.

use mediaprobe_core::{ProbeConfig, Result};
use std::time::Duration;

use crate::cli::ProbeArgs;

impl ProbeArgs {
    pub fn to_config(&self) -> Result<ProbeConfig> {
        ProbeConfig::builder()
            .binary_path(self.ffprobe.as_str())
            .maybe_timeout(self.timeout)
            .maybe_idle_timeout(self.idle_timeout)
            .envs(self.envs.iter().cloned())
            .build()
    }
}

/// Parses a positive number of seconds, e.g. `30` or `2.5`.
pub fn parse_seconds(value: &str) -> std::result::Result<Duration, String> {
    let seconds: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a number of seconds"))?;
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(format!("'{value}' must be a positive number of seconds"));
    }
    Duration::try_from_secs_f64(seconds).map_err(|e| format!("'{value}': {e}"))
}

/// Parses `KEY=VALUE`. The value may itself contain `=`.
pub fn parse_env_pair(value: &str) -> std::result::Result<(String, String), String> {
    match value.split_once('=') {
        Some((key, val)) if !key.is_empty() => Ok((key.to_string(), val.to_string())),
        _ => Err(format!("'{value}' is not in KEY=VALUE form")),
    }
}
