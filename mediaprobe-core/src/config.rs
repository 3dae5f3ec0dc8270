//! Configuration consumed by the invocation builder.
//!
//! `ProbeConfig` is an immutable value: build it once (directly or through
//! `ProbeConfigBuilder`) and hand a reference to every probe. It is `Send +
//! Sync` and can be shared between threads probing different files.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::{ProbeError, Result};

/// Default ffprobe binary, resolved through `PATH`.
pub const DEFAULT_FFPROBE_BINARY: &str = "ffprobe";

/// Settings for invoking ffprobe.
///
/// # Examples
///
/// ```rust
/// use mediaprobe_core::ProbeConfig;
/// use std::time::Duration;
///
/// let config = ProbeConfig::builder()
///     .binary_path("/usr/local/bin/ffprobe")
///     .timeout(Duration::from_secs(30))
///     .idle_timeout(Duration::from_secs(10))
///     .env("LC_ALL", "C")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.binary_path(), "/usr/local/bin/ffprobe");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    binary_path: String,
    timeout: Option<Duration>,
    idle_timeout: Option<Duration>,
    environment: BTreeMap<String, String>,
}

impl ProbeConfig {
    /// Creates a configuration for `binary_path` with no timeouts and an
    /// empty environment.
    pub fn new(binary_path: impl Into<String>) -> Result<Self> {
        Self::builder().binary_path(binary_path).build()
    }

    pub fn builder() -> ProbeConfigBuilder {
        ProbeConfigBuilder::new()
    }

    /// Executable name or path of the probing tool.
    pub fn binary_path(&self) -> &str {
        &self.binary_path
    }

    /// Bound on total wall-clock time, `None` when unbounded.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Bound on time without output, `None` when unbounded.
    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout
    }

    /// Variables set on the child process, overriding inherited ones.
    pub fn environment(&self) -> &BTreeMap<String, String> {
        &self.environment
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            binary_path: DEFAULT_FFPROBE_BINARY.to_string(),
            timeout: None,
            idle_timeout: None,
            environment: BTreeMap::new(),
        }
    }
}

/// Builder for [`ProbeConfig`].
///
/// Starts from the defaults (`ffprobe` on `PATH`, no timeouts, no extra
/// environment). `build` rejects an empty binary path and zero durations.
#[derive(Debug, Clone, Default)]
pub struct ProbeConfigBuilder {
    config: ProbeConfig,
}

impl ProbeConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn binary_path(mut self, binary_path: impl Into<String>) -> Self {
        self.config.binary_path = binary_path.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Sets or clears the total timeout.
    pub fn maybe_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.config.idle_timeout = Some(idle_timeout);
        self
    }

    /// Sets or clears the idle timeout.
    pub fn maybe_idle_timeout(mut self, idle_timeout: Option<Duration>) -> Self {
        self.config.idle_timeout = idle_timeout;
        self
    }

    /// Adds one environment variable. A later call with the same key wins.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.environment.insert(key.into(), value.into());
        self
    }

    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.config
            .environment
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn build(self) -> Result<ProbeConfig> {
        let config = self.config;

        if config.binary_path.trim().is_empty() {
            return Err(ProbeError::Config(
                "ffprobe binary path must not be empty".to_string(),
            ));
        }
        if config.timeout == Some(Duration::ZERO) {
            return Err(ProbeError::Config("timeout must be greater than zero".to_string()));
        }
        if config.idle_timeout == Some(Duration::ZERO) {
            return Err(ProbeError::Config(
                "idle timeout must be greater than zero".to_string(),
            ));
        }
        if let Some(key) = config
            .environment
            .keys()
            .find(|k| k.is_empty() || k.contains('=') || k.contains('\0'))
        {
            return Err(ProbeError::Config(format!(
                "invalid environment variable name: {key:?}"
            )));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_ffprobe_without_limits() {
        let config = ProbeConfig::default();
        assert_eq!(config.binary_path(), "ffprobe");
        assert_eq!(config.timeout(), None);
        assert_eq!(config.idle_timeout(), None);
        assert!(config.environment().is_empty());
    }

    #[test]
    fn builder_sets_all_fields() {
        let config = ProbeConfig::builder()
            .binary_path("/opt/ffmpeg/bin/ffprobe")
            .timeout(Duration::from_secs(60))
            .idle_timeout(Duration::from_secs(5))
            .env("A", "1")
            .envs([("B", "2"), ("A", "3")])
            .build()
            .unwrap();

        assert_eq!(config.binary_path(), "/opt/ffmpeg/bin/ffprobe");
        assert_eq!(config.timeout(), Some(Duration::from_secs(60)));
        assert_eq!(config.idle_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.environment().get("A").map(String::as_str), Some("3"));
        assert_eq!(config.environment().get("B").map(String::as_str), Some("2"));
    }

    #[test]
    fn empty_binary_is_rejected() {
        let err = ProbeConfig::new("  ").unwrap_err();
        assert!(matches!(err, ProbeError::Config(_)));
    }

    #[test]
    fn zero_timeouts_are_rejected() {
        assert!(ProbeConfig::builder().timeout(Duration::ZERO).build().is_err());
        assert!(ProbeConfig::builder().idle_timeout(Duration::ZERO).build().is_err());
    }

    #[test]
    fn malformed_env_key_is_rejected() {
        let err = ProbeConfig::builder().env("A=B", "x").build().unwrap_err();
        assert!(matches!(err, ProbeError::Config(_)));
    }

    #[test]
    fn maybe_setters_clear_values() {
        let config = ProbeConfig::builder()
            .timeout(Duration::from_secs(1))
            .maybe_timeout(None)
            .maybe_idle_timeout(Some(Duration::from_millis(250)))
            .build()
            .unwrap();
        assert_eq!(config.timeout(), None);
        assert_eq!(config.idle_timeout(), Some(Duration::from_millis(250)));
    }
}
