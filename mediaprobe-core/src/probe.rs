// ============================================================================
// mediaprobe-core/src/probe.rs
// ============================================================================
//
// PROBE SERVICE: build → run → materialize
//
// `MediaProbe` pairs a `ProbeConfig` with a `ProcessLauncher` and composes the
// three stages. Failures from any stage are returned unchanged so callers can
// still tell FileNotFound, Timeout, IdleTimeout, ExecutionFailed and
// MalformedProbeOutput apart.

use std::path::Path;

use crate::config::ProbeConfig;
use crate::error::Result;
use crate::info::MediaInfo;
use crate::invocation::ProbeInvocation;
use crate::runner::{ProcessLauncher, SystemLauncher, run_to_completion};

/// Probes media files with a fixed configuration.
///
/// # Examples
///
/// ```rust,no_run
/// use mediaprobe_core::{MediaProbe, ProbeConfig};
/// use std::path::Path;
/// use std::time::Duration;
///
/// let config = ProbeConfig::builder()
///     .timeout(Duration::from_secs(30))
///     .idle_timeout(Duration::from_secs(10))
///     .build()
///     .unwrap();
/// let probe = MediaProbe::new(config);
///
/// let info = probe.get_info(Path::new("/videos/trailer.mkv")).unwrap();
/// for stream in info.streams() {
///     println!("{:?} {:?}", stream.codec_type, stream.codec_name);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MediaProbe<L = SystemLauncher> {
    config: ProbeConfig,
    launcher: L,
}

impl MediaProbe<SystemLauncher> {
    /// Creates a probe that runs ffprobe as a native child process.
    pub fn new(config: ProbeConfig) -> Self {
        Self::with_launcher(config, SystemLauncher)
    }
}

impl<L: ProcessLauncher> MediaProbe<L> {
    /// Creates a probe that starts processes through `launcher`.
    pub fn with_launcher(config: ProbeConfig, launcher: L) -> Self {
        Self { config, launcher }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Builds, without running, the invocation that would probe `path`.
    pub fn invocation(&self, path: &Path) -> Result<ProbeInvocation> {
        ProbeInvocation::build(path, &self.config)
    }

    /// Probes `path` and returns its metadata.
    pub fn get_info(&self, path: &Path) -> Result<MediaInfo> {
        let invocation = self.invocation(path)?;
        let output = run_to_completion(&self.launcher, &invocation)?;
        let info = MediaInfo::from_ffprobe_json(path, &output.stdout)?;

        log::debug!(
            "Probed {}: format={}, {} stream(s)",
            path.display(),
            info.format_name().unwrap_or("unknown"),
            info.stream_count()
        );
        Ok(info)
    }
}

/// Probes `path` with `config` using native child processes.
pub fn get_info(path: &Path, config: &ProbeConfig) -> Result<MediaInfo> {
    MediaProbe::new(config.clone()).get_info(path)
}
