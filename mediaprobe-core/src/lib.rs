//! Core library for retrieving media metadata through ffprobe.
//!
//! This crate builds injection-safe ffprobe invocations, runs them under a
//! total timeout and an idle timeout, and parses the JSON they print into an
//! immutable, typed [`MediaInfo`].
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use mediaprobe_core::{ProbeConfig, ProbeError, get_info};
//! use std::path::Path;
//! use std::time::Duration;
//!
//! let config = ProbeConfig::builder()
//!     .binary_path("ffprobe")
//!     .timeout(Duration::from_secs(60))
//!     .idle_timeout(Duration::from_secs(15))
//!     .build()
//!     .unwrap();
//!
//! match get_info(Path::new("/path/to/video.mkv"), &config) {
//!     Ok(info) => println!("{:?} seconds, {} streams", info.duration(), info.stream_count()),
//!     Err(ProbeError::IdleTimeout { .. }) => eprintln!("ffprobe hung"),
//!     Err(e) => eprintln!("probe failed: {e}"),
//! }
//! ```

pub mod config;
pub mod error;
pub mod info;
pub mod invocation;
pub mod probe;
pub mod runner;

// Re-exports for public API
pub use config::{DEFAULT_FFPROBE_BINARY, ProbeConfig, ProbeConfigBuilder};
pub use error::{ProbeError, Result};
pub use info::{CodecType, FormatInfo, MediaInfo, StreamInfo, materialize, parse_frame_rate};
pub use invocation::{FFPROBE_FLAGS, ProbeInvocation};
pub use probe::{MediaProbe, get_info};
pub use runner::{
    CapturedOutput, OutputChunk, ProbeProcess, ProcessLauncher, SystemLauncher, SystemProcess,
    run_to_completion,
};
