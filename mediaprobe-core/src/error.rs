// ============================================================================
// mediaprobe-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Failure Kinds Surfaced by a Probe
//
// Every stage of a probe (building the invocation, running ffprobe, parsing
// its output) reports failures through `ProbeError`. Callers match on the
// variant to tell a missing input from a hung process, a slow process, a
// failing process or unusable output.

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors produced while probing a media file.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The target path does not exist or cannot be read.
    #[error("Input file not found or unreadable: {path}")]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The whole run took longer than the configured timeout.
    #[error("ffprobe timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    /// The process produced no output for longer than the idle timeout.
    #[error("ffprobe produced no output for {idle_timeout:?} and was terminated")]
    IdleTimeout { idle_timeout: Duration },

    /// The process exited unsuccessfully.
    #[error("ffprobe failed with exit code {}: {stderr}", exit_code.map_or_else(|| "none (terminated by signal)".to_string(), |c| c.to_string()))]
    ExecutionFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    /// The captured output lacks the structure required to build a result.
    #[error("Malformed ffprobe output: {0}")]
    MalformedProbeOutput(String),

    #[error("Failed to start command '{program}': {source}")]
    CommandStart {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed while waiting on command '{program}': {source}")]
    CommandWait {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for probe operations.
pub type Result<T> = std::result::Result<T, ProbeError>;

pub(crate) fn command_start_error(program: impl Into<String>, source: io::Error) -> ProbeError {
    ProbeError::CommandStart {
        program: program.into(),
        source,
    }
}

pub(crate) fn command_wait_error(program: impl Into<String>, source: io::Error) -> ProbeError {
    ProbeError::CommandWait {
        program: program.into(),
        source,
    }
}
