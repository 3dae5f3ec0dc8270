// mediaprobe-cli/src/lib.rs
//
// Library portion of the Mediaprobe CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod output;

use mediaprobe_core::ProbeError;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, CommandArgs, Commands, InfoArgs, ProbeArgs};
pub use commands::command::run_command;
pub use commands::info::run_info;

/// Process exit code for a failed command.
///
/// 3: input missing, 4: ffprobe timed out or stalled, 5: ffprobe failed,
/// 6: unusable ffprobe output, 1: anything else.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ProbeError>() {
        Some(ProbeError::FileNotFound { .. }) => 3,
        Some(ProbeError::Timeout { .. } | ProbeError::IdleTimeout { .. }) => 4,
        Some(ProbeError::ExecutionFailed { .. } | ProbeError::CommandStart { .. }) => 5,
        Some(ProbeError::MalformedProbeOutput(_)) => 6,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::time::Duration;

    fn wrapped(err: ProbeError) -> anyhow::Error {
        Err::<(), _>(err).context("Failed to probe 'x'").unwrap_err()
    }

    #[test]
    fn exit_codes_follow_the_error_kind() {
        let io = || std::io::Error::from(std::io::ErrorKind::NotFound);
        assert_eq!(
            exit_code_for(&wrapped(ProbeError::FileNotFound {
                path: "x".into(),
                source: io(),
            })),
            3
        );
        assert_eq!(
            exit_code_for(&wrapped(ProbeError::IdleTimeout {
                idle_timeout: Duration::from_secs(1)
            })),
            4
        );
        assert_eq!(
            exit_code_for(&wrapped(ProbeError::ExecutionFailed {
                exit_code: Some(1),
                stderr: String::new(),
            })),
            5
        );
        assert_eq!(
            exit_code_for(&wrapped(ProbeError::MalformedProbeOutput("x".into()))),
            6
        );
        assert_eq!(exit_code_for(&anyhow::anyhow!("other")), 1);
    }
}
