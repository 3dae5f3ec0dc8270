// ============================================================================
// mediaprobe-core/src/invocation.rs
// ============================================================================
//
// INVOCATION BUILDER: Inert, Injection-Safe ffprobe Command Descriptors
//
// Turns a target path and a `ProbeConfig` into a `ProbeInvocation`: the
// executable, its argument vector and the limits/environment it must run
// under. Nothing is spawned here. The target path always travels as its own
// argument token, so spaces, quotes and shell metacharacters in file names
// never reach a shell.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use crate::config::ProbeConfig;
use crate::error::{ProbeError, Result};

/// Fixed flags: quiet logging, JSON printer, format block, stream blocks.
pub const FFPROBE_FLAGS: [&str; 6] = [
    "-v",
    "quiet",
    "-print_format",
    "json",
    "-show_format",
    "-show_streams",
];

/// Precedes the target path so names starting with `-` are not read as options.
const INPUT_FLAG: &str = "-i";

/// A fully specified ffprobe run that has not been started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeInvocation {
    executable: String,
    arguments: Vec<OsString>,
    target: PathBuf,
    timeout: Option<Duration>,
    idle_timeout: Option<Duration>,
    environment: BTreeMap<String, String>,
}

impl ProbeInvocation {
    /// Builds the invocation that probes `path` with `config`.
    ///
    /// Fails with [`ProbeError::FileNotFound`] when `path` does not exist or
    /// cannot be read. The check happens before any process is created.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use mediaprobe_core::{ProbeConfig, ProbeInvocation};
    /// use std::path::Path;
    ///
    /// let config = ProbeConfig::default();
    /// let invocation = ProbeInvocation::build(Path::new("movie night.mkv"), &config).unwrap();
    /// assert_eq!(invocation.arguments().last().unwrap(), "movie night.mkv");
    /// ```
    pub fn build(path: &Path, config: &ProbeConfig) -> Result<Self> {
        ensure_readable(path)?;

        let mut arguments: Vec<OsString> = FFPROBE_FLAGS.iter().map(OsString::from).collect();
        arguments.push(OsString::from(INPUT_FLAG));
        arguments.push(path.as_os_str().to_os_string());

        let invocation = Self {
            executable: config.binary_path().to_string(),
            arguments,
            target: path.to_path_buf(),
            timeout: config.timeout(),
            idle_timeout: config.idle_timeout(),
            environment: config.environment().clone(),
        };

        log::debug!("Built ffprobe invocation: {}", invocation);
        Ok(invocation)
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// Argument tokens in order; the last one is the target path.
    pub fn arguments(&self) -> &[OsString] {
        &self.arguments
    }

    /// The path this invocation probes.
    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout
    }

    pub fn environment(&self) -> &BTreeMap<String, String> {
        &self.environment
    }

    /// Returns a ready-to-spawn `Command` with the arguments and environment
    /// applied, for callers that manage the process themselves. The timeouts
    /// are not enforced by a bare `Command`; use [`crate::run_to_completion`]
    /// for that.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.args(&self.arguments)
            .envs(&self.environment)
            .stdin(Stdio::null());
        cmd
    }
}

impl fmt::Display for ProbeInvocation {
    /// Shell-quoted preview for logs and display. Never executed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shell_quote(OsStr::new(&self.executable)))?;
        for arg in &self.arguments {
            write!(f, " {}", shell_quote(arg))?;
        }
        Ok(())
    }
}

fn ensure_readable(path: &Path) -> Result<()> {
    let not_found = |source| ProbeError::FileNotFound {
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(path).map_err(not_found)?;
    if metadata.is_dir() {
        fs::read_dir(path).map_err(not_found)?;
    } else {
        fs::File::open(path).map_err(not_found)?;
    }
    Ok(())
}

fn shell_quote(token: &OsStr) -> String {
    let text = token.to_string_lossy();
    let is_plain = !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=,+@%".contains(c));
    if is_plain {
        text.into_owned()
    } else {
        format!("'{}'", text.replace('\'', r"'\''"))
    }
}
