// ============================================================================
// mediaprobe-core/src/runner.rs
// ============================================================================
//
// EXECUTION LIFECYCLE: Running a ProbeInvocation Under Time Limits
//
// This module defines the narrow capability the core needs from a process
// backend and the loop that drives it to a definitive outcome.
//
// KEY COMPONENTS:
// - ProbeProcess: a started process (output chunks, try_wait, kill)
// - ProcessLauncher: something that can start a ProbeInvocation
// - SystemLauncher / SystemProcess: std::process backend with reader threads
// - run_to_completion: enforces timeout and idle timeout, captures output
//
// A run ends in exactly one of: captured output, Timeout, IdleTimeout,
// ExecutionFailed. When a limit fires the child's whole process group is
// killed, the child is reaped and its partial output is dropped.

use std::io::{self, Read};
use std::process::{Child, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::error::{ProbeError, Result, command_start_error, command_wait_error};
use crate::invocation::ProbeInvocation;

/// Upper bound on how long the run loop blocks before re-checking the child.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

const READ_BUFFER_SIZE: usize = 8 * 1024;

/// A piece of output read from one of the child's pipes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputChunk {
    Stdout(Vec<u8>),
    Stderr(Vec<u8>),
}

// --- Process Execution Abstraction ---

/// A started probe process.
pub trait ProbeProcess {
    /// Output produced by the process. Every chunk counts as activity for the
    /// idle timeout. The channel disconnects once both pipes are closed.
    fn output(&self) -> &Receiver<OutputChunk>;

    /// Returns the exit status if the process has finished.
    fn try_wait(&mut self) -> Result<Option<ExitStatus>>;

    /// Forcibly terminates the process and reaps it.
    fn kill(&mut self) -> Result<()>;
}

/// Something that can start a [`ProbeInvocation`].
pub trait ProcessLauncher {
    type Process: ProbeProcess;

    fn start(&self, invocation: &ProbeInvocation) -> Result<Self::Process>;
}

/// Everything a successful run printed.
#[derive(Debug, Clone)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: ExitStatus,
    pub elapsed: Duration,
}

/// Runs `invocation` through `launcher` and blocks until it finishes, fails
/// or exceeds one of its limits.
pub fn run_to_completion<L: ProcessLauncher>(
    launcher: &L,
    invocation: &ProbeInvocation,
) -> Result<CapturedOutput> {
    let program = invocation.executable();
    log::debug!("Running: {}", invocation);

    let mut process = launcher.start(invocation)?;
    let started = Instant::now();
    let mut last_activity = started;
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let mut pipes_open = true;
    let mut exit_status: Option<ExitStatus> = None;

    loop {
        if exit_status.is_none() {
            exit_status = match process.try_wait() {
                Ok(status) => status,
                Err(err) => {
                    terminate(&mut process, program);
                    return Err(err);
                }
            };
        }

        if let (Some(status), false) = (exit_status, pipes_open) {
            let elapsed = started.elapsed();
            return finish(status, stdout, stderr, elapsed);
        }

        let now = Instant::now();
        if let Some(timeout) = invocation.timeout() {
            if now.duration_since(started) >= timeout {
                log::error!("{} exceeded its {:?} timeout, terminating", program, timeout);
                terminate(&mut process, program);
                return Err(ProbeError::Timeout { timeout });
            }
        }
        if let Some(idle_timeout) = invocation.idle_timeout() {
            if now.duration_since(last_activity) >= idle_timeout {
                log::error!(
                    "{} produced no output for {:?}, terminating",
                    program,
                    idle_timeout
                );
                terminate(&mut process, program);
                return Err(ProbeError::IdleTimeout { idle_timeout });
            }
        }

        let wait = next_wait(now, started, last_activity, invocation);
        if pipes_open {
            match process.output().recv_timeout(wait) {
                Ok(OutputChunk::Stdout(bytes)) => {
                    last_activity = Instant::now();
                    stdout.extend_from_slice(&bytes);
                }
                Ok(OutputChunk::Stderr(bytes)) => {
                    last_activity = Instant::now();
                    stderr.extend_from_slice(&bytes);
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => pipes_open = false,
            }
        } else {
            thread::sleep(wait);
        }
    }
}

fn finish(
    status: ExitStatus,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    elapsed: Duration,
) -> Result<CapturedOutput> {
    let stderr = String::from_utf8_lossy(&stderr).into_owned();

    if !status.success() {
        log::error!("ffprobe exited with {}: {}", status, stderr.trim());
        return Err(ProbeError::ExecutionFailed {
            exit_code: status.code(),
            stderr,
        });
    }

    log::debug!(
        "ffprobe finished in {:?} ({} bytes of output)",
        elapsed,
        stdout.len()
    );
    Ok(CapturedOutput {
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr,
        status,
        elapsed,
    })
}

/// Time to block for the next output chunk without overshooting a limit.
fn next_wait(
    now: Instant,
    started: Instant,
    last_activity: Instant,
    invocation: &ProbeInvocation,
) -> Duration {
    let mut wait = POLL_INTERVAL;
    if let Some(timeout) = invocation.timeout() {
        wait = wait.min((started + timeout).saturating_duration_since(now));
    }
    if let Some(idle_timeout) = invocation.idle_timeout() {
        wait = wait.min((last_activity + idle_timeout).saturating_duration_since(now));
    }
    wait
}

fn terminate<P: ProbeProcess>(process: &mut P, program: &str) {
    if let Err(err) = process.kill() {
        log::error!("Failed to terminate {}: {}", program, err);
    }
}

// --- Concrete Implementation using std::process ---

/// Starts invocations as native child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    type Process = SystemProcess;

    fn start(&self, invocation: &ProbeInvocation) -> Result<Self::Process> {
        let program = invocation.executable().to_string();
        let mut cmd = invocation.to_command();
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

        // Own process group, so a kill also reaches anything the child forks
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        let mut child = cmd.spawn().map_err(|e| {
            log::error!("Failed to start {}: {}", program, e);
            command_start_error(program.as_str(), e)
        })?;

        let (tx, rx) = crossbeam_channel::unbounded();
        if let Some(pipe) = child.stdout.take() {
            spawn_reader(pipe, tx.clone(), OutputChunk::Stdout);
        }
        if let Some(pipe) = child.stderr.take() {
            spawn_reader(pipe, tx, OutputChunk::Stderr);
        }

        log::debug!("Started {} (pid {})", program, child.id());
        Ok(SystemProcess {
            child,
            output: rx,
            program,
            reaped: false,
        })
    }
}

/// A native child process with its pipes drained by background threads.
#[derive(Debug)]
pub struct SystemProcess {
    child: Child,
    output: Receiver<OutputChunk>,
    program: String,
    reaped: bool,
}

impl SystemProcess {
    /// OS process id of the child.
    pub fn id(&self) -> u32 {
        self.child.id()
    }
}

impl ProbeProcess for SystemProcess {
    fn output(&self) -> &Receiver<OutputChunk> {
        &self.output
    }

    fn try_wait(&mut self) -> Result<Option<ExitStatus>> {
        let status = self
            .child
            .try_wait()
            .map_err(|e| command_wait_error(self.program.as_str(), e))?;
        if status.is_some() {
            self.reaped = true;
        }
        Ok(status)
    }

    fn kill(&mut self) -> Result<()> {
        // The group may outlive an already reaped leader
        kill_process_tree(&mut self.child)
            .map_err(|e| command_wait_error(self.program.as_str(), e))?;
        if self.reaped {
            return Ok(());
        }
        self.child
            .wait()
            .map_err(|e| command_wait_error(self.program.as_str(), e))?;
        self.reaped = true;
        log::debug!("Terminated {} (pid {})", self.program, self.child.id());
        Ok(())
    }
}

impl Drop for SystemProcess {
    fn drop(&mut self) {
        if !self.reaped {
            let _ = kill_process_tree(&mut self.child);
            let _ = self.child.wait();
        }
    }
}

/// Sends SIGKILL to the child's process group.
#[cfg(unix)]
fn kill_process_tree(child: &mut Child) -> io::Result<()> {
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let pgid = i32::try_from(child.id())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;
    match killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
        // Whole group already gone
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(errno) => Err(io::Error::from(errno)),
    }
}

#[cfg(not(unix))]
fn kill_process_tree(child: &mut Child) -> io::Result<()> {
    match child.kill() {
        Ok(()) => Ok(()),
        // Already exited; wait() still reaps it.
        Err(e) if e.kind() == io::ErrorKind::InvalidInput => Ok(()),
        Err(e) => Err(e),
    }
}

fn spawn_reader<R>(mut pipe: R, tx: Sender<OutputChunk>, wrap: fn(Vec<u8>) -> OutputChunk)
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buf = [0u8; READ_BUFFER_SIZE];
        loop {
            match pipe.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    // Receiver gone means the run was abandoned.
                    if tx.send(wrap(buf[..n].to_vec())).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    log::warn!("Error reading child output: {}", e);
                    break;
                }
            }
        }
    });
}
