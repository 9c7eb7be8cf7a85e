//! Child process execution with a deadline and bounded output capture.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time;

use crate::{ProcessOutput, ProcessRunner, RunError, RunFut, SystemCommand};

const MAX_OUTPUT_BYTES: usize = 1024 * 1024;
const KILL_GRACE: Duration = Duration::from_secs(2);

/// RAII guard that kills a child process (and its process group on Unix) on drop.
///
/// Wrap the child right after `spawn()` so a cancelled future still cleans up.
/// Call `disarm()` once the process has exited normally.
pub struct ChildGuard {
    child: Option<tokio::process::Child>,
}

impl ChildGuard {
    #[must_use]
    pub fn new(child: tokio::process::Child) -> Self {
        Self { child: Some(child) }
    }

    pub fn child_mut(&mut self) -> Option<&mut tokio::process::Child> {
        self.child.as_mut()
    }

    pub fn disarm(&mut self) {
        self.child = None;
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        let Some(child) = self.child.as_mut() else {
            return;
        };
        if !kill_process_group(child.id()) {
            let _ = child.start_kill();
        }
        let _ = child.try_wait();
    }
}

/// SIGKILL the process group led by `pid`. Returns `false` when no signal
/// was sent.
#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) -> bool {
    let Some(pid) = pid.and_then(|pid| i32::try_from(pid).ok()) else {
        return false;
    };
    // SAFETY: killpg only sends a signal; pid is the group we created.
    unsafe { libc::killpg(pid, libc::SIGKILL) == 0 }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) -> bool {
    false
}

/// Runs [`SystemCommand`]s as real child processes.
#[derive(Debug, Clone)]
pub struct SystemProcessRunner {
    timeout: Duration,
}

impl SystemProcessRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn run_command(
        &self,
        command: &SystemCommand,
        cwd: &Path,
    ) -> Result<ProcessOutput, RunError> {
        let (program, args) = command.argv();
        self.run_program(program, &args, cwd, command.is_launcher())
            .await
    }

    /// Run `program` until it exits or the deadline passes.
    ///
    /// Launchers get null stdio: the GUI they start outlives them and would
    /// otherwise hold our pipes open. For everything else, output still open
    /// at the deadline (a backgrounded grandchild) ends with the process group
    /// being killed and whatever was read so far being returned.
    async fn run_program(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
        launcher: bool,
    ) -> Result<ProcessOutput, RunError> {
        let binary = which::which(program).map_err(|_| RunError::NotFound {
            program: program.to_string(),
        })?;
        let deadline = time::Instant::now() + self.timeout;

        let capture = || {
            if launcher {
                Stdio::null()
            } else {
                Stdio::piped()
            }
        };
        let mut cmd = Command::new(&binary);
        cmd.args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(capture())
            .stderr(capture());
        #[cfg(unix)]
        cmd.process_group(0);

        tracing::debug!(program, ?args, cwd = %cwd.display(), launcher, "Spawning process");
        let child = cmd.spawn().map_err(|e| RunError::Spawn {
            program: program.to_string(),
            message: e.to_string(),
        })?;
        let mut guard = ChildGuard::new(child);
        let Some(child) = guard.child_mut() else {
            return Err(io_error(program, "child handle missing"));
        };
        let pid = child.id();

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let stdout_task = tokio::spawn(read_optional(stdout));
        let stderr_task = tokio::spawn(read_optional(stderr));
        let abort_readers = {
            let out = stdout_task.abort_handle();
            let err = stderr_task.abort_handle();
            move || {
                out.abort();
                err.abort();
            }
        };

        let status = match time::timeout_at(deadline, child.wait()).await {
            Ok(res) => res.map_err(|e| io_error(program, &e.to_string()))?,
            Err(_) => {
                let _ = child.kill().await;
                let _ = time::timeout(KILL_GRACE, child.wait()).await;
                abort_readers();
                tracing::warn!(program, timeout = ?self.timeout, "Process timed out");
                return Err(RunError::TimedOut {
                    program: program.to_string(),
                    elapsed: self.timeout,
                });
            }
        };
        guard.disarm();

        let mut readers = Box::pin(async { tokio::join!(stdout_task, stderr_task) });
        let (stdout_res, stderr_res) = match time::timeout_at(deadline, &mut readers).await {
            Ok(joined) => joined,
            Err(_) => {
                tracing::warn!(program, "Output still open at deadline, killing process group");
                kill_process_group(pid);
                if let Ok(joined) = time::timeout(KILL_GRACE, &mut readers).await {
                    joined
                } else {
                    abort_readers();
                    return Err(RunError::TimedOut {
                        program: program.to_string(),
                        elapsed: self.timeout,
                    });
                }
            }
        };
        let (stdout_bytes, truncated_stdout) = stdout_res.unwrap_or_else(|_| (Vec::new(), false));
        let (stderr_bytes, truncated_stderr) = stderr_res.unwrap_or_else(|_| (Vec::new(), false));

        tracing::debug!(program, exit_code = ?status.code(), "Process finished");
        Ok(ProcessOutput {
            exit_code: status.code(),
            stdout: String::from_utf8_lossy(&stdout_bytes).into_owned(),
            stderr: String::from_utf8_lossy(&stderr_bytes).into_owned(),
            truncated: truncated_stdout || truncated_stderr,
        })
    }
}

impl ProcessRunner for SystemProcessRunner {
    fn run<'a>(&'a self, command: &'a SystemCommand, cwd: &'a Path) -> RunFut<'a> {
        Box::pin(self.run_command(command, cwd))
    }
}

fn io_error(program: &str, message: &str) -> RunError {
    RunError::Io {
        program: program.to_string(),
        message: message.to_string(),
    }
}

async fn read_optional<R: tokio::io::AsyncRead + Unpin + Send + 'static>(
    reader: Option<R>,
) -> (Vec<u8>, bool) {
    match reader {
        Some(reader) => read_to_end_limited(reader, MAX_OUTPUT_BYTES).await,
        None => (Vec::new(), false),
    }
}

async fn read_to_end_limited<R: tokio::io::AsyncRead + Unpin + Send + 'static>(
    mut reader: R,
    max_bytes: usize,
) -> (Vec<u8>, bool) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    let mut truncated = false;

    loop {
        let n = match reader.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        let remaining = max_bytes.saturating_sub(buf.len());
        let take = remaining.min(n);
        buf.extend_from_slice(&chunk[..take]);
        if take < n {
            // Keep draining so the child never blocks on a full pipe.
            truncated = true;
        }
    }

    (buf, truncated)
}
