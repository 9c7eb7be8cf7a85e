//! Collaborators the shell talks to outside its own process.
//!
//! Each concern sits behind a trait so the engine can be driven by fakes in
//! tests: [`ProcessRunner`] for child processes, [`Filesystem`] for directory
//! and file access, [`IssueNotifier`] for the community issue webhook and
//! [`PortProbe`] for local port scans. The `Local*`/`System*` types are the
//! real implementations.

mod fs;
mod ports;
mod process;
mod webhook;

use std::future::Future;
use std::io;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::Duration;

use thiserror::Error;

pub use fs::LocalFilesystem;
pub use ports::TcpPortProbe;
pub use process::{ChildGuard, SystemProcessRunner};
pub use webhook::WebhookNotifier;

/// Boxed future returned by [`ProcessRunner::run`].
pub type RunFut<'a> = Pin<Box<dyn Future<Output = Result<ProcessOutput, RunError>> + Send + 'a>>;

/// Boxed future returned by [`IssueNotifier::submit`].
pub type NotifyFut<'a> = Pin<Box<dyn Future<Output = Result<(), NotifyError>> + Send + 'a>>;

/// Boxed future returned by [`PortProbe::open_ports`].
pub type ProbeFut<'a> = Pin<Box<dyn Future<Output = Vec<u16>> + Send + 'a>>;

/// External programs the shell knows how to launch.
///
/// Handlers never build argv themselves; [`SystemCommand::argv`] owns the
/// per-platform mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemCommand {
    TaskList,
    SystemInfo,
    DiskUsage,
    Ping { target: String },
    Ssh { target: String },
    OpenFileManager { dir: PathBuf },
    OpenEditor { dir: PathBuf },
    GitClone { url: String },
}

impl SystemCommand {
    /// Program name and arguments for the current platform.
    #[must_use]
    pub fn argv(&self) -> (&'static str, Vec<String>) {
        match self {
            Self::TaskList => {
                if cfg!(windows) {
                    ("tasklist", Vec::new())
                } else {
                    ("ps", vec!["aux".to_string()])
                }
            }
            Self::SystemInfo => {
                if cfg!(windows) {
                    ("systeminfo", Vec::new())
                } else {
                    ("uname", vec!["-a".to_string()])
                }
            }
            Self::DiskUsage => {
                if cfg!(windows) {
                    (
                        "fsutil",
                        vec!["volume".into(), "diskfree".into(), "C:".into()],
                    )
                } else {
                    ("df", vec!["-k".to_string(), "/".to_string()])
                }
            }
            Self::Ping { target } => {
                if cfg!(windows) {
                    ("ping", vec![target.clone()])
                } else {
                    ("ping", vec!["-c".into(), "4".into(), target.clone()])
                }
            }
            // BatchMode keeps ssh from prompting on the tty the shell owns.
            Self::Ssh { target } => (
                "ssh",
                vec!["-o".into(), "BatchMode=yes".into(), target.clone()],
            ),
            Self::OpenFileManager { dir } => {
                let program = if cfg!(windows) {
                    "explorer"
                } else if cfg!(target_os = "macos") {
                    "open"
                } else {
                    "xdg-open"
                };
                (program, vec![dir.display().to_string()])
            }
            Self::OpenEditor { dir } => ("code", vec![dir.display().to_string()]),
            Self::GitClone { url } => ("git", vec!["clone".into(), url.clone()]),
        }
    }

    /// Short name used in logs and error messages.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::TaskList => "tasklist",
            Self::SystemInfo => "systeminfo",
            Self::DiskUsage => "diskusage",
            Self::Ping { .. } => "ping",
            Self::Ssh { .. } => "ssh",
            Self::OpenFileManager { .. } => "open",
            Self::OpenEditor { .. } => "code",
            Self::GitClone { .. } => "git",
        }
    }

    /// Commands that start a GUI program and do not report output.
    #[must_use]
    pub fn is_launcher(&self) -> bool {
        matches!(self, Self::OpenFileManager { .. } | Self::OpenEditor { .. })
    }

    /// Explorer exits non-zero even after opening the window.
    #[must_use]
    pub fn ignores_exit_status(&self) -> bool {
        cfg!(windows) && matches!(self, Self::OpenFileManager { .. })
    }
}

/// Captured result of a finished child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub truncated: bool,
}

impl ProcessOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("{program} is not installed or not found in PATH")]
    NotFound { program: String },
    #[error("failed to start {program}: {message}")]
    Spawn { program: String, message: String },
    #[error("{program} timed out after {}s", elapsed.as_secs())]
    TimedOut { program: String, elapsed: Duration },
    #[error("{program} failed: {message}")]
    Io { program: String, message: String },
}

impl RunError {
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }
}

/// Runs a [`SystemCommand`] to completion in `cwd`.
///
/// A non-zero exit status is not an error at this level; callers inspect
/// [`ProcessOutput::exit_code`].
pub trait ProcessRunner: Send + Sync {
    fn run<'a>(&'a self, command: &'a SystemCommand, cwd: &'a Path) -> RunFut<'a>;
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: String,
    pub is_dir: bool,
}

/// Files found under a root, in path order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkResult {
    pub files: Vec<PathBuf>,
    pub truncated: bool,
}

pub trait Filesystem: Send + Sync {
    fn is_dir(&self, path: &Path) -> bool;
    fn exists(&self, path: &Path) -> bool;
    /// Immediate children of `path`, sorted by name.
    fn list_dir(&self, path: &Path) -> io::Result<Vec<DirEntryInfo>>;
    /// Regular files below `root` (recursive), at most `limit` of them.
    fn walk_files(&self, root: &Path, limit: usize) -> io::Result<WalkResult>;
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("no issue webhook is configured")]
    NotConfigured,
    #[error("HTTP {status}")]
    Status { status: u16 },
    #[error("{0}")]
    Transport(String),
}

/// Delivers a formatted community issue.
pub trait IssueNotifier: Send + Sync {
    fn submit<'a>(&'a self, content: &'a str) -> NotifyFut<'a>;
}

/// Reports which TCP ports accept connections on the local host.
pub trait PortProbe: Send + Sync {
    /// Open ports within `ports`, ascending.
    fn open_ports(&self, ports: RangeInclusive<u16>) -> ProbeFut<'_>;
}
