//! Append-only record of identities that have already been greeted.
//!
//! One identity per line. The file is only ever appended to; the shell uses it
//! to decide whether the first-run countdown plays.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct KnownIdentities {
    path: PathBuf,
}

impl KnownIdentities {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `identity` is already recorded. A missing file means nobody is.
    pub fn contains(&self, identity: &str) -> io::Result<bool> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content.lines().any(|line| line.trim() == identity)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Append `identity`, creating the file and its parent directory if needed.
    pub fn record(&self, identity: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{identity}")
    }

    /// Returns `true` when the identity was already known. Unknown identities
    /// are recorded before returning `false`.
    pub fn check_and_record(&self, identity: &str) -> io::Result<bool> {
        if self.contains(identity)? {
            return Ok(true);
        }
        self.record(identity)?;
        tracing::info!(path = %self.path.display(), "Recorded first-run identity");
        Ok(false)
    }
}
