//! Working directory and per-session counters.

use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    working_dir: PathBuf,
    home_dir: PathBuf,
    issue_counter: u64,
}

impl SessionState {
    /// `working_dir` must already exist; callers pick it with
    /// [`default_start_dir`] or a validated config override.
    #[must_use]
    pub fn new(home_dir: PathBuf, working_dir: PathBuf) -> Self {
        Self {
            working_dir,
            home_dir,
            issue_counter: 0,
        }
    }

    #[must_use]
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    #[must_use]
    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    #[must_use]
    pub fn issue_counter(&self) -> u64 {
        self.issue_counter
    }

    /// Number the next submitted issue will carry.
    #[must_use]
    pub fn next_issue_number(&self) -> u64 {
        self.issue_counter + 1
    }

    /// Record a delivered issue.
    pub fn commit_issue(&mut self) -> u64 {
        self.issue_counter += 1;
        self.issue_counter
    }

    /// Resolve a user-supplied path against the session.
    ///
    /// `~` and `~/...` expand to the home directory, rooted paths are taken
    /// as-is, anything else is joined to the working directory. The result is
    /// normalised lexically.
    #[must_use]
    pub fn resolve(&self, raw: &str) -> PathBuf {
        let joined = if raw == "~" {
            self.home_dir.clone()
        } else if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
            self.home_dir.join(rest)
        } else {
            let path = Path::new(raw);
            if path.has_root() {
                path.to_path_buf()
            } else {
                self.working_dir.join(path)
            }
        };
        normalize_lexically(&joined)
    }

    /// Only called with a path that was checked to be an existing directory.
    pub(crate) fn set_working_dir(&mut self, dir: PathBuf) {
        tracing::debug!(dir = %dir.display(), "Working directory changed");
        self.working_dir = dir;
    }

    pub(crate) fn go_home(&mut self) {
        let home = self.home_dir.clone();
        self.set_working_dir(home);
    }
}

/// Start directory when the config does not name one: Downloads, then home,
/// then the process working directory.
#[must_use]
pub fn default_start_dir() -> PathBuf {
    dirs::download_dir()
        .filter(|dir| dir.is_dir())
        .or_else(|| dirs::home_dir().filter(|dir| dir.is_dir()))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Drop `.` components and pop on `..` without touching the filesystem.
/// `..` at the root stays at the root.
#[must_use]
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                let popped_normal = matches!(out.components().next_back(), Some(Component::Normal(_)));
                if popped_normal {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SessionState {
        SessionState::new(PathBuf::from("/home/me"), PathBuf::from("/home/me/Downloads"))
    }

    #[cfg(unix)]
    #[test]
    fn resolve_relative_absolute_and_home() {
        let s = session();
        assert_eq!(s.resolve("music"), PathBuf::from("/home/me/Downloads/music"));
        assert_eq!(s.resolve("/tmp"), PathBuf::from("/tmp"));
        assert_eq!(s.resolve("~"), PathBuf::from("/home/me"));
        assert_eq!(s.resolve("~/src"), PathBuf::from("/home/me/src"));
    }

    #[cfg(unix)]
    #[test]
    fn resolve_normalizes_dots() {
        let s = session();
        assert_eq!(s.resolve(".."), PathBuf::from("/home/me"));
        assert_eq!(s.resolve("./a/../b"), PathBuf::from("/home/me/Downloads/b"));
        assert_eq!(s.resolve("/../.."), PathBuf::from("/"));
    }

    #[test]
    fn normalize_relative_keeps_leading_parent() {
        assert_eq!(normalize_lexically(Path::new("../a/./b/..")), PathBuf::from("../a"));
        assert_eq!(normalize_lexically(Path::new("a/..")), PathBuf::new());
    }

    #[test]
    fn issue_counter_commits_once_per_success() {
        let mut s = session();
        assert_eq!(s.next_issue_number(), 1);
        assert_eq!(s.next_issue_number(), 1);
        assert_eq!(s.commit_issue(), 1);
        assert_eq!(s.next_issue_number(), 2);
        assert_eq!(s.issue_counter(), 1);
    }

    #[test]
    fn go_home_resets_working_dir() {
        let mut s = session();
        s.set_working_dir(PathBuf::from("/srv"));
        s.go_home();
        assert_eq!(s.working_dir(), Path::new("/home/me"));
    }
}
