//! Recall of previously submitted lines.

/// Maximum number of lines kept.
const MAX_HISTORY: usize = 100;

/// Submitted lines with Up/Down navigation.
///
/// The first Up stashes the line being edited and shows the newest entry;
/// further Ups walk back. Down walks forward and, past the newest entry,
/// restores the stash. Navigation resets on every push.
#[derive(Debug, Default, Clone)]
pub struct InputHistory {
    entries: Vec<String>,
    index: Option<usize>,
    stash: Option<String>,
}

impl InputHistory {
    /// Blank lines and repeats of the newest entry are not recorded.
    pub fn push(&mut self, line: String) {
        self.reset_navigation();
        if line.trim().is_empty() {
            return;
        }
        if self.entries.last().is_some_and(|last| last == &line) {
            return;
        }
        self.entries.push(line);
        if self.entries.len() > MAX_HISTORY {
            self.entries.remove(0);
        }
    }

    pub fn navigate_up(&mut self, current: &str) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        match self.index {
            None => {
                self.stash = Some(current.to_owned());
                self.index = Some(self.entries.len() - 1);
                self.entries.last().map(String::as_str)
            }
            Some(0) => None,
            Some(idx) => {
                self.index = Some(idx - 1);
                self.entries.get(idx - 1).map(String::as_str)
            }
        }
    }

    /// Returns `None` when not navigating.
    pub fn navigate_down(&mut self) -> Option<String> {
        let idx = self.index?;
        if idx + 1 >= self.entries.len() {
            self.index = None;
            return Some(self.stash.take().unwrap_or_default());
        }
        self.index = Some(idx + 1);
        self.entries.get(idx + 1).cloned()
    }

    pub fn reset_navigation(&mut self) {
        self.index = None;
        self.stash = None;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
