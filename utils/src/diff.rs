//! Unified diff rendering and stats.

use similar::{ChangeTag, TextDiff};

/// Lines of unchanged context kept around each hunk.
const CONTEXT_LINES: usize = 3;

/// Render a line-level unified diff between `old` and `new`.
///
/// Output starts with `---`/`+++` headers carrying the two labels, followed by
/// `@@` hunks with three lines of context. Returns `None` when the inputs are
/// identical.
#[must_use]
pub fn unified_diff(old: &str, new: &str, old_label: &str, new_label: &str) -> Option<String> {
    if old == new {
        return None;
    }

    let diff = TextDiff::from_lines(old, new);
    let rendered = diff
        .unified_diff()
        .context_radius(CONTEXT_LINES)
        .header(old_label, new_label)
        .to_string();

    if rendered.is_empty() {
        None
    } else {
        Some(rendered)
    }
}

/// Added and removed line counts between two texts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub additions: u32,
    pub deletions: u32,
}

/// Compute diff stats (additions and deletions) between old and new content.
#[must_use]
pub fn compute_diff_stats(old: &str, new: &str) -> DiffStats {
    let diff = TextDiff::from_lines(old, new);

    let mut stats = DiffStats::default();
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => stats.additions += 1,
            ChangeTag::Delete => stats.deletions += 1,
            ChangeTag::Equal => {}
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_inputs_have_no_diff() {
        assert_eq!(unified_diff("a\nb\n", "a\nb\n", "x", "y"), None);
        assert_eq!(unified_diff("", "", "x", "y"), None);
    }

    #[test]
    fn changed_line_renders_headers_and_hunk() {
        let out = unified_diff("one\ntwo\nthree\n", "one\n2\nthree\n", "a.txt", "b.txt")
            .expect("inputs differ");
        assert!(out.starts_with("--- a.txt\n+++ b.txt\n"));
        assert!(out.contains("@@"));
        assert!(out.contains("-two\n"));
        assert!(out.contains("+2\n"));
        assert!(out.contains(" one\n"));
    }

    #[test]
    fn distant_changes_split_into_hunks() {
        let old: String = (1..=20).map(|i| format!("line {i}\n")).collect();
        let new = old.replace("line 2\n", "LINE 2\n").replace("line 19\n", "LINE 19\n");
        let out = unified_diff(&old, &new, "old", "new").expect("inputs differ");
        assert_eq!(out.matches("@@ -").count(), 2);
    }

    #[test]
    fn stats_count_lines() {
        let stats = compute_diff_stats("a\nb\nc\n", "a\nc\nd\ne\n");
        assert_eq!(
            stats,
            DiffStats {
                additions: 2,
                deletions: 1
            }
        );
    }
}
