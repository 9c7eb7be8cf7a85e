//! "Did you mean" lookup for unrecognised input.

use nebula_utils::similarity_ratio;

/// Minimum similarity a candidate needs to be suggested.
pub const SIMILARITY_CUTOFF: f32 = 0.7;

/// Best match per category for one mistyped token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionResult {
    pub input: String,
    pub command: Option<String>,
    pub directory: Option<String>,
    pub file: Option<String>,
}

impl SuggestionResult {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.command.is_none() && self.directory.is_none() && self.file.is_none()
    }

    /// Matches in command, directory, file order.
    pub fn matches(&self) -> impl Iterator<Item = &str> {
        [&self.command, &self.directory, &self.file]
            .into_iter()
            .filter_map(|m| m.as_deref())
    }

    #[must_use]
    pub fn render(&self) -> String {
        if self.is_empty() {
            return "No suggestions found.".to_string();
        }
        let joined: Vec<&str> = self.matches().collect();
        format!("Did you mean: {}?", joined.join(", "))
    }
}

/// Pick the closest candidate from each set.
#[must_use]
pub fn suggest<'c, 'd, 'f, C, D, F>(
    token: &str,
    commands: C,
    directories: D,
    files: F,
) -> SuggestionResult
where
    C: IntoIterator<Item = &'c str>,
    D: IntoIterator<Item = &'d str>,
    F: IntoIterator<Item = &'f str>,
{
    SuggestionResult {
        input: token.to_string(),
        command: best_match(token, commands).map(str::to_string),
        directory: best_match(token, directories).map(str::to_string),
        file: best_match(token, files).map(str::to_string),
    }
}

/// Highest-ratio candidate at or above [`SIMILARITY_CUTOFF`]. Equal ratios
/// resolve to the lexicographically greatest candidate.
pub fn best_match<'a, I>(token: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    candidates
        .into_iter()
        .map(|candidate| (similarity_ratio(token, candidate), candidate))
        .filter(|(ratio, _)| *ratio >= SIMILARITY_CUTOFF)
        .max_by(|(ra, ca), (rb, cb)| ra.total_cmp(rb).then_with(|| ca.cmp(cb)))
        .map(|(_, candidate)| candidate)
}
