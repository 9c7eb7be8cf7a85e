//! Similarity scoring for "did you mean" lookups.

use similar::TextDiff;

/// Character-level similarity in `0.0..=1.0`, computed as `2 * M / T` where `M`
/// is the number of matched characters and `T` the combined length.
///
/// Two empty strings are a perfect match.
#[must_use]
pub fn similarity_ratio(a: &str, b: &str) -> f32 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    TextDiff::from_chars(a, b).ratio()
}
