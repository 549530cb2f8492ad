//! Character-level similarity between heading titles.

use similar::{Algorithm, ChangeTag, TextDiff};

/// Similarity of two strings as `2 * matches / (len_a + len_b)`, compared case-insensitively.
///
/// Matches are the characters a Myers diff keeps unchanged, which is the longest common
/// subsequence. Returns a value in `[0, 1]`; two empty strings are identical.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn ratio(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 1.0;
    }
    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_chars(&a, &b);
    let matches = diff
        .iter_all_changes()
        .filter(|change| change.tag() == ChangeTag::Equal)
        .count();
    (2 * matches) as f64 / total as f64
}

#[cfg(test)]
#[path = "tests/similarity.rs"]
mod tests;
