#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure match engine translating typed input into word claims.

use falling_words_core::{Command, SessionPhase, WordId, WordView};

/// Normalizes raw input for comparison: surrounding whitespace is trimmed and
/// the text is lowercased.
#[must_use]
pub fn normalize_input(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Finds the earliest spawned word whose text equals `normalized` exactly.
#[must_use]
pub fn find_match(normalized: &str, words: &WordView) -> Option<WordId> {
    if normalized.is_empty() {
        return None;
    }
    words
        .iter()
        .find(|word| word.text == normalized)
        .map(|word| word.id)
}

/// Stateless system that compares the input field against active words.
#[derive(Debug, Default)]
pub struct Matching;

impl Matching {
    /// Creates the match engine.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Inspects the current contents of the input field.
    ///
    /// Emits a single [`Command::ClaimWord`] for the earliest matching word and
    /// returns its identifier. Partial input, input without a match and input
    /// received outside of [`SessionPhase::Playing`] produce nothing.
    pub fn handle_input(
        &self,
        raw: &str,
        phase: SessionPhase,
        words: &WordView,
        out: &mut Vec<Command>,
    ) -> Option<WordId> {
        if phase != SessionPhase::Playing {
            return None;
        }

        let word = find_match(&normalize_input(raw), words)?;
        out.push(Command::ClaimWord { word });
        Some(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_trims_and_lowercases() {
        assert_eq!(normalize_input("  Cat \t"), "cat");
        assert_eq!(normalize_input("ÉCOLE"), "école");
        assert_eq!(normalize_input("   "), "");
    }

    #[test]
    fn empty_input_never_matches() {
        let view = WordView::default();
        assert_eq!(find_match("", &view), None);
    }
}
