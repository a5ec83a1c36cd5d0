#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Word bank loading and weighted word selection.
//!
//! The bank is read once from a newline-delimited list and stays immutable for
//! the rest of the session. Selection happens in two steps: a word length is
//! sampled from the active tier's [`LengthWeights`], then a word of exactly
//! that length is drawn uniformly from the bank.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use falling_words_core::{LengthWeights, WORD_LENGTHS};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Word handed out when the bank holds no word of the requested length.
pub const MISSING_WORD_SENTINEL: &str = "???";

/// Length chosen when the accumulated weights never exceed the random draw.
pub const FALLBACK_LENGTH: usize = WORD_LENGTHS[0];

/// Reasons a word bank could not be produced.
#[derive(Debug, Error)]
pub enum WordBankError {
    /// The word list could not be read.
    #[error("failed to read word list `{}`", .path.display())]
    Unreadable {
        /// Location of the word list.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The word list was readable but held no usable word.
    #[error("word list `{}` contains no words", .path.display())]
    Empty {
        /// Location of the word list.
        path: PathBuf,
    },
}

/// Ordered, immutable collection of non-empty words.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordBank {
    words: Vec<String>,
}

impl WordBank {
    /// Builds a bank from newline-delimited text.
    ///
    /// Every line is trimmed; lines that end up empty are dropped.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self::from_words(text.lines())
    }

    /// Builds a bank from individual entries, trimming and dropping blanks.
    #[must_use]
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|word| word.as_ref().trim().to_owned())
            .filter(|word| !word.is_empty())
            .collect();
        Self { words }
    }

    /// Reads a bank from a word list on disk.
    ///
    /// A list without a single usable word is reported as
    /// [`WordBankError::Empty`] so callers never start a session that can only
    /// spawn sentinels.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, WordBankError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| WordBankError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let bank = Self::parse(&text);
        if bank.is_empty() {
            return Err(WordBankError::Empty {
                path: path.to_path_buf(),
            });
        }

        log::info!("loaded {} words from {}", bank.len(), path.display());
        Ok(bank)
    }

    /// Number of words in the bank.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Reports whether the bank holds no word at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterates the words in load order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// Iterates the words whose length, counted in characters, equals `length`.
    pub fn words_of_length(&self, length: usize) -> impl Iterator<Item = &str> {
        self.iter().filter(move |word| word.chars().count() == length)
    }
}

/// Maps a uniform draw in `[0, 1)` onto a word length.
///
/// Weights are accumulated in length order and the first length whose running
/// total is strictly greater than `draw` wins. Falls back to
/// [`FALLBACK_LENGTH`] when no bucket qualifies.
#[must_use]
pub fn length_for_draw(weights: LengthWeights, draw: f64) -> usize {
    let mut accumulated = 0.0;
    for (length, weight) in weights.buckets() {
        accumulated += weight;
        if draw < accumulated {
            return length;
        }
    }
    FALLBACK_LENGTH
}

/// Seeded sampler that picks word lengths and words.
#[derive(Clone, Debug)]
pub struct WordSelector {
    rng: ChaCha8Rng,
}

impl WordSelector {
    /// Creates a selector whose draws are fully determined by `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Samples a word length from `weights`.
    pub fn select_length(&mut self, weights: LengthWeights) -> usize {
        let draw: f64 = self.rng.gen();
        length_for_draw(weights, draw)
    }

    /// Draws a word of exactly `length` characters uniformly from `bank`.
    ///
    /// Returns [`MISSING_WORD_SENTINEL`] when the bank has no such word.
    pub fn select_word(&mut self, bank: &WordBank, length: usize) -> String {
        let candidates = bank.words_of_length(length).count();
        if candidates == 0 {
            log::debug!("no word of length {length} in bank, spawning sentinel");
            return MISSING_WORD_SENTINEL.to_owned();
        }

        let index = self.rng.gen_range(0..candidates);
        bank.words_of_length(length)
            .nth(index)
            .map_or_else(|| MISSING_WORD_SENTINEL.to_owned(), str::to_owned)
    }

    /// Samples a length from `weights`, then a word of that length.
    pub fn select(&mut self, bank: &WordBank, weights: LengthWeights) -> String {
        let length = self.select_length(weights);
        self.select_word(bank, length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_draw_belongs_to_the_later_bucket() {
        let weights = LengthWeights::new([0.5, 0.5, 0.0, 0.0]);

        assert_eq!(length_for_draw(weights, 0.4999), 3);
        assert_eq!(length_for_draw(weights, 0.5), 4);
    }

    #[test]
    fn zero_weight_bucket_never_wins_even_at_zero_draw() {
        let weights = LengthWeights::new([0.0, 1.0, 0.0, 0.0]);

        assert_eq!(length_for_draw(weights, 0.0), 4);
    }

    #[test]
    fn under_normalised_weights_fall_back_to_shortest_length() {
        let weights = LengthWeights::new([0.2, 0.2, 0.2, 0.2]);

        assert_eq!(length_for_draw(weights, 0.79), 6);
        assert_eq!(length_for_draw(weights, 0.9), FALLBACK_LENGTH);
    }
}
