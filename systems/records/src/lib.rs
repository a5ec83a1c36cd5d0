#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! High-score bookkeeping and persisted player preferences.
//!
//! Preferences are a tiny key-value document holding the best Adventure score
//! and the colour theme. The document is stored as TOML through a
//! [`PreferenceStore`]; [`Records`] watches score events and reports when a new
//! high score must be written.

mod store;

pub use store::{FileStore, MemoryStore, PreferenceStore, StoreError};

use falling_words_core::{Event, GameMode};
use serde::{Deserialize, Serialize};

/// Colour theme of the presentation layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    /// Light text on a dark background.
    #[default]
    Dark,
    /// Dark text on a light background.
    Light,
}

impl Theme {
    /// Parses a stored theme key. Only `"light"` selects the light theme.
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        if key == "light" {
            Self::Light
        } else {
            Self::Dark
        }
    }

    /// Key written to the preference document.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

/// Values persisted between game sessions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Preferences {
    /// Best score reached in Adventure mode.
    pub high_score: u32,
    /// Selected colour theme.
    pub theme: Theme,
}

impl Preferences {
    /// Decodes preferences from a TOML document.
    ///
    /// Missing keys fall back to their defaults and unknown theme keys select
    /// the dark theme.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        let document: PreferencesDocument = toml::from_str(text)?;
        Ok(Self {
            high_score: document.high_score,
            theme: document
                .theme
                .as_deref()
                .map_or(Theme::Dark, Theme::from_key),
        })
    }

    /// Encodes preferences as a TOML document.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        let document = PreferencesDocument {
            high_score: self.high_score,
            theme: Some(self.theme.key().to_owned()),
        };
        toml::to_string(&document)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PreferencesDocument {
    #[serde(default)]
    high_score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    theme: Option<String>,
}

/// Tracks the best score of a session's mode.
#[derive(Debug)]
pub struct Records {
    mode: GameMode,
    high_score: u32,
}

impl Records {
    /// Creates the bookkeeping for a session, seeded with the stored best.
    #[must_use]
    pub fn new(mode: GameMode, stored_high_score: u32) -> Self {
        Self {
            mode,
            high_score: stored_high_score,
        }
    }

    /// Best score known so far.
    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Consumes score events and returns the new high score to persist, if any.
    ///
    /// Only Adventure sessions ever produce a value.
    pub fn handle(&mut self, events: &[Event]) -> Option<u32> {
        if !self.mode.tracks_high_score() {
            return None;
        }

        let mut updated = None;
        for event in events {
            if let Event::ScoreChanged { score, .. } = event {
                if *score > self.high_score {
                    self.high_score = *score;
                    updated = Some(*score);
                }
            }
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_keys_default_to_dark() {
        assert_eq!(Theme::from_key("light"), Theme::Light);
        assert_eq!(Theme::from_key("dark"), Theme::Dark);
        assert_eq!(Theme::from_key("Light"), Theme::Dark);
        assert_eq!(Theme::from_key(""), Theme::Dark);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }

    #[test]
    fn preferences_decode_missing_keys_as_defaults() {
        let preferences = Preferences::from_toml("").expect("empty document is valid");
        assert_eq!(preferences, Preferences::default());

        let preferences =
            Preferences::from_toml("theme = \"light\"\n").expect("theme-only document is valid");
        assert_eq!(preferences.high_score, 0);
        assert_eq!(preferences.theme, Theme::Light);
    }

    #[test]
    fn preferences_survive_encoding() {
        let preferences = Preferences {
            high_score: 57,
            theme: Theme::Light,
        };
        let text = preferences.to_toml().expect("encode");

        assert!(text.contains("high_score = 57"));
        assert_eq!(Preferences::from_toml(&text).expect("decode"), preferences);
    }
}
