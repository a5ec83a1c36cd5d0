//! Persistence backends for [`Preferences`].

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::Preferences;

/// Failures raised while reading or writing preferences.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The preference file exists but could not be read.
    #[error("failed to read preferences `{}`", .path.display())]
    Read {
        /// Location of the preference file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The preference file could not be written.
    #[error("failed to write preferences `{}`", .path.display())]
    Write {
        /// Location of the preference file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The preference file is not a valid document.
    #[error("preferences `{}` are malformed", .path.display())]
    Parse {
        /// Location of the preference file.
        path: PathBuf,
        /// Underlying decoding failure.
        #[source]
        source: toml::de::Error,
    },
    /// The preferences could not be encoded.
    #[error("failed to encode preferences")]
    Encode(#[from] toml::ser::Error),
}

/// Key-value storage surviving across sessions.
pub trait PreferenceStore {
    /// Reads the stored preferences, or defaults when nothing was stored yet.
    fn load(&self) -> Result<Preferences, StoreError>;

    /// Replaces the stored preferences.
    fn save(&mut self, preferences: &Preferences) -> Result<(), StoreError>;
}

/// Store keeping preferences in memory, used by headless sessions and tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    preferences: Preferences,
    saves: usize,
}

impl MemoryStore {
    /// Creates a store pre-populated with `preferences`.
    #[must_use]
    pub fn with_preferences(preferences: Preferences) -> Self {
        Self {
            preferences,
            saves: 0,
        }
    }

    /// Currently stored preferences.
    #[must_use]
    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    /// Number of writes performed so far.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self) -> Result<Preferences, StoreError> {
        Ok(self.preferences)
    }

    fn save(&mut self, preferences: &Preferences) -> Result<(), StoreError> {
        self.preferences = *preferences;
        self.saves += 1;
        Ok(())
    }
}

/// Store persisting preferences as a TOML file.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store backed by the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FileStore {
    fn load(&self) -> Result<Preferences, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                log::debug!(
                    "no preferences at {}, using defaults",
                    self.path.display()
                );
                return Ok(Preferences::default());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        Preferences::from_toml(&text).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&mut self, preferences: &Preferences) -> Result<(), StoreError> {
        let text = preferences.to_toml()?;
        fs::write(&self.path, text).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}
