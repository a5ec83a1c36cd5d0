#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Falling Words engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative session world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems and presentation layers to react to deterministically.

use std::time::Duration;

/// Title shown on the splash screen and used for the window.
pub const GAME_TITLE: &str = "Falling Words";

/// Time a word needs to travel from the top of the play area to the bottom.
///
/// The fall duration is a tunable constant and is never derived from the
/// active difficulty tier.
pub const DEFAULT_FALL_DURATION: Duration = Duration::from_millis(8_000);

/// Number of levels offered by the level select screen (levels `1..=30`).
pub const LEVEL_SELECT_COUNT: u32 = 30;

/// Word lengths addressed by the four buckets of [`LengthWeights`], in order.
pub const WORD_LENGTHS: [usize; 4] = [3, 4, 5, 6];

/// Describes how a session derives its difficulty level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameMode {
    /// Level grows with the score and the high score is persisted.
    Adventure,
    /// Level stays fixed for the whole session.
    FixedLevel(u32),
}

impl GameMode {
    /// Level the session starts at.
    #[must_use]
    pub const fn initial_level(self) -> u32 {
        match self {
            Self::Adventure => 0,
            Self::FixedLevel(level) => level,
        }
    }

    /// Reports whether the mode records high scores.
    #[must_use]
    pub const fn tracks_high_score(self) -> bool {
        matches!(self, Self::Adventure)
    }
}

/// Lifecycle of a single game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// Waiting for the word bank; no input is accepted.
    Loading,
    /// Words spawn and typed input is matched.
    Playing,
    /// A word reached the bottom. Terminal.
    GameOver,
}

/// Unique identifier assigned to a falling word.
///
/// Identifiers are allocated in creation order, so a lower identifier always
/// belongs to an earlier spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WordId(u64);

impl WordId {
    /// Creates a new word identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Updates the time a spawned word takes to reach the bottom.
    ConfigureFallDuration {
        /// Travel time applied to words spawned after this command.
        fall_duration: Duration,
    },
    /// Ends the loading phase once the word bank is available.
    BeginPlay,
    /// Advances the session clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a new word starts falling.
    SpawnWord {
        /// Text the player has to type.
        text: String,
        /// Session clock reading at which the word appeared.
        spawned_at: Duration,
    },
    /// Requests that an active word is removed because the player typed it.
    ClaimWord {
        /// Identifier of the word that was typed.
        word: WordId,
    },
    /// Requests that an active word is removed because it reached the bottom.
    ExpireWord {
        /// Identifier of the word whose miss deadline elapsed.
        word: WordId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that the session left the loading phase.
    PlayStarted {
        /// Mode the session runs in.
        mode: GameMode,
        /// Level active when play began.
        level: u32,
    },
    /// Indicates that the session clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a word started falling.
    WordSpawned {
        /// Identifier assigned to the word by the world.
        word: WordId,
        /// Text the player has to type.
        text: String,
        /// Session clock reading at which the word appeared.
        spawned_at: Duration,
        /// Session clock reading at which the word reaches the bottom.
        miss_deadline: Duration,
    },
    /// Confirms that a word was typed correctly and removed.
    WordCleared {
        /// Identifier of the removed word.
        word: WordId,
        /// Text of the removed word.
        text: String,
    },
    /// Reports that a word reached the bottom before being typed.
    WordMissed {
        /// Identifier of the removed word.
        word: WordId,
        /// Text of the removed word.
        text: String,
    },
    /// Reports the score and level after a successful claim.
    ScoreChanged {
        /// Score after the claim.
        score: u32,
        /// Level after the claim.
        level: u32,
    },
    /// Announces the terminal transition of the session.
    GameOver {
        /// Final score.
        score: u32,
        /// Level reached.
        level: u32,
    },
}

/// Relative weights for spawning words of each length in [`WORD_LENGTHS`].
///
/// Weights are not required to sum to one; samplers treat them as a
/// cumulative distribution and fall back to the shortest length when the
/// accumulated weight never exceeds the random draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LengthWeights([f64; 4]);

impl LengthWeights {
    /// Creates weights for lengths 3, 4, 5 and 6 respectively.
    #[must_use]
    pub const fn new(weights: [f64; 4]) -> Self {
        Self(weights)
    }

    /// Iterates `(length, weight)` pairs in ascending length order.
    pub fn buckets(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        WORD_LENGTHS.iter().copied().zip(self.0.iter().copied())
    }
}

/// Spawn cadence and word-length mix for a single difficulty level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultyTier {
    spawn_delay: Duration,
    length_weights: LengthWeights,
}

impl DifficultyTier {
    /// Creates a tier from its spawn delay and length weights.
    #[must_use]
    pub const fn new(spawn_delay: Duration, length_weights: LengthWeights) -> Self {
        Self {
            spawn_delay,
            length_weights,
        }
    }

    /// Delay between two consecutive spawns.
    #[must_use]
    pub const fn spawn_delay(&self) -> Duration {
        self.spawn_delay
    }

    /// Distribution used to pick the length of the next word.
    #[must_use]
    pub const fn length_weights(&self) -> LengthWeights {
        self.length_weights
    }
}

/// Immutable representation of a single falling word used for queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FallingWordSnapshot {
    /// Unique identifier assigned to the word.
    pub id: WordId,
    /// Text the player has to type.
    pub text: String,
    /// Session clock reading at which the word appeared.
    pub spawned_at: Duration,
    /// Session clock reading at which the word reaches the bottom.
    pub miss_deadline: Duration,
}

impl FallingWordSnapshot {
    /// Fraction of the fall completed at `clock`, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn progress(&self, clock: Duration) -> f32 {
        let total = self.miss_deadline.saturating_sub(self.spawned_at);
        if total.is_zero() {
            return 1.0;
        }
        let elapsed = clock.saturating_sub(self.spawned_at);
        (elapsed.as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0)
    }
}

/// Read-only snapshot describing every active word.
#[derive(Clone, Debug, Default)]
pub struct WordView {
    snapshots: Vec<FallingWordSnapshot>,
}

impl WordView {
    /// Creates a new word view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<FallingWordSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured words, earliest spawn first.
    pub fn iter(&self) -> impl Iterator<Item = &FallingWordSnapshot> {
        self.snapshots.iter()
    }

    /// Number of active words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no word is falling.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<FallingWordSnapshot> {
        self.snapshots
    }
}
