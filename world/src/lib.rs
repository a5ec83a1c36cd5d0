#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Falling Words.
//!
//! The world owns the score, the level, the active falling words and the
//! session phase. It is mutated exclusively through [`apply`], which guards
//! every command against the current phase so that stale timer commands and
//! late input become no-ops once the game is over.

use std::time::Duration;

use falling_words_core::{
    Command, Event, GameMode, SessionPhase, WordId, DEFAULT_FALL_DURATION,
};
use falling_words_system_difficulty::calculate_level;

/// Word currently falling down the play area.
#[derive(Clone, Debug, PartialEq, Eq)]
struct FallingWord {
    id: WordId,
    text: String,
    spawned_at: Duration,
    miss_deadline: Duration,
}

/// Represents the authoritative state of a single game session.
#[derive(Debug)]
pub struct World {
    mode: GameMode,
    phase: SessionPhase,
    score: u32,
    level: u32,
    clock: Duration,
    fall_duration: Duration,
    words: Vec<FallingWord>,
    next_word_id: u64,
}

impl World {
    /// Creates a session world in the loading phase.
    #[must_use]
    pub fn new(mode: GameMode) -> Self {
        Self {
            mode,
            phase: SessionPhase::Loading,
            score: 0,
            level: mode.initial_level(),
            clock: Duration::ZERO,
            fall_duration: DEFAULT_FALL_DURATION,
            words: Vec::new(),
            next_word_id: 0,
        }
    }

    fn is_playing(&self) -> bool {
        self.phase == SessionPhase::Playing
    }

    fn allocate_word_id(&mut self) -> WordId {
        let id = WordId::new(self.next_word_id);
        self.next_word_id = self.next_word_id.saturating_add(1);
        id
    }

    fn take_word(&mut self, word: WordId) -> Option<FallingWord> {
        let index = self.words.iter().position(|candidate| candidate.id == word)?;
        Some(self.words.remove(index))
    }

    fn level_for_score(&self) -> u32 {
        match self.mode {
            GameMode::Adventure => calculate_level(self.score),
            GameMode::FixedLevel(level) => level,
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureFallDuration { fall_duration } => {
            world.fall_duration = fall_duration;
        }
        Command::BeginPlay => {
            if world.phase != SessionPhase::Loading {
                return;
            }
            world.phase = SessionPhase::Playing;
            out_events.push(Event::PlayStarted {
                mode: world.mode,
                level: world.level,
            });
        }
        Command::Tick { dt } => {
            if !world.is_playing() {
                return;
            }
            world.clock = world.clock.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::SpawnWord { text, spawned_at } => {
            if !world.is_playing() {
                return;
            }
            let id = world.allocate_word_id();
            let miss_deadline = spawned_at.saturating_add(world.fall_duration);
            world.words.push(FallingWord {
                id,
                text: text.clone(),
                spawned_at,
                miss_deadline,
            });
            out_events.push(Event::WordSpawned {
                word: id,
                text,
                spawned_at,
                miss_deadline,
            });
        }
        Command::ClaimWord { word } => {
            if !world.is_playing() {
                return;
            }
            let Some(claimed) = world.take_word(word) else {
                return;
            };
            world.score = world.score.saturating_add(1);
            world.level = world.level_for_score();
            out_events.push(Event::WordCleared {
                word: claimed.id,
                text: claimed.text,
            });
            out_events.push(Event::ScoreChanged {
                score: world.score,
                level: world.level,
            });
        }
        Command::ExpireWord { word } => {
            if !world.is_playing() {
                return;
            }
            let Some(missed) = world.take_word(word) else {
                return;
            };
            world.phase = SessionPhase::GameOver;
            out_events.push(Event::WordMissed {
                word: missed.id,
                text: missed.text,
            });
            out_events.push(Event::GameOver {
                score: world.score,
                level: world.level,
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use falling_words_core::{FallingWordSnapshot, GameMode, SessionPhase, WordView};

    /// Mode the session was created with.
    #[must_use]
    pub fn mode(world: &World) -> GameMode {
        world.mode
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(world: &World) -> SessionPhase {
        world.phase
    }

    /// Reports whether the session reached its terminal phase.
    #[must_use]
    pub fn is_over(world: &World) -> bool {
        world.phase == SessionPhase::GameOver
    }

    /// Number of words typed correctly so far.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Level driving the current difficulty tier.
    #[must_use]
    pub fn level(world: &World) -> u32 {
        world.level
    }

    /// Simulated time elapsed while playing.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Time a newly spawned word takes to reach the bottom.
    #[must_use]
    pub fn fall_duration(world: &World) -> Duration {
        world.fall_duration
    }

    /// Captures a read-only view of the words currently falling.
    #[must_use]
    pub fn word_view(world: &World) -> WordView {
        WordView::from_snapshots(
            world
                .words
                .iter()
                .map(|word| FallingWordSnapshot {
                    id: word.id,
                    text: word.text.clone(),
                    spawned_at: word.spawned_at,
                    miss_deadline: word.miss_deadline,
                })
                .collect(),
        )
    }
}
