#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless game session wiring the world to the pure systems.
//!
//! A [`Session`] owns the authoritative [`World`] together with the spawning,
//! matching and records systems. Every host interaction becomes a command; the
//! session applies it, feeds the resulting events to the systems and keeps
//! pumping until no further commands are produced. Presentation layers learn
//! about changes through a [`SessionObserver`].

use std::{sync::Arc, time::Duration};

use falling_words_core::{
    Command, Event, GameMode, SessionPhase, WordId, WordView, DEFAULT_FALL_DURATION,
};
use falling_words_system_difficulty::DifficultyTable;
use falling_words_system_matching::Matching;
use falling_words_system_records::{PreferenceStore, Preferences, Records};
use falling_words_system_spawning::{Config as SpawningConfig, Spawning};
use falling_words_system_word_bank::WordBank;
use falling_words_world::{self as world, query, World};

/// Seed used when the host does not supply one.
pub const DEFAULT_RNG_SEED: u64 = 0x5eed_f00d_cafe_0001;

/// Runtime tuning for a single session.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// Time a word takes to cross the play area before it is missed.
    pub fall_duration: Duration,
    /// Seed of the word selector's random stream.
    pub rng_seed: u64,
    /// Difficulty tiers consulted by the spawn scheduler.
    pub table: DifficultyTable,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fall_duration: DEFAULT_FALL_DURATION,
            rng_seed: DEFAULT_RNG_SEED,
            table: DifficultyTable::standard(),
        }
    }
}

/// Receives presentation callbacks while a session runs.
///
/// Every method defaults to doing nothing so observers only implement what
/// they render.
pub trait SessionObserver {
    /// A word started falling and will be missed after `fall_duration`.
    fn word_spawned(&mut self, _word: WordId, _text: &str, _fall_duration: Duration) {}

    /// A word left the play area, either claimed or missed.
    fn word_removed(&mut self, _word: WordId) {}

    /// The score or level changed.
    fn score_changed(&mut self, _score: u32, _level: u32) {}

    /// The session ended.
    fn game_over(&mut self) {}

    /// A new Adventure high score was reached.
    fn high_score_changed(&mut self, _high_score: u32) {}
}

impl SessionObserver for () {}

/// One game of Falling Words, from loading to game over.
#[derive(Debug)]
pub struct Session<S> {
    world: World,
    spawning: Spawning,
    matching: Matching,
    records: Records,
    bank: Option<Arc<WordBank>>,
    store: S,
    preferences: Preferences,
}

impl<S: PreferenceStore> Session<S> {
    /// Creates a session in the loading phase.
    ///
    /// The stored preferences seed the high score. When they cannot be read
    /// the session falls back to defaults.
    pub fn new(mode: GameMode, config: SessionConfig, store: S) -> Self {
        let preferences = match store.load() {
            Ok(preferences) => preferences,
            Err(error) => {
                log::warn!("using default preferences: {error}");
                Preferences::default()
            }
        };

        let mut world = World::new(mode);
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::ConfigureFallDuration {
                fall_duration: config.fall_duration,
            },
            &mut events,
        );

        let spawning =
            Spawning::new(SpawningConfig::new(config.rng_seed).with_table(config.table));

        Self {
            world,
            spawning,
            matching: Matching::new(),
            records: Records::new(mode, preferences.high_score),
            bank: None,
            store,
            preferences,
        }
    }

    /// Supplies the word bank and starts play.
    ///
    /// Only the first call has an effect.
    pub fn finish_loading(&mut self, bank: Arc<WordBank>, observer: &mut dyn SessionObserver) {
        if self.bank.is_some() {
            return;
        }
        self.bank = Some(bank);
        self.submit(Command::BeginPlay, observer);
    }

    /// Advances the session clock, firing every timer that falls due.
    pub fn advance(&mut self, dt: Duration, observer: &mut dyn SessionObserver) {
        self.submit(Command::Tick { dt }, observer);
    }

    /// Offers the current input field contents to the match engine.
    ///
    /// Returns `true` when a word was claimed and the field should be cleared.
    pub fn type_input(&mut self, raw: &str, observer: &mut dyn SessionObserver) -> bool {
        let mut commands = Vec::new();
        let claimed = self.matching.handle_input(
            raw,
            query::phase(&self.world),
            &query::word_view(&self.world),
            &mut commands,
        );
        for command in commands {
            self.submit(command, observer);
        }
        claimed.is_some()
    }

    /// Mode the session was created with.
    #[must_use]
    pub fn mode(&self) -> GameMode {
        query::mode(&self.world)
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        query::phase(&self.world)
    }

    /// Whether the session reached game over.
    #[must_use]
    pub fn is_over(&self) -> bool {
        query::is_over(&self.world)
    }

    /// Words claimed so far.
    #[must_use]
    pub fn score(&self) -> u32 {
        query::score(&self.world)
    }

    /// Level the session currently plays at.
    #[must_use]
    pub fn level(&self) -> u32 {
        query::level(&self.world)
    }

    /// Best Adventure score, including the running session.
    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.records.high_score()
    }

    /// Simulated time elapsed since play started.
    #[must_use]
    pub fn clock(&self) -> Duration {
        query::clock(&self.world)
    }

    /// Words currently falling, ordered by spawn.
    #[must_use]
    pub fn words(&self) -> WordView {
        query::word_view(&self.world)
    }

    /// Preferences as last read or written by this session.
    #[must_use]
    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    /// Backing preference store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Backing preference store, for writes made outside the session.
    #[must_use]
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Discards the session, handing back its preference store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    fn submit(&mut self, command: Command, observer: &mut dyn SessionObserver) {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);

        while !events.is_empty() {
            self.dispatch(&events, observer);

            let mut commands = Vec::new();
            if let Some(bank) = &self.bank {
                self.spawning
                    .handle(&events, query::level(&self.world), bank, &mut commands);
            }

            events.clear();
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }
    }

    fn dispatch(&mut self, events: &[Event], observer: &mut dyn SessionObserver) {
        for event in events {
            match event {
                Event::PlayStarted { mode, level } => {
                    log::info!("session started: {mode:?} at level {level}");
                }
                Event::TimeAdvanced { .. } => {}
                Event::WordSpawned {
                    word,
                    text,
                    spawned_at,
                    miss_deadline,
                } => {
                    log::debug!("spawned {text:?} as {} at {spawned_at:?}", word.get());
                    observer.word_spawned(*word, text, miss_deadline.saturating_sub(*spawned_at));
                }
                Event::WordCleared { word, text } => {
                    log::debug!("claimed {text:?}");
                    observer.word_removed(*word);
                }
                Event::WordMissed { word, text } => {
                    log::debug!("missed {text:?}");
                    observer.word_removed(*word);
                }
                Event::ScoreChanged { score, level } => observer.score_changed(*score, *level),
                Event::GameOver { score, level } => {
                    log::info!("game over with score {score} at level {level}");
                    observer.game_over();
                }
            }
        }

        if let Some(high_score) = self.records.handle(events) {
            self.persist_high_score(high_score);
            observer.high_score_changed(high_score);
        }
    }

    fn persist_high_score(&mut self, high_score: u32) {
        let mut preferences = match self.store.load() {
            Ok(preferences) => preferences,
            Err(error) => {
                log::warn!("re-reading preferences failed: {error}");
                self.preferences
            }
        };
        preferences.high_score = preferences.high_score.max(high_score);

        match self.store.save(&preferences) {
            Ok(()) => self.preferences = preferences,
            Err(error) => log::warn!("failed to persist high score {high_score}: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use falling_words_system_records::MemoryStore;

    fn bank() -> Arc<WordBank> {
        Arc::new(WordBank::parse("cat\ndog\ntree\napple\nbanana\n"))
    }

    #[test]
    fn session_waits_for_the_word_bank() {
        let mut session = Session::new(
            GameMode::Adventure,
            SessionConfig::default(),
            MemoryStore::default(),
        );

        session.advance(Duration::from_secs(30), &mut ());
        assert_eq!(session.phase(), SessionPhase::Loading);
        assert!(session.words().is_empty());

        session.finish_loading(bank(), &mut ());
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert_eq!(session.words().len(), 1);
    }

    #[test]
    fn second_bank_is_ignored() {
        let mut session = Session::new(
            GameMode::FixedLevel(4),
            SessionConfig::default(),
            MemoryStore::default(),
        );
        session.finish_loading(bank(), &mut ());
        session.finish_loading(bank(), &mut ());

        assert_eq!(session.words().len(), 1);
        assert_eq!(session.level(), 4);
    }

    #[test]
    fn configured_fall_duration_sets_miss_deadlines() {
        let config = SessionConfig {
            fall_duration: Duration::from_millis(1_500),
            ..SessionConfig::default()
        };
        let mut session = Session::new(GameMode::Adventure, config, MemoryStore::default());
        session.finish_loading(bank(), &mut ());

        let words = session.words().into_vec();
        assert_eq!(words[0].miss_deadline, Duration::from_millis(1_500));

        session.advance(Duration::from_millis(1_500), &mut ());
        assert!(session.is_over());
    }
}
