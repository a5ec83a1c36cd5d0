#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawn scheduler emitting word spawn and miss commands.
//!
//! The scheduler keeps its own timer queue driven by [`Event::TimeAdvanced`].
//! Two kinds of timers live in the queue: the self-chaining spawn timer, whose
//! next delay is resolved from the difficulty tier active at the moment each
//! spawn fires, and one miss timer per falling word. Timers due within a single
//! clock advance fire in due-time order, ties going to the timer armed first.
//! A fired spawn ends the batch: the remaining due timers wait until the
//! spawned word's miss timer has been armed from its [`Event::WordSpawned`].

use std::{collections::BTreeMap, time::Duration};

use falling_words_core::{Command, Event, WordId};
use falling_words_system_difficulty::DifficultyTable;
use falling_words_system_word_bank::{WordBank, WordSelector};

/// Smallest delay between two spawns; a zero delay would re-fire forever.
const MIN_SPAWN_DELAY: Duration = Duration::from_millis(1);

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Debug)]
pub struct Config {
    rng_seed: u64,
    table: DifficultyTable,
}

impl Config {
    /// Creates a configuration using the standard difficulty table.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            table: DifficultyTable::standard(),
        }
    }

    /// Replaces the difficulty table consulted for every spawn.
    #[must_use]
    pub fn with_table(mut self, table: DifficultyTable) -> Self {
        self.table = table;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct TimerKey {
    due: Duration,
    sequence: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TimerTask {
    Spawn,
    Miss(WordId),
}

/// Pure system that schedules word spawns and miss deadlines.
#[derive(Debug)]
pub struct Spawning {
    table: DifficultyTable,
    selector: WordSelector,
    clock: Duration,
    timers: BTreeMap<TimerKey, TimerTask>,
    next_sequence: u64,
    cancelled: bool,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            table: config.table,
            selector: WordSelector::new(config.rng_seed),
            clock: Duration::ZERO,
            timers: BTreeMap::new(),
            next_sequence: 0,
            cancelled: false,
        }
    }

    /// Consumes events to arm, disarm and fire timers, emitting commands.
    ///
    /// `level` is the level the session currently plays at; it selects the
    /// difficulty tier for every spawn fired during this call.
    pub fn handle(
        &mut self,
        events: &[Event],
        level: u32,
        bank: &WordBank,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::PlayStarted { .. } => self.arm(self.clock, TimerTask::Spawn),
                Event::TimeAdvanced { dt } => {
                    self.clock = self.clock.saturating_add(*dt);
                }
                Event::WordSpawned {
                    word,
                    miss_deadline,
                    ..
                } => self.arm(*miss_deadline, TimerTask::Miss(*word)),
                Event::WordCleared { word, .. } => self.disarm(*word),
                Event::GameOver { .. } => self.cancel(),
                Event::WordMissed { .. } | Event::ScoreChanged { .. } => {}
            }
        }

        self.fire_due(level, bank, out);
    }

    /// Drops every outstanding timer and refuses to arm new ones.
    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.timers.clear();
    }

    /// Reports whether the scheduler was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Number of timers waiting to fire.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    fn arm(&mut self, due: Duration, task: TimerTask) {
        if self.cancelled {
            return;
        }
        let key = TimerKey {
            due,
            sequence: self.next_sequence,
        };
        self.next_sequence = self.next_sequence.saturating_add(1);
        let _ = self.timers.insert(key, task);
    }

    fn disarm(&mut self, word: WordId) {
        self.timers.retain(|_, task| *task != TimerTask::Miss(word));
    }

    fn fire_due(&mut self, level: u32, bank: &WordBank, out: &mut Vec<Command>) {
        while let Some((&key, &task)) = self.timers.first_key_value() {
            if key.due > self.clock {
                break;
            }
            let _ = self.timers.remove(&key);

            match task {
                TimerTask::Spawn => {
                    let tier = self.table.resolve(level);
                    let text = self.selector.select(bank, tier.length_weights());
                    out.push(Command::SpawnWord {
                        text,
                        spawned_at: key.due,
                    });
                    let delay = tier.spawn_delay().max(MIN_SPAWN_DELAY);
                    self.arm(key.due.saturating_add(delay), TimerTask::Spawn);
                    return;
                }
                TimerTask::Miss(word) => out.push(Command::ExpireWord { word }),
            }
        }
    }
}
