use std::{io, path::PathBuf, sync::Arc, time::Duration};

use falling_words_core::{GameMode, SessionPhase, WordId};
use falling_words_session::{Session, SessionConfig, SessionObserver};
use falling_words_system_records::{MemoryStore, PreferenceStore, Preferences, StoreError};
use falling_words_system_word_bank::WordBank;

#[derive(Debug, Default)]
struct Recorder {
    log: Vec<String>,
    high_scores: Vec<u32>,
    game_overs: usize,
}

impl SessionObserver for Recorder {
    fn word_spawned(&mut self, word: WordId, text: &str, fall_duration: Duration) {
        self.log
            .push(format!("spawn {} {text} {fall_duration:?}", word.get()));
    }

    fn word_removed(&mut self, word: WordId) {
        self.log.push(format!("remove {}", word.get()));
    }

    fn score_changed(&mut self, score: u32, level: u32) {
        self.log.push(format!("score {score} level {level}"));
    }

    fn game_over(&mut self) {
        self.game_overs += 1;
        self.log.push("game over".to_owned());
    }

    fn high_score_changed(&mut self, high_score: u32) {
        self.high_scores.push(high_score);
    }
}

fn bank(words: &str) -> Arc<WordBank> {
    Arc::new(WordBank::parse(words))
}

fn started<S: PreferenceStore>(
    mode: GameMode,
    config: SessionConfig,
    store: S,
    words: &str,
    observer: &mut Recorder,
) -> Session<S> {
    let mut session = Session::new(mode, config, store);
    session.finish_loading(bank(words), observer);
    session
}

fn claim_everything<S: PreferenceStore>(session: &mut Session<S>, observer: &mut Recorder) {
    let texts: Vec<String> = session
        .words()
        .into_vec()
        .into_iter()
        .map(|word| word.text)
        .collect();
    for text in texts {
        let _ = session.type_input(&text, observer);
    }
}

/// Plays until `target` words were claimed, then lets the next word fall.
fn play_to_score<S: PreferenceStore>(
    session: &mut Session<S>,
    target: u32,
    observer: &mut Recorder,
) {
    while session.score() < target {
        claim_everything(session, observer);
        if session.score() >= target {
            break;
        }
        session.advance(Duration::from_millis(100), observer);
    }
    while !session.is_over() {
        session.advance(Duration::from_millis(500), observer);
    }
}

#[test]
fn padded_capitalised_input_claims_the_word() {
    let mut observer = Recorder::default();
    let mut session = started(
        GameMode::Adventure,
        SessionConfig::default(),
        MemoryStore::default(),
        "cat\n",
        &mut observer,
    );

    assert!(session.type_input(" Cat ", &mut observer));
    assert_eq!(session.score(), 1);
    assert!(session.words().is_empty());
    assert!(!session.type_input(" Cat ", &mut observer));
}

#[test]
fn claim_and_miss_on_the_same_word_resolve_to_one_outcome() {
    let config = SessionConfig {
        fall_duration: Duration::from_millis(4_000),
        ..SessionConfig::default()
    };

    // The claim lands first: the miss timer is gone.
    let mut observer = Recorder::default();
    let mut claimed_first = started(
        GameMode::Adventure,
        config.clone(),
        MemoryStore::default(),
        "dog\n",
        &mut observer,
    );
    claimed_first.advance(Duration::from_millis(3_999), &mut observer);
    assert!(claimed_first.type_input("dog", &mut observer));
    claimed_first.advance(Duration::from_millis(1), &mut observer);

    assert!(!claimed_first.is_over());
    assert_eq!(claimed_first.score(), 1);
    assert!(claimed_first.words().is_empty());

    // The miss lands first: the claim finds nothing.
    let mut observer = Recorder::default();
    let mut missed_first = started(
        GameMode::Adventure,
        config,
        MemoryStore::default(),
        "dog\n",
        &mut observer,
    );
    missed_first.advance(Duration::from_millis(4_000), &mut observer);
    assert!(!missed_first.type_input("dog", &mut observer));

    assert!(missed_first.is_over());
    assert_eq!(missed_first.score(), 0);
    assert!(missed_first.words().iter().all(|word| word.text != "dog"));
    assert_eq!(observer.game_overs, 1);
}

#[test]
fn one_long_advance_stops_spawning_at_the_first_miss() {
    let mut observer = Recorder::default();
    let mut session = started(
        GameMode::Adventure,
        SessionConfig::default(),
        MemoryStore::default(),
        "cat\n",
        &mut observer,
    );
    assert!(session.type_input("cat", &mut observer));
    session.advance(Duration::from_secs(5), &mut observer);
    assert_eq!(session.words().len(), 1);

    // Word 1 is missed at 13 s; spawns are due at 10 s, 15 s and 20 s.
    session.advance(Duration::from_secs(20), &mut observer);

    assert!(session.is_over());
    assert_eq!(observer.game_overs, 1);
    let spawns: Vec<&String> = observer
        .log
        .iter()
        .filter(|entry| entry.starts_with("spawn"))
        .collect();
    assert_eq!(spawns.len(), 3, "spawned: {spawns:?}");
    let game_over = observer
        .log
        .iter()
        .position(|entry| entry == "game over")
        .expect("game over reported");
    assert!(observer.log[game_over..]
        .iter()
        .all(|entry| !entry.starts_with("spawn")));
    assert!(session.words().iter().all(|word| word.id.get() <= 2));
}

#[test]
fn nothing_happens_after_game_over() {
    let mut observer = Recorder::default();
    let mut session = started(
        GameMode::FixedLevel(9),
        SessionConfig::default(),
        MemoryStore::default(),
        "cat\ndog\ntree\nbird\napple\nlemon\nbanana\ncherry\n",
        &mut observer,
    );
    session.advance(Duration::from_millis(8_000), &mut observer);
    assert_eq!(session.phase(), SessionPhase::GameOver);

    let log_len = observer.log.len();
    let remaining = session.words().len();
    for _ in 0..60 {
        session.advance(Duration::from_millis(500), &mut observer);
    }
    claim_everything(&mut session, &mut observer);

    assert_eq!(observer.log.len(), log_len);
    assert_eq!(session.words().len(), remaining);
    assert_eq!(session.score(), 0);
    assert_eq!(observer.game_overs, 1);
}

#[test]
fn high_score_keeps_the_best_adventure_result() {
    let words = "cat\ndog\nowl\n";

    let mut observer = Recorder::default();
    let mut first = started(
        GameMode::Adventure,
        SessionConfig::default(),
        MemoryStore::default(),
        words,
        &mut observer,
    );
    play_to_score(&mut first, 5, &mut observer);
    assert_eq!(first.high_score(), 5);
    assert_eq!(observer.high_scores, vec![1, 2, 3, 4, 5]);
    let store = first.into_store();
    assert_eq!(store.preferences().high_score, 5);

    let mut observer = Recorder::default();
    let mut second = started(
        GameMode::Adventure,
        SessionConfig::default(),
        store,
        words,
        &mut observer,
    );
    assert_eq!(second.high_score(), 5);
    play_to_score(&mut second, 3, &mut observer);

    assert!(observer.high_scores.is_empty());
    assert_eq!(second.store().preferences().high_score, 5);
    assert_eq!(second.store().save_count(), 5);
}

#[test]
fn level_mode_never_writes_the_high_score() {
    let mut observer = Recorder::default();
    let store = MemoryStore::with_preferences(Preferences {
        high_score: 2,
        ..Preferences::default()
    });
    let mut session = started(
        GameMode::FixedLevel(1),
        SessionConfig::default(),
        store,
        "cat\ndog\n",
        &mut observer,
    );
    play_to_score(&mut session, 4, &mut observer);

    assert_eq!(session.score(), 4);
    assert!(observer.high_scores.is_empty());
    assert_eq!(session.store().save_count(), 0);
    assert_eq!(session.store().preferences().high_score, 2);
}

#[derive(Debug, Default)]
struct BrokenStore;

impl PreferenceStore for BrokenStore {
    fn load(&self) -> Result<Preferences, StoreError> {
        Err(StoreError::Read {
            path: PathBuf::from("prefs.toml"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        })
    }

    fn save(&mut self, _preferences: &Preferences) -> Result<(), StoreError> {
        Err(StoreError::Write {
            path: PathBuf::from("prefs.toml"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        })
    }
}

#[test]
fn storage_failures_never_interrupt_play() {
    let mut observer = Recorder::default();
    let mut session = started(
        GameMode::Adventure,
        SessionConfig::default(),
        BrokenStore,
        "cat\n",
        &mut observer,
    );

    assert_eq!(session.preferences(), Preferences::default());
    assert!(session.type_input("cat", &mut observer));
    assert_eq!(session.high_score(), 1);
    assert_eq!(observer.high_scores, vec![1]);
    assert_eq!(session.preferences().high_score, 0);
}

#[test]
fn same_seed_and_script_replay_identically() {
    let first = scripted_run(0x1234);
    let second = scripted_run(0x1234);

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

fn scripted_run(seed: u64) -> Vec<String> {
    let config = SessionConfig {
        rng_seed: seed,
        ..SessionConfig::default()
    };
    let mut observer = Recorder::default();
    let mut session = started(
        GameMode::FixedLevel(10),
        config,
        MemoryStore::default(),
        "cat\ndog\ntree\nbird\napple\nlemon\nbanana\ncherry\n",
        &mut observer,
    );

    for step in 0..240 {
        session.advance(Duration::from_millis(125), &mut observer);
        if step % 9 == 0 {
            if let Some(word) = session.words().iter().next() {
                let text = word.text.clone();
                let _ = session.type_input(&text, &mut observer);
            }
        }
    }

    observer.log
}
