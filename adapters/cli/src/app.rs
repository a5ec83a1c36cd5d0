//! Screen navigation around game sessions.
//!
//! The app moves between the splash menu, the level picker and a running
//! session, turning each frame's input into session calls and rebuilding the
//! scene afterwards.

use std::{sync::Arc, time::Duration};

use falling_words_core::{GameMode, GAME_TITLE, LEVEL_SELECT_COUNT};
use falling_words_rendering::{
    FrameInput, GameOverPresentation, HudPresentation, LevelSelectPresentation, MenuPresentation,
    Navigation, Palette, PlayfieldPresentation, Scene, Screen, WordPresentation,
};
use falling_words_session::{Session, SessionConfig};
use falling_words_system_records::{PreferenceStore, Preferences};
use falling_words_system_word_bank::WordBank;

use crate::lanes::LaneAssigner;

/// Longest frame delta fed to a session; a stalled window resumes with one
/// short step instead of a burst of misses.
pub(crate) const MAX_FRAME_DT: Duration = Duration::from_millis(250);

const SPLASH_OPTIONS: [&str; 2] = ["Adventure Mode", "Level Select"];
const ADVENTURE_OPTION: usize = 0;
const LEVEL_SELECT_OPTION: usize = 1;
const LEVEL_COLUMNS: u32 = 6;

const SPLASH_HINT: &str = "Arrows: move   Enter: select   Tab: theme   Esc: quit";
const LEVEL_SELECT_HINT: &str = "Arrows: move   Enter: play   Tab: theme   Esc: back";

struct ActiveGame<S> {
    session: Session<S>,
    lanes: LaneAssigner,
    input: String,
}

enum AppScreen<S> {
    Splash { selected: usize },
    LevelSelect { highlighted: u32 },
    Playing(Box<ActiveGame<S>>),
}

/// Navigation state machine driving the window.
pub(crate) struct App<S> {
    bank: Arc<WordBank>,
    store: S,
    preferences: Preferences,
    config: SessionConfig,
    sessions_started: u64,
    screen: AppScreen<S>,
    quit: bool,
}

impl<S: PreferenceStore + Clone> App<S> {
    /// Creates the app on the splash menu, or straight in a session when
    /// `start` names a mode.
    pub(crate) fn new(
        bank: Arc<WordBank>,
        store: S,
        config: SessionConfig,
        start: Option<GameMode>,
    ) -> Self {
        let preferences = match store.load() {
            Ok(preferences) => preferences,
            Err(error) => {
                log::warn!("using default preferences: {error}");
                Preferences::default()
            }
        };

        let mut app = Self {
            bank,
            store,
            preferences,
            config,
            sessions_started: 0,
            screen: AppScreen::Splash {
                selected: ADVENTURE_OPTION,
            },
            quit: false,
        };
        if let Some(mode) = start {
            app.start(mode);
        }
        app
    }

    /// Applies one frame of input and advances the running session.
    pub(crate) fn update(&mut self, dt: Duration, input: &FrameInput) {
        if input.toggle_theme {
            self.toggle_theme();
        }

        match &mut self.screen {
            AppScreen::Splash { selected } => {
                if let Some(direction) = input.navigation {
                    *selected = move_menu_selection(*selected, direction, SPLASH_OPTIONS.len());
                }
                if input.back {
                    self.quit = true;
                } else if input.confirm {
                    let choice = *selected;
                    match choice {
                        LEVEL_SELECT_OPTION => {
                            self.screen = AppScreen::LevelSelect { highlighted: 1 };
                        }
                        _ => self.start(GameMode::Adventure),
                    }
                }
            }
            AppScreen::LevelSelect { highlighted } => {
                if let Some(direction) = input.navigation {
                    *highlighted = move_level_highlight(*highlighted, direction);
                }
                if input.back {
                    self.screen = AppScreen::Splash {
                        selected: LEVEL_SELECT_OPTION,
                    };
                } else if input.confirm {
                    let level = *highlighted;
                    self.start(GameMode::FixedLevel(level));
                }
            }
            AppScreen::Playing(game) => {
                if game.session.is_over() {
                    if input.confirm || input.back {
                        self.back_to_menu();
                    }
                    return;
                }
                if input.back {
                    self.back_to_menu();
                    return;
                }
                game.play_frame(dt, input);
            }
        }
    }

    /// Builds the scene describing the current screen.
    pub(crate) fn scene(&self) -> Scene {
        let screen = match &self.screen {
            AppScreen::Splash { selected } => Screen::Splash(MenuPresentation {
                title: GAME_TITLE.to_owned(),
                options: SPLASH_OPTIONS.iter().map(|option| (*option).to_owned()).collect(),
                selected: *selected,
                hint: SPLASH_HINT.to_owned(),
            }),
            AppScreen::LevelSelect { highlighted } => {
                Screen::LevelSelect(LevelSelectPresentation {
                    title: "Choose a Level".to_owned(),
                    levels: LEVEL_SELECT_COUNT,
                    columns: LEVEL_COLUMNS,
                    highlighted: *highlighted,
                    hint: LEVEL_SELECT_HINT.to_owned(),
                })
            }
            AppScreen::Playing(game) => Screen::Playfield(game.presentation()),
        };

        let mut scene = Scene::new(Palette::for_theme(self.preferences.theme), screen);
        scene.quit_requested = self.quit;
        scene
    }

    fn start(&mut self, mode: GameMode) {
        let seed = self.config.rng_seed.wrapping_add(self.sessions_started);
        self.sessions_started = self.sessions_started.saturating_add(1);

        let config = SessionConfig {
            rng_seed: seed,
            ..self.config.clone()
        };
        let mut game = ActiveGame {
            session: Session::new(mode, config, self.store.clone()),
            lanes: LaneAssigner::new(seed.rotate_left(32)),
            input: String::new(),
        };
        game.session
            .finish_loading(Arc::clone(&self.bank), &mut game.lanes);
        self.screen = AppScreen::Playing(Box::new(game));
    }

    fn back_to_menu(&mut self) {
        let menu = AppScreen::Splash {
            selected: ADVENTURE_OPTION,
        };
        if let AppScreen::Playing(game) = std::mem::replace(&mut self.screen, menu) {
            log::info!(
                "leaving session with score {} at level {}",
                game.session.score(),
                game.session.level()
            );
            self.store = game.session.into_store();
        }
    }

    /// Store receiving writes: the running session's while playing.
    fn active_store(&mut self) -> &mut S {
        match &mut self.screen {
            AppScreen::Playing(game) => game.session.store_mut(),
            AppScreen::Splash { .. } | AppScreen::LevelSelect { .. } => &mut self.store,
        }
    }

    fn toggle_theme(&mut self) {
        let theme = self.preferences.theme.toggled();
        let fallback = self.preferences;
        let store = self.active_store();
        let mut preferences = match store.load() {
            Ok(preferences) => preferences,
            Err(error) => {
                log::warn!("re-reading preferences failed: {error}");
                fallback
            }
        };
        preferences.theme = theme;
        if let Err(error) = store.save(&preferences) {
            log::warn!("failed to persist theme {}: {error}", theme.key());
        }
        self.preferences = preferences;
    }
}

impl<S: PreferenceStore> ActiveGame<S> {
    fn play_frame(&mut self, dt: Duration, input: &FrameInput) {
        let mut edited = false;
        if input.backspace {
            edited |= self.input.pop().is_some();
        }
        if !input.typed.is_empty() {
            self.input.push_str(&input.typed);
            edited = true;
        }
        if edited && self.session.type_input(&self.input, &mut self.lanes) {
            self.input.clear();
        }

        self.session.advance(dt.min(MAX_FRAME_DT), &mut self.lanes);
    }

    fn presentation(&self) -> PlayfieldPresentation {
        let clock = self.session.clock();
        let words = self
            .session
            .words()
            .iter()
            .filter_map(|word| {
                let lane = self.lanes.lane(word.id).unwrap_or(0.0);
                WordPresentation::new(word.id, word.text.clone(), lane, word.progress(clock)).ok()
            })
            .collect();

        let mode = self.session.mode();
        PlayfieldPresentation {
            words,
            hud: HudPresentation {
                score: self.session.score(),
                level: self.session.level(),
                high_score: mode
                    .tracks_high_score()
                    .then(|| self.session.high_score()),
            },
            input: self.input.clone(),
            game_over: self
                .session
                .is_over()
                .then(GameOverPresentation::default),
        }
    }
}

fn move_menu_selection(selected: usize, direction: Navigation, count: usize) -> usize {
    match direction {
        Navigation::Up | Navigation::Left => selected.saturating_sub(1),
        Navigation::Down | Navigation::Right => (selected + 1).min(count.saturating_sub(1)),
    }
}

fn move_level_highlight(highlighted: u32, direction: Navigation) -> u32 {
    let candidate = match direction {
        Navigation::Left => highlighted.saturating_sub(1),
        Navigation::Right => highlighted.saturating_add(1),
        Navigation::Up => highlighted.saturating_sub(LEVEL_COLUMNS),
        Navigation::Down => highlighted.saturating_add(LEVEL_COLUMNS),
    };
    if (1..=LEVEL_SELECT_COUNT).contains(&candidate) {
        candidate
    } else {
        highlighted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use falling_words_system_records::{MemoryStore, Theme};

    fn app(words: &str, config: SessionConfig, start: Option<GameMode>) -> App<MemoryStore> {
        App::new(
            Arc::new(WordBank::parse(words)),
            MemoryStore::default(),
            config,
            start,
        )
    }

    fn press(app: &mut App<MemoryStore>, input: FrameInput) {
        app.update(Duration::ZERO, &input);
    }

    fn navigate(direction: Navigation) -> FrameInput {
        FrameInput {
            navigation: Some(direction),
            ..FrameInput::default()
        }
    }

    fn confirm() -> FrameInput {
        FrameInput {
            confirm: true,
            ..FrameInput::default()
        }
    }

    fn back() -> FrameInput {
        FrameInput {
            back: true,
            ..FrameInput::default()
        }
    }

    fn playfield(app: &App<MemoryStore>) -> PlayfieldPresentation {
        match app.scene().screen {
            Screen::Playfield(playfield) => playfield,
            other => panic!("expected the playfield, got {other:?}"),
        }
    }

    #[test]
    fn level_select_starts_the_highlighted_level() {
        let mut app = app("cat\n", SessionConfig::default(), None);

        press(&mut app, navigate(Navigation::Down));
        press(&mut app, confirm());
        for direction in [Navigation::Right, Navigation::Down, Navigation::Down] {
            press(&mut app, navigate(direction));
        }
        match app.scene().screen {
            Screen::LevelSelect(grid) => {
                assert_eq!(grid.highlighted, 14);
                assert_eq!(grid.levels, 30);
            }
            other => panic!("expected the level picker, got {other:?}"),
        }

        press(&mut app, confirm());
        let playfield = playfield(&app);
        assert_eq!(playfield.hud.level, 14);
        assert_eq!(playfield.hud.high_score, None);
        assert_eq!(playfield.words.len(), 1);
    }

    #[test]
    fn level_highlight_stays_on_the_grid() {
        assert_eq!(move_level_highlight(1, Navigation::Left), 1);
        assert_eq!(move_level_highlight(3, Navigation::Up), 3);
        assert_eq!(move_level_highlight(27, Navigation::Down), 27);
        assert_eq!(move_level_highlight(30, Navigation::Right), 30);
        assert_eq!(move_level_highlight(8, Navigation::Up), 2);
    }

    #[test]
    fn escape_walks_back_up_the_menus() {
        let mut app = app("cat\n", SessionConfig::default(), None);
        press(&mut app, navigate(Navigation::Down));
        press(&mut app, confirm());
        press(&mut app, back());

        match app.scene().screen {
            Screen::Splash(menu) => assert_eq!(menu.selected, LEVEL_SELECT_OPTION),
            other => panic!("expected the splash menu, got {other:?}"),
        }
        assert!(!app.scene().quit_requested);

        press(&mut app, back());
        assert!(app.scene().quit_requested);
    }

    #[test]
    fn typing_a_falling_word_claims_it_and_clears_the_field() {
        let mut app = app("cat\n", SessionConfig::default(), Some(GameMode::Adventure));

        press(
            &mut app,
            FrameInput {
                typed: "Ca".to_owned(),
                ..FrameInput::default()
            },
        );
        assert_eq!(playfield(&app).input, "Ca");

        press(
            &mut app,
            FrameInput {
                typed: "t".to_owned(),
                ..FrameInput::default()
            },
        );
        let playfield = playfield(&app);
        assert_eq!(playfield.input, "");
        assert_eq!(playfield.hud.score, 1);
        assert_eq!(playfield.hud.high_score, Some(1));
        assert!(playfield.words.is_empty());
    }

    #[test]
    fn game_over_returns_to_the_menu_on_enter() {
        let config = SessionConfig {
            fall_duration: Duration::from_millis(1_000),
            ..SessionConfig::default()
        };
        let mut app = app("cat\n", config, Some(GameMode::FixedLevel(2)));

        for _ in 0..4 {
            app.update(Duration::from_secs(5), &FrameInput::default());
        }
        let over = playfield(&app);
        assert!(over.game_over.is_some());

        press(
            &mut app,
            FrameInput {
                typed: "cat".to_owned(),
                ..FrameInput::default()
            },
        );
        assert_eq!(playfield(&app).input, "", "input is disabled after game over");

        press(&mut app, confirm());
        assert!(matches!(app.scene().screen, Screen::Splash(_)));
    }

    #[test]
    fn theme_toggle_is_persisted() {
        let mut app = app("cat\n", SessionConfig::default(), None);
        assert_eq!(app.preferences.theme, Theme::Dark);

        press(
            &mut app,
            FrameInput {
                toggle_theme: true,
                ..FrameInput::default()
            },
        );

        assert_eq!(app.preferences.theme, Theme::Light);
        assert_eq!(app.store.preferences().theme, Theme::Light);
        assert_eq!(app.scene().palette, Palette::for_theme(Theme::Light));
    }

    #[test]
    fn high_score_carries_over_to_the_next_session() {
        let mut app = app("cat
", SessionConfig::default(), Some(GameMode::Adventure));
        for _ in 0..2 {
            press(
                &mut app,
                FrameInput {
                    typed: "cat".to_owned(),
                    ..FrameInput::default()
                },
            );
            for _ in 0..20 {
                app.update(MAX_FRAME_DT, &FrameInput::default());
            }
        }
        assert_eq!(playfield(&app).hud.high_score, Some(2));

        press(
            &mut app,
            FrameInput {
                toggle_theme: true,
                ..FrameInput::default()
            },
        );
        press(&mut app, back());
        assert_eq!(app.store.preferences().high_score, 2);
        assert_eq!(app.store.preferences().theme, Theme::Light);

        press(&mut app, confirm());
        let second = playfield(&app);
        assert_eq!(second.hud.score, 0);
        assert_eq!(second.hud.high_score, Some(2));
    }
}
