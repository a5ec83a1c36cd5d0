#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Falling Words adapters.

use anyhow::Result as AnyResult;
use falling_words_core::WordId;
use falling_words_system_records::Theme;
use glam::Vec2;
use std::time::Duration;
use thiserror::Error;

/// Rightmost horizontal position a word may start at, as a fraction of the
/// play area width.
pub const MAX_LANE: f32 = 0.9;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Colors used to draw every screen under one theme.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Solid color used to clear each frame.
    pub background: Color,
    /// Titles, HUD and menu labels.
    pub text: Color,
    /// Hints and inactive menu entries.
    pub muted: Color,
    /// Highlight of the selected menu entry.
    pub accent: Color,
    /// Falling word labels.
    pub word: Color,
    /// Input field and button backgrounds.
    pub panel: Color,
}

impl Palette {
    /// Palette matching the provided theme.
    #[must_use]
    pub const fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                background: Color::from_rgb_u8(17, 17, 17),
                text: Color::from_rgb_u8(255, 255, 255),
                muted: Color::from_rgb_u8(136, 136, 136),
                accent: Color::from_rgb_u8(255, 204, 0),
                word: Color::from_rgb_u8(120, 220, 255),
                panel: Color::from_rgb_u8(51, 51, 51),
            },
            Theme::Light => Self {
                background: Color::from_rgb_u8(245, 245, 240),
                text: Color::from_rgb_u8(17, 17, 17),
                muted: Color::from_rgb_u8(110, 110, 110),
                accent: Color::from_rgb_u8(200, 80, 0),
                word: Color::from_rgb_u8(0, 90, 160),
                panel: Color::from_rgb_u8(220, 220, 215),
            },
        }
    }
}

/// Arrow-key direction pressed on a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Navigation {
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Printable characters typed during the frame, in order.
    pub typed: String,
    /// Whether backspace was pressed.
    pub backspace: bool,
    /// Whether enter was pressed.
    pub confirm: bool,
    /// Whether escape was pressed.
    pub back: bool,
    /// Arrow key pressed on this frame, if any.
    pub navigation: Option<Navigation>,
    /// Whether the theme toggle key was pressed.
    pub toggle_theme: bool,
}

/// A falling word positioned within the play area.
#[derive(Clone, Debug, PartialEq)]
pub struct WordPresentation {
    /// Identifier of the word in the session.
    pub id: WordId,
    /// Text drawn for the word.
    pub text: String,
    /// Horizontal start position as a fraction of the play area width.
    pub lane: f32,
    /// Fraction of the fall completed.
    pub progress: f32,
}

impl WordPresentation {
    /// Creates a word presentation.
    ///
    /// `lane` must lie within `0.0..=MAX_LANE`; `progress` is clamped to
    /// `0.0..=1.0`.
    pub fn new(
        id: WordId,
        text: impl Into<String>,
        lane: f32,
        progress: f32,
    ) -> Result<Self, RenderingError> {
        if !(0.0..=MAX_LANE).contains(&lane) {
            return Err(RenderingError::LaneOutOfRange { lane });
        }

        Ok(Self {
            id,
            text: text.into(),
            lane,
            progress: if progress.is_nan() {
                0.0
            } else {
                progress.clamp(0.0, 1.0)
            },
        })
    }

    /// Top-left anchor of the word within an area of the given size.
    #[must_use]
    pub fn position(&self, area: Vec2) -> Vec2 {
        Vec2::new(self.lane, self.progress) * area
    }
}

/// Heads-up display shown during play.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HudPresentation {
    /// Words claimed so far.
    pub score: u32,
    /// Level the session plays at.
    pub level: u32,
    /// Best Adventure score; `None` outside Adventure.
    pub high_score: Option<u32>,
}

impl HudPresentation {
    /// Text lines shown in the top-left corner.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        match self.high_score {
            Some(high_score) => vec![
                format!("Score: {}", self.score),
                format!("Difficulty: {}", self.level),
                format!("High Score: {high_score}"),
            ],
            None => vec![
                format!("Score: {}", self.score),
                format!("Level: {}", self.level),
            ],
        }
    }
}

/// Overlay displayed once the session ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameOverPresentation {
    /// Headline of the overlay.
    pub message: String,
    /// Label of the action returning to the menu.
    pub action: String,
}

impl Default for GameOverPresentation {
    fn default() -> Self {
        Self {
            message: "Game Over!".to_owned(),
            action: "Back to Menu".to_owned(),
        }
    }
}

/// Gameplay screen content.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayfieldPresentation {
    /// Words currently falling, earliest spawn first.
    pub words: Vec<WordPresentation>,
    /// Score and level readout.
    pub hud: HudPresentation,
    /// Contents of the input field.
    pub input: String,
    /// Overlay shown after the game ended.
    pub game_over: Option<GameOverPresentation>,
}

/// Vertical list of menu entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuPresentation {
    /// Heading drawn above the entries.
    pub title: String,
    /// Entry labels, top to bottom.
    pub options: Vec<String>,
    /// Index of the highlighted entry.
    pub selected: usize,
    /// Key hints drawn at the bottom.
    pub hint: String,
}

/// Grid of selectable levels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelSelectPresentation {
    /// Heading drawn above the grid.
    pub title: String,
    /// Number of levels, numbered from 1.
    pub levels: u32,
    /// Buttons per row.
    pub columns: u32,
    /// Highlighted level.
    pub highlighted: u32,
    /// Key hints drawn at the bottom.
    pub hint: String,
}

impl LevelSelectPresentation {
    /// Label of a level button.
    #[must_use]
    pub fn label(level: u32) -> String {
        format!("Level {level}")
    }

    /// Column and row of `level` within the grid.
    #[must_use]
    pub fn cell(&self, level: u32) -> Option<(u32, u32)> {
        if level == 0 || level > self.levels || self.columns == 0 {
            return None;
        }
        let index = level - 1;
        Some((index % self.columns, index / self.columns))
    }

    /// Number of grid rows.
    #[must_use]
    pub fn rows(&self) -> u32 {
        if self.columns == 0 {
            return 0;
        }
        self.levels.div_ceil(self.columns)
    }
}

/// Screen currently shown.
#[derive(Clone, Debug, PartialEq)]
pub enum Screen {
    /// Title menu.
    Splash(MenuPresentation),
    /// Level picker.
    LevelSelect(LevelSelectPresentation),
    /// Gameplay, including the game-over overlay.
    Playfield(PlayfieldPresentation),
}

/// Scene description consumed by backends every frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Colors for the active theme.
    pub palette: Palette,
    /// Content of the window.
    pub screen: Screen,
    /// Set by the adapter to close the window after this frame.
    pub quit_requested: bool,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(palette: Palette, screen: Screen) -> Self {
        Self {
            palette,
            screen,
            quit_requested: false,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            scene,
        }
    }
}

/// Rendering backend capable of presenting Falling Words scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until the scene requests to quit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and mutates the scene before it is
    /// rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, Error, PartialEq)]
pub enum RenderingError {
    /// Words must start within the left part of the play area.
    #[error("lane must lie within 0.0..=0.9 (received {lane})")]
    LaneOutOfRange {
        /// Provided lane that failed validation.
        lane: f32,
    },
}
