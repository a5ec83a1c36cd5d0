#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Falling Words.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment, so
//! the dependency is declared without its default `audio` feature.
//!
//! Layout is computed by small pure helpers working on `glam` vectors so the
//! geometry can be tested without opening a window.

use anyhow::Result;
use falling_words_rendering::{
    Color, FrameInput, HudPresentation, LevelSelectPresentation, MenuPresentation, Navigation,
    Palette, PlayfieldPresentation, Presentation, RenderingBackend, Scene, Screen,
};
use glam::Vec2;
use macroquad::{
    input::{get_char_pressed, is_key_pressed, KeyCode},
    shapes::{draw_rectangle, draw_rectangle_lines},
    text::{draw_text, measure_text},
};
use std::time::{Duration, Instant};

const WINDOW_WIDTH: i32 = 960;
const WINDOW_HEIGHT: i32 = 720;

const MARGIN: f32 = 16.0;
const HUD_LINE_HEIGHT: f32 = 28.0;
const HUD_FONT_SIZE: f32 = 26.0;
const HUD_HEIGHT: f32 = 3.0 * HUD_LINE_HEIGHT + MARGIN;
const INPUT_HEIGHT: f32 = 48.0;
const INPUT_FONT_SIZE: f32 = 32.0;
const WORD_FONT_SIZE: f32 = 30.0;

const TITLE_FONT_SIZE: f32 = 56.0;
const TITLE_BASELINE: f32 = 110.0;
const BUTTON_FONT_SIZE: f32 = 28.0;
const MENU_BUTTON_SIZE: Vec2 = Vec2::new(320.0, 56.0);
const MENU_BUTTON_GAP: f32 = 20.0;
const LEVEL_BUTTON_SIZE: Vec2 = Vec2::new(120.0, 44.0);
const LEVEL_BUTTON_GAP: f32 = 10.0;
const LEVEL_GRID_TOP: f32 = 160.0;
const HINT_FONT_SIZE: f32 = 20.0;

/// Keys observed during a single frame.
#[derive(Clone, Debug, Default)]
struct KeyboardState {
    typed: String,
    backspace: bool,
    confirm: bool,
    back: bool,
    navigation: Option<Navigation>,
    toggle_theme: bool,
}

impl KeyboardState {
    fn poll() -> Self {
        let typed = printable_characters(std::iter::from_fn(get_char_pressed));
        let navigation = navigation_from_arrows(
            is_key_pressed(KeyCode::Up),
            is_key_pressed(KeyCode::Down),
            is_key_pressed(KeyCode::Left),
            is_key_pressed(KeyCode::Right),
        );

        Self {
            typed,
            backspace: is_key_pressed(KeyCode::Backspace),
            confirm: is_key_pressed(KeyCode::Enter) || is_key_pressed(KeyCode::KpEnter),
            back: is_key_pressed(KeyCode::Escape),
            navigation,
            toggle_theme: is_key_pressed(KeyCode::Tab),
        }
    }

    fn into_frame_input(self) -> FrameInput {
        FrameInput {
            typed: self.typed,
            backspace: self.backspace,
            confirm: self.confirm,
            back: self.back,
            navigation: self.navigation,
            toggle_theme: self.toggle_theme,
        }
    }
}

/// Keeps printable characters, dropping the control characters macroquad
/// reports for backspace, enter and tab.
fn printable_characters(characters: impl Iterator<Item = char>) -> String {
    characters.filter(|character| !character.is_control()).collect()
}

fn navigation_from_arrows(up: bool, down: bool, left: bool, right: bool) -> Option<Navigation> {
    if up {
        Some(Navigation::Up)
    } else if down {
        Some(Navigation::Down)
    } else if left {
        Some(Navigation::Left)
    } else if right {
        Some(Navigation::Right)
    } else {
        None
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Once-per-second frame rate and game update cost.
#[derive(Debug, Default)]
struct FrameRate {
    elapsed: Duration,
    frames: u32,
    updating: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct FrameReport {
    fps: f32,
    avg_update: Duration,
}

impl FrameRate {
    fn record(&mut self, frame: Duration, update: Duration) -> Option<FrameReport> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        self.updating += update;
        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let report = FrameReport {
            fps: self.frames as f32 / self.elapsed.as_secs_f32(),
            avg_update: self.updating / self.frames,
        };
        *self = Self::default();
        Some(report)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let mut frame_rate = FrameRate::default();

            loop {
                let frame_input = KeyboardState::poll().into_frame_input();
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let update_start = Instant::now();
                update_scene(frame_dt, frame_input, &mut scene);
                let update_duration = update_start.elapsed();
                if scene.quit_requested {
                    break;
                }

                let screen = Vec2::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                macroquad::window::clear_background(to_macroquad_color(
                    scene.palette.background,
                ));
                match &scene.screen {
                    Screen::Splash(menu) => draw_menu(menu, &scene.palette, screen),
                    Screen::LevelSelect(grid) => draw_level_select(grid, &scene.palette, screen),
                    Screen::Playfield(playfield) => {
                        draw_playfield(playfield, &scene.palette, screen);
                    }
                }

                let report = frame_rate.record(frame_dt, update_duration);
                if let Some(FrameReport { fps, avg_update }) = report.filter(|_| show_fps) {
                    println!(
                        "FPS: {fps:.2} | update: {:>6.3}ms",
                        avg_update.as_secs_f64() * 1_000.0
                    );
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Screen-space rectangles of the gameplay screen.
#[derive(Clone, Copy, Debug, PartialEq)]
struct PlayfieldMetrics {
    area_origin: Vec2,
    area_size: Vec2,
    input_origin: Vec2,
    input_size: Vec2,
}

impl PlayfieldMetrics {
    fn from_screen(screen: Vec2) -> Self {
        let width = (screen.x - 2.0 * MARGIN).max(0.0);
        let input_top = (screen.y - MARGIN - INPUT_HEIGHT).max(HUD_HEIGHT);
        // Words are anchored at their baseline, one line below the HUD.
        let area_top = HUD_HEIGHT + WORD_FONT_SIZE;
        let area_height = (input_top - MARGIN / 2.0 - area_top).max(0.0);

        Self {
            area_origin: Vec2::new(MARGIN, area_top),
            area_size: Vec2::new(width, area_height),
            input_origin: Vec2::new(MARGIN, input_top),
            input_size: Vec2::new(width, INPUT_HEIGHT),
        }
    }
}

fn menu_entry_origin(index: usize, count: usize, screen: Vec2) -> Vec2 {
    let count = count.max(1) as f32;
    let stack_height = count * MENU_BUTTON_SIZE.y + (count - 1.0) * MENU_BUTTON_GAP;
    let top = ((screen.y - stack_height) / 2.0).max(TITLE_BASELINE + MARGIN);
    Vec2::new(
        (screen.x - MENU_BUTTON_SIZE.x) / 2.0,
        top + index as f32 * (MENU_BUTTON_SIZE.y + MENU_BUTTON_GAP),
    )
}

fn level_button_origin(column: u32, row: u32, columns: u32, screen: Vec2) -> Vec2 {
    let grid_width =
        columns as f32 * LEVEL_BUTTON_SIZE.x + columns.saturating_sub(1) as f32 * LEVEL_BUTTON_GAP;
    let left = (screen.x - grid_width) / 2.0;
    Vec2::new(
        left + column as f32 * (LEVEL_BUTTON_SIZE.x + LEVEL_BUTTON_GAP),
        LEVEL_GRID_TOP + row as f32 * (LEVEL_BUTTON_SIZE.y + LEVEL_BUTTON_GAP),
    )
}

fn draw_centered_text(text: &str, center_x: f32, baseline: f32, font_size: f32, color: Color) {
    let dimensions = measure_text(text, None, font_size as u16, 1.0);
    draw_text(
        text,
        center_x - dimensions.width / 2.0,
        baseline,
        font_size,
        to_macroquad_color(color),
    );
}

fn draw_button(label: &str, origin: Vec2, size: Vec2, highlighted: bool, palette: &Palette) {
    let (fill, text) = if highlighted {
        (palette.accent, palette.background)
    } else {
        (palette.panel, palette.text)
    };
    draw_rectangle(origin.x, origin.y, size.x, size.y, to_macroquad_color(fill));
    draw_rectangle_lines(
        origin.x,
        origin.y,
        size.x,
        size.y,
        2.0,
        to_macroquad_color(palette.muted),
    );
    let font_size = (size.y * 0.5).min(BUTTON_FONT_SIZE);
    draw_centered_text(
        label,
        origin.x + size.x / 2.0,
        origin.y + size.y / 2.0 + font_size / 3.0,
        font_size,
        text,
    );
}

fn draw_hint(hint: &str, palette: &Palette, screen: Vec2) {
    draw_centered_text(
        hint,
        screen.x / 2.0,
        screen.y - MARGIN,
        HINT_FONT_SIZE,
        palette.muted,
    );
}

fn draw_menu(menu: &MenuPresentation, palette: &Palette, screen: Vec2) {
    draw_centered_text(
        &menu.title,
        screen.x / 2.0,
        TITLE_BASELINE,
        TITLE_FONT_SIZE,
        palette.text,
    );
    for (index, option) in menu.options.iter().enumerate() {
        let origin = menu_entry_origin(index, menu.options.len(), screen);
        draw_button(option, origin, MENU_BUTTON_SIZE, index == menu.selected, palette);
    }
    draw_hint(&menu.hint, palette, screen);
}

fn draw_level_select(grid: &LevelSelectPresentation, palette: &Palette, screen: Vec2) {
    draw_centered_text(
        &grid.title,
        screen.x / 2.0,
        TITLE_BASELINE,
        TITLE_FONT_SIZE * 0.75,
        palette.text,
    );
    for level in 1..=grid.levels {
        if let Some((column, row)) = grid.cell(level) {
            let origin = level_button_origin(column, row, grid.columns, screen);
            draw_button(
                &LevelSelectPresentation::label(level),
                origin,
                LEVEL_BUTTON_SIZE,
                level == grid.highlighted,
                palette,
            );
        }
    }
    draw_hint(&grid.hint, palette, screen);
}

fn draw_hud(hud: &HudPresentation, palette: &Palette) {
    for (index, line) in hud.lines().iter().enumerate() {
        draw_text(
            line,
            MARGIN,
            MARGIN + (index as f32 + 0.8) * HUD_LINE_HEIGHT,
            HUD_FONT_SIZE,
            to_macroquad_color(palette.text),
        );
    }
}

fn draw_playfield(playfield: &PlayfieldPresentation, palette: &Palette, screen: Vec2) {
    let metrics = PlayfieldMetrics::from_screen(screen);

    for word in &playfield.words {
        let position = metrics.area_origin + word.position(metrics.area_size);
        draw_text(
            &word.text,
            position.x,
            position.y,
            WORD_FONT_SIZE,
            to_macroquad_color(palette.word),
        );
    }

    draw_hud(&playfield.hud, palette);

    let input_border = if playfield.game_over.is_some() {
        palette.muted
    } else {
        palette.accent
    };
    draw_rectangle(
        metrics.input_origin.x,
        metrics.input_origin.y,
        metrics.input_size.x,
        metrics.input_size.y,
        to_macroquad_color(palette.panel),
    );
    draw_rectangle_lines(
        metrics.input_origin.x,
        metrics.input_origin.y,
        metrics.input_size.x,
        metrics.input_size.y,
        2.0,
        to_macroquad_color(input_border),
    );
    draw_text(
        &playfield.input,
        metrics.input_origin.x + MARGIN / 2.0,
        metrics.input_origin.y + metrics.input_size.y * 0.7,
        INPUT_FONT_SIZE,
        to_macroquad_color(palette.text),
    );

    if let Some(game_over) = &playfield.game_over {
        let shade = Color::new(0.0, 0.0, 0.0, 0.5);
        draw_rectangle(0.0, 0.0, screen.x, screen.y, to_macroquad_color(shade));
        draw_centered_text(
            &game_over.message,
            screen.x / 2.0,
            screen.y / 2.0 - MENU_BUTTON_SIZE.y,
            TITLE_FONT_SIZE,
            palette.accent,
        );
        let origin = Vec2::new(
            (screen.x - MENU_BUTTON_SIZE.x) / 2.0,
            screen.y / 2.0 + MARGIN,
        );
        draw_button(&game_over.action, origin, MENU_BUTTON_SIZE, true, palette);
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
