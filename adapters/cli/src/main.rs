#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Falling Words experience.

mod app;
mod lanes;

use std::{
    path::PathBuf,
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use falling_words_core::{GameMode, GAME_TITLE, LEVEL_SELECT_COUNT};
use falling_words_rendering::{Presentation, RenderingBackend};
use falling_words_rendering_macroquad::MacroquadBackend;
use falling_words_session::{SessionConfig, DEFAULT_RNG_SEED};
use falling_words_system_records::FileStore;
use falling_words_system_word_bank::WordBank;

use crate::app::App;

/// Command-line arguments accepted by the game.
#[derive(Debug, Parser)]
#[command(name = "falling-words")]
#[command(about = "Type the falling words before they reach the bottom")]
struct CliArgs {
    /// Newline-separated word list.
    #[arg(long, value_name = "PATH", default_value = "assets/words.txt")]
    words: PathBuf,
    /// TOML file holding the high score and theme.
    #[arg(long, value_name = "PATH", default_value = "falling-words.toml")]
    prefs: PathBuf,
    /// Skip the menu: 0 starts Adventure mode, 1 to 30 a fixed level.
    #[arg(
        long,
        value_name = "N",
        value_parser = clap::value_parser!(u32).range(0..=i64::from(LEVEL_SELECT_COUNT))
    )]
    level: Option<u32>,
    /// Seed of the word selection; defaults to the system clock.
    #[arg(long, value_name = "N")]
    seed: Option<u64>,
    /// Time a word takes to fall, in milliseconds.
    #[arg(
        long,
        value_name = "MS",
        default_value_t = 8_000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    fall_duration_ms: u64,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long, value_name = "BOOL", default_value_t = true, action = ArgAction::Set)]
    vsync: bool,
    /// Print frame timing once per second.
    #[arg(long, default_value_t = false)]
    show_fps: bool,
}

impl CliArgs {
    fn start_mode(&self) -> Option<GameMode> {
        self.level.map(|level| match level {
            0 => GameMode::Adventure,
            level => GameMode::FixedLevel(level),
        })
    }

    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            fall_duration: Duration::from_millis(self.fall_duration_ms),
            rng_seed: self.seed.unwrap_or_else(clock_seed),
            ..SessionConfig::default()
        }
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(DEFAULT_RNG_SEED, |elapsed| elapsed.as_nanos() as u64)
}

/// Entry point for the Falling Words command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    run(CliArgs::parse())
}

fn run(args: CliArgs) -> Result<()> {
    let bank = WordBank::from_path(&args.words)
        .with_context(|| format!("cannot start without a word list ({})", args.words.display()))?;
    let store = FileStore::new(&args.prefs);
    log::info!("preferences stored in {}", store.path().display());

    let config = args.session_config();
    log::info!(
        "seed {} with words falling for {:?}",
        config.rng_seed,
        config.fall_duration
    );
    let mut app = App::new(
        Arc::new(bank),
        store,
        config,
        args.start_mode(),
    );

    let presentation = Presentation::new(GAME_TITLE, app.scene());
    MacroquadBackend::new()
        .with_vsync(args.vsync)
        .with_show_fps(args.show_fps)
        .run(presentation, move |dt, input, scene| {
            app.update(dt, &input);
            *scene = app.scene();
        })
}
