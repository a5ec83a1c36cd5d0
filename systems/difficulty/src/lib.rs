#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Difficulty table and resolver mapping levels to spawn cadence and word mix.

use std::time::Duration;

use falling_words_core::{DifficultyTier, LengthWeights};

/// Number of hand-tuned tiers; levels past the last one are extrapolated.
pub const TIER_COUNT: usize = 11;

/// Shortest spawn delay reachable through extrapolation.
pub const SPAWN_DELAY_FLOOR: Duration = Duration::from_millis(1_000);

/// Spawn delay removed for every level past the last hand-tuned tier.
pub const EXTRAPOLATION_STEP: Duration = Duration::from_millis(100);

const THIRD: f64 = 1.0 / 3.0;

const STANDARD_TIERS: [DifficultyTier; TIER_COUNT] = [
    tier(5_000, [1.0, 0.0, 0.0, 0.0]),
    tier(5_000, [1.0, 0.0, 0.0, 0.0]),
    tier(4_000, [1.0, 0.0, 0.0, 0.0]),
    tier(5_000, [0.5, 0.5, 0.0, 0.0]),
    tier(4_000, [0.5, 0.5, 0.0, 0.0]),
    tier(3_000, [0.5, 0.5, 0.0, 0.0]),
    tier(4_000, [THIRD, THIRD, THIRD, 0.0]),
    tier(3_000, [THIRD, THIRD, THIRD, 0.0]),
    tier(4_000, [0.25, 0.25, 0.25, 0.25]),
    tier(3_000, [0.25, 0.25, 0.25, 0.25]),
    tier(3_000, [0.1, 0.2, 0.3, 0.4]),
];

const fn tier(delay_ms: u64, weights: [f64; 4]) -> DifficultyTier {
    DifficultyTier::new(
        Duration::from_millis(delay_ms),
        LengthWeights::new(weights),
    )
}

/// Converts a score into a level using perfect squares: `floor(sqrt(score))`.
#[must_use]
pub fn calculate_level(score: u32) -> u32 {
    let score = u64::from(score);
    let mut level = (score as f64).sqrt() as u64;
    while level * level > score {
        level -= 1;
    }
    while (level + 1) * (level + 1) <= score {
        level += 1;
    }
    // sqrt(u32::MAX) < 2^16, so the level always fits.
    level as u32
}

/// Fixed sequence of difficulty tiers indexed by level.
#[derive(Clone, Debug, PartialEq)]
pub struct DifficultyTable {
    tiers: [DifficultyTier; TIER_COUNT],
}

impl DifficultyTable {
    /// Creates a table from explicit tiers, ordered from level 0 upwards.
    #[must_use]
    pub const fn new(tiers: [DifficultyTier; TIER_COUNT]) -> Self {
        Self { tiers }
    }

    /// Table shipped with the game.
    #[must_use]
    pub const fn standard() -> Self {
        Self::new(STANDARD_TIERS)
    }

    /// Hand-tuned tiers in level order.
    #[must_use]
    pub fn tiers(&self) -> &[DifficultyTier] {
        &self.tiers
    }

    /// Resolves the tier for `level`.
    ///
    /// Levels covered by the table are returned verbatim. Higher levels keep
    /// the last tier's length weights and shorten its spawn delay by
    /// [`EXTRAPOLATION_STEP`] per level, never going below
    /// [`SPAWN_DELAY_FLOOR`].
    #[must_use]
    pub fn resolve(&self, level: u32) -> DifficultyTier {
        match usize::try_from(level)
            .ok()
            .and_then(|index| self.tiers.get(index))
        {
            Some(tier) => *tier,
            None => self.extrapolate(level),
        }
    }

    fn extrapolate(&self, level: u32) -> DifficultyTier {
        let last = self.tiers[TIER_COUNT - 1];
        let beyond = level.saturating_sub(TIER_COUNT as u32 - 1);
        let reduction = EXTRAPOLATION_STEP.saturating_mul(beyond);
        let spawn_delay = last
            .spawn_delay()
            .saturating_sub(reduction)
            .max(SPAWN_DELAY_FLOOR);
        DifficultyTier::new(spawn_delay, last.length_weights())
    }
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self::standard()
    }
}
