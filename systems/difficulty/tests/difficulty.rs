use std::time::Duration;

use falling_words_core::LengthWeights;
use falling_words_system_difficulty::{calculate_level, DifficultyTable, TIER_COUNT};

#[test]
fn level_follows_integer_square_root_of_score() {
    let cases = [(0, 0), (1, 1), (3, 1), (4, 2), (8, 2), (9, 3), (99, 9), (100, 10)];

    for (score, expected) in cases {
        assert_eq!(calculate_level(score), expected, "score {score}");
    }
}

#[test]
fn level_matches_floating_point_reference_for_small_scores() {
    for score in 0..10_000_u32 {
        let expected = f64::from(score).sqrt().floor() as u32;
        assert_eq!(calculate_level(score), expected, "score {score}");
    }
}

#[test]
fn tabled_levels_resolve_verbatim() {
    let table = DifficultyTable::standard();

    for level in 0..TIER_COUNT as u32 {
        assert_eq!(table.resolve(level), table.tiers()[level as usize]);
    }

    let level_three = table.resolve(3);
    assert_eq!(level_three.spawn_delay(), Duration::from_millis(5_000));
    assert_eq!(
        level_three.length_weights(),
        LengthWeights::new([0.5, 0.5, 0.0, 0.0])
    );
}

#[test]
fn standard_table_matches_tuned_delays() {
    let delays: Vec<u64> = DifficultyTable::standard()
        .tiers()
        .iter()
        .map(|tier| tier.spawn_delay().as_millis() as u64)
        .collect();

    assert_eq!(
        delays,
        vec![5_000, 5_000, 4_000, 5_000, 4_000, 3_000, 4_000, 3_000, 4_000, 3_000, 3_000]
    );
}

#[test]
fn levels_past_the_table_shorten_delay_down_to_the_floor() {
    let table = DifficultyTable::standard();
    let last_weights = table.tiers()[TIER_COUNT - 1].length_weights();

    for level in 11..=60_u32 {
        let tier = table.resolve(level);
        let expected_ms = 3_000_i64 - i64::from(level - 10) * 100;
        let expected = Duration::from_millis(expected_ms.max(1_000) as u64);

        assert_eq!(tier.spawn_delay(), expected, "level {level}");
        assert_eq!(tier.length_weights(), last_weights, "level {level}");
    }

    assert_eq!(table.resolve(15).spawn_delay(), Duration::from_millis(2_500));
    assert_eq!(table.resolve(20).spawn_delay(), Duration::from_millis(1_000));
    assert_eq!(table.resolve(30).spawn_delay(), Duration::from_millis(1_000));
}
