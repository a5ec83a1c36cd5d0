//! Horizontal placement of falling words.

use std::{collections::HashMap, time::Duration};

use falling_words_core::WordId;
use falling_words_rendering::MAX_LANE;
use falling_words_session::SessionObserver;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Observer assigning every spawned word a random lane.
#[derive(Debug)]
pub(crate) struct LaneAssigner {
    rng: ChaCha8Rng,
    lanes: HashMap<WordId, f32>,
}

impl LaneAssigner {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            lanes: HashMap::new(),
        }
    }

    /// Lane of a falling word as a fraction of the play area width.
    pub(crate) fn lane(&self, word: WordId) -> Option<f32> {
        self.lanes.get(&word).copied()
    }
}

impl SessionObserver for LaneAssigner {
    fn word_spawned(&mut self, word: WordId, _text: &str, _fall_duration: Duration) {
        let lane = self.rng.gen_range(0.0..=MAX_LANE);
        let _ = self.lanes.insert(word, lane);
    }

    fn word_removed(&mut self, word: WordId) {
        let _ = self.lanes.remove(&word);
    }

    fn game_over(&mut self) {
        log::debug!("{} words left on screen", self.lanes.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lanes_stay_in_the_left_part_of_the_area() {
        let mut lanes = LaneAssigner::new(3);
        for id in 0..500 {
            lanes.word_spawned(WordId::new(id), "cat", Duration::from_secs(8));
        }

        for id in 0..500 {
            let lane = lanes.lane(WordId::new(id)).expect("lane assigned");
            assert!((0.0..=MAX_LANE).contains(&lane), "lane {lane}");
        }
    }

    #[test]
    fn removed_words_forget_their_lane() {
        let mut lanes = LaneAssigner::new(3);
        lanes.word_spawned(WordId::new(7), "dog", Duration::from_secs(8));
        lanes.word_removed(WordId::new(7));

        assert_eq!(lanes.lane(WordId::new(7)), None);
    }
}
