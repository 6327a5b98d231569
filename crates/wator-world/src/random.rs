//! Injectable randomness.
//!
//! One source drives both the activation shuffle and every "pick one of N"
//! decision of a chronon, so a seed fully determines a run.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

pub trait RandomSource {
    /// Uniform index in `0..len`. Callers never pass zero.
    fn pick(&mut self, len: usize) -> usize;

    /// Uniform in-place permutation (Fisher-Yates driven by [`pick`](Self::pick))
    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.pick(i + 1);
            items.swap(i, j);
        }
    }
}

impl RandomSource for ChaCha8Rng {
    fn pick(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(self);
    }
}

/// The generator used when a configuration supplies only a seed
pub fn seeded(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Replays scripted picks, then always answers 0.
///
/// With an empty script every choice lands on the first candidate, and the
/// shuffle reverses a two-element list.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    picks: VecDeque<usize>,
}

impl ScriptedRandom {
    pub fn new(picks: impl IntoIterator<Item = usize>) -> Self {
        Self {
            picks: picks.into_iter().collect(),
        }
    }

    /// Always choose the first candidate
    pub fn first_choice() -> Self {
        Self::default()
    }

    pub fn remaining(&self) -> usize {
        self.picks.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn pick(&mut self, len: usize) -> usize {
        // Out-of-range script entries are clamped onto the last candidate
        self.picks
            .pop_front()
            .map(|pick| pick.min(len.saturating_sub(1)))
            .unwrap_or(0)
    }
}
