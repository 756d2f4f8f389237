//! Seedable random source for gameplay decisions (shuffles, tutorial picks).

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG: the same seed replays the same shuffles and picks.
#[derive(Debug, Clone)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Seed used by tests and by hosts that do not supply one.
    pub const DEFAULT_SEED: u64 = 42;

    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this generator was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform integer in `[0, upper)`. Returns 0 when `upper` is 0.
    pub fn below(&mut self, upper: usize) -> usize {
        if upper == 0 {
            0
        } else {
            self.inner.gen_range(0..upper)
        }
    }

    /// Fisher–Yates shuffle in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }

    /// Uniformly pick one element.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.inner)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEED)
    }
}
