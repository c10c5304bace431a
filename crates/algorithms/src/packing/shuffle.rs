//! Permutation strategies for binding grid points to features
//!
//! Assignment asks a [`Shuffler`] for a permutation of feature positions.
//! Production runs use [`RandomShuffle`]; tests inject [`IdentityShuffle`]
//! or their own implementation to make the mapping predictable.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Source of permutations of `0..len`.
pub trait Shuffler {
    /// Return `0..len` in some order. Every index must appear exactly once.
    fn permutation(&mut self, len: usize) -> Vec<usize>;
}

/// Uniformly random permutations (Fisher-Yates over a `StdRng`).
#[derive(Debug, Clone)]
pub struct RandomShuffle {
    rng: StdRng,
}

impl RandomShuffle {
    /// Reproducible stream of permutations
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for RandomShuffle {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl Shuffler for RandomShuffle {
    fn permutation(&mut self, len: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(&mut self.rng);
        order
    }
}

/// Keeps features in their input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityShuffle;

impl Shuffler for IdentityShuffle {
    fn permutation(&mut self, len: usize) -> Vec<usize> {
        (0..len).collect()
    }
}

impl<S: Shuffler + ?Sized> Shuffler for &mut S {
    fn permutation(&mut self, len: usize) -> Vec<usize> {
        (**self).permutation(len)
    }
}
