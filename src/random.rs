//! Random number generation
//!
//! Thin facade over the rand crate which pins the engine and the seeding
//! policy in one place. Toy event generation is the only consumer; nothing
//! in the selection itself is randomized.

use crate::numeric::Float;
use rand::{Rng, SeedableRng};

// Select random number generation engine in use
#[cfg(feature = "f32")]
type Engine = rand_xoshiro::Xoshiro128Plus;
#[cfg(not(feature = "f32"))]
type Engine = rand_xoshiro::Xoshiro256Plus;

/// Random number generator behind a fixed-engine facade
#[derive(Clone)]
pub struct RandomGenerator {
    rng: Engine,
}
//
impl RandomGenerator {
    /// Spawn a generator from an explicit seed
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Engine::seed_from_u64(seed),
        }
    }

    /// Generate a random floating-point number between 0 and 1
    pub fn random(&mut self) -> Float {
        self.rng.gen()
    }

    /// Generate a random number in `[low, high)`
    pub fn random_range(&mut self, low: Float, high: Float) -> Float {
        low + (high - low) * self.random()
    }

    /// Spawn the generator of batch `index`
    ///
    /// Batch streams are separated by generator long-jumps, so they never
    /// overlap regardless of how many numbers a batch draws, and batch
    /// `index` gets the same stream no matter which thread runs it.
    pub fn fork_batch(&self, index: usize) -> Self {
        let mut rng = self.rng.clone();
        for _ in 0..=index {
            rng.long_jump();
        }
        Self { rng }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streams_are_seed_deterministic() {
        let mut first = RandomGenerator::from_seed(12345);
        let mut second = RandomGenerator::from_seed(12345);
        for _ in 0..100 {
            assert_eq!(first.random(), second.random());
        }
        let mut other = RandomGenerator::from_seed(54321);
        assert_ne!(first.random(), other.random());
    }

    #[test]
    fn ranges_stay_in_bounds() {
        let mut rng = RandomGenerator::from_seed(7);
        for _ in 0..1000 {
            let x = rng.random_range(-2.5, 4.);
            assert!((-2.5..4.).contains(&x));
        }
    }

    #[test]
    fn batch_forks_reproduce_by_index() {
        let root = RandomGenerator::from_seed(99);
        let mut batch0 = root.fork_batch(0);
        let mut batch1 = root.fork_batch(1);
        let mut batch0_again = root.fork_batch(0);

        let draws0: Vec<_> = (0..10).map(|_| batch0.random()).collect();
        let draws1: Vec<_> = (0..10).map(|_| batch1.random()).collect();
        let draws0_again: Vec<_> = (0..10).map(|_| batch0_again.random()).collect();

        assert_eq!(draws0, draws0_again);
        assert_ne!(draws0, draws1);
    }
}
