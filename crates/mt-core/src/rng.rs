//! Seeded random sources for spawning passengers.
//!
//! # Determinism strategy
//!
//! Each passenger's spawn and destination cells are drawn from a `SmallRng`
//! seeded by:
//!
//!   seed = global_seed XOR (passenger_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive ids uniformly across the seed space.  Where a
//! passenger starts and where it heads therefore depend only on the seed and
//! its id, never on thread scheduling.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::PassengerId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Picks one passenger's spawn and destination cells.
pub struct AgentRng(SmallRng);

impl AgentRng {
    pub fn new(global_seed: u64, passenger: PassengerId) -> Self {
        let seed = global_seed ^ (passenger.0 as u64).wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    /// `None` if `cells` is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, cells: &'a [T]) -> Option<&'a T> {
        cells.choose(&mut self.0)
    }
}

/// Jitter for the demo driver's spawn gaps.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}
