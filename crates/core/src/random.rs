//! Pluggable randomness
//!
//! Two things in the laboratory are random: the characteristic volatility an
//! ingredient receives at creation, and the oven's setpoint jitter. Both draw
//! from a [`RandomSource`] so tests can pin them down.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// Source of uniformly distributed values in `[0, 1)`
pub trait RandomSource: fmt::Debug {
    /// Next value in `[0, 1)`
    fn next_unit(&mut self) -> f64;
}

/// Draws from rand's thread-local generator
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&mut self) -> f64 {
        rand::rng().random::<f64>()
    }
}

/// Reproducible generator seeded from a `u64`
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Always yields the same value
///
/// `FixedRandom(0.5)` is the neutral draw: no volatility spread and no oven
/// jitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRandom(pub f64);

impl FixedRandom {
    /// The draw that cancels every random perturbation
    pub const NEUTRAL: FixedRandom = FixedRandom(0.5);
}

impl RandomSource for FixedRandom {
    fn next_unit(&mut self) -> f64 {
        self.0.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
