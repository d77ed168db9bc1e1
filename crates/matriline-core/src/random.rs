//! Uniform random draws behind every probability gate.
//!
//! The engine never calls `rand` directly. It asks a [`RandomSource`] for a
//! draw in `[0, 1)` and compares it with a probability: `draw < p` means the
//! event happens. Tests swap in a [`ScriptedSource`] to force outcomes.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform draws in `[0, 1)`.
pub trait RandomSource {
    /// Next uniform draw in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Bernoulli gate: `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Integer in `min..=max` from a single draw.
    fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        uniform_int(self.next_f64(), min, max)
    }
}

/// Map one uniform draw onto `min..=max`: `min + floor(u * (max - min + 1))`,
/// clamped to `max`.
pub fn uniform_int(u: f64, min: u32, max: u32) -> u32 {
    if max <= min {
        return min;
    }
    let span = f64::from(max.saturating_sub(min)) + 1.0;
    let offset = (u.clamp(0.0, 1.0) * span).floor();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let offset = offset as u32;
    min.saturating_add(offset).min(max)
}

/// Standard generator, optionally seeded for reproducible sessions.
#[derive(Debug, Clone)]
pub struct SeededSource {
    rng: StdRng,
}

impl SeededSource {
    /// Reproducible source from a 64-bit seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from the thread-local generator.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }
}

impl RandomSource for SeededSource {
    fn next_f64(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Replays a fixed sequence of draws, then repeats a fallback value.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    draws: VecDeque<f64>,
    fallback: f64,
    consumed: usize,
}

impl ScriptedSource {
    /// Replays `draws` in order, then returns `fallback` forever.
    pub fn new(draws: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            fallback: clamp_draw(fallback),
            consumed: 0,
        }
    }

    /// Every draw is `value`.
    pub fn constant(value: f64) -> Self {
        Self::new([], value)
    }

    /// Draws handed out so far.
    pub const fn consumed(&self) -> usize {
        self.consumed
    }

    /// Queue more draws behind the remaining script.
    pub fn push(&mut self, draw: f64) {
        self.draws.push_back(draw);
    }
}

impl RandomSource for ScriptedSource {
    fn next_f64(&mut self) -> f64 {
        self.consumed = self.consumed.saturating_add(1);
        self.draws.pop_front().map_or(self.fallback, clamp_draw)
    }
}

/// Keep scripted draws inside `[0, 1)`.
fn clamp_draw(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0 - f64::EPSILON)
    } else {
        0.0
    }
}
