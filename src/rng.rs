//! Seeded random helpers
//!
//! Every random decision in a session flows through one [`GameRng`], so a
//! session built with the same seed and fed the same inputs replays the same.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Session random source
#[derive(Debug, Clone)]
pub struct GameRng {
    seed: u64,
    inner: Pcg32,
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform float in `[min, max)`; returns `min` for an empty range
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.inner.random_range(min..max)
    }

    /// Uniform index into a collection of `len` items
    pub fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.inner.random_range(0..len)
    }

    /// Uniform angle in `[0, 2π)`
    pub fn angle(&mut self) -> f32 {
        self.range(0.0, std::f32::consts::TAU)
    }

    /// Weighted pick over `items` in their given order.
    ///
    /// Draws `r` in `[0, total)`, subtracts each weight in turn and returns the
    /// first item where `r` drops to or below zero. Zero weights are never
    /// picked unless every weight is zero. Returns `None` only for an empty
    /// slice.
    pub fn weighted<'a, T>(&mut self, items: &'a [T], weight: impl Fn(&T) -> f32) -> Option<&'a T> {
        let first = items.first()?;
        let total: f32 = items.iter().map(|i| weight(i).max(0.0)).sum();
        if total <= 0.0 {
            return Some(first);
        }
        let mut r = self.range(0.0, total);
        let mut last = first;
        for item in items {
            let w = weight(item);
            if w <= 0.0 {
                continue;
            }
            last = item;
            r -= w;
            if r <= 0.0 {
                return Some(item);
            }
        }
        Some(last)
    }

    /// Fisher-Yates shuffle in place
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }
}
