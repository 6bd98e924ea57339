//! Inclusive integer ranges rolled against an injected RNG

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Inclusive `[min, max]` range. Generators keep these as configuration and
/// roll a concrete value each time they run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: i32,
    pub max: i32,
}

impl IntRange {
    /// Build a range, swapping the bounds if they were given backwards.
    pub fn new(min: i32, max: i32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn fixed(value: i32) -> Self {
        Self { min: value, max: value }
    }

    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        // Deserialized ranges skip `new`, so order the bounds here too
        let (lo, hi) = (self.min.min(self.max), self.min.max(self.max));
        if lo == hi {
            lo
        } else {
            rng.gen_range(lo..=hi)
        }
    }
}
