//! Deterministic random number generation for scenario generation.
//!
//! RULE: Nothing in this crate may call a platform RNG. The tick engine
//! itself uses no randomness at all; only generated scenarios do, and
//! they derive every draw from a single u64 seed.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

pub struct ScenarioRng {
    inner: Pcg64Mcg,
}

impl ScenarioRng {
    pub fn new(seed: u64) -> Self {
        Self { inner: Pcg64Mcg::seed_from_u64(seed) }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Roll a u64 in [lo, hi] inclusive.
    pub fn range_inclusive(&mut self, lo: u64, hi: u64) -> u64 {
        assert!(lo <= hi, "empty range {lo}..={hi}");
        lo + self.next_u64_below(hi - lo + 1)
    }

    /// Roll a float in [lo, hi).
    pub fn range_f64(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    pub fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        let idx = self.next_u64_below(items.len() as u64) as usize;
        items[idx]
    }
}
