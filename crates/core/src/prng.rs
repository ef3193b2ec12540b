//! Deterministic PRNG based on the Xorshift64 algorithm.
//!
//! Every random draw a field makes (spawn position, radius, velocity) goes
//! through one seeded generator, so a seed plus a config replays a run
//! frame-for-frame on any platform.

use serde::{Deserialize, Serialize};

/// Xorshift64 PRNG with the standard (13, 7, 17) shifts.
///
/// A seed of 0 is replaced with a non-zero fallback, since zero is a fixed
/// point of the algorithm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    /// Creates a new PRNG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Advances the state and returns the next 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Returns a uniformly distributed f64 in [0, 1) using the upper 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Returns a uniformly distributed f64 in [min, max).
    ///
    /// A degenerate range (`min == max`) always yields `min`.
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Returns a value in `[-bound, bound)`; exactly 0.0 when `bound` is 0.
    pub fn next_signed(&mut self, bound: f64) -> f64 {
        self.next_range(-bound, bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_u64_produces_known_golden_value_for_seed_42() {
        // If this breaks, every recorded seed replays differently.
        let mut rng = Xorshift64::new(42);
        assert_eq!(rng.next_u64(), 45_454_805_674);
    }

    #[test]
    fn seed_zero_does_not_produce_all_zeros() {
        let mut rng = Xorshift64::new(0);
        assert_ne!(rng.next_u64(), 0, "seed=0 guard failed");
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn two_instances_with_same_seed_produce_identical_sequences() {
        let mut rng_a = Xorshift64::new(42);
        let mut rng_b = Xorshift64::new(42);
        for i in 0..1000 {
            assert_eq!(
                rng_a.next_u64(),
                rng_b.next_u64(),
                "sequences diverged at index {i}"
            );
        }
    }

    #[test]
    fn next_range_with_empty_range_returns_min() {
        let mut rng = Xorshift64::new(3);
        for _ in 0..100 {
            assert_eq!(rng.next_range(0.0, 0.0), 0.0);
        }
    }

    #[test]
    fn next_signed_zero_bound_is_exactly_zero() {
        let mut rng = Xorshift64::new(11);
        for _ in 0..100 {
            assert_eq!(rng.next_signed(0.0).abs(), 0.0);
        }
    }

    #[test]
    fn next_signed_covers_both_signs() {
        let mut rng = Xorshift64::new(12345);
        let draws: Vec<f64> = (0..1000).map(|_| rng.next_signed(2.0)).collect();
        assert!(draws.iter().any(|&v| v < 0.0));
        assert!(draws.iter().any(|&v| v > 0.0));
    }

    #[test]
    fn serialization_roundtrip_preserves_state() {
        let mut rng = Xorshift64::new(42);
        for _ in 0..50 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: Xorshift64 = serde_json::from_str(&json).unwrap();
        for i in 0..100 {
            assert_eq!(
                rng.next_u64(),
                restored.next_u64(),
                "sequences diverged after deserialization at index {i}"
            );
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn next_f64_in_unit_interval_for_any_seed(seed: u64) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_f64();
                    prop_assert!((0.0..1.0).contains(&v), "next_f64() = {v} for seed {seed}");
                }
            }

            #[test]
            fn next_signed_in_bounds_for_any_seed(seed: u64, bound in 0.001_f64..1e3) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_signed(bound);
                    prop_assert!(v >= -bound && v < bound, "next_signed({bound}) = {v}");
                }
            }
        }
    }
}
