//! Deterministic random source for every resolver.
//!
//! The engine draws all entropy from a 32-bit linear congruential generator.
//! Same seed + same call sequence produces bit-identical draws on every
//! platform, which is what golden-master and balance runs rely on.

use rand::{Error, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

/// Source of uniform draws in `[0, 1)`.
///
/// `GameFlow` is generic over this trait so tests can script exact dice.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;

    /// Roll one die with `sides` faces (1..=sides).
    #[inline]
    fn roll(&mut self, sides: u32) -> u32 {
        (self.next_unit() * sides as f64).floor() as u32 + 1
    }
}

/// Numerical Recipes LCG: `state' = state * 1664525 + 1013904223 (mod 2^32)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    const MULTIPLIER: u32 = 1_664_525;
    const INCREMENT: u32 = 1_013_904_223;
    const SCALE: f64 = 4_294_967_296.0; // 2^32

    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Current internal state. Feeding it back into `Lcg::new` resumes the sequence.
    pub fn state(&self) -> u32 {
        self.state
    }

    #[inline]
    fn step(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(Self::MULTIPLIER).wrapping_add(Self::INCREMENT);
        self.state
    }
}

impl RandomSource for Lcg {
    #[inline]
    fn next_unit(&mut self) -> f64 {
        self.step() as f64 / Self::SCALE
    }
}

impl RngCore for Lcg {
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.step() as u64;
        let lo = self.step() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Lcg {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{any, prop_assert, proptest};

    #[test]
    fn test_known_sequence() {
        let mut rng = Lcg::new(0);
        assert_eq!(rng.next_u32(), 1_013_904_223);
        assert_eq!(rng.next_u32(), 1_196_435_762);
    }

    #[test]
    fn test_same_seed_same_draws() {
        let mut a = Lcg::new(1337);
        let mut b = Lcg::new(1337);
        for _ in 0..1000 {
            assert_eq!(a.next_unit().to_bits(), b.next_unit().to_bits());
        }
    }

    #[test]
    fn test_state_resumes_sequence() {
        let mut a = Lcg::new(7);
        a.next_unit();
        a.next_unit();
        let mut resumed = Lcg::new(a.state());
        assert_eq!(a.next_u32(), resumed.next_u32());
    }

    #[test]
    fn test_seedable_matches_new() {
        let mut a = Lcg::from_seed(42u32.to_le_bytes());
        let mut b = Lcg::new(42);
        assert_eq!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn test_scripted_faces() {
        let mut rng = scripted::ScriptedRng::new(&scripted::ScriptedRng::dice(1, 20));
        assert_eq!(rng.roll(20), 1);
        assert_eq!(rng.roll(20), 20);
        assert_eq!(rng.remaining(), 0);
    }

    proptest! {
        #[test]
        fn prop_unit_in_range(seed in any::<u32>()) {
            let mut rng = Lcg::new(seed);
            for _ in 0..64 {
                let u = rng.next_unit();
                prop_assert!((0.0..1.0).contains(&u));
            }
        }

        #[test]
        fn prop_d20_in_range(seed in any::<u32>()) {
            let mut rng = Lcg::new(seed);
            for _ in 0..64 {
                let d = rng.roll(20);
                prop_assert!((1..=20).contains(&d));
            }
        }
    }
}
