//! Deterministic RNG oracle.
//!
//! Hit rolls and damage variance draw from a seeded stream so a battle
//! replays identically from its configuration. The default implementation
//! is PCG-XSH-RR: one multiply, a xorshift, and a rotate, with good
//! statistical quality for its size.

/// Deterministic random source. Given the same seed, implementations must
/// produce the same value.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Uniform value in `[min, max]` inclusive.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let span = max - min + 1;
        min + (self.next_u32(seed) % span)
    }
}

/// PCG random number generator (Permuted Congruential Generator),
/// XSH-RR variant: 64-bit LCG state permuted down to 32-bit output.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::output(Self::step(seed))
    }
}

/// Composes a per-draw seed from the battle seed, the monotonically
/// advancing roll counter, the acting entity, and a draw context
/// (0 = hit roll, 1 = variance, ...). Each component occupies distinct bit
/// positions so nearby values do not collide.
pub fn compose_seed(battle_seed: u64, nonce: u64, actor: crate::entity::EntityId, context: u32) -> u64 {
    battle_seed
        ^ nonce.rotate_left(17)
        ^ (actor.0 as u64).rotate_left(41)
        ^ (context as u64).rotate_left(53)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityId;

    #[test]
    fn same_seed_same_value() {
        let rng = PcgRng;
        assert_eq!(rng.next_u32(42), rng.next_u32(42));
        assert_ne!(rng.next_u32(42), rng.next_u32(43));
    }

    #[test]
    fn range_is_inclusive_and_degenerate_safe() {
        let rng = PcgRng;
        for seed in 0..200 {
            let value = rng.range(seed, 0, 100);
            assert!(value <= 100);
        }
        assert_eq!(rng.range(9, 7, 7), 7);
    }

    #[test]
    fn composed_seeds_differ_per_component() {
        let base = compose_seed(1, 0, EntityId(0), 0);
        assert_ne!(base, compose_seed(1, 1, EntityId(0), 0));
        assert_ne!(base, compose_seed(1, 0, EntityId(1), 0));
        assert_ne!(base, compose_seed(1, 0, EntityId(0), 1));
    }
}
