//! Deterministic lane and fallback randomness.
//!
//! A linear congruential generator with the GCC constants. The engine stores
//! the raw seed in every snapshot and advances it exactly once per tick, so
//! every draw made while handling one event sees the same value. Replays rely
//! on this: the same seed and the same event order give the same game.

/// LCG modulus (2^31).
pub const M: u64 = 0x8000_0000;
/// LCG multiplier.
pub const A: u64 = 1_103_515_245;
/// LCG increment.
pub const C: u64 = 12_345;

/// Advances a seed by one step.
pub fn hash(seed: u32) -> u32 {
    ((A * seed as u64 + C) % M) as u32
}

/// Maps a hash onto the unit interval.
///
/// `M - 1` maps to exactly `1.0`; [`pick_index`] saturates for that case.
pub fn scale(hash: u32) -> f64 {
    hash as f64 / (M - 1) as f64
}

/// Picks an index in `0..len` from the current seed. Returns 0 for `len == 0`.
pub fn pick_index(seed: u32, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    ((scale(seed) * len as f64).floor() as usize).min(len - 1)
}

/// Picks a float in `[0, max)` from the current seed. Saturates just below
/// `max`, like [`pick_index`] does for `M - 1`.
pub fn pick_float(seed: u32, max: f64) -> f64 {
    let value = scale(seed) * max;
    if value >= max {
        max * (1.0 - f64::EPSILON)
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut a = 42;
        let mut b = 42;
        for _ in 0..1000 {
            a = hash(a);
            b = hash(b);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_known_sequence() {
        // (1103515245 * 10 + 12345) mod 2^31
        assert_eq!(hash(10), 297_746_555);
        assert_eq!(hash(0), 12_345);
    }

    #[test]
    fn test_hash_stays_below_modulus() {
        let mut seed = 10;
        for _ in 0..10_000 {
            seed = hash(seed);
            assert!((seed as u64) < M);
        }
    }

    #[test]
    fn test_scale_bounded_and_monotonic() {
        let mut seed = 7;
        let mut values = Vec::new();
        for _ in 0..500 {
            seed = hash(seed);
            let v = scale(seed);
            assert!((0.0..1.0).contains(&v));
            values.push((seed, v));
        }
        values.sort_by_key(|(h, _)| *h);
        for pair in values.windows(2) {
            assert!(pair[0].1 <= pair[1].1);
        }
        assert_eq!(scale(0), 0.0);
    }

    #[test]
    fn test_pick_index_saturates() {
        assert_eq!(pick_index((M - 1) as u32, 4), 3);
        assert_eq!(pick_index(0, 4), 0);
        assert_eq!(pick_index(123, 0), 0);
        for seed in [1, 99, 1 << 20, 1 << 30] {
            assert!(pick_index(seed, 4) < 4);
        }
    }

    #[test]
    fn test_pick_float_range() {
        let mut seed = 10;
        for _ in 0..200 {
            seed = hash(seed);
            let d = pick_float(seed, 0.5);
            assert!((0.0..0.5).contains(&d));
        }
    }

    #[test]
    fn test_pick_float_saturates_below_max() {
        let top = pick_float((M - 1) as u32, 0.5);
        assert!(top < 0.5);
        assert!(top > 0.499_999);
        assert_eq!(pick_float(0, 0.5), 0.0);
        assert_eq!(pick_float(123, 0.0), 0.0);
    }
}
