//! 32-bit and seeded 64-bit hashes over base values.
//!
//! Values that compare equal hash equally: an `i32` and an `i64` holding the
//! same number share a hash, and `0.0`/`-0.0` hash alike, as do all NaNs.
use rustc_hash::FxHasher;
use std::hash::Hasher;

/// Fold the high half of a 64-bit integer into its low half so that values
/// fitting in 32 bits hash the same whatever their width.
fn fold_int(value: i64) -> u32 {
    let lohalf = value as u32;
    let hihalf = (value >> 32) as u32;
    if value >= 0 {
        lohalf ^ hihalf
    } else {
        lohalf ^ !hihalf
    }
}

fn finish32(hasher: FxHasher) -> u32 {
    let h = hasher.finish();
    (h ^ (h >> 32)) as u32
}

fn seeded(seed: u64) -> FxHasher {
    let mut hasher = FxHasher::default();
    hasher.write_u64(seed);
    hasher
}

pub fn hash_int(value: i64) -> u32 {
    let mut hasher = FxHasher::default();
    hasher.write_u32(fold_int(value));
    finish32(hasher)
}

pub fn hash_int_extended(value: i64, seed: u64) -> u64 {
    let mut hasher = seeded(seed);
    hasher.write_u32(fold_int(value));
    hasher.finish()
}

pub fn hash_bool(value: bool) -> u32 {
    hash_int(value as i64)
}

fn canonical_float_bits(value: f64) -> u64 {
    if value.is_nan() {
        f64::NAN.to_bits()
    } else {
        value.to_bits()
    }
}

pub fn hash_float(value: f64) -> u32 {
    // -0.0 == 0.0, so both must land on the same hash
    if value == 0.0 {
        return 0;
    }
    let mut hasher = FxHasher::default();
    hasher.write_u64(canonical_float_bits(value));
    finish32(hasher)
}

pub fn hash_float_extended(value: f64, seed: u64) -> u64 {
    if value == 0.0 {
        return seed;
    }
    let mut hasher = seeded(seed);
    hasher.write_u64(canonical_float_bits(value));
    hasher.finish()
}

pub fn hash_text(value: &str) -> u32 {
    let mut hasher = FxHasher::default();
    hasher.write(value.as_bytes());
    hasher.write_u8(0xff);
    finish32(hasher)
}

pub fn hash_text_extended(value: &str, seed: u64) -> u64 {
    let mut hasher = seeded(seed);
    hasher.write(value.as_bytes());
    hasher.write_u8(0xff);
    hasher.finish()
}

/// Combine two 32-bit hashes, order sensitive.
pub fn combine32(a: u32, b: u32) -> u32 {
    a ^ b
        .wrapping_add(0x9e37_79b9)
        .wrapping_add(a << 6)
        .wrapping_add(a >> 2)
}

/// Combine two 64-bit hashes, order sensitive.
pub fn combine64(a: u64, b: u64) -> u64 {
    a ^ b
        .wrapping_add(0x9e37_79b9_7f4a_7c15)
        .wrapping_add(a << 12)
        .wrapping_add(a >> 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_width_independent() {
        assert_eq!(hash_int(42), hash_int(42i32 as i64));
        assert_eq!(hash_int(-7), hash_int(-7i32 as i64));
        assert_eq!(hash_int_extended(-7, 3), hash_int_extended(-7i32 as i64, 3));
    }

    #[test]
    fn test_fold_matches_low_half_for_small_values() {
        assert_eq!(fold_int(5), 5);
        assert_eq!(fold_int(-1), u32::MAX ^ !u32::MAX);
    }

    #[test]
    fn test_float_zero_and_nan() {
        assert_eq!(hash_float(0.0), hash_float(-0.0));
        assert_eq!(hash_float(0.0), 0);
        assert_eq!(hash_float(f64::NAN), hash_float(-f64::NAN));
        assert_eq!(hash_float_extended(-0.0, 9), 9);
    }

    #[test]
    fn test_seed_changes_extended_hash() {
        assert_ne!(hash_int_extended(10, 1), hash_int_extended(10, 2));
        assert_ne!(hash_text_extended("abc", 1), hash_text_extended("abc", 2));
    }

    #[test]
    fn test_text_hash_distinguishes_values() {
        assert_eq!(hash_text("abc"), hash_text("abc"));
        assert_ne!(hash_text("abc"), hash_text("abd"));
    }
}
