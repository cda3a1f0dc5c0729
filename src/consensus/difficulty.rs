// Difficulty retargeting, generalized from the teacher's U256-clamp
// technique to a 2016-block window at a 600-second target block time.
use primitive_types::U256;

use crate::primitives::target_from_bits;

pub const DIFFICULTY_WINDOW: u64 = 2016;
pub const TARGET_BLOCK_TIME_SECS: u64 = 600;
const EXPECTED_WINDOW_SECS: u64 = DIFFICULTY_WINDOW * TARGET_BLOCK_TIME_SECS;

/// Encodes a 256-bit target back into compact "bits" form: the smallest byte
/// count that holds the target as the mantissa, with the high byte the
/// exponent. Mirrors the inverse of `target_from_bits`.
pub fn bits_from_target(target: U256) -> u32 {
    if target.is_zero() {
        return 0;
    }
    let mut size = target.bits().div_ceil(8) as i64;
    let mut compact = if size <= 3 {
        (target << (8 * (3 - size)) as u32).low_u32()
    } else {
        (target >> (8 * (size - 3)) as u32).low_u32()
    };
    // Keep the mantissa's sign bit clear so it's never misread as negative.
    if compact & 0x0080_0000 != 0 {
        compact >>= 8;
        size += 1;
    }
    ((size as u32) << 24) | (compact & 0x00FF_FFFF)
}

/// Retargets difficulty given the actual elapsed time (seconds) over the last
/// `DIFFICULTY_WINDOW` blocks, clamped to +/-4x the expected window.
pub fn retarget(old_bits: u32, actual_secs: u64) -> u32 {
    let clamped = actual_secs.clamp(EXPECTED_WINDOW_SECS / 4, EXPECTED_WINDOW_SECS * 4);
    let old_target = target_from_bits(old_bits);
    let actual = U256::from(clamped);
    let expected = U256::from(EXPECTED_WINDOW_SECS);

    let new_target = if actual.is_zero() || U256::MAX / actual < old_target {
        U256::MAX
    } else {
        (old_target * actual / expected).max(U256::one())
    };
    bits_from_target(new_target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_roundtrip_through_target() {
        let bits = 0x1d00_ffff;
        let target = target_from_bits(bits);
        assert_eq!(bits_from_target(target), bits);
    }

    #[test]
    fn test_retarget_unchanged_when_on_schedule() {
        let bits = 0x1d00_ffff;
        let new_bits = retarget(bits, EXPECTED_WINDOW_SECS);
        assert_eq!(new_bits, bits);
    }

    #[test]
    fn test_retarget_eases_when_blocks_slow() {
        let bits = 0x1d00_ffff;
        let eased = retarget(bits, EXPECTED_WINDOW_SECS * 2);
        assert!(target_from_bits(eased) > target_from_bits(bits));
    }

    #[test]
    fn test_retarget_tightens_when_blocks_fast() {
        let bits = 0x1d00_ffff;
        let tightened = retarget(bits, EXPECTED_WINDOW_SECS / 2);
        assert!(target_from_bits(tightened) < target_from_bits(bits));
    }

    #[test]
    fn test_retarget_clamps_to_four_x_ceiling() {
        let bits = 0x1d00_ffff;
        let blown_out = retarget(bits, EXPECTED_WINDOW_SECS * 100);
        let clamped_at_four = retarget(bits, EXPECTED_WINDOW_SECS * 4);
        assert_eq!(blown_out, clamped_at_four);
    }

    #[test]
    fn test_retarget_clamps_to_quarter_floor() {
        let bits = 0x1d00_ffff;
        let blown_in = retarget(bits, 1);
        let clamped_at_quarter = retarget(bits, EXPECTED_WINDOW_SECS / 4);
        assert_eq!(blown_in, clamped_at_quarter);
    }
}
