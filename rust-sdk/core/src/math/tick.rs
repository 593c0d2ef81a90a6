use crate::{
    Result, RewardsError, MAX_TICK_INDEX, MIN_TICK_INDEX, TICKS_PER_BITMAP_WORD,
};

/// Compress a tick index by the tick spacing, rounding towards negative infinity.
///
/// # Parameters
/// - `tick_index` - A i32 integer representing the tick integer
/// - `tick_spacing` - A u16 integer representing the tick spacing
///
/// # Returns
/// - A i32 integer representing the compressed tick
pub fn compress_tick(tick_index: i32, tick_spacing: u16) -> i32 {
    tick_index.div_euclid(tick_spacing as i32)
}

/// Split a compressed tick into its bitmap word index and bit position.
///
/// # Parameters
/// - `compressed` - A compressed tick, see `compress_tick`
///
/// # Returns
/// - `Ok`: The word index and the bit position inside that word
/// - `Err`: `TickOutOfBounds` if the word index does not fit an i16
pub fn tick_position(compressed: i32) -> Result<(i16, u8)> {
    let word_pos =
        i16::try_from(compressed >> 8).map_err(|_| RewardsError::TickOutOfBounds(compressed))?;
    Ok((word_pos, (compressed & 0xff) as u8))
}

/// Convert a bitmap word index and bit position back into a tick index.
///
/// # Parameters
/// - `word_pos` - The bitmap word index
/// - `bit_pos` - The bit position inside the word
/// - `tick_spacing` - A u16 integer representing the tick spacing
///
/// # Returns
/// - `Ok`: A i32 integer representing the tick index
/// - `Err`: `TickOutOfBounds` if the tick index does not fit an i32
pub fn tick_from_position(word_pos: i16, bit_pos: u8, tick_spacing: u16) -> Result<i32> {
    let compressed = word_pos as i32 * TICKS_PER_BITMAP_WORD + bit_pos as i32;
    compressed
        .checked_mul(tick_spacing as i32)
        .ok_or(RewardsError::TickOutOfBounds(compressed))
}

/// Check if a tick is in-bounds.
#[allow(clippy::manual_range_contains)]
pub fn is_tick_index_in_bounds(tick_index: i32) -> bool {
    tick_index <= MAX_TICK_INDEX && tick_index >= MIN_TICK_INDEX
}

/// Check if a tick is initializable.
/// A tick is initializable if it is in-bounds and divisible by the tick spacing.
pub fn is_tick_initializable(tick_index: i32, tick_spacing: u16) -> bool {
    is_tick_index_in_bounds(tick_index) && tick_index % tick_spacing as i32 == 0
}

pub(crate) fn check_tick_spacing(tick_spacing: u16) -> Result<u16> {
    if tick_spacing == 0 {
        return Err(RewardsError::InvalidTickSpacing(tick_spacing));
    }
    Ok(tick_spacing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 10, 0)]
    #[case(9, 10, 0)]
    #[case(10, 10, 1)]
    #[case(-1, 10, -1)]
    #[case(-10, 10, -1)]
    #[case(-11, 10, -2)]
    fn test_compress_tick(#[case] tick: i32, #[case] spacing: u16, #[case] expected: i32) {
        assert_eq!(compress_tick(tick, spacing), expected);
    }

    #[rstest]
    #[case(0, (0, 0))]
    #[case(255, (0, 255))]
    #[case(256, (1, 0))]
    #[case(-1, (-1, 255))]
    #[case(-256, (-1, 0))]
    #[case(-257, (-2, 255))]
    fn test_tick_position(#[case] compressed: i32, #[case] expected: (i16, u8)) {
        assert_eq!(tick_position(compressed), Ok(expected));
    }

    #[rstest]
    #[case(1 << 23)]
    #[case(-(1 << 23) - 1)]
    #[case(i32::MAX)]
    #[case(i32::MIN)]
    fn test_tick_position_outside_word_range(#[case] compressed: i32) {
        assert_eq!(
            tick_position(compressed),
            Err(RewardsError::TickOutOfBounds(compressed))
        );
    }

    #[test]
    fn test_tick_from_position_overflow() {
        assert_eq!(tick_from_position(i16::MAX, 255, 1), Ok(8_388_607));
        assert_eq!(
            tick_from_position(i16::MAX, 255, 1000),
            Err(RewardsError::TickOutOfBounds(8_388_607))
        );
    }

    #[test]
    fn test_position_round_trip() {
        for tick in [-887272, -60, -1, 0, 1, 60, 887272] {
            for spacing in [1u16, 10, 60, 200] {
                let (word, bit) = tick_position(compress_tick(tick, spacing)).unwrap();
                let restored = tick_from_position(word, bit, spacing).unwrap();
                assert!(restored <= tick);
                assert!(tick - restored < spacing as i32);
            }
        }
    }

    #[test]
    fn test_tick_bounds() {
        assert!(is_tick_index_in_bounds(MAX_TICK_INDEX));
        assert!(is_tick_index_in_bounds(MIN_TICK_INDEX));
        assert!(!is_tick_index_in_bounds(MAX_TICK_INDEX + 1));
        assert!(!is_tick_index_in_bounds(MIN_TICK_INDEX - 1));
        assert!(is_tick_initializable(-120, 60));
        assert!(!is_tick_initializable(-121, 60));
    }

    #[test]
    fn test_zero_tick_spacing_is_rejected() {
        assert_eq!(
            check_tick_spacing(0),
            Err(RewardsError::InvalidTickSpacing(0))
        );
        assert_eq!(check_tick_spacing(60), Ok(60));
    }
}
