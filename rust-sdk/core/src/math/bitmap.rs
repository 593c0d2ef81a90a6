use ethnum::U256;

use crate::MAX_BIT_POSITION;

/// Find the lowest set bit at or above `bit_pos` in a bitmap word.
///
/// # Parameters
/// - `word` - The 256-bit bitmap word
/// - `bit_pos` - The bit position to start searching from (inclusive)
///
/// # Returns
/// - `(true, pos)` for the nearest set bit at or above `bit_pos`
/// - `(false, 255)` if no such bit exists in the word
pub fn next_bit_pos_gte(word: U256, bit_pos: u8) -> (bool, u8) {
    let relative = word >> u32::from(bit_pos);
    if relative == U256::ZERO {
        return (false, MAX_BIT_POSITION);
    }
    (true, bit_pos + relative.trailing_zeros() as u8)
}

/// Find the highest set bit at or below `bit_pos` in a bitmap word.
///
/// # Parameters
/// - `word` - The 256-bit bitmap word
/// - `bit_pos` - The bit position to start searching from (inclusive)
///
/// # Returns
/// - `(true, pos)` for the nearest set bit at or below `bit_pos`
/// - `(false, 0)` if no such bit exists in the word
pub fn next_bit_pos_lte(word: U256, bit_pos: u8) -> (bool, u8) {
    let relative = word << u32::from(MAX_BIT_POSITION - bit_pos);
    if relative == U256::ZERO {
        return (false, 0);
    }
    (true, bit_pos - relative.leading_zeros() as u8)
}
