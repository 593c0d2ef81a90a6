use ethnum::{AsI256, I256, U256};

use crate::{Result, RewardsError};

/// Add an unsigned 256-bit value to a signed 256-bit value.
///
/// # Parameters
/// - `x` - The signed base value
/// - `y` - The unsigned addend
///
/// # Returns
/// - `Ok`: The exact sum
/// - `Err`: `ArithmeticOverflow` if the sum does not fit an I256
pub fn add_signed_unsigned(x: I256, y: U256) -> Result<I256> {
    let z = x.wrapping_add(y.as_i256());
    // a non-negative addend can only move the result below x by wrapping
    if z < x {
        return Err(RewardsError::ArithmeticOverflow);
    }
    Ok(z)
}

/// Subtract an unsigned 256-bit value from a signed 256-bit value.
///
/// # Parameters
/// - `x` - The signed base value
/// - `y` - The unsigned subtrahend
///
/// # Returns
/// - `Ok`: The exact difference
/// - `Err`: `ArithmeticOverflow` if the difference does not fit an I256
pub fn sub_signed_unsigned(x: I256, y: U256) -> Result<I256> {
    let z = x.wrapping_sub(y.as_i256());
    if z > x {
        return Err(RewardsError::ArithmeticOverflow);
    }
    Ok(z)
}

/// Apply a signed delta to an unsigned 128-bit value, e.g. a net liquidity crossed upwards.
///
/// # Parameters
/// - `x` - The unsigned base value
/// - `y` - The signed delta
///
/// # Returns
/// - `Ok`: `x + y`
/// - `Err`: `ArithmeticOverflow` if the result is negative or exceeds `u128::MAX`
pub fn add_bounded_unsigned_signed(x: u128, y: i128) -> Result<u128> {
    if y >= 0 {
        x.checked_add(y as u128)
    } else {
        x.checked_sub(y.unsigned_abs())
    }
    .ok_or(RewardsError::ArithmeticOverflow)
}

/// Remove a signed delta from an unsigned 128-bit value, e.g. a net liquidity crossed downwards.
///
/// # Parameters
/// - `x` - The unsigned base value
/// - `y` - The signed delta
///
/// # Returns
/// - `Ok`: `x - y`
/// - `Err`: `ArithmeticOverflow` if the result is negative or exceeds `u128::MAX`
pub fn sub_bounded_unsigned_signed(x: u128, y: i128) -> Result<u128> {
    if y >= 0 {
        x.checked_sub(y as u128)
    } else {
        x.checked_add(y.unsigned_abs())
    }
    .ok_or(RewardsError::ArithmeticOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethnum::AsU256;
    use rstest::rstest;

    #[rstest]
    #[case(100, 100, Some(200))]
    #[case(100, 0, Some(100))]
    #[case(100, -100, Some(0))]
    #[case(u128::MAX, 1, None)]
    #[case(0, -1, None)]
    #[case(u128::MAX, i128::MIN, Some(u128::MAX - (1 << 127)))]
    fn test_add_bounded_unsigned_signed(
        #[case] x: u128,
        #[case] y: i128,
        #[case] expected: Option<u128>,
    ) {
        assert_eq!(add_bounded_unsigned_signed(x, y).ok(), expected);
    }

    #[rstest]
    #[case(100, 100, Some(0))]
    #[case(100, -100, Some(200))]
    #[case(0, 1, None)]
    #[case(u128::MAX, -1, None)]
    #[case(0, i128::MIN, Some(1 << 127))]
    fn test_sub_bounded_unsigned_signed(
        #[case] x: u128,
        #[case] y: i128,
        #[case] expected: Option<u128>,
    ) {
        assert_eq!(sub_bounded_unsigned_signed(x, y).ok(), expected);
    }

    #[test]
    fn test_add_signed_unsigned_bounds() {
        assert_eq!(
            add_signed_unsigned(I256::MAX, U256::ONE),
            Err(RewardsError::ArithmeticOverflow)
        );
        assert_eq!(add_signed_unsigned(I256::MIN, U256::MAX), Ok(I256::MAX));
        assert_eq!(
            add_signed_unsigned(I256::ONE, U256::MAX),
            Err(RewardsError::ArithmeticOverflow)
        );
        assert_eq!(
            add_signed_unsigned(I256::MIN, I256::MAX.as_u256()),
            Ok(I256::MINUS_ONE)
        );
        assert_eq!(
            add_signed_unsigned(I256::new(-5), U256::new(7)),
            Ok(I256::new(2))
        );
    }

    #[test]
    fn test_sub_signed_unsigned_bounds() {
        assert_eq!(
            sub_signed_unsigned(I256::MIN, U256::ONE),
            Err(RewardsError::ArithmeticOverflow)
        );
        assert_eq!(
            sub_signed_unsigned(I256::MAX, I256::MAX.as_u256()),
            Ok(I256::ZERO)
        );
        assert_eq!(
            sub_signed_unsigned(I256::new(3), U256::new(10)),
            Ok(I256::new(-7))
        );
    }
}
