use ethnum::U256;

use crate::{Result, RewardsError, WAD};

/// Reward density of `amount` spread over `liquidity`, as a WAD-scaled value.
/// Flat division: a zero liquidity yields zero growth rather than a fault.
///
/// # Parameters
/// - `amount` - The reward quantity
/// - `liquidity` - The liquidity the reward is spread over
///
/// # Returns
/// - `amount * WAD / liquidity`, or zero if `liquidity` is zero
pub fn flat_div_wad(amount: u128, liquidity: u128) -> U256 {
    if liquidity == 0 {
        return U256::ZERO;
    }
    // u128 * 10^18 always fits in 256 bits
    U256::from(amount) * U256::from(WAD) / U256::from(liquidity)
}

/// Calculate the reward owed to a position since its last checkpoint.
///
/// # Parameters
/// - `growth_inside` - The current reward growth inside the position's range
/// - `growth_inside_checkpoint` - The growth inside recorded when the position last settled
/// - `liquidity` - The liquidity of the position
///
/// # Returns
/// - `Ok`: The reward owed, rounded down
/// - `Err`: `ArithmeticOverflow` if the reward does not fit a u128
pub fn reward_owed(
    growth_inside: U256,
    growth_inside_checkpoint: U256,
    liquidity: u128,
) -> Result<u128> {
    let growth_delta = growth_inside.wrapping_sub(growth_inside_checkpoint);
    let owed = growth_delta
        .checked_mul(U256::from(liquidity))
        .ok_or(RewardsError::ArithmeticOverflow)?
        / U256::from(WAD);
    owed.try_into()
        .map_err(|_| RewardsError::ArithmeticOverflow)
}
