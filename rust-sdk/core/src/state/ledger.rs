use std::collections::HashMap;

use ethnum::U256;
use tracing::trace;

use crate::{is_tick_index_in_bounds, PoolStateProvider, Result, RewardsError, TickNavigator};

/// Reward accounting for one pool.
///
/// `reward_growth_outside[tick]` holds the reward density accrued on the side of
/// `tick` away from the current price: below it while `tick <= current_tick`, above
/// it otherwise. Missing entries are zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PoolRewards {
    reward_growth_outside: HashMap<i32, U256>,
    global_growth: U256,
}

impl PoolRewards {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global_growth(&self) -> U256 {
        self.global_growth
    }

    pub fn growth_outside(&self, tick_index: i32) -> U256 {
        self.reward_growth_outside
            .get(&tick_index)
            .copied()
            .unwrap_or(U256::ZERO)
    }

    /// Number of ticks holding a ledger entry.
    pub fn len(&self) -> usize {
        self.reward_growth_outside.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reward_growth_outside.is_empty()
    }

    pub(crate) fn add_growth_outside(&mut self, tick_index: i32, growth: U256) {
        let entry = self
            .reward_growth_outside
            .entry(tick_index)
            .or_insert(U256::ZERO);
        *entry = entry.wrapping_add(growth);
    }

    pub(crate) fn add_global_growth(&mut self, growth: U256) -> Result<()> {
        self.global_growth = self
            .global_growth
            .checked_add(growth)
            .ok_or(RewardsError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Reward growth accrued inside `[tick_lower_index, tick_upper_index)`.
    ///
    /// # Parameters
    /// - `tick_current_index` - The pool's current tick
    /// - `tick_lower_index` - The lower tick of the range
    /// - `tick_upper_index` - The upper tick of the range
    ///
    /// # Returns
    /// - The WAD-scaled reward density accrued inside the range
    pub fn growth_inside(
        &self,
        tick_current_index: i32,
        tick_lower_index: i32,
        tick_upper_index: i32,
    ) -> U256 {
        let lower = self.growth_outside(tick_lower_index);
        let upper = self.growth_outside(tick_upper_index);

        if tick_current_index < tick_lower_index {
            lower.wrapping_sub(upper)
        } else if tick_current_index >= tick_upper_index {
            upper.wrapping_sub(lower)
        } else {
            self.global_growth.wrapping_sub(lower).wrapping_sub(upper)
        }
    }

    /// Seed the entry of a tick that just became initialized.
    /// By convention, all prior growth happened below the tick.
    pub fn initialize_tick(&mut self, tick_index: i32, tick_current_index: i32) {
        let global_growth = self.global_growth;
        self.reward_growth_outside
            .entry(tick_index)
            .or_insert(if tick_index <= tick_current_index {
                global_growth
            } else {
                U256::ZERO
            });
    }

    /// Drop the entry of a tick that no longer holds liquidity.
    pub fn clear_tick(&mut self, tick_index: i32) {
        self.reward_growth_outside.remove(&tick_index);
    }

    fn flip(&mut self, tick_index: i32) {
        let outside = self.growth_outside(tick_index);
        self.reward_growth_outside
            .insert(tick_index, self.global_growth.wrapping_sub(outside));
    }

    /// Re-orient the entries of every initialized tick the current tick moved across.
    ///
    /// Moving up flips the ticks in `(last_tick, new_tick]`, moving down flips the
    /// ticks in `(new_tick, last_tick]`: exactly the ticks whose side of the current
    /// tick changed.
    ///
    /// # Returns
    /// - `Ok`: The number of ticks flipped
    /// - `Err`: `TickOutOfBounds` if either tick is outside the tick range
    pub fn on_current_tick_moved<P: PoolStateProvider + ?Sized>(
        &mut self,
        navigator: &TickNavigator<'_, P>,
        last_tick: i32,
        new_tick: i32,
    ) -> Result<usize> {
        for tick in [last_tick, new_tick] {
            if !is_tick_index_in_bounds(tick) {
                return Err(RewardsError::TickOutOfBounds(tick));
            }
        }
        let mut flipped = 0;
        if new_tick > last_tick {
            let mut tick = last_tick;
            loop {
                let (initialized, next_tick) = navigator.next_initialized_tick_up(tick)?;
                if next_tick > new_tick {
                    break;
                }
                if initialized {
                    trace!(tick = next_tick, "flipping growth outside");
                    self.flip(next_tick);
                    flipped += 1;
                }
                tick = next_tick;
            }
        } else if new_tick < last_tick {
            // start one above so `last_tick` itself is a candidate
            let mut tick = last_tick + 1;
            loop {
                let (initialized, next_tick) = navigator.next_initialized_tick_down(tick)?;
                if next_tick <= new_tick {
                    break;
                }
                if initialized {
                    trace!(tick = next_tick, "flipping growth outside");
                    self.flip(next_tick);
                    flipped += 1;
                }
                tick = next_tick;
            }
        }
        Ok(flipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InMemoryPool, PoolId, MAX_TICK_INDEX, MIN_TICK_INDEX};
    use rstest::rstest;

    fn ledger_with(entries: &[(i32, u128)], global_growth: u128) -> PoolRewards {
        let mut ledger = PoolRewards::new();
        for (tick, growth) in entries {
            ledger.add_growth_outside(*tick, U256::from(*growth));
        }
        ledger.add_global_growth(U256::from(global_growth)).unwrap();
        ledger
    }

    #[rstest]
    #[case(-100, 30)]
    #[case(-11, 30)]
    #[case(-10, 1000 - 20 - 50)]
    #[case(15, 1000 - 20 - 50)]
    #[case(19, 1000 - 20 - 50)]
    #[case(20, 30)]
    #[case(500, 30)]
    fn test_growth_inside(#[case] current: i32, #[case] expected: u128) {
        // lower = -10, upper = 20; values chosen for each orientation separately
        let below_range = ledger_with(&[(-10, 80), (20, 50)], 1000);
        let in_range = ledger_with(&[(-10, 20), (20, 50)], 1000);
        let above_range = ledger_with(&[(-10, 20), (20, 50)], 1000);

        let ledger = if current < -10 {
            below_range
        } else if current < 20 {
            in_range
        } else {
            above_range
        };
        assert_eq!(ledger.growth_inside(current, -10, 20), U256::from(expected));
    }

    #[test]
    fn test_initialize_tick() {
        let mut ledger = ledger_with(&[], 700);
        ledger.initialize_tick(-60, 0);
        ledger.initialize_tick(0, 0);
        ledger.initialize_tick(60, 0);
        assert_eq!(ledger.growth_outside(-60), U256::from(700u32));
        assert_eq!(ledger.growth_outside(0), U256::from(700u32));
        assert_eq!(ledger.growth_outside(60), U256::ZERO);
        assert_eq!(ledger.len(), 3);

        // already initialized entries are left alone
        ledger.add_global_growth(U256::from(5u32)).unwrap();
        ledger.initialize_tick(-60, 0);
        assert_eq!(ledger.growth_outside(-60), U256::from(700u32));

        ledger.clear_tick(-60);
        assert_eq!(ledger.growth_outside(-60), U256::ZERO);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_new_range_starts_with_zero_growth_inside() {
        let mut ledger = ledger_with(&[], 12_345);
        for tick in [-120, -60, 60, 120] {
            ledger.initialize_tick(tick, 0);
        }
        assert_eq!(ledger.growth_inside(0, -60, 60), U256::ZERO);
        assert_eq!(ledger.growth_inside(0, 60, 120), U256::ZERO);
        assert_eq!(ledger.growth_inside(0, -120, -60), U256::ZERO);
    }

    #[test]
    fn test_global_growth_overflow() {
        let mut ledger = PoolRewards::new();
        ledger.add_global_growth(U256::MAX).unwrap();
        assert_eq!(
            ledger.add_global_growth(U256::ONE),
            Err(RewardsError::ArithmeticOverflow)
        );
        assert_eq!(ledger.global_growth(), U256::MAX);
    }

    fn pool_with_ticks(ticks: &[i32]) -> InMemoryPool {
        let mut pool = InMemoryPool::new(10, 0).unwrap();
        for tick in ticks {
            pool.set_net_liquidity(*tick, 1).unwrap();
        }
        pool
    }

    #[test]
    fn test_tick_move_up_flips_crossed_ticks() {
        let pool = pool_with_ticks(&[-20, 10, 30, 5000]);
        let id = PoolId::default();
        let navigator = TickNavigator::new(&pool, &id).unwrap();
        let mut ledger = ledger_with(&[(-20, 100), (10, 40), (30, 60), (5000, 7)], 1000);

        let flipped = ledger.on_current_tick_moved(&navigator, 0, 30).unwrap();
        assert_eq!(flipped, 2);
        assert_eq!(ledger.growth_outside(-20), U256::from(100u32));
        assert_eq!(ledger.growth_outside(10), U256::from(960u32));
        assert_eq!(ledger.growth_outside(30), U256::from(940u32));
        assert_eq!(ledger.growth_outside(5000), U256::from(7u32));
    }

    #[test]
    fn test_tick_move_down_flips_crossed_ticks() {
        let pool = pool_with_ticks(&[-5000, -20, 10, 30]);
        let id = PoolId::default();
        let navigator = TickNavigator::new(&pool, &id).unwrap();
        let mut ledger = ledger_with(&[(-5000, 9), (-20, 100), (10, 40), (30, 60)], 1000);

        let flipped = ledger.on_current_tick_moved(&navigator, 10, -20).unwrap();
        assert_eq!(flipped, 1);
        assert_eq!(ledger.growth_outside(10), U256::from(960u32));
        assert_eq!(ledger.growth_outside(-20), U256::from(100u32));

        let flipped = ledger.on_current_tick_moved(&navigator, -20, -6000).unwrap();
        assert_eq!(flipped, 2);
        assert_eq!(ledger.growth_outside(-20), U256::from(900u32));
        assert_eq!(ledger.growth_outside(-5000), U256::from(991u32));
        assert_eq!(ledger.growth_outside(30), U256::from(60u32));
    }

    #[test]
    fn test_tick_move_round_trip_restores_ledger() {
        let pool = pool_with_ticks(&[-2600, -20, 10, 30, 2570]);
        let id = PoolId::default();
        let navigator = TickNavigator::new(&pool, &id).unwrap();
        let original = ledger_with(&[(-2600, 1), (-20, 2), (10, 3), (30, 4), (2570, 5)], 1000);

        let mut ledger = original.clone();
        assert_eq!(ledger.on_current_tick_moved(&navigator, 0, 3000).unwrap(), 3);
        assert_eq!(ledger.on_current_tick_moved(&navigator, 3000, -3000).unwrap(), 5);
        assert_eq!(ledger.on_current_tick_moved(&navigator, -3000, 0).unwrap(), 2);
        assert_eq!(ledger, original);

        assert_eq!(ledger.on_current_tick_moved(&navigator, 0, 0).unwrap(), 0);
    }

    #[test]
    fn test_tick_move_outside_tick_range_is_rejected() {
        let mut pool = InMemoryPool::new(1, 0).unwrap();
        pool.set_net_liquidity(10, 1).unwrap();
        let id = PoolId::default();
        let navigator = TickNavigator::new(&pool, &id).unwrap();
        let mut ledger = ledger_with(&[(10, 4)], 1000);
        let before = ledger.clone();

        assert_eq!(
            ledger.on_current_tick_moved(&navigator, i32::MAX, 0),
            Err(RewardsError::TickOutOfBounds(i32::MAX))
        );
        assert_eq!(
            ledger.on_current_tick_moved(&navigator, 0, 8_388_607),
            Err(RewardsError::TickOutOfBounds(8_388_607))
        );
        assert_eq!(
            ledger.on_current_tick_moved(&navigator, 0, MIN_TICK_INDEX - 1),
            Err(RewardsError::TickOutOfBounds(MIN_TICK_INDEX - 1))
        );
        assert_eq!(ledger, before);

        assert_eq!(
            ledger.on_current_tick_moved(&navigator, MIN_TICK_INDEX, MAX_TICK_INDEX),
            Ok(1)
        );
        assert_eq!(
            ledger.on_current_tick_moved(&navigator, MAX_TICK_INDEX, MIN_TICK_INDEX),
            Ok(1)
        );
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_growth_inside_is_preserved_across_tick_moves() {
        let pool = pool_with_ticks(&[-20, 30]);
        let id = PoolId::default();
        let navigator = TickNavigator::new(&pool, &id).unwrap();
        // current tick 0 sits inside [-20, 30)
        let mut ledger = ledger_with(&[(-20, 100), (30, 60)], 1000);
        let inside = ledger.growth_inside(0, -20, 30);

        ledger.on_current_tick_moved(&navigator, 0, 45).unwrap();
        assert_eq!(ledger.growth_inside(45, -20, 30), inside);

        ledger.on_current_tick_moved(&navigator, 45, -45).unwrap();
        assert_eq!(ledger.growth_inside(-45, -20, 30), inside);
    }
}
