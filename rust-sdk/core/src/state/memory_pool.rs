use std::collections::{BTreeMap, HashMap};

use ethnum::U256;

use crate::{
    add_bounded_unsigned_signed, check_tick_spacing, compress_tick, is_tick_index_in_bounds,
    is_tick_initializable, PoolId, PoolStateProvider, Result, RewardsError,
    TICKS_PER_BITMAP_WORD,
};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickLiquidity {
    pub liquidity_gross: u128,
    pub liquidity_net: i128,
}

/// A self-contained concentrated-liquidity pool state: ticks, bitmap and current tick.
///
/// Used to simulate reward schedules off-chain and as the ground truth in tests.
/// Bitmap words are derived from the initialized ticks on demand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InMemoryPool {
    tick_spacing: u16,
    tick_current_index: i32,
    ticks: BTreeMap<i32, TickLiquidity>,
}

impl InMemoryPool {
    pub fn new(tick_spacing: u16, tick_current_index: i32) -> Result<Self> {
        check_tick_spacing(tick_spacing)?;
        if !is_tick_index_in_bounds(tick_current_index) {
            return Err(RewardsError::TickOutOfBounds(tick_current_index));
        }
        Ok(Self {
            tick_spacing,
            tick_current_index,
            ticks: BTreeMap::new(),
        })
    }

    #[cfg(test)]
    pub(crate) fn new_unchecked(tick_spacing: u16, tick_current_index: i32) -> Self {
        Self {
            tick_spacing,
            tick_current_index,
            ticks: BTreeMap::new(),
        }
    }

    pub fn spacing(&self) -> u16 {
        self.tick_spacing
    }

    pub fn tick_current_index(&self) -> i32 {
        self.tick_current_index
    }

    /// Move the current tick, returning the previous one.
    pub fn set_tick_current_index(&mut self, tick_index: i32) -> Result<i32> {
        if !is_tick_index_in_bounds(tick_index) {
            return Err(RewardsError::TickOutOfBounds(tick_index));
        }
        Ok(std::mem::replace(&mut self.tick_current_index, tick_index))
    }

    fn check_initializable(&self, tick_index: i32) -> Result<()> {
        if !is_tick_initializable(tick_index, self.tick_spacing) {
            return Err(RewardsError::TickOutOfBounds(tick_index));
        }
        Ok(())
    }

    /// Initialize `tick_index` with a raw net liquidity, bypassing position accounting.
    pub fn set_net_liquidity(&mut self, tick_index: i32, liquidity_net: i128) -> Result<()> {
        self.check_initializable(tick_index)?;
        let tick = self.ticks.entry(tick_index).or_default();
        tick.liquidity_net = liquidity_net;
        tick.liquidity_gross = tick
            .liquidity_gross
            .max(liquidity_net.unsigned_abs())
            .max(1);
        Ok(())
    }

    /// Add (or remove, for a negative delta) liquidity over `[tick_lower_index, tick_upper_index)`.
    /// Ticks whose gross liquidity drops to zero become uninitialized.
    pub fn update_position(
        &mut self,
        tick_lower_index: i32,
        tick_upper_index: i32,
        liquidity_delta: i128,
    ) -> Result<()> {
        self.check_initializable(tick_lower_index)?;
        self.check_initializable(tick_upper_index)?;
        if tick_lower_index >= tick_upper_index {
            return Err(RewardsError::TickOutOfBounds(tick_upper_index));
        }

        let lower = self.tick(tick_lower_index);
        let upper = self.tick(tick_upper_index);
        let next_lower = TickLiquidity {
            liquidity_gross: add_bounded_unsigned_signed(lower.liquidity_gross, liquidity_delta)?,
            liquidity_net: lower
                .liquidity_net
                .checked_add(liquidity_delta)
                .ok_or(RewardsError::ArithmeticOverflow)?,
        };
        let next_upper = TickLiquidity {
            liquidity_gross: add_bounded_unsigned_signed(upper.liquidity_gross, liquidity_delta)?,
            liquidity_net: upper
                .liquidity_net
                .checked_sub(liquidity_delta)
                .ok_or(RewardsError::ArithmeticOverflow)?,
        };

        self.write_tick(tick_lower_index, next_lower);
        self.write_tick(tick_upper_index, next_upper);
        Ok(())
    }

    fn write_tick(&mut self, tick_index: i32, tick: TickLiquidity) {
        if tick.liquidity_gross == 0 {
            self.ticks.remove(&tick_index);
        } else {
            self.ticks.insert(tick_index, tick);
        }
    }

    pub fn tick(&self, tick_index: i32) -> TickLiquidity {
        self.ticks.get(&tick_index).copied().unwrap_or_default()
    }

    pub fn is_initialized(&self, tick_index: i32) -> bool {
        self.ticks.contains_key(&tick_index)
    }

    pub fn net_liquidity(&self, tick_index: i32) -> i128 {
        self.tick(tick_index).liquidity_net
    }

    pub fn initialized_ticks(&self) -> impl Iterator<Item = i32> + '_ {
        self.ticks.keys().copied()
    }

    /// Liquidity active in the range containing `tick_index`: the net liquidity of
    /// every initialized tick at or below it.
    pub fn liquidity_at(&self, tick_index: i32) -> Result<u128> {
        self.ticks
            .range(..=tick_index)
            .try_fold(0u128, |liquidity, (_, tick)| {
                add_bounded_unsigned_signed(liquidity, tick.liquidity_net)
            })
    }

    pub fn active_liquidity(&self) -> Result<u128> {
        self.liquidity_at(self.tick_current_index)
    }

    pub fn word(&self, word_index: i16) -> U256 {
        let spacing = self.tick_spacing as i32;
        let first_compressed = word_index as i32 * TICKS_PER_BITMAP_WORD;
        let first = first_compressed * spacing;
        let last = (first_compressed + TICKS_PER_BITMAP_WORD - 1) * spacing;
        self.ticks
            .range(first..=last)
            .fold(U256::ZERO, |word, (tick_index, _)| {
                let bit = compress_tick(*tick_index, self.tick_spacing) - first_compressed;
                word | (U256::ONE << bit as u32)
            })
    }
}

impl PoolStateProvider for InMemoryPool {
    fn tick_spacing(&self, _pool_id: &PoolId) -> Result<u16> {
        Ok(self.tick_spacing)
    }

    fn current_tick(&self, _pool_id: &PoolId) -> Result<i32> {
        Ok(self.tick_current_index)
    }

    fn current_liquidity(&self, _pool_id: &PoolId) -> Result<u128> {
        self.active_liquidity()
    }

    fn net_liquidity_at(&self, _pool_id: &PoolId, tick: i32) -> Result<i128> {
        Ok(self.net_liquidity(tick))
    }

    fn bitmap_word(&self, _pool_id: &PoolId, word_index: i16) -> Result<U256> {
        Ok(self.word(word_index))
    }
}

fn lookup<'a>(pools: &'a HashMap<PoolId, InMemoryPool>, pool_id: &PoolId) -> Result<&'a InMemoryPool> {
    pools
        .get(pool_id)
        .ok_or(RewardsError::UnknownPool(*pool_id))
}

impl PoolStateProvider for HashMap<PoolId, InMemoryPool> {
    fn tick_spacing(&self, pool_id: &PoolId) -> Result<u16> {
        Ok(lookup(self, pool_id)?.tick_spacing)
    }

    fn current_tick(&self, pool_id: &PoolId) -> Result<i32> {
        Ok(lookup(self, pool_id)?.tick_current_index)
    }

    fn current_liquidity(&self, pool_id: &PoolId) -> Result<u128> {
        lookup(self, pool_id)?.active_liquidity()
    }

    fn net_liquidity_at(&self, pool_id: &PoolId, tick: i32) -> Result<i128> {
        Ok(lookup(self, pool_id)?.net_liquidity(tick))
    }

    fn bitmap_word(&self, pool_id: &PoolId, word_index: i16) -> Result<U256> {
        Ok(lookup(self, pool_id)?.word(word_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_position_tracks_net_and_gross() {
        let mut pool = InMemoryPool::new(10, 0).unwrap();
        pool.update_position(-20, 30, 100).unwrap();
        pool.update_position(-20, 10, 50).unwrap();
        assert_eq!(
            pool.tick(-20),
            TickLiquidity {
                liquidity_gross: 150,
                liquidity_net: 150
            }
        );
        assert_eq!(pool.net_liquidity(10), -50);
        assert_eq!(pool.net_liquidity(30), -100);
        assert_eq!(pool.active_liquidity(), Ok(150));
        assert_eq!(pool.liquidity_at(10), Ok(100));
        assert_eq!(pool.liquidity_at(30), Ok(0));
        assert_eq!(pool.liquidity_at(-21), Ok(0));
    }

    #[test]
    fn test_removing_all_liquidity_uninitializes_ticks() {
        let mut pool = InMemoryPool::new(10, 0).unwrap();
        pool.update_position(-20, 30, 100).unwrap();
        pool.update_position(-20, 30, -100).unwrap();
        assert!(!pool.is_initialized(-20));
        assert!(!pool.is_initialized(30));
        assert_eq!(pool.word(0), U256::ZERO);
        assert_eq!(pool.word(-1), U256::ZERO);
    }

    #[test]
    fn test_update_position_rejects_bad_ranges() {
        let mut pool = InMemoryPool::new(10, 0).unwrap();
        assert_eq!(
            pool.update_position(-15, 30, 1),
            Err(RewardsError::TickOutOfBounds(-15))
        );
        assert_eq!(
            pool.update_position(30, 30, 1),
            Err(RewardsError::TickOutOfBounds(30))
        );
        assert_eq!(
            pool.update_position(-20, 30, -1),
            Err(RewardsError::ArithmeticOverflow)
        );
        assert_eq!(pool.initialized_ticks().count(), 0);
    }

    #[test]
    fn test_bitmap_words() {
        let mut pool = InMemoryPool::new(10, 0).unwrap();
        pool.set_net_liquidity(0, 1).unwrap();
        pool.set_net_liquidity(2550, 1).unwrap();
        pool.set_net_liquidity(2560, 1).unwrap();
        pool.set_net_liquidity(-10, 1).unwrap();
        assert_eq!(pool.word(0), U256::ONE | (U256::ONE << 255u32));
        assert_eq!(pool.word(1), U256::ONE);
        assert_eq!(pool.word(-1), U256::ONE << 255u32);
    }

    #[test]
    fn test_map_of_pools_reports_unknown_pool() {
        let pools: HashMap<PoolId, InMemoryPool> = HashMap::new();
        let id = PoolId::new([7; 32]);
        assert_eq!(
            pools.current_tick(&id),
            Err(RewardsError::UnknownPool(id))
        );
    }
}
