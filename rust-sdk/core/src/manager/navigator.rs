use crate::{
    check_tick_spacing, compress_tick, next_bit_pos_gte, next_bit_pos_lte, tick_from_position,
    tick_position, PoolId, PoolStateProvider, Result, RewardsError,
};

/// Walks a pool's initialized-tick bitmap one word at a time.
///
/// Every step moves strictly past the tick it was given, so repeated calls always
/// terminate even over an empty bitmap.
pub struct TickNavigator<'a, P: PoolStateProvider + ?Sized> {
    state: &'a P,
    pool_id: &'a PoolId,
    tick_spacing: u16,
}

impl<'a, P: PoolStateProvider + ?Sized> TickNavigator<'a, P> {
    pub fn new(state: &'a P, pool_id: &'a PoolId) -> Result<Self> {
        let tick_spacing = check_tick_spacing(state.tick_spacing(pool_id)?)?;
        Ok(Self {
            state,
            pool_id,
            tick_spacing,
        })
    }

    /// Find the next initialized tick strictly above `tick`, searching only the
    /// bitmap word that holds the first candidate.
    ///
    /// # Returns
    /// - `(true, tick)` for the nearest initialized tick in that word
    /// - `(false, tick)` for the last tick of that word if none is initialized
    pub fn next_initialized_tick_up(&self, tick: i32) -> Result<(bool, i32)> {
        let compressed = compress_tick(tick, self.tick_spacing)
            .checked_add(1)
            .ok_or(RewardsError::TickOutOfBounds(tick))?;
        let (word_pos, bit_pos) = tick_position(compressed)?;
        let word = self.state.bitmap_word(self.pool_id, word_pos)?;
        let (initialized, bit_pos) = next_bit_pos_gte(word, bit_pos);
        Ok((
            initialized,
            tick_from_position(word_pos, bit_pos, self.tick_spacing)?,
        ))
    }

    /// Find the next initialized tick strictly below `tick`, searching only the
    /// bitmap word that holds the first candidate.
    ///
    /// # Returns
    /// - `(true, tick)` for the nearest initialized tick in that word
    /// - `(false, tick)` for the first tick of that word if none is initialized
    pub fn next_initialized_tick_down(&self, tick: i32) -> Result<(bool, i32)> {
        let below = tick
            .checked_sub(1)
            .ok_or(RewardsError::TickOutOfBounds(tick))?;
        let (word_pos, bit_pos) = tick_position(compress_tick(below, self.tick_spacing))?;
        let word = self.state.bitmap_word(self.pool_id, word_pos)?;
        let (initialized, bit_pos) = next_bit_pos_lte(word, bit_pos);
        Ok((
            initialized,
            tick_from_position(word_pos, bit_pos, self.tick_spacing)?,
        ))
    }

    pub fn net_liquidity_at(&self, tick: i32) -> Result<i128> {
        self.state.net_liquidity_at(self.pool_id, tick)
    }
}
