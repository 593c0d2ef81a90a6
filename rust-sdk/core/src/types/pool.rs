use core::fmt::{Display, Formatter, Result as FmtResult};

use ethnum::U256;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Identifier of a pool, e.g. the hash of its pool key.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PoolId(pub [u8; 32]);

impl PoolId {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for PoolId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Display for PoolId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "0x")?;
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Read access to the authoritative state of the underlying pools.
///
/// The reward engine never owns pool state. Whatever holds the real ticks, bitmap
/// and liquidity implements this trait and is consulted during every update.
pub trait PoolStateProvider {
    /// The tick spacing of the pool. Must be non-zero.
    fn tick_spacing(&self, pool_id: &PoolId) -> Result<u16>;

    /// The tick the pool's price currently sits in.
    fn current_tick(&self, pool_id: &PoolId) -> Result<i32>;

    /// The liquidity active in the current tick range.
    fn current_liquidity(&self, pool_id: &PoolId) -> Result<u128>;

    /// The signed liquidity delta applied when the price crosses `tick` upwards.
    fn net_liquidity_at(&self, pool_id: &PoolId, tick: i32) -> Result<i128>;

    /// The initialized-tick bitmap word at `word_index` (one bit per compressed tick).
    fn bitmap_word(&self, pool_id: &PoolId, word_index: i16) -> Result<U256>;
}

impl<P: PoolStateProvider + ?Sized> PoolStateProvider for &P {
    fn tick_spacing(&self, pool_id: &PoolId) -> Result<u16> {
        (**self).tick_spacing(pool_id)
    }

    fn current_tick(&self, pool_id: &PoolId) -> Result<i32> {
        (**self).current_tick(pool_id)
    }

    fn current_liquidity(&self, pool_id: &PoolId) -> Result<u128> {
        (**self).current_liquidity(pool_id)
    }

    fn net_liquidity_at(&self, pool_id: &PoolId, tick: i32) -> Result<i128> {
        (**self).net_liquidity_at(pool_id, tick)
    }

    fn bitmap_word(&self, pool_id: &PoolId, word_index: i16) -> Result<U256> {
        (**self).bitmap_word(pool_id, word_index)
    }
}
