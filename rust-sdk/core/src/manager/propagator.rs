use ethnum::U256;
use tracing::trace;

use crate::{
    add_bounded_unsigned_signed, flat_div_wad, sub_bounded_unsigned_signed, CalldataReader,
    EndBoundary, PoolRewards, PoolStateProvider, Result, RewardsError, TickNavigator,
};

/// The quantities sub-stream of one update: a reader bounded by the declared end.
pub struct QuantityStream<'r, 'a> {
    reader: &'r mut CalldataReader<'a>,
    end: EndBoundary,
}

impl<'r, 'a> QuantityStream<'r, 'a> {
    pub fn new(reader: &'r mut CalldataReader<'a>, end: EndBoundary) -> Self {
        Self { reader, end }
    }

    /// The next quantity, or zero once the sub-stream is exhausted.
    pub fn next_quantity(&mut self) -> Result<u128> {
        self.reader.read_u128_or_zero(self.end)
    }

    fn finish(self) -> Result<()> {
        self.reader.require_at_end_of(self.end)
    }
}

/// Where a traversal starts and where it must stop.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Traversal {
    pub start_tick: i32,
    pub start_liquidity: u128,
    pub current_tick: i32,
    pub max_tick_crossings: Option<usize>,
}

/// Result of one traversal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RewardOutcome {
    /// Sum of every quantity consumed.
    pub total: u128,
    /// Reward density accrued over the whole traversal. Becomes the pool's global growth increment.
    pub cumulative_growth: U256,
    /// Liquidity of the range the traversal ended in.
    pub liquidity: u128,
}

impl RewardOutcome {
    fn starting_at(liquidity: u128) -> Self {
        Self {
            liquidity,
            ..Self::default()
        }
    }

    fn accrue(&mut self, quantity: u128) -> Result<()> {
        self.total = self
            .total
            .checked_add(quantity)
            .ok_or(RewardsError::ArithmeticOverflow)?;
        self.cumulative_growth = self
            .cumulative_growth
            .checked_add(flat_div_wad(quantity, self.liquidity))
            .ok_or(RewardsError::ArithmeticOverflow)?;
        Ok(())
    }
}

fn count_crossing(crossings: &mut usize, limit: Option<usize>) -> Result<()> {
    *crossings += 1;
    match limit {
        Some(limit) if *crossings > limit => Err(RewardsError::TraversalLimitExceeded(limit)),
        _ => Ok(()),
    }
}

/// Distribute quantities walking up from `start_tick` to the current tick.
///
/// The start tick and every initialized tick up to and including the current tick
/// consume one quantity each, accrued over the liquidity of the range below them.
/// Their growth outside is then credited with the cumulative growth so far and the
/// tick is crossed. The walk stops at the first tick past the current tick: if that
/// tick is initialized it consumes a last quantity over the current range's
/// liquidity, if it is only a bitmap word boundary nothing more is read.
///
/// A start tick above the current tick therefore only rewards the current range.
/// The quantity sub-stream must be consumed exactly; missing trailing quantities
/// read as zero.
pub fn reward_below<P: PoolStateProvider + ?Sized>(
    ledger: &mut PoolRewards,
    navigator: &TickNavigator<'_, P>,
    mut quantities: QuantityStream<'_, '_>,
    traversal: Traversal,
) -> Result<RewardOutcome> {
    let mut outcome = RewardOutcome::starting_at(traversal.start_liquidity);
    let mut tick = traversal.start_tick;
    let mut initialized = true;
    let mut crossings = 0;

    loop {
        let past_current = tick > traversal.current_tick;
        if initialized {
            outcome.accrue(quantities.next_quantity()?)?;
            if past_current {
                break;
            }
            ledger.add_growth_outside(tick, outcome.cumulative_growth);
            outcome.liquidity =
                add_bounded_unsigned_signed(outcome.liquidity, navigator.net_liquidity_at(tick)?)?;
            trace!(tick, liquidity = %outcome.liquidity, "crossed tick up");
        } else if past_current {
            break;
        }
        count_crossing(&mut crossings, traversal.max_tick_crossings)?;
        (initialized, tick) = navigator.next_initialized_tick_up(tick)?;
    }

    quantities.finish()?;
    Ok(outcome)
}

/// Distribute quantities walking down from `start_tick` to the current tick.
///
/// Mirror image of [`reward_below`]: the start tick and every initialized tick above
/// the current tick consume one quantity each, accrued over the liquidity of the range
/// above them, and are crossed downward. The walk stops at the first tick at or below
/// the current tick, accruing a last quantity over the current range only when that
/// tick is initialized.
pub fn reward_above<P: PoolStateProvider + ?Sized>(
    ledger: &mut PoolRewards,
    navigator: &TickNavigator<'_, P>,
    mut quantities: QuantityStream<'_, '_>,
    traversal: Traversal,
) -> Result<RewardOutcome> {
    let mut outcome = RewardOutcome::starting_at(traversal.start_liquidity);
    let mut tick = traversal.start_tick;
    let mut initialized = true;
    let mut crossings = 0;

    loop {
        let past_current = tick <= traversal.current_tick;
        if initialized {
            outcome.accrue(quantities.next_quantity()?)?;
            if past_current {
                break;
            }
            ledger.add_growth_outside(tick, outcome.cumulative_growth);
            outcome.liquidity =
                sub_bounded_unsigned_signed(outcome.liquidity, navigator.net_liquidity_at(tick)?)?;
            trace!(tick, liquidity = %outcome.liquidity, "crossed tick down");
        } else if past_current {
            break;
        }
        count_crossing(&mut crossings, traversal.max_tick_crossings)?;
        (initialized, tick) = navigator.next_initialized_tick_down(tick)?;
    }

    quantities.finish()?;
    Ok(outcome)
}
