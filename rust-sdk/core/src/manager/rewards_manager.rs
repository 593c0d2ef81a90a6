use tracing::{debug, warn};

use crate::{
    flat_div_wad, is_tick_index_in_bounds, reward_above, reward_below, CalldataReader, PoolId,
    PoolRewards, PoolStateProvider, QuantityStream, Result, RewardsConfig, RewardsError,
    TickNavigator, Traversal, BELOW_FLAG, CURRENT_ONLY_FLAG, QUANTITY_WIDTH,
};

/// Decode one reward update from `reader` and apply it to `ledger`.
///
/// The update is all-or-nothing: it is applied to a staged copy of the ledger which
/// replaces `ledger` only once the pool's liquidity checksum passes. On failure the
/// ledger is untouched and the reader is rewound to where the update began.
///
/// # Parameters
/// - `reader` - The payload, positioned at the update's flags byte
/// - `ledger` - The pool's reward ledger
/// - `state` - The authoritative pool state
/// - `pool_id` - The pool the update targets
/// - `config` - Limits applied while decoding
///
/// # Returns
/// - `Ok`: The total quantity distributed
/// - `Err`: The first error raised while decoding or propagating
pub fn apply_rewards_update<P: PoolStateProvider + ?Sized>(
    reader: &mut CalldataReader<'_>,
    ledger: &mut PoolRewards,
    state: &P,
    pool_id: &PoolId,
    config: &RewardsConfig,
) -> Result<u128> {
    let checkpoint = *reader;
    let mut staged = ledger.clone();
    match apply_rewards_update_in_place(reader, &mut staged, state, pool_id, config) {
        Ok(total) => {
            *ledger = staged;
            Ok(total)
        }
        Err(error) => {
            warn!(%pool_id, %error, "reward update rolled back");
            *reader = checkpoint;
            Err(error)
        }
    }
}

/// Same as [`apply_rewards_update`] but writes straight into `ledger`, leaving it
/// partially updated on failure. Callers must stage the ledger themselves.
pub(crate) fn apply_rewards_update_in_place<P: PoolStateProvider + ?Sized>(
    reader: &mut CalldataReader<'_>,
    ledger: &mut PoolRewards,
    state: &P,
    pool_id: &PoolId,
    config: &RewardsConfig,
) -> Result<u128> {
    match reader.read_u8()? {
        CURRENT_ONLY_FLAG => apply_current_only(reader, ledger, state, pool_id),
        flags @ (0 | BELOW_FLAG) => {
            apply_multi_tick(reader, ledger, state, pool_id, config, flags == BELOW_FLAG)
        }
        _ => Err(RewardsError::MalformedStream),
    }
}

fn apply_current_only<P: PoolStateProvider + ?Sized>(
    reader: &mut CalldataReader<'_>,
    ledger: &mut PoolRewards,
    state: &P,
    pool_id: &PoolId,
) -> Result<u128> {
    let amount = reader.read_u128()?;
    let expected_liquidity = reader.read_u128()?;
    debug!(%pool_id, amount = %amount, "applying current-range reward");

    let liquidity = check_liquidity(state, pool_id, expected_liquidity)?;
    ledger.add_global_growth(flat_div_wad(amount, liquidity))?;
    Ok(amount)
}

fn apply_multi_tick<P: PoolStateProvider + ?Sized>(
    reader: &mut CalldataReader<'_>,
    ledger: &mut PoolRewards,
    state: &P,
    pool_id: &PoolId,
    config: &RewardsConfig,
    below: bool,
) -> Result<u128> {
    let start_tick = reader.read_i24()?;
    if !is_tick_index_in_bounds(start_tick) {
        return Err(RewardsError::TickOutOfBounds(start_tick));
    }
    let current_tick = state.current_tick(pool_id)?;
    let start_liquidity = reader.read_u128()?;
    let end = reader.read_u24_end()?;

    let stream_length = end.offset() - reader.offset();
    if stream_length % QUANTITY_WIDTH != 0
        || stream_length / QUANTITY_WIDTH > config.max_quantities_per_update
    {
        return Err(RewardsError::MalformedStream);
    }

    debug!(
        %pool_id,
        below,
        start_tick,
        current_tick,
        quantities = stream_length / QUANTITY_WIDTH,
        "applying reward update"
    );

    let navigator = TickNavigator::new(state, pool_id)?;
    let traversal = Traversal {
        start_tick,
        start_liquidity,
        current_tick,
        max_tick_crossings: config.max_tick_crossings,
    };
    let quantities = QuantityStream::new(reader, end);
    let outcome = if below {
        reward_below(ledger, &navigator, quantities, traversal)?
    } else {
        reward_above(ledger, &navigator, quantities, traversal)?
    };

    check_liquidity(state, pool_id, outcome.liquidity)?;
    ledger.add_global_growth(outcome.cumulative_growth)?;

    debug!(
        %pool_id,
        total = %outcome.total,
        growth = %outcome.cumulative_growth,
        "applied reward update"
    );
    Ok(outcome.total)
}

fn check_liquidity<P: PoolStateProvider + ?Sized>(
    state: &P,
    pool_id: &PoolId,
    actual: u128,
) -> Result<u128> {
    let expected = state.current_liquidity(pool_id)?;
    if expected != actual {
        warn!(%pool_id, %expected, %actual, "liquidity checksum mismatch");
        return Err(RewardsError::LiquidityMismatch { expected, actual });
    }
    Ok(expected)
}
