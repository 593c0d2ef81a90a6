use serde::{Deserialize, Serialize};

use crate::{
    Result, RewardsError, BELOW_FLAG, CURRENT_ONLY_FLAG, MAX_STREAM_LENGTH, QUANTITY_WIDTH,
};

const MIN_I24: i32 = -(1 << 23);
const MAX_I24: i32 = (1 << 23) - 1;

/// A reward update for one pool, as produced by the solver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardsUpdate {
    /// Reward only the range the current tick sits in.
    CurrentOnly {
        amount: u128,
        expected_liquidity: u128,
    },
    /// Reward the ranges crossed from `start_tick` up to (`below`) or down to the current tick.
    MultiTick {
        below: bool,
        start_tick: i32,
        start_liquidity: u128,
        quantities: Vec<u128>,
    },
}

impl RewardsUpdate {
    /// Encode the update into its packed big-endian wire format.
    ///
    /// # Returns
    /// - `Ok`: The encoded bytes
    /// - `Err`: `TickOutOfBounds` if `start_tick` does not fit 24 bits, or
    ///   `MalformedStream` if the quantities do not fit a 24-bit length
    pub fn encode(&self) -> Result<Vec<u8>> {
        match self {
            Self::CurrentOnly {
                amount,
                expected_liquidity,
            } => {
                let mut bytes = Vec::with_capacity(1 + 2 * QUANTITY_WIDTH);
                bytes.push(CURRENT_ONLY_FLAG);
                bytes.extend_from_slice(&amount.to_be_bytes());
                bytes.extend_from_slice(&expected_liquidity.to_be_bytes());
                Ok(bytes)
            }
            Self::MultiTick {
                below,
                start_tick,
                start_liquidity,
                quantities,
            } => {
                if !(MIN_I24..=MAX_I24).contains(start_tick) {
                    return Err(RewardsError::TickOutOfBounds(*start_tick));
                }
                let stream_length = quantities.len() * QUANTITY_WIDTH;
                if stream_length > MAX_STREAM_LENGTH {
                    return Err(RewardsError::MalformedStream);
                }

                let mut bytes = Vec::with_capacity(23 + stream_length);
                bytes.push(if *below { BELOW_FLAG } else { 0 });
                bytes.extend_from_slice(&start_tick.to_be_bytes()[1..]);
                bytes.extend_from_slice(&start_liquidity.to_be_bytes());
                bytes.extend_from_slice(&(stream_length as u32).to_be_bytes()[1..]);
                for quantity in quantities {
                    bytes.extend_from_slice(&quantity.to_be_bytes());
                }
                Ok(bytes)
            }
        }
    }
}
