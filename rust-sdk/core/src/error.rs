use crate::{
    ErrorCode, PoolId, ARITHMETIC_OVERFLOW, INVALID_TICK_SPACING, LIQUIDITY_MISMATCH,
    LOCK_POISONED, MALFORMED_STREAM, POOL_ALREADY_INITIALIZED, TICK_OUT_OF_BOUNDS,
    TRAVERSAL_LIMIT_EXCEEDED, UNEXPECTED_END_OF_INPUT, UNKNOWN_POOL,
};

/// Errors that can occur while applying a reward update to a pool ledger.
///
/// Every variant is fatal for the unit of work that raised it: the ledger is left
/// exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RewardsError {
    #[error("Liquidity mismatch: pool reports {expected}, update ended at {actual}")]
    LiquidityMismatch { expected: u128, actual: u128 },

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    #[error("Malformed reward stream")]
    MalformedStream,

    #[error("Unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEndOfInput { needed: usize, remaining: usize },

    #[error("Invalid tick spacing: {0}")]
    InvalidTickSpacing(u16),

    #[error("Tick index out of bounds or not on tick spacing: {0}")]
    TickOutOfBounds(i32),

    #[error("Tick traversal exceeded {0} steps")]
    TraversalLimitExceeded(usize),

    #[error("Unknown pool: {0}")]
    UnknownPool(PoolId),

    #[error("Pool already initialized: {0}")]
    PoolAlreadyInitialized(PoolId),

    #[error("Pool ledger lock poisoned")]
    LockPoisoned,
}

impl RewardsError {
    /// Stable numeric code for the error, suitable for surfacing in a rejected bundle.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::LiquidityMismatch { .. } => LIQUIDITY_MISMATCH,
            Self::ArithmeticOverflow => ARITHMETIC_OVERFLOW,
            Self::MalformedStream => MALFORMED_STREAM,
            Self::UnexpectedEndOfInput { .. } => UNEXPECTED_END_OF_INPUT,
            Self::InvalidTickSpacing(_) => INVALID_TICK_SPACING,
            Self::TickOutOfBounds(_) => TICK_OUT_OF_BOUNDS,
            Self::TraversalLimitExceeded(_) => TRAVERSAL_LIMIT_EXCEEDED,
            Self::UnknownPool(_) => UNKNOWN_POOL,
            Self::PoolAlreadyInitialized(_) => POOL_ALREADY_INITIALIZED,
            Self::LockPoisoned => LOCK_POISONED,
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for RewardsError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::LockPoisoned
    }
}

/// Result type for reward operations
pub type Result<T> = std::result::Result<T, RewardsError>;
