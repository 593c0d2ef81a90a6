/// Fixed-point scale of every growth accumulator. 1.0 is represented as 10^18.
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// Flag bit selecting the "below" traversal (walk up from a tick at or below the current tick).
pub const BELOW_FLAG: u8 = 0b01;

/// Flag bit selecting the compact form that only rewards the current range.
pub const CURRENT_ONLY_FLAG: u8 = 0b10;

/// Encoded width of a tick index.
pub const TICK_WIDTH: usize = 3;

/// Encoded width of a liquidity value or reward quantity.
pub const QUANTITY_WIDTH: usize = 16;

/// Encoded width of the quantities sub-stream length.
pub const END_MARKER_WIDTH: usize = 3;

/// Largest byte length the quantities sub-stream length field can express.
pub const MAX_STREAM_LENGTH: usize = (1 << 24) - 1;
