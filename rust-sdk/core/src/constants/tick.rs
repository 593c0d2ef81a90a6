/// The minimum tick index.
pub const MIN_TICK_INDEX: i32 = -887272;

/// The maximum tick index.
pub const MAX_TICK_INDEX: i32 = 887272;

/// The number of ticks (in compressed units) covered by one bitmap word.
pub const TICKS_PER_BITMAP_WORD: i32 = 256;

/// The largest bit position inside a bitmap word.
pub const MAX_BIT_POSITION: u8 = 255;
