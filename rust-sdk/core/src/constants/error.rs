pub type ErrorCode = u16;

pub const LIQUIDITY_MISMATCH: ErrorCode = 9100;

pub const ARITHMETIC_OVERFLOW: ErrorCode = 9101;

pub const MALFORMED_STREAM: ErrorCode = 9102;

pub const UNEXPECTED_END_OF_INPUT: ErrorCode = 9103;

pub const INVALID_TICK_SPACING: ErrorCode = 9104;

pub const TICK_OUT_OF_BOUNDS: ErrorCode = 9105;

pub const TRAVERSAL_LIMIT_EXCEEDED: ErrorCode = 9106;

pub const UNKNOWN_POOL: ErrorCode = 9107;

pub const POOL_ALREADY_INITIALIZED: ErrorCode = 9108;

pub const LOCK_POISONED: ErrorCode = 9109;
