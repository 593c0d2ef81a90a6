mod error;
mod rewards;
mod tick;

pub use error::*;
pub use rewards::*;
pub use tick::*;
