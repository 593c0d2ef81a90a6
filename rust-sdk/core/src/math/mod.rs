mod bitmap;
mod growth;
mod mixed_sign;
mod tick;

pub use bitmap::*;
pub use growth::*;
pub use mixed_sign::*;
pub use tick::*;
