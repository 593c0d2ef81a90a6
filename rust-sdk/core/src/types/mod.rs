mod pool;
mod reader;
mod update;

pub use pool::*;
pub use reader::*;
pub use update::*;
