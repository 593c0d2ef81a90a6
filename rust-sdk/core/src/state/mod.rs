mod ledger;
mod memory_pool;
mod store;

pub use ledger::*;
pub use memory_pool::*;
pub use store::*;
