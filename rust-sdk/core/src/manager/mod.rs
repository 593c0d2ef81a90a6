mod navigator;
mod propagator;
mod rewards_manager;

pub use navigator::*;
pub use propagator::*;
pub use rewards_manager::*;
