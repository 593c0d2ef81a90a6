mod config;
mod constants;
mod error;
mod manager;
mod math;
mod state;
mod types;

pub use config::*;
pub use constants::*;
pub use error::*;
pub use manager::*;
pub use math::*;
pub use state::*;
pub use types::*;
