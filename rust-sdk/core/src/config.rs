use std::{error::Error, sync::Mutex};

use serde::{Deserialize, Serialize};

use crate::Result;

/// The default cap on the number of quantities a single update may declare.
pub const DEFAULT_MAX_QUANTITIES_PER_UPDATE: usize = 65_536;

/// The currently selected cap on the number of quantities a single update may declare.
pub static MAX_QUANTITIES_PER_UPDATE: Mutex<usize> = Mutex::new(DEFAULT_MAX_QUANTITIES_PER_UPDATE);

/// Sets the currently selected cap on the number of quantities per update.
pub fn set_max_quantities_per_update(limit: usize) -> std::result::Result<(), Box<dyn Error>> {
    *MAX_QUANTITIES_PER_UPDATE.try_lock()? = limit;
    Ok(())
}

/// The default cap on navigator steps taken by one traversal: none.
/// Traversals between two in-bounds ticks always terminate.
pub const DEFAULT_MAX_TICK_CROSSINGS: Option<usize> = None;

/// The currently selected cap on navigator steps taken by one traversal.
pub static MAX_TICK_CROSSINGS: Mutex<Option<usize>> = Mutex::new(DEFAULT_MAX_TICK_CROSSINGS);

/// Sets the currently selected cap on navigator steps taken by one traversal.
/// `None` lifts the cap.
pub fn set_max_tick_crossings(limit: Option<usize>) -> std::result::Result<(), Box<dyn Error>> {
    *MAX_TICK_CROSSINGS.try_lock()? = limit;
    Ok(())
}

/// Resets the configuration to its default values.
pub fn reset_configuration() -> std::result::Result<(), Box<dyn Error>> {
    *MAX_QUANTITIES_PER_UPDATE.try_lock()? = DEFAULT_MAX_QUANTITIES_PER_UPDATE;
    *MAX_TICK_CROSSINGS.try_lock()? = DEFAULT_MAX_TICK_CROSSINGS;
    Ok(())
}

/// A snapshot of the limits applied while decoding and propagating updates.
///
/// Stores and managers take a snapshot when they are created so a long-running
/// batch is not affected by a concurrent configuration change.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RewardsConfig {
    pub max_quantities_per_update: usize,
    pub max_tick_crossings: Option<usize>,
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            max_quantities_per_update: DEFAULT_MAX_QUANTITIES_PER_UPDATE,
            max_tick_crossings: DEFAULT_MAX_TICK_CROSSINGS,
        }
    }
}

/// Returns a snapshot of the currently selected configuration.
pub fn current_configuration() -> Result<RewardsConfig> {
    Ok(RewardsConfig {
        max_quantities_per_update: *MAX_QUANTITIES_PER_UPDATE.lock()?,
        max_tick_crossings: *MAX_TICK_CROSSINGS.lock()?,
    })
}

/// Selects every value of `config` as the current configuration.
pub fn apply_configuration(config: &RewardsConfig) -> std::result::Result<(), Box<dyn Error>> {
    set_max_quantities_per_update(config.max_quantities_per_update)?;
    set_max_tick_crossings(config.max_tick_crossings)?;
    Ok(())
}
