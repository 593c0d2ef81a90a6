use std::{
    collections::HashMap,
    sync::{Arc, Mutex, RwLock},
};

use ethnum::U256;
use tracing::{debug, warn};

use crate::{
    apply_rewards_update_in_place, current_configuration, CalldataReader, PoolId, PoolRewards,
    PoolStateProvider, Result, RewardsConfig, RewardsError, TickNavigator,
};

type SharedLedger = Arc<Mutex<PoolRewards>>;

/// Every pool's reward ledger, each behind its own lock.
///
/// Mutations are staged on a copy of the affected ledgers and committed only when
/// the whole operation succeeds.
#[derive(Debug)]
pub struct RewardsStore {
    config: RewardsConfig,
    pools: RwLock<HashMap<PoolId, SharedLedger>>,
}

impl RewardsStore {
    /// Create a store using a snapshot of the current global configuration.
    pub fn new() -> Result<Self> {
        Ok(Self::with_config(current_configuration()?))
    }

    pub fn with_config(config: RewardsConfig) -> Self {
        Self {
            config,
            pools: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RewardsConfig {
        &self.config
    }

    pub fn initialize_pool(&self, pool_id: PoolId) -> Result<()> {
        let mut pools = self.pools.write()?;
        if pools.contains_key(&pool_id) {
            return Err(RewardsError::PoolAlreadyInitialized(pool_id));
        }
        pools.insert(pool_id, Arc::new(Mutex::new(PoolRewards::new())));
        debug!(%pool_id, "initialized pool rewards");
        Ok(())
    }

    pub fn contains_pool(&self, pool_id: &PoolId) -> Result<bool> {
        Ok(self.pools.read()?.contains_key(pool_id))
    }

    fn ledger(&self, pool_id: &PoolId) -> Result<SharedLedger> {
        self.pools
            .read()?
            .get(pool_id)
            .cloned()
            .ok_or(RewardsError::UnknownPool(*pool_id))
    }

    /// Stage a copy of the pool's ledger, run `f` on it and commit it if `f` succeeds.
    fn with_staged_ledger<T>(
        &self,
        pool_id: &PoolId,
        f: impl FnOnce(&mut PoolRewards) -> Result<T>,
    ) -> Result<T> {
        let shared = self.ledger(pool_id)?;
        let mut ledger = shared.lock()?;
        let mut staged = ledger.clone();
        let value = f(&mut staged)?;
        *ledger = staged;
        Ok(value)
    }

    /// Apply a payload holding exactly one reward update to a pool.
    ///
    /// # Returns
    /// - `Ok`: The total quantity distributed
    /// - `Err`: The error that rolled the update back; the ledger is unchanged
    pub fn apply_update<P: PoolStateProvider + ?Sized>(
        &self,
        pool_id: &PoolId,
        state: &P,
        payload: &[u8],
    ) -> Result<u128> {
        self.with_staged_ledger(pool_id, |ledger| {
            apply_payload(ledger, state, pool_id, payload, &self.config).inspect_err(|error| {
                warn!(%pool_id, %error, "reward update rolled back");
            })
        })
    }

    /// Apply a batch of updates in listed order, committing every pool's ledger only if
    /// every update succeeds. A pool may appear more than once; later updates see the
    /// effect of earlier ones.
    ///
    /// Pool ledgers are locked in pool id order for the duration of the batch.
    ///
    /// # Returns
    /// - `Ok`: The total distributed by each update, in listed order
    /// - `Err`: The first error raised; no ledger is changed
    pub fn apply_batch<P: PoolStateProvider + ?Sized>(
        &self,
        state: &P,
        updates: &[(PoolId, &[u8])],
    ) -> Result<Vec<u128>> {
        let mut pool_ids: Vec<PoolId> = updates.iter().map(|(pool_id, _)| *pool_id).collect();
        pool_ids.sort();
        pool_ids.dedup();

        let shared = pool_ids
            .iter()
            .map(|pool_id| Ok((*pool_id, self.ledger(pool_id)?)))
            .collect::<Result<Vec<_>>>()?;
        let mut guards = shared
            .iter()
            .map(|(pool_id, ledger)| Ok((*pool_id, ledger.lock()?)))
            .collect::<Result<Vec<_>>>()?;
        let mut staged: HashMap<PoolId, PoolRewards> = guards
            .iter()
            .map(|(pool_id, ledger)| (*pool_id, PoolRewards::clone(ledger)))
            .collect();

        let mut totals = Vec::with_capacity(updates.len());
        for (index, (pool_id, payload)) in updates.iter().enumerate() {
            let ledger = staged
                .get_mut(pool_id)
                .ok_or(RewardsError::UnknownPool(*pool_id))?;
            match apply_payload(ledger, state, pool_id, payload, &self.config) {
                Ok(total) => totals.push(total),
                Err(error) => {
                    warn!(index, %pool_id, %error, "reward batch rolled back");
                    return Err(error);
                }
            }
        }

        for (pool_id, ledger) in guards.iter_mut() {
            if let Some(next) = staged.remove(pool_id) {
                **ledger = next;
            }
        }
        debug!(
            updates = updates.len(),
            pools = pool_ids.len(),
            "applied reward batch"
        );
        Ok(totals)
    }

    /// Re-orient a pool's ledger after its current tick moved from `last_tick` to `new_tick`.
    pub fn on_current_tick_moved<P: PoolStateProvider + ?Sized>(
        &self,
        pool_id: &PoolId,
        state: &P,
        last_tick: i32,
        new_tick: i32,
    ) -> Result<usize> {
        let navigator = TickNavigator::new(state, pool_id)?;
        self.with_staged_ledger(pool_id, |ledger| {
            ledger.on_current_tick_moved(&navigator, last_tick, new_tick)
        })
    }

    pub fn initialize_tick(
        &self,
        pool_id: &PoolId,
        tick_index: i32,
        tick_current_index: i32,
    ) -> Result<()> {
        self.with_staged_ledger(pool_id, |ledger| {
            ledger.initialize_tick(tick_index, tick_current_index);
            Ok(())
        })
    }

    pub fn clear_tick(&self, pool_id: &PoolId, tick_index: i32) -> Result<()> {
        self.with_staged_ledger(pool_id, |ledger| {
            ledger.clear_tick(tick_index);
            Ok(())
        })
    }

    pub fn growth_inside(
        &self,
        pool_id: &PoolId,
        tick_current_index: i32,
        tick_lower_index: i32,
        tick_upper_index: i32,
    ) -> Result<U256> {
        let shared = self.ledger(pool_id)?;
        let ledger = shared.lock()?;
        Ok(ledger.growth_inside(tick_current_index, tick_lower_index, tick_upper_index))
    }

    /// A copy of the pool's ledger as of the last committed operation.
    pub fn snapshot(&self, pool_id: &PoolId) -> Result<PoolRewards> {
        let shared = self.ledger(pool_id)?;
        let ledger = shared.lock()?;
        Ok(ledger.clone())
    }
}

fn apply_payload<P: PoolStateProvider + ?Sized>(
    ledger: &mut PoolRewards,
    state: &P,
    pool_id: &PoolId,
    payload: &[u8],
    config: &RewardsConfig,
) -> Result<u128> {
    let mut reader = CalldataReader::new(payload);
    let total = apply_rewards_update_in_place(&mut reader, ledger, state, pool_id, config)?;
    if !reader.is_empty() {
        return Err(RewardsError::MalformedStream);
    }
    Ok(total)
}
