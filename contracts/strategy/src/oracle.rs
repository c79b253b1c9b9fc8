//! Read-only adapter over the pool plus the calm-period guard. The guard
//! compares the current tick against the time-weighted-average tick so a
//! single-block price push cannot be used to mint at a distorted price or
//! siphon value at harvest time.

use crate::collab;
use crate::errors::StrategyError;
use clm_types::{StrategyConfig, StrategyState, MAX_TICK, MIN_TICK};
use soroban_sdk::{vec, Address, Env};

/// Time-weighted-average tick over `window` seconds, from the pool's tick
/// cumulatives. Floored division keeps negative averages rounding toward
/// negative infinity, matching the pool's own convention.
pub fn twap_tick(env: &Env, pool: &Address, window: u64) -> i32 {
    let cumulatives = collab::pool_observe(env, pool, vec![env, window, 0]);
    let then = cumulatives.get(0).expect("observe: missing cumulative");
    let now = cumulatives.get(1).expect("observe: missing cumulative");
    now.saturating_sub(then).div_euclid(window as i64) as i32
}

/// True when the current tick sits within `max_tick_deviation` of the TWAP
/// tick, with the window clamped to the pool's global tick bounds.
pub fn is_calm(env: &Env, config: &StrategyConfig, state: &StrategyState) -> bool {
    let tick = collab::pool_tick(env, &config.pool);
    let twap = twap_tick(env, &config.pool, state.twap_interval);

    let lo = twap.saturating_sub(state.max_tick_deviation).max(MIN_TICK);
    let hi = twap.saturating_add(state.max_tick_deviation).min(MAX_TICK);
    lo <= tick && tick <= hi
}

pub fn require_calm(
    env: &Env,
    config: &StrategyConfig,
    state: &StrategyState,
) -> Result<(), StrategyError> {
    if is_calm(env, config, state) {
        Ok(())
    } else {
        Err(StrategyError::NotCalm)
    }
}
