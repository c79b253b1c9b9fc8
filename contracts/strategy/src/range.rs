//! Tick placement for the two ranges: a symmetric main range around the
//! current price and a single-sided alt range that deploys whichever token
//! is left over after the main range is filled.

use crate::errors::StrategyError;
use crate::{accounting, collab};
use clm_types::{StrategyConfig, StrategyState, PRECISION};
use soroban_sdk::{Env, Symbol};

/// Round a tick down to the spacing grid, flooring toward negative
/// infinity (the pool's convention for negative ticks).
pub fn floor_tick(tick: i32, spacing: i32) -> i32 {
    tick.div_euclid(spacing) * spacing
}

/// Symmetric range of `half_width` ticks on each side of the floored tick.
pub fn base_ticks(tick: i32, half_width: i32, spacing: i32) -> (i32, i32) {
    let floored = floor_tick(tick, spacing);
    (floored - half_width, floored + half_width)
}

/// Recompute both ranges from the current tick and wallet balances.
/// Callers must have verified the calm guard: placing ranges at a
/// manipulated price is exactly the attack the guard exists to stop.
pub fn set_ticks(
    env: &Env,
    config: &StrategyConfig,
    state: &mut StrategyState,
) -> Result<(), StrategyError> {
    let tick = collab::pool_tick(env, &config.pool);
    let spacing = collab::pool_tick_spacing(env, &config.pool);
    let width = state.position_width * spacing;

    let floored = floor_tick(tick, spacing);
    let (main_lower, main_upper) = base_ticks(tick, width, spacing);

    // Alt range leans toward the token with the larger residual value,
    // comparing token0 in token1 units at the spot price.
    let (bal0, bal1) = accounting::wallet_balances(env, config, state);
    let price = clm_math::price_x36(env, collab::pool_sqrt_price(env, &config.pool));
    let value0 = if bal0 > 0 {
        clm_math::mul_div(env, bal0 as u128, price, PRECISION)
    } else {
        0
    };
    let value1 = bal1.max(0) as u128;

    let (alt_lower, alt_upper) = if value0 < value1 {
        (main_lower, floored + spacing)
    } else if value1 < value0 {
        (floored - spacing, main_upper)
    } else {
        // Exactly balanced: no side to favor, refuse rather than open a
        // degenerate range at the zero tick
        return Err(StrategyError::InvalidTicks);
    };

    if (alt_lower, alt_upper) == (main_lower, main_upper) {
        return Err(StrategyError::InvalidTicks);
    }

    state.position_main.tick_lower = main_lower;
    state.position_main.tick_upper = main_upper;
    state.position_alt.tick_lower = alt_lower;
    state.position_alt.tick_upper = alt_upper;
    state.last_rebalance = env.ledger().timestamp();

    env.events().publish(
        (Symbol::new(env, "new_ticks"),),
        (main_lower, main_upper, alt_lower, alt_upper),
    );

    Ok(())
}
