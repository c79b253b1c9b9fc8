//! Balance views over the strategy's three buckets: tokens sitting in the
//! contract wallet, tokens deployed in ledger positions, and the portion of
//! recent harvest profit still locked away from depositors.

use crate::collab;
use clm_types::{Position, StrategyConfig, StrategyState, LOCK_DURATION};
use soroban_fixed_point_math::FixedPoint;
use soroban_sdk::{token, Env};

/// Tokens held directly by the contract, minus claimed emission that is
/// earmarked for the reward distributor when the emission token doubles as
/// a pool token.
pub fn wallet_balances(env: &Env, config: &StrategyConfig, state: &StrategyState) -> (i128, i128) {
    let here = env.current_contract_address();
    let mut bal0 = token::Client::new(env, &config.token0).balance(&here);
    let mut bal1 = token::Client::new(env, &config.token1).balance(&here);

    if config.emission_token == config.token0 {
        bal0 = (bal0 - state.emission_received).max(0);
    } else if config.emission_token == config.token1 {
        bal1 = (bal1 - state.emission_received).max(0);
    }

    (bal0, bal1)
}

fn position_amounts(
    env: &Env,
    config: &StrategyConfig,
    position: &Position,
    sqrt_price_x96: u128,
) -> (i128, i128) {
    if !position.is_open() {
        return (0, 0);
    }
    let (liquidity, owed0, owed1) = collab::ledger_query(env, &config.ledger, position.id);
    let sqrt_lower = clm_math::get_sqrt_ratio_at_tick(env, position.tick_lower);
    let sqrt_upper = clm_math::get_sqrt_ratio_at_tick(env, position.tick_upper);
    let (amount0, amount1) =
        clm_math::get_amounts_for_liquidity(env, sqrt_price_x96, sqrt_lower, sqrt_upper, liquidity);
    (amount0 as i128 + owed0, amount1 as i128 + owed1)
}

/// Principal plus owed amounts across both open positions, valued at the
/// pool's current price.
pub fn pool_balances(env: &Env, config: &StrategyConfig, state: &StrategyState) -> (i128, i128) {
    let sqrt_price = collab::pool_sqrt_price(env, &config.pool);
    let (main0, main1) = position_amounts(env, config, &state.position_main, sqrt_price);
    let (alt0, alt1) = position_amounts(env, config, &state.position_alt, sqrt_price);
    (main0 + alt0, main1 + alt1)
}

pub fn total_balances(env: &Env, config: &StrategyConfig, state: &StrategyState) -> (i128, i128) {
    let (w0, w1) = wallet_balances(env, config, state);
    let (p0, p1) = pool_balances(env, config, state);
    (w0 + p0, w1 + p1)
}

/// Profit from the last harvest still withheld from depositors, decaying
/// linearly to zero over the lock window. Capped at the current total so a
/// loss after harvest can never lock more than exists.
pub fn locked_profit(env: &Env, config: &StrategyConfig, state: &StrategyState) -> (i128, i128) {
    let elapsed = env.ledger().timestamp().saturating_sub(state.last_harvest);
    if elapsed >= LOCK_DURATION {
        return (0, 0);
    }
    let remaining = (LOCK_DURATION - elapsed) as i128;
    let (total0, total1) = total_balances(env, config, state);

    let locked0 = state
        .total_locked0
        .min(total0)
        .max(0)
        .fixed_mul_floor(remaining, LOCK_DURATION as i128)
        .expect("locked profit overflow");
    let locked1 = state
        .total_locked1
        .min(total1)
        .max(0)
        .fixed_mul_floor(remaining, LOCK_DURATION as i128)
        .expect("locked profit overflow");
    (locked0, locked1)
}

/// Depositor-visible balances: totals minus still-locked profit minus
/// claimed-but-uncharged trading fees.
pub fn balances(env: &Env, config: &StrategyConfig, state: &StrategyState) -> (i128, i128) {
    let (total0, total1) = total_balances(env, config, state);
    let (locked0, locked1) = locked_profit(env, config, state);

    let avail0 = total0 - locked0;
    let avail1 = total1 - locked1;
    (avail0 - state.fees0.min(avail0), avail1 - state.fees1.min(avail1))
}
