//! Harvest pipeline stages. Each stage is a plain function over `&mut
//! StrategyState`; entry points compose them and persist the state once at
//! the end, so a panic anywhere leaves storage untouched.

use crate::errors::StrategyError;
use crate::{accounting, collab, oracle};
use clm_types::{Position, StrategyConfig, StrategyState, FEE_DIVISOR, REWARD_DURATION};
use soroban_fixed_point_math::FixedPoint;
use soroban_sdk::{token, Address, Env, Symbol};

fn claim_position(env: &Env, config: &StrategyConfig, position: &Position) -> (i128, i128, i128) {
    if !position.is_open() {
        return (0, 0, 0);
    }
    let (fee0, fee1) =
        collab::ledger_collect(env, &config.ledger, position.id, i128::MAX, i128::MAX);
    let reward = collab::ledger_claim_reward(env, &config.ledger, position.id);
    (fee0, fee1, reward)
}

/// Pull accrued trading fees and emission from both positions into the
/// wallet and record them in the earned buckets.
pub fn claim_earnings(env: &Env, config: &StrategyConfig, state: &mut StrategyState) {
    let (fee0_main, fee1_main, reward_main) = claim_position(env, config, &state.position_main);
    let (fee0_alt, fee1_alt, reward_alt) = claim_position(env, config, &state.position_alt);

    state.fees0 += fee0_main + fee0_alt;
    state.fees1 += fee1_main + fee1_alt;
    state.emission_received += reward_main + reward_alt;

    env.events().publish(
        (Symbol::new(env, "claim"),),
        (
            fee0_main + fee0_alt,
            fee1_main + fee1_alt,
            reward_main + reward_alt,
        ),
    );
}

fn close_position(env: &Env, config: &StrategyConfig, position: Position) -> Position {
    if position.is_open() {
        let (liquidity, _, _) = collab::ledger_query(env, &config.ledger, position.id);
        if liquidity > 0 {
            collab::ledger_decrease(env, &config.ledger, position.id, liquidity);
        }
        // Principal lands in the wallet, not in the fee buckets
        collab::ledger_collect(env, &config.ledger, position.id, i128::MAX, i128::MAX);
        collab::ledger_close(env, &config.ledger, position.id);
    }
    Position {
        id: 0,
        tick_lower: position.tick_lower,
        tick_upper: position.tick_upper,
    }
}

/// Unwind both positions back to the wallet. Tick bounds are kept so a
/// later deposit can re-open the same ranges without replacing them.
pub fn remove_liquidity(env: &Env, config: &StrategyConfig, state: &mut StrategyState) {
    state.position_main = close_position(env, config, state.position_main.clone());
    state.position_alt = close_position(env, config, state.position_alt.clone());
}

/// Convert the fee slice of one earned bucket to the native token.
/// Returns the post-fee remainder and the native amount obtained.
fn skim(
    env: &Env,
    config: &StrategyConfig,
    token: &Address,
    amount: i128,
    total_fee: u32,
) -> (i128, i128) {
    if amount <= 0 {
        return (amount.max(0), 0);
    }
    let to_swap = amount
        .fixed_mul_floor(total_fee as i128, FEE_DIVISOR as i128)
        .expect("fee math overflow");
    if to_swap == 0 {
        return (amount, 0);
    }
    let native = if *token == config.native_token {
        to_swap
    } else {
        token::Client::new(env, token).transfer(
            &env.current_contract_address(),
            &config.swapper,
            &to_swap,
        );
        collab::swapper_swap(env, &config.swapper, token, &config.native_token, to_swap)
    };
    (amount - to_swap, native)
}

/// Take the performance fee from each earned bucket, swap it to native and
/// split the proceeds between caller, strategist and protocol. Returns the
/// post-fee amounts of (token0, token1, emission).
pub fn charge_fees(
    env: &Env,
    config: &StrategyConfig,
    state: &StrategyState,
    call_recipient: &Address,
) -> (i128, i128, i128) {
    let split = collab::fee_config_get_fees(env, &config.fee_config);

    let mut native = 0i128;
    let (post0, earned) = skim(env, config, &config.token0, state.fees0, split.total);
    native += earned;
    let (post1, earned) = skim(env, config, &config.token1, state.fees1, split.total);
    native += earned;
    let (post_emission, earned) = skim(
        env,
        config,
        &config.emission_token,
        state.emission_received,
        split.total,
    );
    native += earned;

    if native > 0 {
        let call_amount = native
            .fixed_mul_floor(split.call as i128, FEE_DIVISOR as i128)
            .expect("fee math overflow");
        let strategist_amount = native
            .fixed_mul_floor(split.strategist as i128, FEE_DIVISOR as i128)
            .expect("fee math overflow");
        // Rounding dust stays with the protocol
        let protocol_amount = native - call_amount - strategist_amount;

        let here = env.current_contract_address();
        let native_client = token::Client::new(env, &config.native_token);
        if call_amount > 0 {
            native_client.transfer(&here, call_recipient, &call_amount);
        }
        if strategist_amount > 0 {
            native_client.transfer(&here, &config.strategist, &strategist_amount);
        }
        if protocol_amount > 0 {
            native_client.transfer(&here, &config.protocol_fee_recipient, &protocol_amount);
        }

        env.events().publish(
            (Symbol::new(env, "fees_charged"),),
            (call_amount, strategist_amount, protocol_amount),
        );
    }

    (post0, post1, post_emission)
}

/// Roll the post-fee token proceeds into a fresh lock. Whatever was still
/// locked from the previous harvest carries over, so back-to-back harvests
/// never release profit early.
pub fn lock_profit(
    env: &Env,
    config: &StrategyConfig,
    state: &mut StrategyState,
    post0: i128,
    post1: i128,
) {
    let (carry0, carry1) = accounting::locked_profit(env, config, state);
    state.total_locked0 = post0 + carry0;
    state.total_locked1 = post1 + carry1;
    state.fees0 = 0;
    state.fees1 = 0;
    state.last_harvest = env.ledger().timestamp();
}

/// Hand the post-fee emission to the reward distributor and start a new
/// streaming window.
pub fn forward_emission(
    env: &Env,
    config: &StrategyConfig,
    state: &mut StrategyState,
    post_emission: i128,
) {
    state.emission_received = 0;
    if post_emission > 0 {
        token::Client::new(env, &config.emission_token).transfer(
            &env.current_contract_address(),
            &config.reward_distributor,
            &post_emission,
        );
        collab::rewarder_notify(
            env,
            &config.reward_distributor,
            &config.emission_token,
            post_emission,
            REWARD_DURATION,
        );
    }
}

fn open_position(
    env: &Env,
    config: &StrategyConfig,
    position: &mut Position,
    amount0: i128,
    amount1: i128,
) {
    // The ledger is funded up front, like the swapper; a nested pull out
    // of this contract would not be authorized.
    let here = env.current_contract_address();
    if amount0 > 0 {
        token::Client::new(env, &config.token0).transfer(&here, &config.ledger, &amount0);
    }
    if amount1 > 0 {
        token::Client::new(env, &config.token1).transfer(&here, &config.ledger, &amount1);
    }
    let id = collab::ledger_open(
        env,
        &config.ledger,
        position.tick_lower,
        position.tick_upper,
        amount0,
        amount1,
    );
    position.id = id;
    collab::ledger_stake(env, &config.ledger, id);
}

/// Deploy wallet balances into the two ranges: the main range takes as much
/// of both tokens as its bounds allow, the alt range takes the leftover of
/// whichever token dominates.
pub fn add_liquidity(
    env: &Env,
    config: &StrategyConfig,
    state: &mut StrategyState,
) -> Result<(), StrategyError> {
    // Before the first range placement both positions carry (0, 0)
    // bounds; there is nothing valid to deploy into yet
    if !state.ticks_initialized {
        return Ok(());
    }

    let sqrt_price = collab::pool_sqrt_price(env, &config.pool);

    let (bal0, bal1) = accounting::wallet_balances(env, config, state);
    let sqrt_lower = clm_math::get_sqrt_ratio_at_tick(env, state.position_main.tick_lower);
    let sqrt_upper = clm_math::get_sqrt_ratio_at_tick(env, state.position_main.tick_upper);
    let liquidity = clm_math::get_liquidity_for_amounts(
        env,
        sqrt_price,
        sqrt_lower,
        sqrt_upper,
        bal0.max(0) as u128,
        bal1.max(0) as u128,
    );
    let (amount0, amount1) =
        clm_math::get_amounts_for_liquidity(env, sqrt_price, sqrt_lower, sqrt_upper, liquidity);

    if liquidity > 0 && amount0 > 0 && amount1 > 0 {
        let mut main = state.position_main.clone();
        open_position(env, config, &mut main, amount0 as i128, amount1 as i128);
        state.position_main = main;
    } else {
        // One-sided wallet: the main range stays closed, and leaving the
        // funds for the alt range is only safe at an honest price
        oracle::require_calm(env, config, state)?;
    }

    let (bal0, bal1) = accounting::wallet_balances(env, config, state);
    let sqrt_lower = clm_math::get_sqrt_ratio_at_tick(env, state.position_alt.tick_lower);
    let sqrt_upper = clm_math::get_sqrt_ratio_at_tick(env, state.position_alt.tick_upper);
    let liquidity = clm_math::get_liquidity_for_amounts(
        env,
        sqrt_price,
        sqrt_lower,
        sqrt_upper,
        bal0.max(0) as u128,
        bal1.max(0) as u128,
    );
    if liquidity > 0 {
        let (amount0, amount1) =
            clm_math::get_amounts_for_liquidity(env, sqrt_price, sqrt_lower, sqrt_upper, liquidity);
        if amount0 > 0 || amount1 > 0 {
            let mut alt = state.position_alt.clone();
            open_position(env, config, &mut alt, amount0 as i128, amount1 as i128);
            state.position_alt = alt;
        }
    }

    Ok(())
}
