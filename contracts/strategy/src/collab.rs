//! Cross-contract calls into the engine's collaborators. Every call is
//! synchronous and fallible; a collaborator panic aborts the whole
//! invocation, which is exactly the all-or-nothing behavior the pipeline
//! relies on.

use clm_types::FeeSplit;
use soroban_sdk::{Address, Env, IntoVal, Symbol, Vec};

// === Pool ===

pub fn pool_tick(env: &Env, pool: &Address) -> i32 {
    env.invoke_contract(pool, &Symbol::new(env, "tick"), ().into_val(env))
}

pub fn pool_sqrt_price(env: &Env, pool: &Address) -> u128 {
    env.invoke_contract(pool, &Symbol::new(env, "sqrt_price_x96"), ().into_val(env))
}

pub fn pool_tick_spacing(env: &Env, pool: &Address) -> i32 {
    env.invoke_contract(pool, &Symbol::new(env, "tick_spacing"), ().into_val(env))
}

pub fn pool_fee(env: &Env, pool: &Address) -> u32 {
    env.invoke_contract(pool, &Symbol::new(env, "fee"), ().into_val(env))
}

/// Tick cumulatives at each requested lookback, oldest first.
pub fn pool_observe(env: &Env, pool: &Address, seconds_ago: Vec<u64>) -> Vec<i64> {
    env.invoke_contract(pool, &Symbol::new(env, "observe"), (seconds_ago,).into_val(env))
}

// === Position ledger ===

/// Open a position over the given ticks. The desired amounts must already
/// have been transferred to the ledger; it does not pull from the caller.
pub fn ledger_open(
    env: &Env,
    ledger: &Address,
    tick_lower: i32,
    tick_upper: i32,
    amount0_desired: i128,
    amount1_desired: i128,
) -> u32 {
    env.invoke_contract(
        ledger,
        &Symbol::new(env, "open"),
        (tick_lower, tick_upper, amount0_desired, amount1_desired).into_val(env),
    )
}

pub fn ledger_decrease(env: &Env, ledger: &Address, id: u32, liquidity: u128) {
    env.invoke_contract::<()>(
        ledger,
        &Symbol::new(env, "decrease_liquidity"),
        (id, liquidity).into_val(env),
    )
}

/// Pull owed amounts (fees before removal, principal after) to the caller.
pub fn ledger_collect(
    env: &Env,
    ledger: &Address,
    id: u32,
    amount0_max: i128,
    amount1_max: i128,
) -> (i128, i128) {
    env.invoke_contract(
        ledger,
        &Symbol::new(env, "collect"),
        (id, amount0_max, amount1_max).into_val(env),
    )
}

pub fn ledger_close(env: &Env, ledger: &Address, id: u32) {
    env.invoke_contract::<()>(ledger, &Symbol::new(env, "close"), (id,).into_val(env))
}

/// (liquidity, owed0, owed1) as recorded on the ledger position.
pub fn ledger_query(env: &Env, ledger: &Address, id: u32) -> (u128, i128, i128) {
    env.invoke_contract(
        ledger,
        &Symbol::new(env, "query_position"),
        (id,).into_val(env),
    )
}

pub fn ledger_stake(env: &Env, ledger: &Address, id: u32) {
    env.invoke_contract::<()>(ledger, &Symbol::new(env, "stake"), (id,).into_val(env))
}

/// Collect pending emission for a position; returns the amount paid out.
pub fn ledger_claim_reward(env: &Env, ledger: &Address, id: u32) -> i128 {
    env.invoke_contract(
        ledger,
        &Symbol::new(env, "claim_reward"),
        (id,).into_val(env),
    )
}

// === Swapper ===

/// Swap `amount_in` already transferred to the swapper; route selection is
/// the swapper's business. Returns the output amount paid back to us.
pub fn swapper_swap(
    env: &Env,
    swapper: &Address,
    token_in: &Address,
    token_out: &Address,
    amount_in: i128,
) -> i128 {
    env.invoke_contract(
        swapper,
        &Symbol::new(env, "swap"),
        (token_in, token_out, amount_in).into_val(env),
    )
}

// === Reward distributor ===

pub fn rewarder_notify(
    env: &Env,
    rewarder: &Address,
    token: &Address,
    amount: i128,
    duration: u64,
) {
    env.invoke_contract::<()>(
        rewarder,
        &Symbol::new(env, "notify"),
        (token, amount, duration).into_val(env),
    )
}

// === Fee config ===

pub fn fee_config_get_fees(env: &Env, fee_config: &Address) -> FeeSplit {
    env.invoke_contract(fee_config, &Symbol::new(env, "get_fees"), ().into_val(env))
}

// === Rebalancer registry ===

pub fn registry_is_rebalancer(env: &Env, registry: &Address, who: &Address) -> bool {
    env.invoke_contract(
        registry,
        &Symbol::new(env, "is_rebalancer"),
        (who,).into_val(env),
    )
}
