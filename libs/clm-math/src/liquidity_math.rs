use crate::full_math::mul_div;
use clm_types::Q96;
use soroban_sdk::Env;

fn sorted(a: u128, b: u128) -> (u128, u128) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

/// Largest liquidity mintable over [sqrt_a, sqrt_b] from the given token
/// amounts at the current price. In-range placements take the smaller of
/// the two single-token liquidities so neither amount is overcommitted.
pub fn get_liquidity_for_amounts(
    env: &Env,
    sqrt_price_x96: u128,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    amount0: u128,
    amount1: u128,
) -> u128 {
    let (lower, upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_price_x96 <= lower {
        // Below range: the position fills entirely with token0
        get_liquidity_for_amount0(env, lower, upper, amount0)
    } else if sqrt_price_x96 < upper {
        let liquidity0 = get_liquidity_for_amount0(env, sqrt_price_x96, upper, amount0);
        let liquidity1 = get_liquidity_for_amount1(env, lower, sqrt_price_x96, amount1);
        liquidity0.min(liquidity1)
    } else {
        // Above range: entirely token1
        get_liquidity_for_amount1(env, lower, upper, amount1)
    }
}

/// L = amount0 * (sqrt_a * sqrt_b / Q96) / (sqrt_b - sqrt_a)
fn get_liquidity_for_amount0(
    env: &Env,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    amount0: u128,
) -> u128 {
    let (lower, upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    let intermediate = mul_div(env, lower, upper, Q96);
    mul_div(env, amount0, intermediate, upper - lower)
}

/// L = amount1 * Q96 / (sqrt_b - sqrt_a)
fn get_liquidity_for_amount1(
    env: &Env,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    amount1: u128,
) -> u128 {
    let (lower, upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    mul_div(env, amount1, Q96, upper - lower)
}

/// Token amounts released by burning `liquidity` over [sqrt_a, sqrt_b] at
/// the current price. Rounds down: never promises more than the pool holds.
pub fn get_amounts_for_liquidity(
    env: &Env,
    sqrt_price_x96: u128,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    liquidity: u128,
) -> (u128, u128) {
    let (lower, upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_price_x96 <= lower {
        (get_amount0_for_liquidity(env, lower, upper, liquidity), 0)
    } else if sqrt_price_x96 < upper {
        (
            get_amount0_for_liquidity(env, sqrt_price_x96, upper, liquidity),
            get_amount1_for_liquidity(env, lower, sqrt_price_x96, liquidity),
        )
    } else {
        (0, get_amount1_for_liquidity(env, lower, upper, liquidity))
    }
}

/// amount0 = L * Q96 * (sqrt_b - sqrt_a) / (sqrt_b * sqrt_a)
fn get_amount0_for_liquidity(
    env: &Env,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    liquidity: u128,
) -> u128 {
    let (lower, upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    let shifted = mul_div(env, liquidity, Q96, upper);
    mul_div(env, shifted, upper - lower, lower)
}

/// amount1 = L * (sqrt_b - sqrt_a) / Q96
fn get_amount1_for_liquidity(
    env: &Env,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    liquidity: u128,
) -> u128 {
    let (lower, upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    mul_div(env, liquidity, upper - lower, Q96)
}
