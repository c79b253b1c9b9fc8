use crate::full_math::mul_div;
use crate::tick_math::get_sqrt_ratio_at_tick;
use clm_types::Q96;
use soroban_sdk::Env;

const WAD: u128 = 1_000_000_000_000_000_000;

/// Spot price of token0 in token1 at 36-decimal fixed point:
/// (sqrt_price_x96 * 1e18 / 2^96)^2.
pub fn price_x36(env: &Env, sqrt_price_x96: u128) -> u128 {
    let root = mul_div(env, sqrt_price_x96, WAD, Q96);
    mul_div(env, root, root, 1)
}

/// 36-decimal price at a tick boundary.
pub fn price_of_tick(env: &Env, tick: i32) -> u128 {
    price_x36(env, get_sqrt_ratio_at_tick(env, tick))
}
