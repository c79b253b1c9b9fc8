use soroban_sdk::{Env, U256};

/// (a * b) / denominator with a 256-bit intermediate product, rounding down.
pub fn mul_div(env: &Env, a: u128, b: u128, denominator: u128) -> u128 {
    if denominator == 0 {
        panic!("Division by zero");
    }

    let product = U256::from_u128(env, a).mul(&U256::from_u128(env, b));
    let result = product.div(&U256::from_u128(env, denominator));
    to_u128(env, &result)
}

/// (a * b) / denominator with a 256-bit intermediate product, rounding up.
pub fn mul_div_rounding_up(env: &Env, a: u128, b: u128, denominator: u128) -> u128 {
    let floor = mul_div(env, a, b, denominator);

    let product = U256::from_u128(env, a).mul(&U256::from_u128(env, b));
    let remainder = product.rem_euclid(&U256::from_u128(env, denominator));
    if remainder.gt(&U256::from_u32(env, 0)) {
        floor + 1
    } else {
        floor
    }
}

/// Narrow a U256 back to u128, panicking if the value does not fit.
pub(crate) fn to_u128(env: &Env, value: &U256) -> u128 {
    if value.gt(&U256::from_u128(env, u128::MAX)) {
        panic!("U256 overflow when converting to u128");
    }
    value.to_u128().unwrap()
}
