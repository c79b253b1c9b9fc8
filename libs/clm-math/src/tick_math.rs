use clm_types::{MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK};
use soroban_sdk::{Env, U256};

/// sqrt(1.0001^(2^i)) for i = 0..20, as Q128 fractions of 2^128.
/// Together the terms cover the full |tick| <= 887272 domain.
const SQRT_1_0001_POW2: [u128; 20] = [
    0xfffcb933bd6fad37aa2d162d1a594001,
    0xfff97272373d413259a46990580e213a,
    0xfff2e50f5f656932ef12357cf3c7fdcc,
    0xffe5caca7e10e4e61c3624eaa0941cd0,
    0xffcb9843d60f6159c9db58835c926644,
    0xff973b41fa98c081472e6896dfb254c0,
    0xff2ea16466c96a3843ec78b326b52861,
    0xfe5dee046a99a2a811c461f1969c3053,
    0xfcbe86c7900a88aedcffc83b479aa3a4,
    0xf987a7253ac413176f2b074cf7815e54,
    0xf3392b0822b70005940c7a398e4b70f3,
    0xe7159475a2c29b7443b29c7fa6e889d9,
    0xd097f3bdfd2022b8845ad8f792aa5825,
    0xa9f746462d870fdf8a65dc1f90e061e5,
    0x70d869a156d2a1b890bb3df62baf32f7,
    0x31be135f97d08fd981231505542fcfa6,
    0x9aa508b5b7a84e1c677de54f3e99bc9,
    0x5d6af8dedb81196699c329225ee604,
    0x2216e584f5fa1ea926041bedfe98,
    0x48a170391f7dc42444e8fa2,
];

// 2^128 as a U256
fn q128(env: &Env) -> U256 {
    U256::from_u128(env, 1u128 << 64).mul(&U256::from_u128(env, 1u128 << 64))
}

fn u256_max(env: &Env) -> U256 {
    let high = U256::from_u128(env, u128::MAX);
    high.mul(&q128(env)).add(&U256::from_u128(env, u128::MAX))
}

// (x * y) >> 128
fn mul_shift_128(env: &Env, x: &U256, y: u128) -> U256 {
    x.mul(&U256::from_u128(env, y)).div(&q128(env))
}

/// sqrt(1.0001^tick) * 2^96 as a Q64.96 value.
///
/// Accepts the full pool tick domain; results saturate into
/// [MIN_SQRT_RATIO, MAX_SQRT_RATIO] where the true value exceeds what a
/// u128 Q64.96 can carry (|tick| beyond ~443636).
pub fn get_sqrt_ratio_at_tick(env: &Env, tick: i32) -> u128 {
    if tick < MIN_TICK || tick > MAX_TICK {
        panic!("Tick out of bounds");
    }

    let abs_tick = tick.unsigned_abs();

    // Product of the constant table entries selected by abs_tick's bits,
    // computed as a Q128 fraction. This yields the ratio for -|tick|.
    let mut ratio = q128(env);
    for (i, factor) in SQRT_1_0001_POW2.iter().enumerate() {
        if abs_tick & (1 << i) != 0 {
            ratio = mul_shift_128(env, &ratio, *factor);
        }
    }

    // Positive ticks are the reciprocal of the negative-tick ratio
    if tick > 0 {
        ratio = u256_max(env).div(&ratio);
    }

    // Q128 -> Q96
    let result = ratio.div(&U256::from_u128(env, 1u128 << 32));

    let result_u128 = result.to_u128().unwrap_or(u128::MAX);
    result_u128.clamp(MIN_SQRT_RATIO, MAX_SQRT_RATIO)
}
