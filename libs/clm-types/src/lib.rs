#![no_std]

mod strategy;

pub use strategy::*;

/// Q96 constant (2^96) for fixed-point sqrt-price math
pub const Q96: u128 = 1 << 96;

/// Minimum tick index (global pool bound)
pub const MIN_TICK: i32 = -887272;

/// Maximum tick index (global pool bound)
pub const MAX_TICK: i32 = 887272;

/// Minimum sqrt price: sqrt(1.0001^-887272) * 2^96
pub const MIN_SQRT_RATIO: u128 = 4295128739;

/// Maximum sqrt price representable as a Q64.96 u128 (reached near tick
/// 443636); conversions for larger ticks saturate here
pub const MAX_SQRT_RATIO: u128 = 340275971719517849884101479065584693834;

/// Spot price is exposed at 36-decimal fixed point:
/// price = (sqrt_price_x96 * 1e18 / 2^96)^2
pub const PRECISION: u128 = 1_000_000_000_000_000_000_000_000_000_000_000_000;

/// Fee fractions are in hundredths of a basis point (1e-6),
/// the same convention pools use for their fee tier
pub const FEE_DIVISOR: u128 = 1_000_000;

/// Harvested profit is released to depositors linearly over this window
pub const LOCK_DURATION: u64 = 3600;

/// Emission proceeds are streamed by the reward distributor over this window
pub const REWARD_DURATION: u64 = 86400;

/// Shortest allowed TWAP averaging window
pub const MIN_TWAP_INTERVAL: u64 = 60;
