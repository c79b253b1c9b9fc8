use soroban_sdk::{contracttype, Address};

/// One open range on the underlying pool. `id == 0` means no open position.
#[contracttype]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    /// Handle into the position ledger
    pub id: u32,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

impl Position {
    pub fn empty() -> Self {
        Self {
            id: 0,
            tick_lower: 0,
            tick_upper: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.id != 0
    }
}

/// Collaborator addresses, immutable after initialization
#[contracttype]
#[derive(Clone, Debug)]
pub struct StrategyConfig {
    /// Underlying concentrated-liquidity pool
    pub pool: Address,
    /// Position ledger that mints, stakes and burns range positions
    pub ledger: Address,
    /// Owning vault; the only caller allowed to move depositor funds
    pub vault: Address,
    pub token0: Address,
    pub token1: Address,
    /// Reward/emission token claimed from the ledger
    pub emission_token: Address,
    /// Network base asset fee shares are paid in
    pub native_token: Address,
    /// Multi-hop router used to convert fee slices to the native asset
    pub swapper: Address,
    /// Streams emission proceeds to stakers
    pub reward_distributor: Address,
    /// Supplies the fee fractions
    pub fee_config: Address,
    /// Registry of addresses allowed to call move_ticks
    pub rebalancer_registry: Address,
    pub owner: Address,
    pub strategist: Address,
    pub protocol_fee_recipient: Address,
}

/// Mutable engine state, owned exclusively by the strategy contract
#[contracttype]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrategyState {
    pub position_main: Position,
    pub position_alt: Position,
    /// Main-range half-width as a multiple of tick spacing
    pub position_width: i32,
    /// Max allowed distance between current tick and TWAP tick
    pub max_tick_deviation: i32,
    /// TWAP averaging window in seconds
    pub twap_interval: u64,
    /// Trading fees claimed but not yet processed by a harvest
    pub fees0: i128,
    pub fees1: i128,
    /// Emission tokens claimed but not yet forwarded to the distributor
    pub emission_received: i128,
    /// Post-fee harvest proceeds still releasing linearly to depositors
    pub total_locked0: i128,
    pub total_locked1: i128,
    pub last_harvest: u64,
    pub last_rebalance: u64,
    /// True once the first range placement succeeded
    pub ticks_initialized: bool,
    pub paused: bool,
}

/// Fee fractions supplied by the fee-config collaborator, in hundredths of
/// a basis point. `total` is the slice taken from each harvest; `call` and
/// `strategist` split the resulting native amount, the protocol keeps the
/// remainder.
#[contracttype]
#[derive(Clone, Debug)]
pub struct FeeSplit {
    pub total: u32,
    pub call: u32,
    pub strategist: u32,
}
