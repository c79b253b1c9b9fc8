use soroban_sdk::contracterror;

/// Failure taxonomy for the strategy engine. Any error aborts the whole
/// invocation; the host rolls back storage, so there is never a partial
/// state change.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum StrategyError {
    /// Caller is not in the rebalancer registry (or otherwise lacks a role)
    NotAuthorized = 1,
    /// Caller is not the owning vault
    NotVault = 2,
    /// Parameter outside allowed bounds
    InvalidInput = 3,
    /// Current tick deviates too far from the TWAP tick
    NotCalm = 4,
    /// Post-panic balances fell below the caller-declared floor
    TooMuchSlippage = 5,
    /// Alt range degenerate or colliding with the main range
    InvalidTicks = 6,
    NotInitialized = 7,
    AlreadyInitialized = 8,
    Paused = 9,
}
