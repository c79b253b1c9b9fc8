#![no_std]

//! Passive concentrated-liquidity strategy. Keeps depositor funds deployed
//! in two ranges on the underlying pool (a symmetric main range and a
//! single-sided alt range), harvests trading fees and emission, charges a
//! performance fee in the native token and releases the remaining profit to
//! depositors linearly over a lock window. Every price-sensitive action is
//! gated on the tick sitting close to its TWAP.

mod accounting;
mod collab;
mod errors;
mod oracle;
mod pipeline;
mod range;
mod storage;


pub use errors::StrategyError;

use clm_types::{Position, StrategyConfig, StrategyState, MIN_TWAP_INTERVAL};
use soroban_sdk::{contract, contractimpl, token, Address, Env, Symbol};

fn require_vault(config: &StrategyConfig, caller: &Address) -> Result<(), StrategyError> {
    caller.require_auth();
    if *caller != config.vault {
        return Err(StrategyError::NotVault);
    }
    Ok(())
}

fn validate_deviation(
    env: &Env,
    config: &StrategyConfig,
    max_tick_deviation: i32,
) -> Result<(), StrategyError> {
    let spacing = collab::pool_tick_spacing(env, &config.pool);
    if max_tick_deviation <= 0 || max_tick_deviation >= 4 * spacing {
        return Err(StrategyError::InvalidInput);
    }
    Ok(())
}

#[contract]
pub struct ClmStrategy;

#[contractimpl]
impl ClmStrategy {
    pub fn initialize(
        env: Env,
        config: StrategyConfig,
        position_width: i32,
        max_tick_deviation: i32,
        twap_interval: u64,
    ) -> Result<(), StrategyError> {
        if storage::is_initialized(&env) {
            return Err(StrategyError::AlreadyInitialized);
        }
        if position_width <= 0 {
            return Err(StrategyError::InvalidInput);
        }
        validate_deviation(&env, &config, max_tick_deviation)?;
        if twap_interval < MIN_TWAP_INTERVAL {
            return Err(StrategyError::InvalidInput);
        }

        let state = StrategyState {
            position_main: Position::empty(),
            position_alt: Position::empty(),
            position_width,
            max_tick_deviation,
            twap_interval,
            fees0: 0,
            fees1: 0,
            emission_received: 0,
            total_locked0: 0,
            total_locked1: 0,
            last_harvest: env.ledger().timestamp(),
            last_rebalance: 0,
            ticks_initialized: false,
            paused: false,
        };
        storage::set_config(&env, &config);
        storage::set_state(&env, &state);

        env.events()
            .publish((Symbol::new(&env, "initialized"),), config.pool);
        Ok(())
    }

    // === Vault-driven flows ===

    /// Called by the vault before it mints or burns shares: realizes
    /// pending earnings and unwinds both positions so share math sees an
    /// up-to-date wallet.
    pub fn before_action(env: Env, caller: Address) -> Result<(), StrategyError> {
        let config = storage::get_config(&env)?;
        require_vault(&config, &caller)?;
        let mut state = storage::get_state(&env)?;

        pipeline::claim_earnings(&env, &config, &mut state);
        pipeline::remove_liquidity(&env, &config, &mut state);
        storage::set_state(&env, &state);
        Ok(())
    }

    /// Deploy whatever sits in the wallet into the two ranges. On the very
    /// first deposit this also places the initial ranges.
    pub fn deposit(env: Env, caller: Address) -> Result<(), StrategyError> {
        let config = storage::get_config(&env)?;
        require_vault(&config, &caller)?;
        let mut state = storage::get_state(&env)?;
        if state.paused {
            return Err(StrategyError::Paused);
        }
        oracle::require_calm(&env, &config, &state)?;

        if !state.ticks_initialized {
            range::set_ticks(&env, &config, &mut state)?;
            state.ticks_initialized = true;
        }
        pipeline::add_liquidity(&env, &config, &mut state)?;
        storage::set_state(&env, &state);

        let (bal0, bal1) = accounting::total_balances(&env, &config, &state);
        env.events()
            .publish((Symbol::new(&env, "deposit"),), (bal0, bal1));
        Ok(())
    }

    /// Send `amount0`/`amount1` to the vault, then redeploy the rest.
    pub fn withdraw(
        env: Env,
        caller: Address,
        amount0: i128,
        amount1: i128,
    ) -> Result<(), StrategyError> {
        let config = storage::get_config(&env)?;
        require_vault(&config, &caller)?;
        if amount0 < 0 || amount1 < 0 {
            return Err(StrategyError::InvalidInput);
        }
        let mut state = storage::get_state(&env)?;

        pipeline::claim_earnings(&env, &config, &mut state);
        pipeline::remove_liquidity(&env, &config, &mut state);

        let here = env.current_contract_address();
        if amount0 > 0 {
            token::Client::new(&env, &config.token0).transfer(&here, &config.vault, &amount0);
        }
        if amount1 > 0 {
            token::Client::new(&env, &config.token1).transfer(&here, &config.vault, &amount1);
        }

        if !state.paused {
            pipeline::add_liquidity(&env, &config, &mut state)?;
        }
        storage::set_state(&env, &state);

        env.events()
            .publish((Symbol::new(&env, "withdraw"),), (amount0, amount1));
        Ok(())
    }

    // === Harvest ===

    /// Permissionless compounding cycle: claim, unwind, charge the
    /// performance fee, re-lock profit, forward emission and redeploy.
    /// `call_recipient` receives the caller share of the fee.
    pub fn harvest(env: Env, call_recipient: Address) -> Result<(), StrategyError> {
        let config = storage::get_config(&env)?;
        let mut state = storage::get_state(&env)?;
        if state.paused {
            return Err(StrategyError::Paused);
        }
        oracle::require_calm(&env, &config, &state)?;

        pipeline::claim_earnings(&env, &config, &mut state);
        pipeline::remove_liquidity(&env, &config, &mut state);
        let (post0, post1, post_emission) =
            pipeline::charge_fees(&env, &config, &state, &call_recipient);
        pipeline::lock_profit(&env, &config, &mut state, post0, post1);
        pipeline::forward_emission(&env, &config, &mut state, post_emission);
        pipeline::add_liquidity(&env, &config, &mut state)?;
        storage::set_state(&env, &state);

        env.events().publish(
            (Symbol::new(&env, "harvest"),),
            (post0, post1, post_emission),
        );
        Ok(())
    }

    /// Realize pending fees and emission into the earned buckets without
    /// running the full harvest.
    pub fn claim_earnings(env: Env) -> Result<(), StrategyError> {
        let config = storage::get_config(&env)?;
        let mut state = storage::get_state(&env)?;
        oracle::require_calm(&env, &config, &state)?;

        pipeline::claim_earnings(&env, &config, &mut state);
        storage::set_state(&env, &state);
        Ok(())
    }

    // === Rebalancing ===

    /// Re-center both ranges on the current tick. Restricted to addresses
    /// listed in the rebalancer registry.
    pub fn move_ticks(env: Env, caller: Address) -> Result<(), StrategyError> {
        let config = storage::get_config(&env)?;
        caller.require_auth();
        if !collab::registry_is_rebalancer(&env, &config.rebalancer_registry, &caller) {
            return Err(StrategyError::NotAuthorized);
        }
        let mut state = storage::get_state(&env)?;
        if state.paused {
            return Err(StrategyError::Paused);
        }
        oracle::require_calm(&env, &config, &state)?;

        pipeline::claim_earnings(&env, &config, &mut state);
        pipeline::remove_liquidity(&env, &config, &mut state);
        range::set_ticks(&env, &config, &mut state)?;
        pipeline::add_liquidity(&env, &config, &mut state)?;
        storage::set_state(&env, &state);
        Ok(())
    }

    // === Owner controls ===

    pub fn set_position_width(env: Env, width: i32) -> Result<(), StrategyError> {
        let config = storage::get_config(&env)?;
        config.owner.require_auth();
        if width <= 0 {
            return Err(StrategyError::InvalidInput);
        }
        let mut state = storage::get_state(&env)?;
        if state.paused {
            return Err(StrategyError::Paused);
        }
        oracle::require_calm(&env, &config, &state)?;

        pipeline::claim_earnings(&env, &config, &mut state);
        pipeline::remove_liquidity(&env, &config, &mut state);
        state.position_width = width;
        range::set_ticks(&env, &config, &mut state)?;
        pipeline::add_liquidity(&env, &config, &mut state)?;
        storage::set_state(&env, &state);
        env.events()
            .publish((Symbol::new(&env, "set_position_width"),), width);
        Ok(())
    }

    pub fn set_deviation(env: Env, max_tick_deviation: i32) -> Result<(), StrategyError> {
        let config = storage::get_config(&env)?;
        config.owner.require_auth();
        validate_deviation(&env, &config, max_tick_deviation)?;
        let mut state = storage::get_state(&env)?;
        state.max_tick_deviation = max_tick_deviation;
        storage::set_state(&env, &state);
        env.events()
            .publish((Symbol::new(&env, "set_deviation"),), max_tick_deviation);
        Ok(())
    }

    pub fn set_twap_interval(env: Env, twap_interval: u64) -> Result<(), StrategyError> {
        let config = storage::get_config(&env)?;
        config.owner.require_auth();
        if twap_interval < MIN_TWAP_INTERVAL {
            return Err(StrategyError::InvalidInput);
        }
        let mut state = storage::get_state(&env)?;
        state.twap_interval = twap_interval;
        storage::set_state(&env, &state);
        env.events()
            .publish((Symbol::new(&env, "set_twap_interval"),), twap_interval);
        Ok(())
    }

    /// Emergency exit: unwind everything to the wallet and pause. Runs
    /// without the calm guard, so the caller supplies minimum balances to
    /// bound what a manipulated price can cost.
    pub fn panic_strategy(env: Env, min0: i128, min1: i128) -> Result<(), StrategyError> {
        let config = storage::get_config(&env)?;
        config.owner.require_auth();
        let mut state = storage::get_state(&env)?;

        pipeline::claim_earnings(&env, &config, &mut state);
        pipeline::remove_liquidity(&env, &config, &mut state);

        let (bal0, bal1) = accounting::wallet_balances(&env, &config, &state);
        if bal0 < min0 || bal1 < min1 {
            return Err(StrategyError::TooMuchSlippage);
        }

        state.paused = true;
        storage::set_state(&env, &state);

        env.events()
            .publish((Symbol::new(&env, "panic"),), (bal0, bal1));
        Ok(())
    }

    pub fn unpause(env: Env) -> Result<(), StrategyError> {
        let config = storage::get_config(&env)?;
        config.owner.require_auth();
        let mut state = storage::get_state(&env)?;
        state.paused = false;
        oracle::require_calm(&env, &config, &state)?;

        range::set_ticks(&env, &config, &mut state)?;
        state.ticks_initialized = true;
        pipeline::add_liquidity(&env, &config, &mut state)?;
        storage::set_state(&env, &state);
        env.events().publish((Symbol::new(&env, "unpause"),), ());
        Ok(())
    }

    // === Views ===

    /// Depositor-visible balances: totals minus locked profit and pending
    /// fees. This is what vault share math prices against.
    pub fn balances(env: Env) -> Result<(i128, i128), StrategyError> {
        let config = storage::get_config(&env)?;
        let state = storage::get_state(&env)?;
        Ok(accounting::balances(&env, &config, &state))
    }

    pub fn total_balances(env: Env) -> Result<(i128, i128), StrategyError> {
        let config = storage::get_config(&env)?;
        let state = storage::get_state(&env)?;
        Ok(accounting::total_balances(&env, &config, &state))
    }

    pub fn locked_profit(env: Env) -> Result<(i128, i128), StrategyError> {
        let config = storage::get_config(&env)?;
        let state = storage::get_state(&env)?;
        Ok(accounting::locked_profit(&env, &config, &state))
    }

    /// Main-range bounds as 36-decimal token1-per-token0 prices.
    pub fn range(env: Env) -> Result<(u128, u128), StrategyError> {
        let state = storage::get_state(&env)?;
        let lower = clm_math::price_of_tick(&env, state.position_main.tick_lower);
        let upper = clm_math::price_of_tick(&env, state.position_main.tick_upper);
        Ok((lower, upper))
    }

    /// Current pool price, 36 decimals.
    pub fn price(env: Env) -> Result<u128, StrategyError> {
        let config = storage::get_config(&env)?;
        let sqrt_price = collab::pool_sqrt_price(&env, &config.pool);
        Ok(clm_math::price_x36(&env, sqrt_price))
    }

    /// Fee tier of the underlying pool, in hundredths of a basis point.
    pub fn pool_fee(env: Env) -> Result<u32, StrategyError> {
        let config = storage::get_config(&env)?;
        Ok(collab::pool_fee(&env, &config.pool))
    }

    pub fn is_calm(env: Env) -> Result<bool, StrategyError> {
        let config = storage::get_config(&env)?;
        let state = storage::get_state(&env)?;
        Ok(oracle::is_calm(&env, &config, &state))
    }

    pub fn get_config(env: Env) -> Result<StrategyConfig, StrategyError> {
        storage::get_config(&env)
    }

    pub fn get_state(env: Env) -> Result<StrategyState, StrategyError> {
        storage::get_state(&env)
    }
}
