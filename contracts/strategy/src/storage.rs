use crate::errors::StrategyError;
use clm_types::{StrategyConfig, StrategyState};
use soroban_sdk::{contracttype, Env};

/// Storage keys for the strategy contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Collaborator addresses (instance storage, immutable)
    Config,
    /// Engine state (instance storage, rewritten every cycle)
    State,
}

// TTL constants, ~1 day threshold / ~30 day extension at 5s ledgers
const INSTANCE_TTL_THRESHOLD: u32 = 17280;
const INSTANCE_TTL_EXTEND: u32 = 518400;

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn get_config(env: &Env) -> Result<StrategyConfig, StrategyError> {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(StrategyError::NotInitialized)
}

pub fn set_config(env: &Env, config: &StrategyConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    extend_instance_ttl(env);
}

pub fn get_state(env: &Env) -> Result<StrategyState, StrategyError> {
    env.storage()
        .instance()
        .get(&DataKey::State)
        .ok_or(StrategyError::NotInitialized)
}

pub fn set_state(env: &Env, state: &StrategyState) {
    env.storage().instance().set(&DataKey::State, state);
}
