use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::state::{Pool, StakeAccount};
use crate::ContractError;

// ── Storage key constants ───────────────────────────────────────────────────

const POOL: Symbol = symbol_short!("POOL");

// Per-account persistent storage uses tuple keys: (prefix, staker)
const ACCOUNT: Symbol = symbol_short!("ACCT");

const TTL_THRESHOLD: u32 = 17_280; // ~1 day
const TTL_EXTEND_TO: u32 = 518_400; // ~30 days

fn account_key(staker: &Address) -> (Symbol, Address) {
    (ACCOUNT, staker.clone())
}

// ── Pool aggregate ──────────────────────────────────────────────────────────

pub fn has_pool(env: &Env) -> bool {
    env.storage().instance().has(&POOL)
}

pub fn load_pool(env: &Env) -> Result<Pool, ContractError> {
    env.storage()
        .instance()
        .get(&POOL)
        .ok_or(ContractError::NotInitialized)
}

pub fn save_pool(env: &Env, pool: &Pool) {
    env.storage().instance().set(&POOL, pool);
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

// ── Accounts ────────────────────────────────────────────────────────────────

/// Retrieve a staker's account, returning `None` if they never deposited.
pub fn load_account(env: &Env, staker: &Address) -> Option<StakeAccount> {
    let key = account_key(staker);
    let account: Option<StakeAccount> = env.storage().persistent().get(&key);
    if account.is_some() {
        env.storage()
            .persistent()
            .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    account
}

/// Existing account, or a fresh one checkpointed at `precision`.
pub fn load_account_or_new(env: &Env, staker: &Address, precision: u32) -> StakeAccount {
    load_account(env, staker).unwrap_or_else(|| StakeAccount::new(precision))
}

/// Persist an account. Zeroed accounts are kept so re-deposits reuse them.
pub fn save_account(env: &Env, staker: &Address, account: &StakeAccount) {
    let key = account_key(staker);
    env.storage().persistent().set(&key, account);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
