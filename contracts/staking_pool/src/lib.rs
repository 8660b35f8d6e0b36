#![no_std]

//! Fixed-term staking pool.
//!
//! Users deposit one token, accrue rewards from a fixed budget in
//! proportion to stake and elapsed time over a bounded period, and
//! withdraw principal plus rewards once their lockup has passed. After a
//! full extra period of grace the operator may sweep whatever the pool
//! holds beyond principal and outstanding reward commitments.
//!
//! Entry points load the pool aggregate and the caller's account, hand
//! them to the pure ledger with the ledger timestamp as `now`, move
//! tokens, and only then write state back.

pub mod config;
pub mod events;
pub mod ledger;
pub mod lifecycle;
pub mod residual;
pub mod rewards;
pub mod state;
pub mod storage;

use common::operator;
use soroban_sdk::{contract, contractimpl, log, token, Address, Env};

pub use config::{LockupPolicy, PoolConfig};
pub use state::{Pool, PoolPhase, StakeAccount};

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidConfig = 4,
    PrecisionOutOfRange = 5,
    AlreadyStarted = 6,
    ZeroAmount = 7,
    MaxStakeExceeded = 8,
    AllowanceOrBalanceInsufficient = 9,
    AmountExceedsStaked = 10,
    LockupActive = 11,
    StakingEnded = 12,
    NothingToClaim = 13,
    TooEarly = 14,
    NoResidual = 15,
    InsufficientPoolBalance = 16,
    PendingOperatorMissing = 17,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct StakingPoolContract;

#[contractimpl]
impl StakingPoolContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Configure the pool. `operator` becomes the only address allowed to
    /// start staking, tune precision and sweep residual tokens.
    pub fn initialize(env: Env, operator: Address, config: PoolConfig) -> Result<(), ContractError> {
        if storage::has_pool(&env) {
            return Err(ContractError::AlreadyInitialized);
        }

        let pool = Pool::from_config(&config)?;

        operator::set_operator(&env, &operator);
        storage::save_pool(&env, &pool);

        events::publish_initialized(
            &env,
            operator,
            pool.token,
            pool.total_reward_pool,
            pool.total_period,
            pool.lockup_duration,
            pool.max_pool_size,
        );

        Ok(())
    }

    // ── Operator ────────────────────────────────────────────────────────────

    /// Open the staking period now. Returns the resulting `end_time`.
    pub fn start_staking(env: Env, caller: Address) -> Result<u64, ContractError> {
        let mut pool = storage::load_pool(&env)?;
        Self::require_operator(&env, &caller)?;

        let now = env.ledger().timestamp();
        let end = lifecycle::start(&mut pool, now)?;
        storage::save_pool(&env, &pool);

        events::publish_staking_started(&env, now, end);

        Ok(end)
    }

    /// Change the fixed-point precision used by future settlements.
    ///
    /// Existing checkpoints keep the precision they were recorded at and
    /// are rescaled when their account is next settled.
    pub fn set_precision(env: Env, caller: Address, precision: u32) -> Result<(), ContractError> {
        let mut pool = storage::load_pool(&env)?;
        Self::require_operator(&env, &caller)?;

        if !rewards::precision_supported(&pool, precision) {
            return Err(ContractError::PrecisionOutOfRange);
        }

        let old = pool.precision;
        pool.precision = precision;
        storage::save_pool(&env, &pool);

        events::publish_precision_set(&env, old, precision);

        Ok(())
    }

    /// Sweep tokens that no staker can ever claim. Only possible one full
    /// period after `end_time`. Returns the amount swept.
    pub fn withdraw_residual_balance(env: Env, caller: Address) -> Result<i128, ContractError> {
        let mut pool = storage::load_pool(&env)?;
        Self::require_operator(&env, &caller)?;

        lifecycle::ensure_sweepable(&pool, env.ledger().timestamp())?;

        let balance = Self::pool_balance(&env, &pool);
        let amount = residual::sweepable(&pool, balance)?;

        Self::push_tokens(&env, &pool, &caller, amount)?;
        residual::record_sweep(&mut pool, amount);
        storage::save_pool(&env, &pool);

        log!(&env, "residual swept", amount, pool.total_unclaimed_liability);
        events::publish_residual_withdrawn(&env, caller, amount);

        Ok(amount)
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` tokens. The pool must hold an allowance from
    /// `staker` for at least `amount`. Returns the staker's new stake.
    pub fn deposit(env: Env, staker: Address, amount: i128) -> Result<i128, ContractError> {
        staker.require_auth();
        let mut pool = storage::load_pool(&env)?;
        let mut account = storage::load_account_or_new(&env, &staker, pool.precision);

        let new_stake = ledger::deposit(
            &env,
            &mut pool,
            &mut account,
            amount,
            env.ledger().timestamp(),
        )?;

        Self::pull_tokens(&env, &pool, &staker, amount)?;
        storage::save_account(&env, &staker, &account);
        storage::save_pool(&env, &pool);

        events::publish_deposited(&env, staker, amount, new_stake, pool.total_deposited);

        Ok(new_stake)
    }

    /// Withdraw `amount` of principal together with every accrued reward.
    /// Returns the total transferred.
    pub fn withdraw(env: Env, staker: Address, amount: i128) -> Result<i128, ContractError> {
        staker.require_auth();
        Self::withdraw_inner(&env, staker, Some(amount))
    }

    /// Withdraw the caller's entire stake with every accrued reward.
    pub fn withdraw_all(env: Env, staker: Address) -> Result<i128, ContractError> {
        staker.require_auth();
        Self::withdraw_inner(&env, staker, None)
    }

    /// Transfer accrued rewards to `staker`, leaving the stake in place.
    pub fn claim_rewards(env: Env, staker: Address) -> Result<i128, ContractError> {
        staker.require_auth();
        let mut pool = storage::load_pool(&env)?;
        let mut account = storage::load_account_or_new(&env, &staker, pool.precision);

        let reward = ledger::claim(&env, &mut pool, &mut account, env.ledger().timestamp())?;

        Self::push_tokens(&env, &pool, &staker, reward)?;
        storage::save_account(&env, &staker, &account);
        storage::save_pool(&env, &pool);

        log!(&env, "rewards claimed", reward, pool.total_unclaimed_liability);

        events::publish_rewards_claimed(&env, staker, reward);

        Ok(reward)
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Reward `staker` could claim right now. Never mutates state.
    pub fn reward_of(env: Env, staker: Address) -> Result<i128, ContractError> {
        let pool = storage::load_pool(&env)?;
        let Some(account) = storage::load_account(&env, &staker) else {
            return Ok(0);
        };
        Ok(ledger::pending_reward(
            &env,
            &pool,
            &account,
            env.ledger().timestamp(),
        ))
    }

    /// Return the staker's current principal.
    pub fn amount_staked(env: Env, staker: Address) -> i128 {
        storage::load_account(&env, &staker).map_or(0, |a| a.staked_amount)
    }

    pub fn get_account(env: Env, staker: Address) -> Option<StakeAccount> {
        storage::load_account(&env, &staker)
    }

    /// Return the sum of all currently staked principal.
    pub fn total_deposited(env: Env) -> i128 {
        storage::load_pool(&env).map_or(0, |p| p.total_deposited)
    }

    /// Current maturity fraction, scaled by `10^precision`.
    pub fn maturity_fraction(env: Env) -> Result<i128, ContractError> {
        let pool = storage::load_pool(&env)?;
        Ok(rewards::maturity_fraction(
            &env,
            &pool,
            env.ledger().timestamp(),
        ))
    }

    pub fn start_time(env: Env) -> Option<u64> {
        storage::load_pool(&env).ok().and_then(|p| p.start_time)
    }

    pub fn end_time(env: Env) -> Option<u64> {
        storage::load_pool(&env).ok().and_then(|p| p.end_time())
    }

    pub fn phase(env: Env) -> Result<PoolPhase, ContractError> {
        let pool = storage::load_pool(&env)?;
        Ok(lifecycle::phase(&pool, env.ledger().timestamp()))
    }

    pub fn precision(env: Env) -> Result<u32, ContractError> {
        Ok(storage::load_pool(&env)?.precision)
    }

    /// Rewards owed to stakers now or at maturity, settled or not.
    pub fn total_unclaimed_liability(env: Env) -> Result<i128, ContractError> {
        Ok(storage::load_pool(&env)?.total_unclaimed_liability)
    }

    /// Tokens currently held beyond principal and reward commitments.
    pub fn residual_balance(env: Env) -> Result<i128, ContractError> {
        let pool = storage::load_pool(&env)?;
        let balance = Self::pool_balance(&env, &pool);
        Ok(residual::residual(&pool, balance).max(0))
    }

    pub fn get_pool(env: Env) -> Result<Pool, ContractError> {
        storage::load_pool(&env)
    }

    pub fn is_initialized(env: Env) -> bool {
        storage::has_pool(&env)
    }

    pub fn get_operator(env: Env) -> Result<Address, ContractError> {
        operator::get_operator(&env).ok_or(ContractError::NotInitialized)
    }

    // ── Operator transfer (two-step) ───────────────────────────────────────

    /// Propose a new operator. Only the current operator can call this.
    /// The new operator must call `accept_operator` to complete the transfer.
    pub fn propose_operator(
        env: Env,
        caller: Address,
        new_operator: Address,
    ) -> Result<(), ContractError> {
        storage::load_pool(&env)?;
        caller.require_auth();
        if !operator::propose_operator(&env, &caller, &new_operator) {
            return Err(ContractError::Unauthorized);
        }

        events::publish_operator_transfer_proposed(&env, caller, new_operator);

        Ok(())
    }

    /// Accept the pending operator transfer. Only the proposed operator can
    /// call this.
    pub fn accept_operator(env: Env, new_operator: Address) -> Result<(), ContractError> {
        storage::load_pool(&env)?;
        new_operator.require_auth();

        let pending =
            operator::get_pending_operator(&env).ok_or(ContractError::PendingOperatorMissing)?;
        if pending != new_operator {
            return Err(ContractError::Unauthorized);
        }
        let old_operator =
            operator::accept_operator(&env, &new_operator).ok_or(ContractError::NotInitialized)?;

        events::publish_operator_transfer_accepted(&env, old_operator, new_operator);

        Ok(())
    }

    /// Cancel a pending operator transfer. Only the current operator can
    /// call this.
    pub fn cancel_operator_transfer(env: Env, caller: Address) -> Result<(), ContractError> {
        storage::load_pool(&env)?;
        Self::require_operator(&env, &caller)?;

        let pending =
            operator::clear_pending_operator(&env).ok_or(ContractError::PendingOperatorMissing)?;

        events::publish_operator_transfer_cancelled(&env, caller, pending);

        Ok(())
    }

    pub fn get_pending_operator(env: Env) -> Option<Address> {
        operator::get_pending_operator(&env)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// Guard: authenticate `caller` and revert unless it is the operator.
    fn require_operator(env: &Env, caller: &Address) -> Result<(), ContractError> {
        caller.require_auth();
        if !operator::is_operator(env, caller) {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    fn withdraw_inner(
        env: &Env,
        staker: Address,
        amount: Option<i128>,
    ) -> Result<i128, ContractError> {
        let mut pool = storage::load_pool(env)?;
        let mut account = storage::load_account_or_new(env, &staker, pool.precision);
        let amount = amount.unwrap_or(account.staked_amount);

        let out = ledger::withdraw(
            env,
            &mut pool,
            &mut account,
            amount,
            env.ledger().timestamp(),
        )?;

        // Principal and reward leave in a single transfer.
        Self::push_tokens(env, &pool, &staker, out.total())?;
        storage::save_account(env, &staker, &account);
        storage::save_pool(env, &pool);

        log!(env, "withdrawn", out.principal, out.reward);
        events::publish_withdrawn(
            env,
            staker,
            out.principal,
            out.reward,
            account.staked_amount,
        );

        Ok(out.total())
    }

    fn pool_balance(env: &Env, pool: &Pool) -> i128 {
        token::Client::new(env, &pool.token).balance(&env.current_contract_address())
    }

    /// Pull `amount` from `from` using the allowance it granted the pool.
    fn pull_tokens(env: &Env, pool: &Pool, from: &Address, amount: i128) -> Result<(), ContractError> {
        let this = env.current_contract_address();
        match token::Client::new(env, &pool.token).try_transfer_from(&this, from, &this, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => Err(ContractError::AllowanceOrBalanceInsufficient),
        }
    }

    fn push_tokens(env: &Env, pool: &Pool, to: &Address, amount: i128) -> Result<(), ContractError> {
        if amount <= 0 {
            return Ok(());
        }
        let this = env.current_contract_address();
        match token::Client::new(env, &pool.token).try_transfer(&this, to, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => Err(ContractError::InsufficientPoolBalance),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_operator;
