//! Stake ledger: per-account principal, checkpoints and accrued rewards.
//!
//! Every mutation settles the account first: elapsed maturity since the
//! account's checkpoint is converted into `accrued_unclaimed` on the
//! account's *current* stake, then the checkpoint moves to `now`. Only
//! after that is the stake changed, so a stake change never reaches back
//! in time.
//!
//! The functions here are pure with respect to storage. They take the pool
//! aggregate, one account and the timestamp explicitly and validate every
//! precondition before touching either value, so an `Err` leaves both
//! untouched.

use soroban_sdk::Env;

use crate::lifecycle;
use crate::rewards;
use crate::state::{Pool, StakeAccount};
use crate::ContractError;

// ── Settlement ──────────────────────────────────────────────────────────────

/// Settle `account` at `now` and return the reward it newly accrued.
pub fn settle(env: &Env, pool: &mut Pool, account: &mut StakeAccount, now: u64) -> i128 {
    let current = rewards::maturity_fraction(env, pool, now);
    let checkpoint = rewards::checkpoint_at_current_precision(pool, account);

    let newly_owed = rewards::reward_between(env, pool, account.staked_amount, checkpoint, current);

    account.accrued_unclaimed = account.accrued_unclaimed.saturating_add(newly_owed);
    // A checkpoint rounded up by a precision drop may sit one quantum past
    // `current`; it must never move backwards.
    account.reward_checkpoint_fraction = current.max(checkpoint);
    account.checkpoint_precision = pool.precision;

    recommit(env, pool, account);
    newly_owed
}

/// Recompute the account's reward commitment and fold the difference into
/// the pool-wide liability.
fn recommit(env: &Env, pool: &mut Pool, account: &mut StakeAccount) {
    let future = rewards::remaining_until_maturity(
        env,
        pool,
        account.staked_amount,
        account.reward_checkpoint_fraction,
    );
    let commitment = account.accrued_unclaimed.saturating_add(future);

    pool.total_unclaimed_liability = pool
        .total_unclaimed_liability
        .saturating_sub(account.reward_commitment)
        .saturating_add(commitment);
    account.reward_commitment = commitment;
}

/// Move the account's accrued rewards out of the ledger; the caller owns
/// the transfer.
fn take_accrued(pool: &mut Pool, account: &mut StakeAccount) -> i128 {
    let reward = account.accrued_unclaimed;
    account.accrued_unclaimed = 0;
    account.reward_commitment = account.reward_commitment.saturating_sub(reward);
    pool.total_unclaimed_liability = pool.total_unclaimed_liability.saturating_sub(reward);
    pool.total_rewards_paid = pool.total_rewards_paid.saturating_add(reward);
    reward
}

// ── Operations ──────────────────────────────────────────────────────────────

/// Add `amount` to the account's stake. Returns the new stake.
pub fn deposit(
    env: &Env,
    pool: &mut Pool,
    account: &mut StakeAccount,
    amount: i128,
    now: u64,
) -> Result<i128, ContractError> {
    if amount <= 0 {
        return Err(ContractError::ZeroAmount);
    }
    lifecycle::ensure_deposits_open(pool, now)?;

    let new_total = pool
        .total_deposited
        .checked_add(amount)
        .ok_or(ContractError::MaxStakeExceeded)?;
    if new_total > pool.max_pool_size {
        return Err(ContractError::MaxStakeExceeded);
    }

    settle(env, pool, account, now);

    account.staked_amount = account.staked_amount.saturating_add(amount);
    pool.total_deposited = new_total;
    recommit(env, pool, account);

    Ok(account.staked_amount)
}

/// Result of a withdrawal: both parts leave the pool in one transfer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Withdrawal {
    pub principal: i128,
    pub reward: i128,
}

impl Withdrawal {
    pub fn total(&self) -> i128 {
        self.principal.saturating_add(self.reward)
    }
}

/// Remove `amount` of principal and pay out everything accrued so far.
pub fn withdraw(
    env: &Env,
    pool: &mut Pool,
    account: &mut StakeAccount,
    amount: i128,
    now: u64,
) -> Result<Withdrawal, ContractError> {
    if amount <= 0 {
        return Err(ContractError::ZeroAmount);
    }
    if amount > account.staked_amount {
        return Err(ContractError::AmountExceedsStaked);
    }
    lifecycle::ensure_unlocked(pool, now)?;

    settle(env, pool, account, now);

    account.staked_amount = account.staked_amount.saturating_sub(amount);
    pool.total_deposited = pool.total_deposited.saturating_sub(amount);
    let reward = take_accrued(pool, account);
    recommit(env, pool, account);

    Ok(Withdrawal {
        principal: amount,
        reward,
    })
}

/// Pay out accrued rewards without touching the stake.
pub fn claim(
    env: &Env,
    pool: &mut Pool,
    account: &mut StakeAccount,
    now: u64,
) -> Result<i128, ContractError> {
    if pending_reward(env, pool, account, now) <= 0 {
        return Err(ContractError::NothingToClaim);
    }

    settle(env, pool, account, now);
    Ok(take_accrued(pool, account))
}

// ── Views ───────────────────────────────────────────────────────────────────

/// What the account could claim at `now`: settled plus not-yet-settled
/// reward. Side-effect free.
pub fn pending_reward(env: &Env, pool: &Pool, account: &StakeAccount, now: u64) -> i128 {
    let current = rewards::maturity_fraction(env, pool, now);
    let checkpoint = rewards::checkpoint_at_current_precision(pool, account);
    account
        .accrued_unclaimed
        .saturating_add(rewards::reward_between(
            env,
            pool,
            account.staked_amount,
            checkpoint,
            current,
        ))
}

// ── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use crate::config::{LockupPolicy, PoolConfig, ONE_DAY, UNIT_18};
    use soroban_sdk::{testutils::Address as _, Address};

    const T0: u64 = 10_000;

    fn pool(env: &Env) -> Pool {
        Pool::from_config(&PoolConfig::deep(Address::generate(env))).unwrap()
    }

    fn started(env: &Env) -> Pool {
        let mut p = pool(env);
        lifecycle::start(&mut p, T0).unwrap();
        p
    }

    fn liability_matches(accounts: &[&StakeAccount], pool: &Pool) -> bool {
        accounts.iter().map(|a| a.reward_commitment).sum::<i128>()
            == pool.total_unclaimed_liability
    }

    #[test]
    fn deposit_before_start_earns_from_start() {
        let env = Env::default();
        let mut p = pool(&env);
        let mut a = StakeAccount::new(p.precision);

        deposit(&env, &mut p, &mut a, 100_000 * UNIT_18, 0).unwrap();
        assert_eq!(a.reward_checkpoint_fraction, 0);
        assert_eq!(p.total_deposited, 100_000 * UNIT_18);
        assert_eq!(a.reward_commitment, 25_000 * UNIT_18);

        lifecycle::start(&mut p, T0).unwrap();
        assert_eq!(
            pending_reward(&env, &p, &a, T0 + ONE_DAY),
            68_475_000_000_000_000_000
        );
    }

    #[test]
    fn deposit_rejections_leave_state_untouched() {
        let env = Env::default();
        let mut p = started(&env);
        let mut a = StakeAccount::new(p.precision);
        let (p0, a0) = (p.clone(), a.clone());

        assert_eq!(
            deposit(&env, &mut p, &mut a, 0, T0),
            Err(ContractError::ZeroAmount)
        );
        assert_eq!(
            deposit(&env, &mut p, &mut a, p0.max_pool_size + 1, T0),
            Err(ContractError::MaxStakeExceeded)
        );
        let end = p.end_time().unwrap();
        assert_eq!(
            deposit(&env, &mut p, &mut a, 1, end),
            Err(ContractError::StakingEnded)
        );
        assert_eq!(p, p0);
        assert_eq!(a, a0);
    }

    #[test]
    fn deposit_up_to_the_cap() {
        let env = Env::default();
        let mut p = started(&env);
        let mut a = StakeAccount::new(p.precision);
        let cap = p.max_pool_size;

        deposit(&env, &mut p, &mut a, cap - 1, T0).unwrap();
        assert_eq!(
            deposit(&env, &mut p, &mut a, 2, T0),
            Err(ContractError::MaxStakeExceeded)
        );
        deposit(&env, &mut p, &mut a, 1, T0).unwrap();
        assert_eq!(p.total_deposited, cap);
        assert_eq!(p.total_unclaimed_liability, p.total_reward_pool);
    }

    #[test]
    fn mid_period_deposit_only_earns_from_deposit_time() {
        let env = Env::default();
        let mut p = started(&env);
        let mut a = StakeAccount::new(p.precision);

        deposit(&env, &mut p, &mut a, 100_000 * UNIT_18, T0 + ONE_DAY).unwrap();
        assert_eq!(pending_reward(&env, &p, &a, T0 + ONE_DAY), 0);
        // one day of stake: fraction 5479 − 2739 = 2740
        assert_eq!(
            pending_reward(&env, &p, &a, T0 + 2 * ONE_DAY),
            68_500_000_000_000_000_000
        );
    }

    #[test]
    fn top_up_settles_existing_stake_first() {
        let env = Env::default();
        let mut p = started(&env);
        let mut a = StakeAccount::new(p.precision);

        deposit(&env, &mut p, &mut a, 100_000 * UNIT_18, T0).unwrap();
        deposit(&env, &mut p, &mut a, 100_000 * UNIT_18, T0 + ONE_DAY).unwrap();
        assert_eq!(a.accrued_unclaimed, 68_475_000_000_000_000_000);
        assert_eq!(a.staked_amount, 200_000 * UNIT_18);
        assert_eq!(
            pending_reward(&env, &p, &a, T0 + 2 * ONE_DAY),
            68_475_000_000_000_000_000 + 2 * 68_500_000_000_000_000_000
        );
    }

    #[test]
    fn claim_pays_and_resets() {
        let env = Env::default();
        let mut p = pool(&env);
        let mut a = StakeAccount::new(p.precision);
        deposit(&env, &mut p, &mut a, 100_000 * UNIT_18, 0).unwrap();
        lifecycle::start(&mut p, T0).unwrap();

        let paid = claim(&env, &mut p, &mut a, T0 + ONE_DAY).unwrap();
        assert_eq!(paid, 68_475_000_000_000_000_000);
        assert_eq!(a.accrued_unclaimed, 0);
        assert_eq!(pending_reward(&env, &p, &a, T0 + ONE_DAY), 0);
        assert_eq!(p.total_rewards_paid, paid);
        assert_eq!(
            claim(&env, &mut p, &mut a, T0 + ONE_DAY),
            Err(ContractError::NothingToClaim)
        );
        assert_eq!(p.total_unclaimed_liability, 25_000 * UNIT_18 - paid);
    }

    #[test]
    fn claim_before_start_has_nothing() {
        let env = Env::default();
        let mut p = pool(&env);
        let mut a = StakeAccount::new(p.precision);
        deposit(&env, &mut p, &mut a, 1_000, 0).unwrap();
        assert_eq!(
            claim(&env, &mut p, &mut a, 5 * ONE_DAY),
            Err(ContractError::NothingToClaim)
        );
    }

    #[test]
    fn withdraw_requires_lockup_and_stake() {
        let env = Env::default();
        let mut p = started(&env);
        let mut a = StakeAccount::new(p.precision);
        deposit(&env, &mut p, &mut a, 1_000 * UNIT_18, T0).unwrap();

        assert_eq!(
            withdraw(&env, &mut p, &mut a, 0, T0),
            Err(ContractError::ZeroAmount)
        );
        assert_eq!(
            withdraw(&env, &mut p, &mut a, 1_001 * UNIT_18, T0),
            Err(ContractError::AmountExceedsStaked)
        );
        assert_eq!(
            withdraw(&env, &mut p, &mut a, 1_000 * UNIT_18, T0 + 200 * ONE_DAY),
            Err(ContractError::LockupActive)
        );
    }

    #[test]
    fn partial_withdraw_settles_then_halves_accrual() {
        let env = Env::default();
        let mut cfg = PoolConfig::quick(Address::generate(&env));
        cfg.lockup_policy = LockupPolicy::PoolWide;
        let mut p = Pool::from_config(&cfg).unwrap();
        let mut a = StakeAccount::new(p.precision);
        deposit(&env, &mut p, &mut a, 10_000 * UNIT_18, 0).unwrap();
        lifecycle::start(&mut p, T0).unwrap();

        let at = T0 + 180 * ONE_DAY;
        let owed_at = pending_reward(&env, &p, &a, at);
        let out = withdraw(&env, &mut p, &mut a, 5_000 * UNIT_18, at).unwrap();
        assert_eq!(out.principal, 5_000 * UNIT_18);
        assert_eq!(out.reward, owed_at);
        assert_eq!(a.staked_amount, 5_000 * UNIT_18);
        assert_eq!(p.total_deposited, 5_000 * UNIT_18);

        let end = p.end_time().unwrap();
        let rest = pending_reward(&env, &p, &a, end);
        let f_at = rewards::maturity_fraction(&env, &p, at);
        assert_eq!(
            rest,
            rewards::reward_between(&env, &p, 5_000 * UNIT_18, f_at, p.scale())
        );
    }

    #[test]
    fn full_withdraw_zeroes_account_and_allows_redeposit() {
        let env = Env::default();
        let mut p = pool(&env);
        let mut a = StakeAccount::new(p.precision);
        deposit(&env, &mut p, &mut a, 1_000 * UNIT_18, 0).unwrap();
        lifecycle::start(&mut p, T0).unwrap();

        let end = p.end_time().unwrap();
        let out = withdraw(&env, &mut p, &mut a, 1_000 * UNIT_18, end).unwrap();
        assert_eq!(out.reward, 250 * UNIT_18);
        assert_eq!(out.total(), 1_250 * UNIT_18);
        assert!(a.is_empty());
        assert_eq!(a.reward_commitment, 0);
        assert_eq!(p.total_unclaimed_liability, 0);
    }

    #[test]
    fn redeposit_after_full_withdraw_restarts_accrual() {
        let env = Env::default();
        let mut p = Pool::from_config(&PoolConfig::quick(Address::generate(&env))).unwrap();
        let mut a = StakeAccount::new(p.precision);
        deposit(&env, &mut p, &mut a, 1_000 * UNIT_18, 0).unwrap();
        lifecycle::start(&mut p, T0).unwrap();

        let unlock = T0 + 180 * ONE_DAY;
        withdraw(&env, &mut p, &mut a, 1_000 * UNIT_18, unlock).unwrap();
        assert!(a.is_empty());

        deposit(&env, &mut p, &mut a, 500 * UNIT_18, unlock).unwrap();
        assert_eq!(a.staked_amount, 500 * UNIT_18);
        assert_eq!(pending_reward(&env, &p, &a, unlock), 0);
        assert_eq!(
            a.reward_checkpoint_fraction,
            rewards::maturity_fraction(&env, &p, unlock)
        );
    }

    #[test]
    fn reward_caps_at_maturity() {
        let env = Env::default();
        let mut p = pool(&env);
        let mut a = StakeAccount::new(p.precision);
        deposit(&env, &mut p, &mut a, 100_000 * UNIT_18, 0).unwrap();
        lifecycle::start(&mut p, T0).unwrap();
        let end = p.end_time().unwrap();

        let at_end = pending_reward(&env, &p, &a, end);
        assert_eq!(at_end, 25_000 * UNIT_18);
        assert_eq!(pending_reward(&env, &p, &a, end + 3_000 * ONE_DAY), at_end);
    }

    #[test]
    fn raising_precision_pays_exact_remainder() {
        let env = Env::default();
        let mut p = pool(&env);
        let mut a = StakeAccount::new(p.precision);
        deposit(&env, &mut p, &mut a, 100_000 * UNIT_18, 0).unwrap();
        lifecycle::start(&mut p, T0).unwrap();

        let first = claim(&env, &mut p, &mut a, T0 + ONE_DAY).unwrap();
        let second = claim(&env, &mut p, &mut a, T0 + 2 * ONE_DAY).unwrap();
        assert_eq!(first + second, 136_975_000_000_000_000_000);

        p.precision = 28;
        let later = T0 + 1_002 * ONE_DAY;
        assert_eq!(
            pending_reward(&env, &p, &a, later),
            24_863_025_000_000_000_000_000
        );
        claim(&env, &mut p, &mut a, later).unwrap();
        assert_eq!(p.total_rewards_paid, 25_000 * UNIT_18);

        p.precision = 8;
        assert_eq!(pending_reward(&env, &p, &a, later), 0);
    }

    #[test]
    fn liability_tracks_every_commitment() {
        let env = Env::default();
        let mut p = pool(&env);
        let mut a = StakeAccount::new(p.precision);
        let mut b = StakeAccount::new(p.precision);

        deposit(&env, &mut p, &mut a, 3_333 * UNIT_18, 0).unwrap();
        lifecycle::start(&mut p, T0).unwrap();
        deposit(&env, &mut p, &mut b, 7_777 * UNIT_18, T0 + 17 * ONE_DAY).unwrap();
        assert!(liability_matches(&[&a, &b], &p));

        claim(&env, &mut p, &mut a, T0 + 40 * ONE_DAY).unwrap();
        p.precision = 12;
        settle(&env, &mut p, &mut b, T0 + 41 * ONE_DAY + 7);
        assert!(liability_matches(&[&a, &b], &p));

        let end = p.end_time().unwrap();
        withdraw(&env, &mut p, &mut b, 1_000 * UNIT_18, end + 5).unwrap();
        assert!(liability_matches(&[&a, &b], &p));

        // once matured, every commitment is exactly what is still claimable
        assert!(a.reward_commitment >= pending_reward(&env, &p, &a, end));
        assert_eq!(b.reward_commitment, pending_reward(&env, &p, &b, end));
    }
}
