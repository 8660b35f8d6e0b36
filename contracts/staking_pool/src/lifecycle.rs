//! Pool lifecycle: `NotStarted → Active → Ended → Sweepable (→ Swept)`.
//!
//! Only `NotStarted → Active` is an explicit transition (`start_staking`);
//! every later phase follows from the timestamp alone. The guards below
//! are what the ledger consults before mutating anything.

use crate::config::LockupPolicy;
use crate::state::{Pool, PoolPhase};
use crate::ContractError;

/// Phase of `pool` at `now`.
pub fn phase(pool: &Pool, now: u64) -> PoolPhase {
    let (Some(end), Some(sweep_at)) = (pool.end_time(), sweep_opens_at(pool)) else {
        return PoolPhase::NotStarted;
    };
    if now < end {
        PoolPhase::Active
    } else if now < sweep_at {
        PoolPhase::Ended
    } else if pool.total_residual_swept > 0 {
        PoolPhase::Swept
    } else {
        PoolPhase::Sweepable
    }
}

/// `NotStarted → Active`. Fixes `start_time` to `now` and returns `end_time`.
pub fn start(pool: &mut Pool, now: u64) -> Result<u64, ContractError> {
    if pool.start_time.is_some() {
        return Err(ContractError::AlreadyStarted);
    }
    pool.start_time = Some(now);
    pool.end_time().ok_or(ContractError::NotInitialized)
}

/// Deposits are open until `end_time`; before staking starts they are
/// always open.
pub fn ensure_deposits_open(pool: &Pool, now: u64) -> Result<(), ContractError> {
    match pool.end_time() {
        Some(end) if now >= end => Err(ContractError::StakingEnded),
        _ => Ok(()),
    }
}

/// Earliest timestamp at which principal may leave the pool.
pub fn unlock_time(pool: &Pool) -> Option<u64> {
    match pool.lockup_policy {
        LockupPolicy::PoolWide => pool
            .start_time
            .map(|start| start.saturating_add(pool.lockup_duration)),
        LockupPolicy::FullPeriod => pool.end_time(),
    }
}

pub fn ensure_unlocked(pool: &Pool, now: u64) -> Result<(), ContractError> {
    match unlock_time(pool) {
        Some(unlock) if now >= unlock => Ok(()),
        _ => Err(ContractError::LockupActive),
    }
}

/// `end_time + total_period`: one full extra period of grace for claims.
pub fn sweep_opens_at(pool: &Pool) -> Option<u64> {
    pool.end_time()
        .map(|end| end.saturating_add(pool.total_period))
}

pub fn ensure_sweepable(pool: &Pool, now: u64) -> Result<(), ContractError> {
    match sweep_opens_at(pool) {
        Some(opens) if now >= opens => Ok(()),
        _ => Err(ContractError::TooEarly),
    }
}
