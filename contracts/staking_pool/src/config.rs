use common::fixed_point;
use soroban_sdk::{contracttype, Address};

use crate::ContractError;

/// Seconds in one day; pool durations are configured in whole days.
pub const ONE_DAY: u64 = 86_400;

/// Precision a freshly initialized pool starts with (`scale = 10^6`).
pub const DEFAULT_PRECISION: u32 = 6;

/// One whole token of an 18-decimal asset.
pub const UNIT_18: i128 = 1_000_000_000_000_000_000;

/// Reference point from which a depositor's lockup is measured.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum LockupPolicy {
    /// Withdrawals open at `start_time + lockup_duration`.
    PoolWide = 0,
    /// Withdrawals open only once the staking period has ended.
    FullPeriod = 1,
}

/// Construction parameters for a pool.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    /// Token that is both staked and paid out as reward.
    pub token: Address,
    /// Reward paid over the full period if the pool were filled to the cap.
    pub total_reward_pool: i128,
    pub total_period_days: u64,
    pub lockup_duration_days: u64,
    /// Hard cap on `total_deposited`.
    pub max_pool_size: i128,
    pub lockup_policy: LockupPolicy,
}

/// Reward budget for a pool paying `rate_percent` of principal over the
/// full period when filled to `max_pool_size`.
pub fn reward_pool_for_rate(max_pool_size: i128, rate_percent: u32) -> i128 {
    max_pool_size.saturating_mul(i128::from(rate_percent)) / 100
}

impl PoolConfig {
    fn preset(token: Address, rate_percent: u32, lockup_days: u64, cap_tokens: i128) -> Self {
        let max_pool_size = cap_tokens.saturating_mul(UNIT_18);
        Self {
            token,
            total_reward_pool: reward_pool_for_rate(max_pool_size, rate_percent),
            total_period_days: 365,
            lockup_duration_days: lockup_days,
            max_pool_size,
            lockup_policy: LockupPolicy::PoolWide,
        }
    }

    /// 25% over a year, locked for the whole year, 20M token cap.
    pub fn deep(token: Address) -> Self {
        Self::preset(token, 25, 365, 20_000_000)
    }

    /// 12% over a year, 270-day lockup, 35M token cap.
    pub fn mid(token: Address) -> Self {
        Self::preset(token, 12, 270, 35_000_000)
    }

    /// 9% over a year, 180-day lockup, 45M token cap.
    pub fn quick(token: Address) -> Self {
        Self::preset(token, 9, 180, 45_000_000)
    }

    pub fn total_period_secs(&self) -> Option<u64> {
        self.total_period_days.checked_mul(ONE_DAY)
    }

    pub fn lockup_duration_secs(&self) -> Option<u64> {
        self.lockup_duration_days.checked_mul(ONE_DAY)
    }

    /// Full-period reward per unit of stake as a reduced fraction.
    pub fn reward_rate(&self) -> (i128, i128) {
        fixed_point::reduce_fraction(self.total_reward_pool, self.max_pool_size)
    }

    /// Reject configurations the reward engine cannot serve exactly.
    pub fn validate(&self) -> Result<(), ContractError> {
        if self.total_period_days == 0 || self.lockup_duration_days > self.total_period_days {
            return Err(ContractError::InvalidConfig);
        }
        if self.max_pool_size <= 0 || self.total_reward_pool < 0 {
            return Err(ContractError::InvalidConfig);
        }
        // end_time + total_period must stay representable
        let period = self.total_period_secs().ok_or(ContractError::InvalidConfig)?;
        if period.checked_mul(3).is_none() {
            return Err(ContractError::InvalidConfig);
        }
        let (numerator, _) = self.reward_rate();
        if !fixed_point::fits_digit_budget(self.max_pool_size, numerator, DEFAULT_PRECISION) {
            return Err(ContractError::InvalidConfig);
        }
        Ok(())
    }
}
