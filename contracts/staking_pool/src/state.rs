use common::fixed_point;
use soroban_sdk::{contracttype, Address};

use crate::config::{PoolConfig, DEFAULT_PRECISION};
use crate::ContractError;

/// Coarse lifecycle position of a pool at a given timestamp.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum PoolPhase {
    /// `start_staking` has not been called; deposits accrue nothing yet.
    NotStarted = 0,
    Active = 1,
    /// Past `end_time`: no deposits, rewards capped at maturity.
    Ended = 2,
    /// Grace window over; the operator may sweep residual tokens.
    Sweepable = 3,
    /// Sweepable and at least one sweep has already happened.
    Swept = 4,
}

/// The pool aggregate. One per contract instance.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pool {
    pub token: Address,
    pub total_reward_pool: i128,
    /// Seconds from `start_time` to `end_time`.
    pub total_period: u64,
    /// Seconds after `start_time` before `PoolWide` withdrawals open.
    pub lockup_duration: u64,
    pub lockup_policy: crate::config::LockupPolicy,
    pub max_pool_size: i128,
    /// `total_reward_pool / max_pool_size` in lowest terms: the
    /// full-period reward per unit of stake.
    pub reward_rate_numerator: i128,
    pub reward_rate_denominator: i128,
    /// Unset until `start_staking`; immutable afterwards.
    pub start_time: Option<u64>,
    /// Principal currently staked across all accounts.
    pub total_deposited: i128,
    /// Sum of every account's `reward_commitment`.
    pub total_unclaimed_liability: i128,
    pub total_rewards_paid: i128,
    pub total_residual_swept: i128,
    /// Fixed-point exponent; fractions are scaled by `10^precision`.
    pub precision: u32,
}

impl Pool {
    pub fn from_config(config: &PoolConfig) -> Result<Self, ContractError> {
        config.validate()?;
        let (reward_rate_numerator, reward_rate_denominator) = config.reward_rate();
        Ok(Self {
            token: config.token.clone(),
            total_reward_pool: config.total_reward_pool,
            total_period: config
                .total_period_secs()
                .ok_or(ContractError::InvalidConfig)?,
            lockup_duration: config
                .lockup_duration_secs()
                .ok_or(ContractError::InvalidConfig)?,
            lockup_policy: config.lockup_policy,
            max_pool_size: config.max_pool_size,
            reward_rate_numerator,
            reward_rate_denominator,
            start_time: None,
            total_deposited: 0,
            total_unclaimed_liability: 0,
            total_rewards_paid: 0,
            total_residual_swept: 0,
            precision: DEFAULT_PRECISION,
        })
    }

    /// `start_time + total_period`, once staking has started.
    pub fn end_time(&self) -> Option<u64> {
        self.start_time
            .map(|start| start.saturating_add(self.total_period))
    }

    /// Fixed-point representation of 1.0 at the current precision.
    pub fn scale(&self) -> i128 {
        fixed_point::scale(self.precision)
    }
}

/// Per-depositor bookkeeping. Created on first deposit, never removed.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakeAccount {
    pub staked_amount: i128,
    /// Maturity fraction at the last settlement.
    pub reward_checkpoint_fraction: i128,
    /// Precision the checkpoint above was recorded at.
    pub checkpoint_precision: u32,
    /// Settled rewards not yet transferred out.
    pub accrued_unclaimed: i128,
    /// `accrued_unclaimed` plus what the current stake still earns up to
    /// maturity; this account's share of `total_unclaimed_liability`.
    pub reward_commitment: i128,
}

impl StakeAccount {
    pub fn new(precision: u32) -> Self {
        Self {
            staked_amount: 0,
            reward_checkpoint_fraction: 0,
            checkpoint_precision: precision,
            accrued_unclaimed: 0,
            reward_commitment: 0,
        }
    }

    /// Fully withdrawn (or never funded) accounts hold nothing.
    pub fn is_empty(&self) -> bool {
        self.staked_amount == 0 && self.accrued_unclaimed == 0
    }
}
