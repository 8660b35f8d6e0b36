#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the pool is configured.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolInitializedEvent {
    pub operator: Address,
    pub token: Address,
    pub total_reward_pool: i128,
    pub total_period: u64,
    pub lockup_duration: u64,
    pub max_pool_size: i128,
    pub timestamp: u64,
}

/// Fired when the operator opens the staking period.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakingStartedEvent {
    pub start_time: u64,
    pub end_time: u64,
    pub timestamp: u64,
}

/// Fired when a user deposits stake.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositedEvent {
    pub staker: Address,
    pub amount: i128,
    pub new_stake: i128,
    pub total_deposited: i128,
    pub timestamp: u64,
}

/// Fired when a user withdraws principal (with all accrued reward).
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub staker: Address,
    pub principal: i128,
    pub reward: i128,
    pub remaining_stake: i128,
    pub timestamp: u64,
}

/// Fired when a user claims accrued rewards.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsClaimedEvent {
    pub staker: Address,
    pub amount: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PrecisionSetEvent {
    pub old_precision: u32,
    pub new_precision: u32,
    pub timestamp: u64,
}

/// Fired when the operator sweeps unclaimable tokens.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResidualWithdrawnEvent {
    pub operator: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired when an operator handover is proposed.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OperatorTransferProposedEvent {
    pub current_operator: Address,
    pub proposed_operator: Address,
    pub timestamp: u64,
}

/// Fired when an operator handover is accepted.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OperatorTransferAcceptedEvent {
    pub old_operator: Address,
    pub new_operator: Address,
    pub timestamp: u64,
}

/// Fired when a pending operator handover is cancelled.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OperatorTransferCancelledEvent {
    pub operator: Address,
    pub cancelled_proposed: Address,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    operator: Address,
    token: Address,
    total_reward_pool: i128,
    total_period: u64,
    lockup_duration: u64,
    max_pool_size: i128,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        PoolInitializedEvent {
            operator,
            token,
            total_reward_pool,
            total_period,
            lockup_duration,
            max_pool_size,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_staking_started(env: &Env, start_time: u64, end_time: u64) {
    env.events().publish(
        (symbol_short!("STARTED"),),
        StakingStartedEvent {
            start_time,
            end_time,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_deposited(
    env: &Env,
    staker: Address,
    amount: i128,
    new_stake: i128,
    total_deposited: i128,
) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), staker.clone()),
        DepositedEvent {
            staker,
            amount,
            new_stake,
            total_deposited,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdrawn(
    env: &Env,
    staker: Address,
    principal: i128,
    reward: i128,
    remaining_stake: i128,
) {
    env.events().publish(
        (symbol_short!("WITHDRAWN"), staker.clone()),
        WithdrawnEvent {
            staker,
            principal,
            reward,
            remaining_stake,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rewards_claimed(env: &Env, staker: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("CLMD"), staker.clone()),
        RewardsClaimedEvent {
            staker,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_precision_set(env: &Env, old_precision: u32, new_precision: u32) {
    env.events().publish(
        (symbol_short!("PREC_SET"),),
        PrecisionSetEvent {
            old_precision,
            new_precision,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_residual_withdrawn(env: &Env, operator: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("RESIDUAL"), operator.clone()),
        ResidualWithdrawnEvent {
            operator,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_operator_transfer_proposed(
    env: &Env,
    current_operator: Address,
    proposed_operator: Address,
) {
    env.events().publish(
        (symbol_short!("OP_PROP"), current_operator.clone()),
        OperatorTransferProposedEvent {
            current_operator,
            proposed_operator,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_operator_transfer_accepted(env: &Env, old_operator: Address, new_operator: Address) {
    env.events().publish(
        (symbol_short!("OP_ACPT"), new_operator.clone()),
        OperatorTransferAcceptedEvent {
            old_operator,
            new_operator,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_operator_transfer_cancelled(
    env: &Env,
    operator: Address,
    cancelled_proposed: Address,
) {
    env.events().publish(
        (symbol_short!("OP_CNCL"), operator.clone()),
        OperatorTransferCancelledEvent {
            operator,
            cancelled_proposed,
            timestamp: env.ledger().timestamp(),
        },
    );
}
