use crate::state::Pool;
use crate::ContractError;

/// Tokens held beyond outstanding principal and every reward commitment.
/// Negative when the pool is under-funded.
pub fn residual(pool: &Pool, balance: i128) -> i128 {
    balance
        .saturating_sub(pool.total_deposited)
        .saturating_sub(pool.total_unclaimed_liability)
}

/// Amount the operator may sweep given the pool's token `balance`.
///
/// Never more than `balance - total_deposited`, so staked principal is
/// untouchable regardless of the liability figure.
pub fn sweepable(pool: &Pool, balance: i128) -> Result<i128, ContractError> {
    let amount = residual(pool, balance).min(balance.saturating_sub(pool.total_deposited));
    if amount <= 0 {
        return Err(ContractError::NoResidual);
    }
    Ok(amount)
}

pub fn record_sweep(pool: &mut Pool, amount: i128) {
    pool.total_residual_swept = pool.total_residual_swept.saturating_add(amount);
}
