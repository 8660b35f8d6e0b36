use common::fixed_point::{self, MAX_PRECISION};
use soroban_sdk::Env;

use crate::state::{Pool, StakeAccount};

// ── Maturity fraction ───────────────────────────────────────────────────────

/// Portion of the full-period reward that one unit of stake held since
/// `start_time` has matured by `now`, scaled by `pool.scale()`.
///
/// ```text
/// fraction = scale × (now − start) / total_period      (floored)
/// ```
///
/// Zero before staking starts and capped at `scale` from `end_time` on,
/// so an account left untouched for years never accrues past the budget.
/// The multiplication happens before the division so short elapsed times
/// do not collapse to zero; flooring keeps every quantum of rounding in
/// the pool rather than in user payouts.
pub fn maturity_fraction(env: &Env, pool: &Pool, now: u64) -> i128 {
    let Some(start) = pool.start_time else {
        return 0;
    };
    if now <= start {
        return 0;
    }

    let scale = pool.scale();
    let elapsed = now - start;
    if elapsed >= pool.total_period {
        return scale;
    }

    let fraction = fixed_point::mul_div_floor(
        env,
        &[scale, i128::from(elapsed)],
        &[i128::from(pool.total_period)],
    );
    debug_assert!(fraction.is_some(), "maturity fraction overflowed");
    fraction.unwrap_or(0)
}

/// The account's checkpoint expressed at the pool's current precision.
pub fn checkpoint_at_current_precision(pool: &Pool, account: &StakeAccount) -> i128 {
    fixed_point::rescale(
        account.reward_checkpoint_fraction,
        account.checkpoint_precision,
        pool.precision,
    )
}

// ── Reward arithmetic ───────────────────────────────────────────────────────

/// Reward earned by `staked` while the maturity fraction moved from
/// `from_fraction` to `to_fraction`.
///
/// ```text
/// reward = staked × Δfraction × total_reward_pool / (scale × max_pool_size)
/// ```
///
/// `total_reward_pool / max_pool_size` is the full-period reward per unit
/// of stake, so the result depends only on this account's own stake. The
/// rate is applied in lowest terms, which leaves the floored result
/// unchanged but keeps the product small enough for high precisions.
pub fn reward_between(
    env: &Env,
    pool: &Pool,
    staked: i128,
    from_fraction: i128,
    to_fraction: i128,
) -> i128 {
    let delta = to_fraction.saturating_sub(from_fraction);
    if staked <= 0 || delta <= 0 || pool.reward_rate_numerator <= 0 {
        return 0;
    }

    let owed = fixed_point::mul_div_floor(
        env,
        &[staked, delta, pool.reward_rate_numerator],
        &[pool.scale(), pool.reward_rate_denominator],
    );
    // unreachable while the precision passes `precision_supported`
    debug_assert!(owed.is_some(), "reward product outside the digit budget");
    owed.unwrap_or(0)
}

/// What `staked` still earns from `checkpoint` up to maturity.
pub fn remaining_until_maturity(env: &Env, pool: &Pool, staked: i128, checkpoint: i128) -> i128 {
    reward_between(env, pool, staked, checkpoint, pool.scale())
}

/// Reward for holding `staked` across the entire period.
pub fn full_period_reward(env: &Env, pool: &Pool, staked: i128) -> i128 {
    reward_between(env, pool, staked, 0, pool.scale())
}

/// Returns `true` if `precision` keeps every intermediate product of this
/// pool inside I256. Stakes never exceed `max_pool_size` and a fraction
/// delta never exceeds `10^precision`.
pub fn precision_supported(pool: &Pool, precision: u32) -> bool {
    (1..=MAX_PRECISION).contains(&precision)
        && fixed_point::fits_digit_budget(
            pool.max_pool_size,
            pool.reward_rate_numerator,
            precision,
        )
}

// ── Unit tests ──────────────────────────────────────────────────────────────
