//! Fixed-point helpers shared by the pool contracts.
//!
//! Fractions are `i128` values scaled by `10^precision`. Any product that
//! can leave the `i128` range is formed in the host's 256-bit integer and
//! narrowed back only after the final division. All operands are
//! non-negative, so every division here floors.

use soroban_sdk::{Env, I256};

/// Largest accepted precision exponent; `10^30` still leaves room for the
/// `scale * elapsed` product in `i128`-sized storage.
pub const MAX_PRECISION: u32 = 30;

/// Number of decimal digits guaranteed to fit in a positive I256
/// (`10^76 < 2^255`).
pub const I256_DIGIT_BUDGET: u32 = 76;

/// `10^precision` as an `i128`.
pub fn scale(precision: u32) -> i128 {
    10i128.saturating_pow(precision)
}

/// Count of decimal digits in `|value|`; zero has no digits.
pub fn digits(value: i128) -> u32 {
    value
        .unsigned_abs()
        .checked_ilog10()
        .map_or(0, |d| d.saturating_add(1))
}

/// Returns `true` when `a * b * 10^precision` is guaranteed to fit in I256.
pub fn fits_digit_budget(a: i128, b: i128, precision: u32) -> bool {
    digits(a)
        .saturating_add(digits(b))
        .saturating_add(precision)
        <= I256_DIGIT_BUDGET
}

/// `Π numerators / Π denominators`, floored.
///
/// Returns `None` if any numerator is negative, any denominator is not
/// positive, or the quotient does not fit back into `i128`.
pub fn mul_div_floor(env: &Env, numerators: &[i128], denominators: &[i128]) -> Option<i128> {
    if numerators.iter().any(|n| *n < 0) || denominators.iter().any(|d| *d <= 0) {
        return None;
    }

    let one = I256::from_i32(env, 1);
    let num = numerators
        .iter()
        .fold(one.clone(), |acc, n| acc.mul(&I256::from_i128(env, *n)));
    let den = denominators
        .iter()
        .fold(one, |acc, d| acc.mul(&I256::from_i128(env, *d)));

    num.div(&den).to_i128()
}

/// Greatest common divisor of `|a|` and `|b|`; `gcd(0, 0) == 0`.
pub fn gcd(a: i128, b: i128) -> i128 {
    let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    i128::try_from(a).unwrap_or(i128::MAX)
}

/// `numerator / denominator` in lowest terms. A zero numerator reduces to
/// `0 / 1`.
pub fn reduce_fraction(numerator: i128, denominator: i128) -> (i128, i128) {
    let g = gcd(numerator, denominator);
    if g == 0 {
        return (numerator, denominator);
    }
    (numerator / g, denominator / g)
}

/// Ceiling division for non-negative `value` and positive `divisor`.
pub fn div_ceil(value: i128, divisor: i128) -> i128 {
    let q = value / divisor;
    if value % divisor == 0 {
        q
    } else {
        q.saturating_add(1)
    }
}

/// Re-express a fraction recorded at `from` precision in `to` precision.
///
/// Raising precision is exact. Lowering it rounds *up*, so a rescaled
/// checkpoint never sits below the point it represented.
pub fn rescale(value: i128, from: u32, to: u32) -> i128 {
    if to >= from {
        value.saturating_mul(scale(to - from))
    } else {
        div_ceil(value, scale(from - to))
    }
}
