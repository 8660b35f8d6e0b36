//! Shared building blocks for the staking pool contracts.
//!
//! This crate provides:
//! - [`fixed_point`]: 256-bit mul-div, powers of ten and precision
//!   rescaling used by the reward engine.
//! - [`operator`]: the privileged operator role and its two-step handover.

#![no_std]

// ── Modules ──────────────────────────────────────────────────────────────────

pub mod fixed_point;
pub mod operator;

pub use fixed_point::{MAX_PRECISION, I256_DIGIT_BUDGET};
