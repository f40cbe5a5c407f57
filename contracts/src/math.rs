//! Checked arithmetic for counters and signed conversions.
//!
//! Every counter update in the manager goes through these helpers so that
//! overflow and underflow abort the call instead of wrapping.

use odra::casper_types::U256;
use crate::errors::ManagerError;
use crate::types::SignedAmount;

/// Unsigned integers the guard operates on.
pub trait GuardedUint: Copy + PartialOrd {
    fn checked_plus(self, rhs: Self) -> Option<Self>;
    fn checked_minus(self, rhs: Self) -> Option<Self>;
}

impl GuardedUint for u64 {
    fn checked_plus(self, rhs: Self) -> Option<Self> {
        self.checked_add(rhs)
    }

    fn checked_minus(self, rhs: Self) -> Option<Self> {
        self.checked_sub(rhs)
    }
}

impl GuardedUint for U256 {
    fn checked_plus(self, rhs: Self) -> Option<Self> {
        self.checked_add(rhs)
    }

    fn checked_minus(self, rhs: Self) -> Option<Self> {
        self.checked_sub(rhs)
    }
}

/// `x + y`, or `Overflow`.
pub fn checked_add<T: GuardedUint>(x: T, y: T) -> Result<T, ManagerError> {
    match x.checked_plus(y) {
        Some(z) if z >= x => Ok(z),
        _ => Err(ManagerError::Overflow),
    }
}

/// `x - y`, or `Underflow`.
pub fn checked_sub<T: GuardedUint>(x: T, y: T) -> Result<T, ManagerError> {
    match x.checked_minus(y) {
        Some(z) if z <= x => Ok(z),
        _ => Err(ManagerError::Underflow),
    }
}

/// Largest magnitude a signed 256-bit value can carry (2^255 - 1).
pub fn max_signed_magnitude() -> U256 {
    U256::MAX >> 1
}

/// Widen an unsigned amount into a non-negative `SignedAmount`.
pub fn to_signed(x: U256) -> Result<SignedAmount, ManagerError> {
    if x > max_signed_magnitude() {
        return Err(ManagerError::SignOverflow);
    }
    Ok(SignedAmount::positive(x))
}

/// Check that a caller-supplied signed amount is within the signed range.
///
/// Negative amounts reach one further than positive ones: -2^255 is valid.
pub fn check_signed(amount: &SignedAmount) -> Result<(), ManagerError> {
    if amount.negative {
        if amount.magnitude > max_signed_magnitude() + U256::one() {
            return Err(ManagerError::SignOverflow);
        }
        return Ok(());
    }
    to_signed(amount.magnitude).map(|_| ())
}

/// Apply a signed delta to an unsigned balance.
pub fn apply_delta(balance: U256, delta: &SignedAmount) -> Result<U256, ManagerError> {
    if delta.negative {
        checked_sub(balance, delta.magnitude)
    } else {
        checked_add(balance, delta.magnitude)
    }
}
