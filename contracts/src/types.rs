//! Common types used across the position manager.

use odra::prelude::*;
use odra::casper_types::account::AccountHash;
use odra::casper_types::U256;
use crate::errors::ManagerError;

/// Sentinel id: "no position" and list terminator. Never assigned.
pub const NO_POSITION: u64 = 0;

/// Collateral class tag, a 32-byte identifier padded with zeroes.
#[odra::odra_type]
#[derive(Copy, PartialOrd, Ord)]
pub struct CollateralType {
    pub tag: [u8; 32],
}

impl CollateralType {
    /// Build a tag from a short ASCII symbol such as `"ETH-A"`.
    pub fn from_symbol(symbol: &str) -> Result<Self, ManagerError> {
        let bytes = symbol.as_bytes();
        if bytes.len() > 32 {
            return Err(ManagerError::InvalidCollateralType);
        }
        let mut tag = [0u8; 32];
        tag[..bytes.len()].copy_from_slice(bytes);
        Ok(Self { tag })
    }

    /// The symbol with its zero padding stripped.
    pub fn symbol(&self) -> &[u8] {
        let end = self.tag.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
        &self.tag[..end]
    }
}

/// Signed 256-bit quantity as magnitude plus sign.
#[odra::odra_type]
#[derive(Copy)]
pub struct SignedAmount {
    /// Absolute value, at most 2^255 - 1 (2^255 when negative)
    pub magnitude: U256,
    /// Whether the amount is negative
    pub negative: bool,
}

impl SignedAmount {
    pub fn zero() -> Self {
        Self { magnitude: U256::zero(), negative: false }
    }

    pub fn positive(magnitude: U256) -> Self {
        Self { magnitude, negative: false }
    }

    pub fn negative(magnitude: U256) -> Self {
        Self { magnitude, negative: !magnitude.is_zero() }
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude.is_zero()
    }
}

/// Locked collateral and generated debt the ledger engine holds for a handler.
#[odra::odra_type]
#[derive(Copy, Default)]
pub struct PositionBalances {
    pub locked_collateral: U256,
    pub generated_debt: U256,
}

/// Links of a position inside its owner's list.
#[odra::odra_type]
#[derive(Copy, Default)]
pub struct ListNode {
    /// Previous position id (0 = head)
    pub prev: u64,
    /// Next position id (0 = tail)
    pub next: u64,
}

/// Head, tail and length of one owner's position list.
#[odra::odra_type]
#[derive(Copy, Default)]
pub struct OwnerIndex {
    pub first: u64,
    pub last: u64,
    pub count: u64,
}

impl OwnerIndex {
    pub fn is_empty(&self) -> bool {
        self.first == NO_POSITION
    }
}

/// Full view of one position.
#[odra::odra_type]
pub struct PositionInfo {
    pub id: u64,
    pub owner: Address,
    pub handler: Address,
    pub collateral_type: CollateralType,
    pub prev: u64,
    pub next: u64,
}

/// The null principal.
pub fn null_address() -> Address {
    Address::Account(AccountHash::default())
}

pub fn is_null(address: &Address) -> bool {
    *address == null_address()
}
