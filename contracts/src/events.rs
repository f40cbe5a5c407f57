//! Events emitted by the position manager.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::types::{CollateralType, SignedAmount};

#[odra::event]
pub struct AuthorizationAdded {
    pub account: Address,
}

#[odra::event]
pub struct AuthorizationRemoved {
    pub account: Address,
}

#[odra::event]
pub struct ParametersModified {
    pub parameter: String,
    pub data: Address,
}

/// A position was opened for `owner` by `sender`.
#[odra::event]
pub struct PositionOpened {
    pub sender: Address,
    pub owner: Address,
    pub position_id: u64,
}

#[odra::event]
pub struct PositionAllowed {
    pub sender: Address,
    pub position_id: u64,
    pub delegate: Address,
    pub enabled: bool,
}

#[odra::event]
pub struct HandlerAllowed {
    pub sender: Address,
    pub delegate: Address,
    pub enabled: bool,
}

#[odra::event]
pub struct OwnershipTransferred {
    pub sender: Address,
    pub position_id: u64,
    pub previous_owner: Address,
    pub new_owner: Address,
}

#[odra::event]
pub struct CollateralizationModified {
    pub sender: Address,
    pub position_id: u64,
    pub delta_collateral: SignedAmount,
    pub delta_debt: SignedAmount,
}

#[odra::event]
pub struct CollateralTransferred {
    pub sender: Address,
    pub collateral_type: CollateralType,
    pub position_id: u64,
    pub dst: Address,
    pub amount: U256,
}

#[odra::event]
pub struct InternalBalanceTransferred {
    pub sender: Address,
    pub position_id: u64,
    pub dst: Address,
    pub amount: U256,
}

#[odra::event]
pub struct SystemQuit {
    pub sender: Address,
    pub position_id: u64,
    pub dst_handler: Address,
}

#[odra::event]
pub struct SystemEntered {
    pub sender: Address,
    pub src_handler: Address,
    pub position_id: u64,
}

#[odra::event]
pub struct PositionMoved {
    pub sender: Address,
    pub src_position_id: u64,
    pub dst_position_id: u64,
}

/// Management rewards for a position were paid out to `beneficiary`.
#[odra::event]
pub struct ManagementRewardsClaimed {
    pub sender: Address,
    pub beneficiary: Address,
    pub collateral_type: CollateralType,
    pub handler: Address,
}
