//! Cross-contract calls into the ledger engine and the reward distributor.
//!
//! The manager never reads or writes balances itself. Every economic effect is
//! a call into one of these two collaborators, which revert the whole
//! transaction on failure.

use odra::prelude::*;
use odra::casper_types::{runtime_args, U256};
use odra::CallDef;
use crate::types::{CollateralType, PositionBalances, SignedAmount};

/// Ledger engine entry points
pub const OPEN_HANDLER: &str = "open_handler";
pub const POSITION_BALANCES: &str = "position_balances";
pub const TRANSFER_COLLATERAL: &str = "transfer_collateral";
pub const TRANSFER_INTERNAL_BALANCE: &str = "transfer_internal_balance";
pub const MODIFY_COLLATERALIZATION: &str = "modify_collateralization";
pub const TRANSFER_POSITION: &str = "transfer_position";

/// Reward distributor entry point
pub const CLAIM_MANAGEMENT_REWARDS: &str = "claim_management_rewards";

/// Call layer for the ledger engine that stores per-handler collateral and debt.
pub struct LedgerEngine;

impl LedgerEngine {
    /// Allocate a fresh handler and let `manager` modify its position.
    pub fn open_handler(env: &odra::ContractEnv, engine: Address, manager: Address) -> Address {
        let args = runtime_args! { "manager" => manager };
        env.call_contract(engine, CallDef::new(OPEN_HANDLER, true, args))
    }

    pub fn position_balances(
        env: &odra::ContractEnv,
        engine: Address,
        collateral_type: CollateralType,
        handler: Address,
    ) -> PositionBalances {
        let args = runtime_args! {
            "collateral_type" => collateral_type,
            "handler" => handler,
        };
        env.call_contract(engine, CallDef::new(POSITION_BALANCES, false, args))
    }

    pub fn transfer_collateral(
        env: &odra::ContractEnv,
        engine: Address,
        collateral_type: CollateralType,
        src: Address,
        dst: Address,
        amount: U256,
    ) {
        let args = runtime_args! {
            "collateral_type" => collateral_type,
            "src" => src,
            "dst" => dst,
            "amount" => amount,
        };
        env.call_contract::<()>(engine, CallDef::new(TRANSFER_COLLATERAL, true, args));
    }

    pub fn transfer_internal_balance(
        env: &odra::ContractEnv,
        engine: Address,
        src: Address,
        dst: Address,
        amount: U256,
    ) {
        let args = runtime_args! {
            "src" => src,
            "dst" => dst,
            "amount" => amount,
        };
        env.call_contract::<()>(engine, CallDef::new(TRANSFER_INTERNAL_BALANCE, true, args));
    }

    /// Adjust `handler`'s locked collateral and debt by signed deltas.
    ///
    /// Collateral is drawn from `collateral_src` and generated debt credited to `debt_dst`.
    #[allow(clippy::too_many_arguments)]
    pub fn modify_collateralization(
        env: &odra::ContractEnv,
        engine: Address,
        collateral_type: CollateralType,
        handler: Address,
        collateral_src: Address,
        debt_dst: Address,
        delta_collateral: SignedAmount,
        delta_debt: SignedAmount,
    ) {
        let args = runtime_args! {
            "collateral_type" => collateral_type,
            "handler" => handler,
            "collateral_src" => collateral_src,
            "debt_dst" => debt_dst,
            "delta_collateral" => delta_collateral,
            "delta_debt" => delta_debt,
        };
        env.call_contract::<()>(engine, CallDef::new(MODIFY_COLLATERALIZATION, true, args));
    }

    /// Move locked collateral and debt from `src` to `dst`.
    pub fn transfer_position(
        env: &odra::ContractEnv,
        engine: Address,
        collateral_type: CollateralType,
        src: Address,
        dst: Address,
        delta_collateral: SignedAmount,
        delta_debt: SignedAmount,
    ) {
        let args = runtime_args! {
            "collateral_type" => collateral_type,
            "src" => src,
            "dst" => dst,
            "delta_collateral" => delta_collateral,
            "delta_debt" => delta_debt,
        };
        env.call_contract::<()>(engine, CallDef::new(TRANSFER_POSITION, true, args));
    }
}

/// Call layer for the management reward distributor.
pub struct RewardDistributor;

impl RewardDistributor {
    /// Returns whether the distributor accepted the claim.
    pub fn claim_management_rewards(
        env: &odra::ContractEnv,
        distributor: Address,
        collateral_type: CollateralType,
        handler: Address,
        beneficiary: Address,
    ) -> bool {
        let args = runtime_args! {
            "collateral_type" => collateral_type,
            "handler" => handler,
            "beneficiary" => beneficiary,
        };
        env.call_contract(distributor, CallDef::new(CLAIM_MANAGEMENT_REWARDS, true, args))
    }
}
