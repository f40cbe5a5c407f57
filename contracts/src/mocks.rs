//! Test doubles for the position manager's external collaborators.
//!
//! `MockLedgerEngine` keeps per-handler balances and modification approvals
//! and exposes the entry points the manager calls. `MockRewardDistributor`
//! accepts or rejects claims depending on a switch.

use odra::prelude::*;
use odra::casper_types::account::AccountHash;
use odra::casper_types::{runtime_args, U256};
use odra::CallDef;
use crate::errors::ManagerError;
use crate::math::{apply_delta, checked_add, checked_sub};
use crate::types::{CollateralType, PositionBalances, SignedAmount};

/// Minimal ledger engine
#[odra::module]
pub struct MockLedgerEngine {
    /// Number of handlers allocated so far
    handler_count: Var<u64>,
    /// (handler, account) -> account may modify handler
    approvals: Mapping<(Address, Address), bool>,
    /// (collateral type, handler) -> locked collateral and debt
    positions: Mapping<(CollateralType, Address), PositionBalances>,
    /// (collateral type, account) -> free collateral
    collateral: Mapping<(CollateralType, Address), U256>,
    /// account -> internal balance
    internal_balances: Mapping<Address, U256>,
}

#[odra::module]
impl MockLedgerEngine {
    /// Allocate a handler and approve `manager` to modify it.
    pub fn open_handler(&mut self, manager: Address) -> Address {
        let id = self.ok_or_revert(checked_add(self.handler_count.get().unwrap_or(0), 1));
        self.handler_count.set(id);

        let handler = handler_address(id);
        self.approvals.set(&(handler, manager), true);
        handler
    }

    /// Let `account` modify the caller's positions and balances.
    pub fn approve_modification(&mut self, account: Address) {
        let caller = self.env().caller();
        self.approvals.set(&(caller, account), true);
    }

    pub fn can_modify(&self, handler: Address, account: Address) -> bool {
        handler == account || self.approvals.get(&(handler, account)).unwrap_or(false)
    }

    pub fn position_balances(&self, collateral_type: CollateralType, handler: Address) -> PositionBalances {
        self.positions.get(&(collateral_type, handler)).unwrap_or_default()
    }

    pub fn collateral_balance(&self, collateral_type: CollateralType, account: Address) -> U256 {
        self.collateral.get(&(collateral_type, account)).unwrap_or(U256::zero())
    }

    pub fn internal_balance(&self, account: Address) -> U256 {
        self.internal_balances.get(&account).unwrap_or(U256::zero())
    }

    /// Credit free collateral to `account`.
    pub fn mint_collateral(&mut self, collateral_type: CollateralType, account: Address, amount: U256) {
        let balance = self.collateral_balance(collateral_type, account);
        let updated = self.ok_or_revert(checked_add(balance, amount));
        self.collateral.set(&(collateral_type, account), updated);
    }

    /// Credit internal balance to `account`.
    pub fn mint_internal_balance(&mut self, account: Address, amount: U256) {
        let balance = self.internal_balance(account);
        let updated = self.ok_or_revert(checked_add(balance, amount));
        self.internal_balances.set(&account, updated);
    }

    pub fn transfer_collateral(
        &mut self,
        collateral_type: CollateralType,
        src: Address,
        dst: Address,
        amount: U256,
    ) {
        self.require_can_modify(src);
        let src_balance = self.collateral_balance(collateral_type, src);
        let src_updated = self.ok_or_insufficient(checked_sub(src_balance, amount));
        self.collateral.set(&(collateral_type, src), src_updated);

        let dst_balance = self.collateral_balance(collateral_type, dst);
        let dst_updated = self.ok_or_revert(checked_add(dst_balance, amount));
        self.collateral.set(&(collateral_type, dst), dst_updated);
    }

    pub fn transfer_internal_balance(&mut self, src: Address, dst: Address, amount: U256) {
        self.require_can_modify(src);
        let src_updated = self.ok_or_insufficient(checked_sub(self.internal_balance(src), amount));
        self.internal_balances.set(&src, src_updated);

        let dst_updated = self.ok_or_revert(checked_add(self.internal_balance(dst), amount));
        self.internal_balances.set(&dst, dst_updated);
    }

    /// Lock collateral from `collateral_src` into `handler` and credit debt to `debt_dst`.
    pub fn modify_collateralization(
        &mut self,
        collateral_type: CollateralType,
        handler: Address,
        collateral_src: Address,
        debt_dst: Address,
        delta_collateral: SignedAmount,
        delta_debt: SignedAmount,
    ) {
        self.require_can_modify(handler);

        let mut position = self.position_balances(collateral_type, handler);
        position.locked_collateral =
            self.ok_or_insufficient(apply_delta(position.locked_collateral, &delta_collateral));
        position.generated_debt =
            self.ok_or_insufficient(apply_delta(position.generated_debt, &delta_debt));
        self.positions.set(&(collateral_type, handler), position);

        // Collateral leaves the source when locked and returns when freed.
        let free = self.collateral_balance(collateral_type, collateral_src);
        let free = self.ok_or_insufficient(apply_delta(free, &flip(&delta_collateral)));
        self.collateral.set(&(collateral_type, collateral_src), free);

        let coins = self.internal_balance(debt_dst);
        let coins = self.ok_or_insufficient(apply_delta(coins, &delta_debt));
        self.internal_balances.set(&debt_dst, coins);
    }

    /// Move locked collateral and debt from `src` to `dst`.
    pub fn transfer_position(
        &mut self,
        collateral_type: CollateralType,
        src: Address,
        dst: Address,
        delta_collateral: SignedAmount,
        delta_debt: SignedAmount,
    ) {
        self.require_can_modify(src);
        self.require_can_modify(dst);

        let mut from = self.position_balances(collateral_type, src);
        from.locked_collateral =
            self.ok_or_insufficient(apply_delta(from.locked_collateral, &flip(&delta_collateral)));
        from.generated_debt =
            self.ok_or_insufficient(apply_delta(from.generated_debt, &flip(&delta_debt)));
        self.positions.set(&(collateral_type, src), from);

        let mut to = self.position_balances(collateral_type, dst);
        to.locked_collateral =
            self.ok_or_insufficient(apply_delta(to.locked_collateral, &delta_collateral));
        to.generated_debt = self.ok_or_insufficient(apply_delta(to.generated_debt, &delta_debt));
        self.positions.set(&(collateral_type, dst), to);
    }

    fn require_can_modify(&self, handler: Address) {
        if !self.can_modify(handler, self.env().caller()) {
            self.env().revert(ManagerError::NotPermitted);
        }
    }

    fn ok_or_revert<T>(&self, result: Result<T, ManagerError>) -> T {
        match result {
            Ok(value) => value,
            Err(error) => self.env().revert(error),
        }
    }

    fn ok_or_insufficient<T>(&self, result: Result<T, ManagerError>) -> T {
        match result {
            Ok(value) => value,
            Err(_) => self.env().revert(ManagerError::InsufficientBalance),
        }
    }
}

/// Minimal reward distributor
#[odra::module]
pub struct MockRewardDistributor {
    /// Whether claims are accepted
    accept_claims: Var<bool>,
    /// Number of accepted claims
    claims: Var<u64>,
    /// Beneficiary of the most recent accepted claim
    last_beneficiary: Var<Option<Address>>,
    /// (collateral type, handler) -> accepted claims
    handler_claims: Mapping<(CollateralType, Address), u64>,
}

#[odra::module]
impl MockRewardDistributor {
    pub fn init(&mut self, accept_claims: bool) {
        self.accept_claims.set(accept_claims);
        self.claims.set(0);
        self.last_beneficiary.set(None);
    }

    pub fn set_accept_claims(&mut self, accept_claims: bool) {
        self.accept_claims.set(accept_claims);
    }

    pub fn claim_management_rewards(
        &mut self,
        collateral_type: CollateralType,
        handler: Address,
        beneficiary: Address,
    ) -> bool {
        if !self.accept_claims.get().unwrap_or(false) {
            return false;
        }
        let claims = self.claims.get().unwrap_or(0);
        self.claims.set(claims.saturating_add(1));
        let key = (collateral_type, handler);
        let per_handler = self.handler_claims.get(&key).unwrap_or(0);
        self.handler_claims.set(&key, per_handler.saturating_add(1));
        self.last_beneficiary.set(Some(beneficiary));
        true
    }

    pub fn claim_count(&self) -> u64 {
        self.claims.get().unwrap_or(0)
    }

    /// Accepted claims made for `handler` under `collateral_type`.
    pub fn claims_for(&self, collateral_type: CollateralType, handler: Address) -> u64 {
        self.handler_claims.get(&(collateral_type, handler)).unwrap_or(0)
    }

    pub fn last_beneficiary(&self) -> Option<Address> {
        self.last_beneficiary.get().flatten()
    }
}

/// Ledger engine that re-enters the manager's `open` from `open_handler`
#[odra::module]
pub struct ReentrantLedgerEngine {
    /// Number of `open_handler` calls that got past the callback
    calls: Var<u64>,
}

#[odra::module]
impl ReentrantLedgerEngine {
    pub fn open_handler(&mut self, manager: Address) -> Address {
        let args = runtime_args! {
            "collateral_type" => CollateralType { tag: [0u8; 32] },
            "owner" => manager,
        };
        self.env().call_contract::<u64>(manager, CallDef::new("open", true, args));

        let calls = match checked_add(self.calls.get().unwrap_or(0), 1) {
            Ok(calls) => calls,
            Err(error) => self.env().revert(error),
        };
        self.calls.set(calls);
        handler_address(calls)
    }

    pub fn calls(&self) -> u64 {
        self.calls.get().unwrap_or(0)
    }
}

/// Deterministic handler address for the `id`-th allocation.
pub fn handler_address(id: u64) -> Address {
    let mut bytes = [0xAAu8; 32];
    bytes[..8].copy_from_slice(&id.to_be_bytes());
    Address::Account(AccountHash::new(bytes))
}

fn flip(amount: &SignedAmount) -> SignedAmount {
    if amount.negative {
        SignedAmount::positive(amount.magnitude)
    } else {
        SignedAmount::negative(amount.magnitude)
    }
}
