//! Position manager contract.
//!
//! Registry of collateralized debt positions sitting in front of the ledger
//! engine. Each position gets its own handler identity from the engine, an
//! owner, and a slot in that owner's linked list. Owners can delegate a single
//! position to other accounts, and handler holders can delegate their handler.
//!
//! Every mutating entry point checks its permission predicate first, then
//! updates registry storage, then forwards the economic effect to the ledger
//! engine or the reward distributor. Any revert rolls back the whole call.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::access_control::AuthorizationTable;
use crate::errors::ManagerError;
use crate::events::{
    AuthorizationAdded, AuthorizationRemoved, CollateralTransferred, CollateralizationModified,
    HandlerAllowed, InternalBalanceTransferred, ManagementRewardsClaimed, OwnershipTransferred,
    ParametersModified, PositionAllowed, PositionMoved, PositionOpened, SystemEntered, SystemQuit,
};
use crate::ledger::{LedgerEngine, RewardDistributor};
use crate::math::{check_signed, checked_add, to_signed};
use crate::owner_index::{self, ListStore};
use crate::permissions::{is_permitted, Capability, DelegationLookup};
use crate::types::{
    is_null, CollateralType, ListNode, OwnerIndex, PositionInfo, SignedAmount, NO_POSITION,
};

/// Configuration key for the reward distributor
pub const REWARD_DISTRIBUTOR: &str = "reward_distributor";

/// Position manager contract
#[odra::module(events = [
    AuthorizationAdded,
    AuthorizationRemoved,
    ParametersModified,
    PositionOpened,
    PositionAllowed,
    HandlerAllowed,
    OwnershipTransferred,
    CollateralizationModified,
    CollateralTransferred,
    InternalBalanceTransferred,
    SystemQuit,
    SystemEntered,
    PositionMoved,
    ManagementRewardsClaimed
])]
pub struct PositionManager {
    /// Accounts allowed to change configuration
    authorization: SubModule<AuthorizationTable>,
    /// Ledger engine contract address
    ledger_engine: Var<Address>,
    /// Reward distributor contract address
    reward_distributor: Var<Option<Address>>,
    /// Last allocated position id (0 = none yet)
    last_position_id: Var<u64>,
    /// position id -> handler
    handlers: Mapping<u64, Address>,
    /// position id -> owner
    owners: Mapping<u64, Address>,
    /// position id -> collateral type
    collateral_types: Mapping<u64, CollateralType>,
    /// position id -> links in its owner's list
    list_nodes: Mapping<u64, ListNode>,
    /// owner -> head, tail and count of its list
    owner_indices: Mapping<Address, OwnerIndex>,
    /// (owner, position id, delegate) -> allowed
    position_delegates: Mapping<(Address, u64, Address), bool>,
    /// (handler, delegate) -> allowed
    handler_delegates: Mapping<(Address, Address), bool>,
    /// Set while an entry point is executing
    locked: Var<bool>,
}

#[odra::module]
impl PositionManager {
    /// Initialize the manager. The deployer becomes the first authorized account.
    pub fn init(&mut self, ledger_engine: Address) {
        if is_null(&ledger_engine) {
            self.env().revert(ManagerError::InvalidAddress);
        }
        let deployer = self.env().caller();
        self.authorization.bootstrap(deployer);
        self.ledger_engine.set(ledger_engine);
        self.reward_distributor.set(None);
        self.last_position_id.set(NO_POSITION);
        self.locked.set(false);
    }

    // ========== Authorization ==========

    /// Authorize an account (authorized accounts only)
    pub fn add_authorization(&mut self, account: Address) {
        self.authorization.add(account);
    }

    /// Remove an authorized account (authorized accounts only)
    pub fn remove_authorization(&mut self, account: Address) {
        self.authorization.remove(account);
    }

    pub fn is_authorized(&self, account: Address) -> bool {
        self.authorization.is_authorized(account)
    }

    pub fn authorized_count(&self) -> u32 {
        self.authorization.count()
    }

    /// Change a configuration value (authorized accounts only).
    ///
    /// Recognized parameters: `"reward_distributor"`.
    pub fn modify_parameters(&mut self, parameter: String, data: Address) {
        self.authorization.require_authorized();

        match parameter.as_str() {
            REWARD_DISTRIBUTOR => self.reward_distributor.set(Some(data)),
            _ => self.env().revert(ManagerError::UnrecognizedParameter),
        }

        self.env().emit_event(ParametersModified { parameter, data });
    }

    /// Replace the reward distributor (authorized accounts only)
    pub fn set_reward_distributor(&mut self, distributor: Address) {
        self.modify_parameters(String::from(REWARD_DISTRIBUTOR), distributor);
    }

    // ========== Registry ==========

    /// Open a new position of `collateral_type` owned by `owner`.
    ///
    /// Returns the new position id.
    pub fn open(&mut self, collateral_type: CollateralType, owner: Address) -> u64 {
        self.lock();
        if is_null(&owner) {
            self.env().revert(ManagerError::InvalidAddress);
        }

        let position_id = self.ok_or_revert(checked_add(self.last_position_id(), 1));
        let manager = self.env().self_address();
        let handler = LedgerEngine::open_handler(&self.env(), self.engine(), manager);

        self.last_position_id.set(position_id);
        self.handlers.set(&position_id, handler);
        self.owners.set(&position_id, owner);
        self.collateral_types.set(&position_id, collateral_type);
        let appended = owner_index::append(self, &owner, position_id);
        self.ok_or_revert(appended);

        self.env().emit_event(PositionOpened {
            sender: self.env().caller(),
            owner,
            position_id,
        });
        self.unlock();
        position_id
    }

    /// Hand a position over to `new_owner`, moving it to the tail of their list.
    pub fn transfer_ownership(&mut self, position_id: u64, new_owner: Address) {
        self.lock();
        let owner = self.require_position_allowed(position_id);
        if is_null(&new_owner) || new_owner == owner {
            self.env().revert(ManagerError::InvalidAddress);
        }

        let moved = owner_index::transfer(self, &owner, &new_owner, position_id);
        self.ok_or_revert(moved);
        self.owners.set(&position_id, new_owner);

        self.env().emit_event(OwnershipTransferred {
            sender: self.env().caller(),
            position_id,
            previous_owner: owner,
            new_owner,
        });
        self.unlock();
    }

    // ========== Delegation ==========

    /// Allow or disallow `delegate` to act on `position_id` on the owner's behalf.
    ///
    /// The grant is keyed by the current owner and stops applying once the
    /// position changes hands.
    pub fn allow_position(&mut self, position_id: u64, delegate: Address, enabled: bool) {
        self.lock();
        let owner = self.require_position_allowed(position_id);
        self.position_delegates.set(&(owner, position_id, delegate), enabled);

        self.env().emit_event(PositionAllowed {
            sender: self.env().caller(),
            position_id,
            delegate,
            enabled,
        });
        self.unlock();
    }

    /// Allow or disallow `delegate` to move value into and out of the caller's handler.
    pub fn allow_handler(&mut self, delegate: Address, enabled: bool) {
        self.lock();
        let caller = self.env().caller();
        self.handler_delegates.set(&(caller, delegate), enabled);

        self.env().emit_event(HandlerAllowed {
            sender: caller,
            delegate,
            enabled,
        });
        self.unlock();
    }

    // ========== Ledger operations ==========

    /// Adjust the position's locked collateral and debt. The handler is both
    /// the collateral source and the debt destination.
    pub fn modify_collateralization(
        &mut self,
        position_id: u64,
        delta_collateral: SignedAmount,
        delta_debt: SignedAmount,
    ) {
        self.lock();
        self.require_position_allowed(position_id);
        self.ok_or_revert(check_signed(&delta_collateral));
        self.ok_or_revert(check_signed(&delta_debt));

        let handler = self.require_handler(position_id);
        let collateral_type = self.require_collateral_type(position_id);
        LedgerEngine::modify_collateralization(
            &self.env(),
            self.engine(),
            collateral_type,
            handler,
            handler,
            handler,
            delta_collateral,
            delta_debt,
        );

        self.env().emit_event(CollateralizationModified {
            sender: self.env().caller(),
            position_id,
            delta_collateral,
            delta_debt,
        });
        self.unlock();
    }

    /// Move `amount` of the position's own collateral type out of its handler.
    pub fn transfer_collateral(&mut self, position_id: u64, dst: Address, amount: U256) {
        self.lock();
        self.require_position_allowed(position_id);
        let collateral_type = self.require_collateral_type(position_id);
        self.transfer_collateral_internal(collateral_type, position_id, dst, amount);
        self.unlock();
    }

    /// Move `amount` of an explicitly named collateral type out of the position's handler.
    pub fn transfer_collateral_of_type(
        &mut self,
        collateral_type: CollateralType,
        position_id: u64,
        dst: Address,
        amount: U256,
    ) {
        self.lock();
        self.require_position_allowed(position_id);
        self.transfer_collateral_internal(collateral_type, position_id, dst, amount);
        self.unlock();
    }

    /// Move internal balance out of the position's handler.
    pub fn transfer_internal_balance(&mut self, position_id: u64, dst: Address, amount: U256) {
        self.lock();
        self.require_position_allowed(position_id);
        if is_null(&dst) {
            self.env().revert(ManagerError::InvalidAddress);
        }

        let handler = self.require_handler(position_id);
        LedgerEngine::transfer_internal_balance(&self.env(), self.engine(), handler, dst, amount);

        self.env().emit_event(InternalBalanceTransferred {
            sender: self.env().caller(),
            position_id,
            dst,
            amount,
        });
        self.unlock();
    }

    /// Move the position's entire collateral and debt out to `dst_handler`.
    pub fn quit_system(&mut self, position_id: u64, dst_handler: Address) {
        self.lock();
        self.require_position_allowed(position_id);
        if is_null(&dst_handler) {
            self.env().revert(ManagerError::InvalidAddress);
        }
        self.require_handler_allowed(dst_handler);

        let handler = self.require_handler(position_id);
        let collateral_type = self.require_collateral_type(position_id);
        self.move_entire_position(collateral_type, handler, dst_handler);

        self.env().emit_event(SystemQuit {
            sender: self.env().caller(),
            position_id,
            dst_handler,
        });
        self.unlock();
    }

    /// Move the entire collateral and debt held by `src_handler` into the position.
    pub fn enter_system(&mut self, src_handler: Address, position_id: u64) {
        self.lock();
        self.require_position_allowed(position_id);
        if is_null(&src_handler) {
            self.env().revert(ManagerError::InvalidAddress);
        }
        self.require_handler_allowed(src_handler);

        let handler = self.require_handler(position_id);
        let collateral_type = self.require_collateral_type(position_id);
        self.move_entire_position(collateral_type, src_handler, handler);

        self.env().emit_event(SystemEntered {
            sender: self.env().caller(),
            src_handler,
            position_id,
        });
        self.unlock();
    }

    /// Move the entire collateral and debt of one position into another of the same type.
    pub fn move_position(&mut self, src_position_id: u64, dst_position_id: u64) {
        self.lock();
        self.require_position_allowed(src_position_id);
        self.require_position_allowed(dst_position_id);

        let src_type = self.require_collateral_type(src_position_id);
        let dst_type = self.require_collateral_type(dst_position_id);
        if src_type != dst_type {
            self.env().revert(ManagerError::TypeMismatch);
        }

        let src_handler = self.require_handler(src_position_id);
        let dst_handler = self.require_handler(dst_position_id);
        self.move_entire_position(src_type, src_handler, dst_handler);

        self.env().emit_event(PositionMoved {
            sender: self.env().caller(),
            src_position_id,
            dst_position_id,
        });
        self.unlock();
    }

    /// Claim management rewards accrued by the position's handler.
    ///
    /// Rewards go to `beneficiary`, or to the caller when none is given.
    pub fn claim_management_rewards(&mut self, position_id: u64, beneficiary: Option<Address>) {
        self.lock();
        self.require_position_allowed(position_id);

        let distributor = match self.reward_distributor() {
            Some(d) => d,
            None => self.env().revert(ManagerError::RewardDistributorNotSet),
        };
        let caller = self.env().caller();
        let beneficiary = beneficiary.unwrap_or(caller);
        let handler = self.require_handler(position_id);
        let collateral_type = self.require_collateral_type(position_id);

        let accepted = RewardDistributor::claim_management_rewards(
            &self.env(),
            distributor,
            collateral_type,
            handler,
            beneficiary,
        );
        if !accepted {
            self.env().revert(ManagerError::ClaimRejected);
        }

        self.env().emit_event(ManagementRewardsClaimed {
            sender: caller,
            beneficiary,
            collateral_type,
            handler,
        });
        self.unlock();
    }

    // ========== Queries ==========

    pub fn last_position_id(&self) -> u64 {
        self.last_position_id.get().unwrap_or(NO_POSITION)
    }

    pub fn handler_of(&self, position_id: u64) -> Option<Address> {
        self.handlers.get(&position_id)
    }

    pub fn owner_of(&self, position_id: u64) -> Option<Address> {
        self.owners.get(&position_id)
    }

    pub fn collateral_type_of(&self, position_id: u64) -> Option<CollateralType> {
        self.collateral_types.get(&position_id)
    }

    /// Full view of a position, including its list links.
    pub fn position(&self, position_id: u64) -> Option<PositionInfo> {
        let owner = self.owners.get(&position_id)?;
        let handler = self.handlers.get(&position_id)?;
        let collateral_type = self.collateral_types.get(&position_id)?;
        let links = self.list_nodes.get(&position_id).unwrap_or_default();
        Some(PositionInfo {
            id: position_id,
            owner,
            handler,
            collateral_type,
            prev: links.prev,
            next: links.next,
        })
    }

    /// Head, tail and count of `owner`'s position list.
    pub fn owner_index(&self, owner: Address) -> OwnerIndex {
        self.owner_indices.get(&owner).unwrap_or_default()
    }

    /// Position ids owned by `owner`, oldest first, at most `max_count`.
    pub fn positions_of(&self, owner: Address, max_count: u64) -> Vec<u64> {
        owner_index::collect(self, &owner, max_count)
    }

    pub fn position_allowed(&self, owner: Address, position_id: u64, delegate: Address) -> bool {
        self.position_delegates.get(&(owner, position_id, delegate)).unwrap_or(false)
    }

    pub fn handler_allowed(&self, handler: Address, delegate: Address) -> bool {
        self.handler_delegates.get(&(handler, delegate)).unwrap_or(false)
    }

    pub fn ledger_engine(&self) -> Option<Address> {
        self.ledger_engine.get()
    }

    pub fn reward_distributor(&self) -> Option<Address> {
        self.reward_distributor.get().flatten()
    }

    // ========== Internal helpers ==========

    fn transfer_collateral_internal(
        &mut self,
        collateral_type: CollateralType,
        position_id: u64,
        dst: Address,
        amount: U256,
    ) {
        if is_null(&dst) {
            self.env().revert(ManagerError::InvalidAddress);
        }

        let handler = self.require_handler(position_id);
        LedgerEngine::transfer_collateral(
            &self.env(),
            self.engine(),
            collateral_type,
            handler,
            dst,
            amount,
        );

        self.env().emit_event(CollateralTransferred {
            sender: self.env().caller(),
            collateral_type,
            position_id,
            dst,
            amount,
        });
    }

    /// Read `src`'s balances and move all of them to `dst`.
    fn move_entire_position(&mut self, collateral_type: CollateralType, src: Address, dst: Address) {
        let engine = self.engine();
        let balances = LedgerEngine::position_balances(&self.env(), engine, collateral_type, src);
        let delta_collateral = self.ok_or_revert(to_signed(balances.locked_collateral));
        let delta_debt = self.ok_or_revert(to_signed(balances.generated_debt));

        LedgerEngine::transfer_position(
            &self.env(),
            engine,
            collateral_type,
            src,
            dst,
            delta_collateral,
            delta_debt,
        );
    }

    /// Revert unless the caller owns `position_id` or holds a delegation for it.
    /// Returns the current owner.
    fn require_position_allowed(&self, position_id: u64) -> Address {
        let owner = self.owners.get(&position_id);
        let capability = Capability::Position {
            owner,
            position_id,
            caller: self.env().caller(),
        };
        if !is_permitted(&capability, self) {
            self.env().revert(ManagerError::NotPermitted);
        }
        match owner {
            Some(owner) => owner,
            None => self.env().revert(ManagerError::PositionNotFound),
        }
    }

    /// Revert unless the caller is `handler` or holds a delegation from it.
    fn require_handler_allowed(&self, handler: Address) {
        let capability = Capability::Handler {
            handler,
            caller: self.env().caller(),
        };
        if !is_permitted(&capability, self) {
            self.env().revert(ManagerError::NotPermitted);
        }
    }

    fn require_handler(&self, position_id: u64) -> Address {
        match self.handlers.get(&position_id) {
            Some(handler) => handler,
            None => self.env().revert(ManagerError::PositionNotFound),
        }
    }

    fn require_collateral_type(&self, position_id: u64) -> CollateralType {
        match self.collateral_types.get(&position_id) {
            Some(collateral_type) => collateral_type,
            None => self.env().revert(ManagerError::PositionNotFound),
        }
    }

    fn engine(&self) -> Address {
        match self.ledger_engine.get() {
            Some(engine) => engine,
            None => self.env().revert(ManagerError::InvalidAddress),
        }
    }

    fn ok_or_revert<T>(&self, result: Result<T, ManagerError>) -> T {
        match result {
            Ok(value) => value,
            Err(error) => self.env().revert(error),
        }
    }

    fn lock(&mut self) {
        if self.locked.get().unwrap_or(false) {
            self.env().revert(ManagerError::ReentrantCall);
        }
        self.locked.set(true);
    }

    fn unlock(&mut self) {
        self.locked.set(false);
    }
}

impl ListStore for PositionManager {
    fn node(&self, id: u64) -> ListNode {
        self.list_nodes.get(&id).unwrap_or_default()
    }

    fn set_node(&mut self, id: u64, node: ListNode) {
        self.list_nodes.set(&id, node);
    }

    fn index(&self, owner: &Address) -> OwnerIndex {
        self.owner_indices.get(owner).unwrap_or_default()
    }

    fn set_index(&mut self, owner: &Address, index: OwnerIndex) {
        self.owner_indices.set(owner, index);
    }
}

impl DelegationLookup for PositionManager {
    fn position_delegated(&self, owner: &Address, position_id: u64, delegate: &Address) -> bool {
        self.position_allowed(*owner, position_id, *delegate)
    }

    fn handler_delegated(&self, handler: &Address, delegate: &Address) -> bool {
        self.handler_allowed(*handler, *delegate)
    }
}
