//! CDP Position Manager Integration Tests
//!
//! Scenario tests against a deployed manager wired to the mock ledger engine
//! and mock reward distributor.

#[cfg(test)]
mod fixtures {
    use cdp_manager_contracts::mocks::{
        MockLedgerEngine, MockLedgerEngineHostRef, MockRewardDistributor,
        MockRewardDistributorHostRef, MockRewardDistributorInitArgs,
    };
    use cdp_manager_contracts::position_manager::{
        PositionManager, PositionManagerHostRef, PositionManagerInitArgs,
    };
    use cdp_manager_contracts::types::CollateralType;
    use odra::host::{Deployer, HostEnv, HostRef, NoArgs};
    use odra::prelude::*;

    pub struct Fixture {
        pub env: HostEnv,
        pub admin: Address,
        pub alice: Address,
        pub bob: Address,
        pub carol: Address,
        pub ledger: MockLedgerEngineHostRef,
        pub distributor: MockRewardDistributorHostRef,
        pub manager: PositionManagerHostRef,
    }

    pub fn eth_a() -> CollateralType {
        CollateralType::from_symbol("ETH-A").unwrap()
    }

    pub fn eth_b() -> CollateralType {
        CollateralType::from_symbol("ETH-B").unwrap()
    }

    pub fn setup() -> Fixture {
        let env = odra_test::env();
        let admin = env.get_account(0);
        let alice = env.get_account(1);
        let bob = env.get_account(2);
        let carol = env.get_account(3);

        env.set_caller(admin);
        let ledger = MockLedgerEngine::deploy(&env, NoArgs);
        let distributor = MockRewardDistributor::deploy(
            &env,
            MockRewardDistributorInitArgs { accept_claims: true },
        );
        let mut manager = PositionManager::deploy(
            &env,
            PositionManagerInitArgs {
                ledger_engine: ledger.address().clone(),
            },
        );
        manager.set_reward_distributor(distributor.address().clone());

        Fixture { env, admin, alice, bob, carol, ledger, distributor, manager }
    }

    impl Fixture {
        /// Open a position of `collateral_type` for `owner`, called by `owner`.
        pub fn open_for(&mut self, owner: Address, collateral_type: CollateralType) -> u64 {
            self.env.set_caller(owner);
            self.manager.open(collateral_type, owner)
        }

        pub fn manager_address(&self) -> Address {
            self.manager.address().clone()
        }

        pub fn handler(&self, position_id: u64) -> Address {
            self.manager.handler_of(position_id).unwrap()
        }
    }
}

#[cfg(test)]
mod registry_tests {
    use super::fixtures::*;
    use cdp_manager_contracts::errors::ManagerError;
    use cdp_manager_contracts::types::{null_address, OwnerIndex};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_open_assigns_increasing_ids() {
        let mut f = setup();
        let ids: Vec<u64> = (0..5).map(|_| f.open_for(f.alice, eth_a())).collect();

        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(f.manager.last_position_id(), 5);
        assert!(f.env.emitted(&f.manager, "PositionOpened"));
    }

    #[test]
    fn test_open_records_position() {
        let mut f = setup();
        f.env.set_caller(f.bob);
        let id = f.manager.open(eth_a(), f.alice);

        let info = f.manager.position(id).unwrap();
        assert_eq!(info.owner, f.alice);
        assert_eq!(info.collateral_type, eth_a());
        assert_eq!(info.prev, 0);
        assert_eq!(info.next, 0);
        assert_eq!(f.manager.handler_of(id), Some(info.handler));
        assert_eq!(f.manager.positions_of(f.alice, 10), vec![id]);
        assert!(f.manager.positions_of(f.bob, 10).is_empty());
    }

    #[test]
    fn test_open_gives_each_position_its_own_handler() {
        let mut f = setup();
        let first = f.open_for(f.alice, eth_a());
        let second = f.open_for(f.alice, eth_a());
        assert_ne!(f.handler(first), f.handler(second));

        let manager = f.manager_address();
        assert!(f.ledger.can_modify(f.handler(first), manager));
    }

    #[test]
    fn test_open_rejects_null_owner() {
        let mut f = setup();
        f.env.set_caller(f.alice);
        assert_eq!(
            f.manager.try_open(eth_a(), null_address()),
            Err(ManagerError::InvalidAddress.into())
        );
        assert_eq!(f.manager.last_position_id(), 0);
    }

    #[test]
    fn test_transfer_scenario() {
        let mut f = setup();
        for _ in 0..3 {
            f.open_for(f.alice, eth_a());
        }

        f.env.set_caller(f.alice);
        f.manager.transfer_ownership(2, f.bob);

        assert_eq!(f.manager.positions_of(f.alice, 10), vec![1, 3]);
        assert_eq!(f.manager.owner_index(f.alice), OwnerIndex { first: 1, last: 3, count: 2 });
        assert_eq!(f.manager.positions_of(f.bob, 10), vec![2]);
        assert_eq!(f.manager.owner_index(f.bob), OwnerIndex { first: 2, last: 2, count: 1 });
        assert_eq!(f.manager.owner_of(2), Some(f.bob));

        f.manager.transfer_ownership(1, f.bob);

        assert_eq!(f.manager.positions_of(f.alice, 10), vec![3]);
        assert_eq!(f.manager.owner_index(f.alice), OwnerIndex { first: 3, last: 3, count: 1 });
        assert_eq!(f.manager.positions_of(f.bob, 10), vec![2, 1]);
        assert_eq!(f.manager.owner_index(f.bob), OwnerIndex { first: 2, last: 1, count: 2 });
        assert!(f.env.emitted(&f.manager, "OwnershipTransferred"));
    }

    #[test]
    fn test_transfer_round_trip() {
        let mut f = setup();
        let id = f.open_for(f.alice, eth_a());

        f.env.set_caller(f.alice);
        f.manager.transfer_ownership(id, f.bob);
        f.env.set_caller(f.bob);
        f.manager.transfer_ownership(id, f.alice);

        assert_eq!(f.manager.positions_of(f.alice, 10), vec![id]);
        assert_eq!(f.manager.owner_index(f.alice), OwnerIndex { first: id, last: id, count: 1 });
        assert_eq!(f.manager.owner_index(f.bob), OwnerIndex::default());
    }

    #[test]
    fn test_transfer_rejects_null_and_self() {
        let mut f = setup();
        let id = f.open_for(f.alice, eth_a());

        f.env.set_caller(f.alice);
        assert_eq!(
            f.manager.try_transfer_ownership(id, null_address()),
            Err(ManagerError::InvalidAddress.into())
        );
        assert_eq!(
            f.manager.try_transfer_ownership(id, f.alice),
            Err(ManagerError::InvalidAddress.into())
        );
        assert_eq!(f.manager.owner_of(id), Some(f.alice));
    }

    #[test]
    fn test_transfer_by_stranger_is_denied() {
        let mut f = setup();
        let id = f.open_for(f.alice, eth_a());

        f.env.set_caller(f.bob);
        assert_eq!(
            f.manager.try_transfer_ownership(id, f.bob),
            Err(ManagerError::NotPermitted.into())
        );
        assert_eq!(f.manager.positions_of(f.alice, 10), vec![id]);
        assert!(f.manager.positions_of(f.bob, 10).is_empty());
    }

    #[test]
    fn test_unknown_position_is_not_permitted() {
        let mut f = setup();
        f.env.set_caller(f.alice);
        assert_eq!(
            f.manager.try_transfer_ownership(42, f.bob),
            Err(ManagerError::NotPermitted.into())
        );
        assert_eq!(f.manager.position(42), None);
    }
}

#[cfg(test)]
mod delegation_tests {
    use super::fixtures::*;
    use cdp_manager_contracts::errors::ManagerError;
    use cdp_manager_contracts::types::SignedAmount;
    use odra::casper_types::U256;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_position_delegate_can_transfer() {
        let mut f = setup();
        let id = f.open_for(f.alice, eth_a());

        f.env.set_caller(f.alice);
        f.manager.allow_position(id, f.bob, true);
        assert!(f.manager.position_allowed(f.alice, id, f.bob));

        f.env.set_caller(f.bob);
        f.manager.transfer_ownership(id, f.carol);
        assert_eq!(f.manager.owner_of(id), Some(f.carol));
    }

    #[test]
    fn test_delegation_does_not_survive_transfer() {
        let mut f = setup();
        let id = f.open_for(f.alice, eth_a());

        f.env.set_caller(f.alice);
        f.manager.allow_position(id, f.bob, true);
        f.manager.transfer_ownership(id, f.carol);

        f.env.set_caller(f.bob);
        assert_eq!(
            f.manager.try_transfer_ownership(id, f.bob),
            Err(ManagerError::NotPermitted.into())
        );
    }

    #[test]
    fn test_revoked_delegate_is_denied() {
        let mut f = setup();
        let id = f.open_for(f.alice, eth_a());

        f.env.set_caller(f.alice);
        f.manager.allow_position(id, f.bob, true);
        f.manager.allow_position(id, f.bob, false);

        f.env.set_caller(f.bob);
        assert_eq!(
            f.manager.try_allow_position(id, f.carol, true),
            Err(ManagerError::NotPermitted.into())
        );
        assert!(!f.manager.position_allowed(f.alice, id, f.carol));
    }

    #[test]
    fn test_allow_handler_records_grant() {
        let mut f = setup();
        f.env.set_caller(f.alice);
        f.manager.allow_handler(f.bob, true);

        assert!(f.manager.handler_allowed(f.alice, f.bob));
        assert!(!f.manager.handler_allowed(f.bob, f.alice));
        assert!(f.env.emitted(&f.manager, "HandlerAllowed"));
    }

    #[test]
    fn test_facade_denies_strangers() {
        let mut f = setup();
        let id = f.open_for(f.alice, eth_a());
        let other = f.open_for(f.alice, eth_a());
        let one = U256::one();

        f.env.set_caller(f.bob);
        let denied = Err(ManagerError::NotPermitted.into());
        assert_eq!(f.manager.try_allow_position(id, f.bob, true), denied);
        assert_eq!(
            f.manager.try_modify_collateralization(id, SignedAmount::zero(), SignedAmount::zero()),
            denied
        );
        assert_eq!(f.manager.try_transfer_collateral(id, f.bob, one), denied);
        assert_eq!(f.manager.try_transfer_collateral_of_type(eth_b(), id, f.bob, one), denied);
        assert_eq!(f.manager.try_transfer_internal_balance(id, f.bob, one), denied);
        assert_eq!(f.manager.try_quit_system(id, f.bob), denied);
        assert_eq!(f.manager.try_enter_system(f.bob, id), denied);
        assert_eq!(f.manager.try_move_position(id, other), denied);
        assert_eq!(f.manager.try_claim_management_rewards(id, None), denied);

        assert_eq!(f.manager.positions_of(f.alice, 10), vec![id, other]);
        assert!(!f.manager.position_allowed(f.alice, id, f.bob));
    }
}

#[cfg(test)]
mod ledger_tests {
    use super::fixtures::*;
    use cdp_manager_contracts::errors::ManagerError;
    use cdp_manager_contracts::types::{null_address, PositionBalances, SignedAmount};
    use odra::casper_types::U256;
    use pretty_assertions::assert_eq;

    fn wad(n: u64) -> U256 {
        U256::from(n) * U256::from(10u64).pow(U256::from(18u64))
    }

    /// Open a position for alice and lock `collateral` against `debt` in it.
    fn funded_position(f: &mut Fixture, collateral: U256, debt: U256) -> u64 {
        let id = f.open_for(f.alice, eth_a());
        let handler = f.handler(id);
        f.ledger.mint_collateral(eth_a(), handler, collateral);

        f.env.set_caller(f.alice);
        f.manager.modify_collateralization(
            id,
            SignedAmount::positive(collateral),
            SignedAmount::positive(debt),
        );
        id
    }

    #[test]
    fn test_modify_collateralization() {
        let mut f = setup();
        let id = funded_position(&mut f, wad(10), wad(4));
        let handler = f.handler(id);

        assert_eq!(
            f.ledger.position_balances(eth_a(), handler),
            PositionBalances { locked_collateral: wad(10), generated_debt: wad(4) }
        );
        assert_eq!(f.ledger.internal_balance(handler), wad(4));

        f.manager.modify_collateralization(
            id,
            SignedAmount::negative(wad(3)),
            SignedAmount::negative(wad(1)),
        );
        assert_eq!(
            f.ledger.position_balances(eth_a(), handler),
            PositionBalances { locked_collateral: wad(7), generated_debt: wad(3) }
        );
        assert_eq!(f.ledger.collateral_balance(eth_a(), handler), wad(3));
    }

    #[test]
    fn test_modify_collateralization_rejects_out_of_range_delta() {
        let mut f = setup();
        let id = f.open_for(f.alice, eth_a());

        f.env.set_caller(f.alice);
        assert_eq!(
            f.manager.try_modify_collateralization(
                id,
                SignedAmount::positive(U256::MAX),
                SignedAmount::zero()
            ),
            Err(ManagerError::SignOverflow.into())
        );
    }

    #[test]
    fn test_transfer_collateral_and_internal_balance() {
        let mut f = setup();
        let id = f.open_for(f.alice, eth_a());
        let handler = f.handler(id);
        f.ledger.mint_collateral(eth_a(), handler, wad(5));
        f.ledger.mint_collateral(eth_b(), handler, wad(2));
        f.ledger.mint_internal_balance(handler, wad(7));

        f.env.set_caller(f.alice);
        f.manager.transfer_collateral(id, f.bob, wad(1));
        f.manager.transfer_collateral_of_type(eth_b(), id, f.bob, wad(2));
        f.manager.transfer_internal_balance(id, f.bob, wad(7));

        assert_eq!(f.ledger.collateral_balance(eth_a(), f.bob), wad(1));
        assert_eq!(f.ledger.collateral_balance(eth_a(), handler), wad(4));
        assert_eq!(f.ledger.collateral_balance(eth_b(), f.bob), wad(2));
        assert_eq!(f.ledger.internal_balance(f.bob), wad(7));
        assert!(f.env.emitted(&f.manager, "CollateralTransferred"));
        assert!(f.env.emitted(&f.manager, "InternalBalanceTransferred"));
    }

    #[test]
    fn test_ledger_failure_reverts_operation() {
        let mut f = setup();
        let id = f.open_for(f.alice, eth_a());

        f.env.set_caller(f.alice);
        assert_eq!(
            f.manager.try_transfer_collateral(id, f.bob, wad(1)),
            Err(ManagerError::InsufficientBalance.into())
        );
        assert!(!f.env.emitted(&f.manager, "CollateralTransferred"));
    }

    #[test]
    fn test_quit_and_enter_system() {
        let mut f = setup();
        let id = funded_position(&mut f, wad(10), wad(4));
        let handler = f.handler(id);
        let manager = f.manager_address();

        // alice receives the position in her own account, which the engine must let the manager modify
        f.env.set_caller(f.alice);
        f.ledger.approve_modification(manager);
        f.manager.quit_system(id, f.alice);

        assert_eq!(f.ledger.position_balances(eth_a(), handler), PositionBalances::default());
        assert_eq!(
            f.ledger.position_balances(eth_a(), f.alice),
            PositionBalances { locked_collateral: wad(10), generated_debt: wad(4) }
        );

        f.manager.enter_system(f.alice, id);

        assert_eq!(f.ledger.position_balances(eth_a(), f.alice), PositionBalances::default());
        assert_eq!(
            f.ledger.position_balances(eth_a(), handler),
            PositionBalances { locked_collateral: wad(10), generated_debt: wad(4) }
        );
        assert!(f.env.emitted(&f.manager, "SystemQuit"));
        assert!(f.env.emitted(&f.manager, "SystemEntered"));
    }

    #[test]
    fn test_quit_requires_handler_permission() {
        let mut f = setup();
        let id = funded_position(&mut f, wad(10), wad(4));

        f.env.set_caller(f.alice);
        assert_eq!(
            f.manager.try_quit_system(id, f.bob),
            Err(ManagerError::NotPermitted.into())
        );

        // bob lets alice move value into and out of his handler
        f.env.set_caller(f.bob);
        f.manager.allow_handler(f.alice, true);
        f.ledger.approve_modification(f.manager_address());

        f.env.set_caller(f.alice);
        f.manager.quit_system(id, f.bob);
        assert_eq!(
            f.ledger.position_balances(eth_a(), f.bob),
            PositionBalances { locked_collateral: wad(10), generated_debt: wad(4) }
        );
    }

    #[test]
    fn test_enter_requires_handler_permission() {
        let mut f = setup();
        let id = funded_position(&mut f, wad(10), wad(4));
        let handler = f.handler(id);
        let manager = f.manager_address();
        let bob = f.bob;

        // park the position under bob's account, where only bob may pull it back
        f.env.set_caller(bob);
        f.ledger.approve_modification(manager);
        f.manager.allow_handler(f.alice, true);
        f.env.set_caller(f.alice);
        f.manager.quit_system(id, bob);
        f.env.set_caller(bob);
        f.manager.allow_handler(f.alice, false);

        f.env.set_caller(f.alice);
        assert_eq!(
            f.manager.try_enter_system(bob, id),
            Err(ManagerError::NotPermitted.into())
        );
        assert_eq!(
            f.ledger.position_balances(eth_a(), bob),
            PositionBalances { locked_collateral: wad(10), generated_debt: wad(4) }
        );
        assert!(!f.env.emitted(&f.manager, "SystemEntered"));

        f.env.set_caller(bob);
        f.manager.allow_handler(f.alice, true);

        f.env.set_caller(f.alice);
        f.manager.enter_system(bob, id);
        assert_eq!(f.ledger.position_balances(eth_a(), bob), PositionBalances::default());
        assert_eq!(
            f.ledger.position_balances(eth_a(), handler),
            PositionBalances { locked_collateral: wad(10), generated_debt: wad(4) }
        );
        assert!(f.env.emitted(&f.manager, "SystemEntered"));
    }

    #[test]
    fn test_quit_and_enter_reject_null_handler() {
        let mut f = setup();
        let id = f.open_for(f.alice, eth_a());

        f.env.set_caller(f.alice);
        assert_eq!(
            f.manager.try_quit_system(id, null_address()),
            Err(ManagerError::InvalidAddress.into())
        );
        assert_eq!(
            f.manager.try_enter_system(null_address(), id),
            Err(ManagerError::InvalidAddress.into())
        );
    }

    #[test]
    fn test_move_position() {
        let mut f = setup();
        let src = funded_position(&mut f, wad(6), wad(2));
        let dst = f.open_for(f.alice, eth_a());

        f.env.set_caller(f.alice);
        f.manager.move_position(src, dst);

        assert_eq!(f.ledger.position_balances(eth_a(), f.handler(src)), PositionBalances::default());
        assert_eq!(
            f.ledger.position_balances(eth_a(), f.handler(dst)),
            PositionBalances { locked_collateral: wad(6), generated_debt: wad(2) }
        );
        assert!(f.env.emitted(&f.manager, "PositionMoved"));
    }

    #[test]
    fn test_move_position_type_mismatch() {
        let mut f = setup();
        let src = funded_position(&mut f, wad(6), wad(2));
        let dst = f.open_for(f.alice, eth_b());

        f.env.set_caller(f.alice);
        assert_eq!(
            f.manager.try_move_position(src, dst),
            Err(ManagerError::TypeMismatch.into())
        );
        assert_eq!(
            f.ledger.position_balances(eth_a(), f.handler(src)),
            PositionBalances { locked_collateral: wad(6), generated_debt: wad(2) }
        );
        assert_eq!(f.ledger.position_balances(eth_b(), f.handler(dst)), PositionBalances::default());
    }

    #[test]
    fn test_move_position_needs_both_permissions() {
        let mut f = setup();
        let src = funded_position(&mut f, wad(6), wad(2));
        let dst = f.open_for(f.bob, eth_a());

        f.env.set_caller(f.alice);
        assert_eq!(
            f.manager.try_move_position(src, dst),
            Err(ManagerError::NotPermitted.into())
        );

        f.env.set_caller(f.bob);
        f.manager.allow_position(dst, f.alice, true);
        f.env.set_caller(f.alice);
        f.manager.move_position(src, dst);
        assert_eq!(
            f.ledger.position_balances(eth_a(), f.handler(dst)),
            PositionBalances { locked_collateral: wad(6), generated_debt: wad(2) }
        );
    }
}

#[cfg(test)]
mod reward_tests {
    use super::fixtures::*;
    use cdp_manager_contracts::errors::ManagerError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_claim_defaults_beneficiary_to_caller() {
        let mut f = setup();
        let id = f.open_for(f.alice, eth_a());

        f.env.set_caller(f.alice);
        f.manager.claim_management_rewards(id, None);

        assert_eq!(f.distributor.claim_count(), 1);
        assert_eq!(f.distributor.claims_for(eth_a(), f.handler(id)), 1);
        assert_eq!(f.distributor.claims_for(eth_b(), f.handler(id)), 0);
        assert_eq!(f.distributor.last_beneficiary(), Some(f.alice));
        assert!(f.env.emitted(&f.manager, "ManagementRewardsClaimed"));
    }

    #[test]
    fn test_claim_to_explicit_beneficiary() {
        let mut f = setup();
        let id = f.open_for(f.alice, eth_a());

        f.env.set_caller(f.alice);
        f.manager.claim_management_rewards(id, Some(f.carol));
        assert_eq!(f.distributor.last_beneficiary(), Some(f.carol));
    }

    #[test]
    fn test_rejected_claim_emits_nothing() {
        let mut f = setup();
        let id = f.open_for(f.alice, eth_a());
        f.distributor.set_accept_claims(false);

        f.env.set_caller(f.alice);
        assert_eq!(
            f.manager.try_claim_management_rewards(id, None),
            Err(ManagerError::ClaimRejected.into())
        );
        assert_eq!(f.distributor.claim_count(), 0);
        assert!(!f.env.emitted(&f.manager, "ManagementRewardsClaimed"));
    }
}

#[cfg(test)]
mod admin_tests {
    use super::fixtures::*;
    use cdp_manager_contracts::errors::ManagerError;
    use odra::host::HostRef;
    use odra::prelude::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deployer_is_first_admin() {
        let f = setup();
        assert!(f.manager.is_authorized(f.admin));
        assert!(!f.manager.is_authorized(f.alice));
        assert_eq!(f.manager.authorized_count(), 1);
        assert_eq!(f.manager.reward_distributor(), Some(f.distributor.address().clone()));
    }

    #[test]
    fn test_add_and_remove_authorization() {
        let mut f = setup();
        f.env.set_caller(f.admin);
        f.manager.add_authorization(f.alice);
        assert!(f.manager.is_authorized(f.alice));
        assert_eq!(f.manager.authorized_count(), 2);

        f.env.set_caller(f.alice);
        f.manager.remove_authorization(f.admin);
        assert!(!f.manager.is_authorized(f.admin));
        assert_eq!(
            f.manager.try_remove_authorization(f.alice),
            Err(ManagerError::LastAuthorization.into())
        );
        assert!(f.env.emitted(&f.manager, "AuthorizationRemoved"));
    }

    #[test]
    fn test_non_admin_cannot_configure() {
        let mut f = setup();
        f.env.set_caller(f.alice);
        assert_eq!(
            f.manager.try_add_authorization(f.alice),
            Err(ManagerError::NotAuthorized.into())
        );
        assert_eq!(
            f.manager.try_set_reward_distributor(f.alice),
            Err(ManagerError::NotAuthorized.into())
        );
    }

    #[test]
    fn test_unrecognized_parameter() {
        let mut f = setup();
        f.env.set_caller(f.admin);
        assert_eq!(
            f.manager.try_modify_parameters(String::from("oracle"), f.alice),
            Err(ManagerError::UnrecognizedParameter.into())
        );

        f.manager.modify_parameters(String::from("reward_distributor"), f.bob);
        assert_eq!(f.manager.reward_distributor(), Some(f.bob));
        assert!(f.env.emitted(&f.manager, "ParametersModified"));
    }
}

#[cfg(test)]
mod reentrancy_tests {
    use super::fixtures::*;
    use cdp_manager_contracts::errors::ManagerError;
    use cdp_manager_contracts::mocks::ReentrantLedgerEngine;
    use cdp_manager_contracts::position_manager::{PositionManager, PositionManagerInitArgs};
    use odra::host::{Deployer, HostRef, NoArgs};
    use odra::prelude::Addressable;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_engine_callback_cannot_reenter_open() {
        let env = odra_test::env();
        let alice = env.get_account(1);
        let engine = ReentrantLedgerEngine::deploy(&env, NoArgs);
        let mut manager = PositionManager::deploy(
            &env,
            PositionManagerInitArgs {
                ledger_engine: engine.address().clone(),
            },
        );

        env.set_caller(alice);
        assert_eq!(
            manager.try_open(eth_a(), alice),
            Err(ManagerError::ReentrantCall.into())
        );
        assert_eq!(manager.last_position_id(), 0);
        assert!(manager.positions_of(alice, 10).is_empty());
        assert_eq!(engine.calls(), 0);
        assert!(!env.emitted(&manager, "PositionOpened"));
    }
}
