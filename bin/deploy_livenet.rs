//! Deploy the position manager to Casper livenet/testnet using Odra livenet environment.
//!
//! Usage:
//!   cargo run --bin deploy_livenet --release
//!
//! Requires .env file with:
//!   ODRA_CASPER_LIVENET_SECRET_KEY_PATH=/path/to/secret_key.pem
//!   ODRA_CASPER_LIVENET_NODE_ADDRESS=https://node.testnet.casper.network
//!   ODRA_CASPER_LIVENET_CHAIN_NAME=casper-test
//!   ODRA_CASPER_LIVENET_PAYMENT_AMOUNT=200000000000
//!
//! Optional:
//!   CDP_MANAGER_LEDGER_ENGINE=hash-...        (mock ledger engine deployed if unset)
//!   CDP_MANAGER_REWARD_DISTRIBUTOR=hash-...   (mock reward distributor deployed if unset)

use odra::host::{Deployer, HostRef, NoArgs};
use odra::prelude::*;

use cdp_manager_contracts::mocks::{
    MockLedgerEngine, MockRewardDistributor, MockRewardDistributorInitArgs,
};
use cdp_manager_contracts::position_manager::{PositionManager, PositionManagerInitArgs};

/// Read a contract address from the environment, if set and well formed.
fn address_from_env(key: &str) -> Option<Address> {
    let raw = std::env::var(key).ok()?;
    match raw.parse::<Address>() {
        Ok(address) => Some(address),
        Err(_) => {
            println!("Ignoring {}: not a valid address ({})", key, raw);
            None
        }
    }
}

fn main() {
    // Load environment from .env file
    dotenv::dotenv().ok();

    println!("=== CDP Position Manager Livenet Deployment ===");
    println!();

    let env = odra_casper_livenet_env::env();

    // Configure payment amount for deployments/calls (required for Casper 2.0 txs)
    let payment_amount: u64 = std::env::var("ODRA_CASPER_LIVENET_PAYMENT_AMOUNT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(200_000_000_000);
    env.set_gas(payment_amount);

    let deployer = env.caller();
    println!("Deployer: {:?}", deployer);
    println!();

    // ==================== Phase 1: Collaborators ====================
    println!("=== Phase 1: Ledger Engine and Reward Distributor ===");
    println!();

    let ledger_engine = match address_from_env("CDP_MANAGER_LEDGER_ENGINE") {
        Some(address) => {
            println!("Using ledger engine at: {:?}", address);
            address
        }
        None => {
            println!("Deploying MockLedgerEngine...");
            let ledger = MockLedgerEngine::deploy(&env, NoArgs);
            println!("MockLedgerEngine deployed at: {:?}", ledger.address().clone());
            ledger.address().clone()
        }
    };

    let reward_distributor = match address_from_env("CDP_MANAGER_REWARD_DISTRIBUTOR") {
        Some(address) => {
            println!("Using reward distributor at: {:?}", address);
            address
        }
        None => {
            println!("Deploying MockRewardDistributor...");
            let distributor = MockRewardDistributor::deploy(
                &env,
                MockRewardDistributorInitArgs { accept_claims: true },
            );
            println!("MockRewardDistributor deployed at: {:?}", distributor.address().clone());
            distributor.address().clone()
        }
    };
    println!();

    // ==================== Phase 2: Position Manager ====================
    println!("=== Phase 2: Position Manager ===");
    println!();

    println!("Deploying PositionManager...");
    let mut manager = PositionManager::deploy(&env, PositionManagerInitArgs { ledger_engine });
    let manager_addr = manager.address().clone();
    println!("PositionManager deployed at: {:?}", manager_addr);

    println!("Configuring PositionManager -> RewardDistributor link...");
    manager.set_reward_distributor(reward_distributor);
    println!("Done.");

    println!();
    println!("=== Deployment Complete ===");
    println!();
    println!("Contract Addresses:");
    println!("  LedgerEngine:       {:?}", ledger_engine);
    println!("  RewardDistributor:  {:?}", reward_distributor);
    println!("  PositionManager:    {:?}", manager_addr);
}
