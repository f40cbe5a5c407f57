//! CDP Position Manager Contracts
//!
//! Registry of collateralized debt positions in front of a ledger engine.
//!
//! ## Architecture
//!
//! - **PositionManager**: Opens positions, tracks owners, gates every mutation
//! - **AuthorizationTable**: Accounts allowed to change global configuration
//! - **Owner index**: Per-owner doubly linked list of position ids
//! - **Permissions**: Position-level and handler-level delegation predicate
//! - **Ledger**: Cross-contract calls into the ledger engine and reward distributor
//! - **Mocks**: Ledger engine and reward distributor test doubles
//!
//! ## Permissions
//!
//! A position can be acted on by its owner or by an account the owner allowed
//! for that position. Moving value into or out of a handler additionally needs
//! the handler itself or an account the handler allowed.

#![cfg_attr(target_arch = "wasm32", no_std)]

#[cfg(target_arch = "wasm32")]
extern crate alloc;

// Re-export odra for downstream usage
pub use odra;

// Core module declarations
pub mod types;
pub mod errors;
pub mod events;
pub mod math;
pub mod owner_index;
pub mod permissions;
pub mod ledger;

// Contract modules
pub mod access_control;
pub mod position_manager;
pub mod mocks;
