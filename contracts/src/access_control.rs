//! Authorization table
//!
//! Set of accounts allowed to change the manager's global configuration.
//! The account that deploys the manager becomes the first member.

use odra::prelude::*;
use crate::errors::ManagerError;
use crate::events::{AuthorizationAdded, AuthorizationRemoved};
use crate::math::{checked_add, checked_sub};

/// Authorized accounts, embedded in the manager as a submodule
#[odra::module]
pub struct AuthorizationTable {
    /// account -> authorized
    authorized: Mapping<Address, bool>,
    /// Number of authorized accounts
    count: Var<u32>,
}

#[odra::module]
impl AuthorizationTable {
    /// Make `initial` the first authorized account. No-op once the table has members.
    pub fn bootstrap(&mut self, initial: Address) {
        if self.count() > 0 {
            return;
        }
        self.set_internal(initial, true);
    }

    pub fn is_authorized(&self, account: Address) -> bool {
        self.authorized.get(&account).unwrap_or(false)
    }

    pub fn count(&self) -> u32 {
        self.count.get().unwrap_or(0)
    }

    /// Grant `account` (caller must be authorized).
    pub fn add(&mut self, account: Address) {
        self.require_authorized();

        if self.is_authorized(account) {
            return;
        }
        self.set_internal(account, true);
    }

    /// Revoke `account` (caller must be authorized).
    pub fn remove(&mut self, account: Address) {
        self.require_authorized();

        if !self.is_authorized(account) {
            return;
        }
        // Prevent removing the last authorized account
        if self.count() <= 1 {
            self.env().revert(ManagerError::LastAuthorization);
        }
        self.set_internal(account, false);
    }

    /// Revert unless the caller is authorized.
    pub fn require_authorized(&self) {
        if !self.is_authorized(self.env().caller()) {
            self.env().revert(ManagerError::NotAuthorized);
        }
    }

    fn set_internal(&mut self, account: Address, value: bool) {
        let count = self.count();
        let updated = if value {
            checked_add(count as u64, 1)
        } else {
            checked_sub(count as u64, 1)
        };
        let updated = match updated {
            Ok(c) if c <= u32::MAX as u64 => c as u32,
            Ok(_) => self.env().revert(ManagerError::Overflow),
            Err(e) => self.env().revert(e),
        };

        self.authorized.set(&account, value);
        self.count.set(updated);

        if value {
            self.env().emit_event(AuthorizationAdded { account });
        } else {
            self.env().emit_event(AuthorizationRemoved { account });
        }
    }
}
