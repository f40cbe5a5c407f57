//! Position manager error definitions.

use odra::prelude::*;

/// Position manager errors
#[repr(u16)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ManagerError {
    // Authorization errors (1xx)
    NotAuthorized = 100,
    NotPermitted = 101,
    LastAuthorization = 102,
    ReentrantCall = 103,

    // Position errors (2xx)
    InvalidAddress = 200,
    TypeMismatch = 201,
    PositionNotFound = 202,
    InvalidCollateralType = 203,

    // Arithmetic errors (3xx)
    Overflow = 300,
    Underflow = 301,
    SignOverflow = 302,

    // Configuration errors (4xx)
    UnrecognizedParameter = 400,
    RewardDistributorNotSet = 401,

    // External collaborator errors (5xx)
    ClaimRejected = 500,
    InsufficientBalance = 501,
}

impl ManagerError {
    pub const fn message(&self) -> &'static str {
        match self {
            // Authorization
            ManagerError::NotAuthorized => "Unauthorized: caller is not an authorized account",
            ManagerError::NotPermitted => "Not permitted: caller may not act on this position or handler",
            ManagerError::LastAuthorization => "Cannot remove the last authorized account",
            ManagerError::ReentrantCall => "Reentrant call into the position manager",

            // Position
            ManagerError::InvalidAddress => "Invalid address: null or current owner",
            ManagerError::TypeMismatch => "Collateral types differ",
            ManagerError::PositionNotFound => "Position not found",
            ManagerError::InvalidCollateralType => "Collateral type symbol longer than 32 bytes",

            // Arithmetic
            ManagerError::Overflow => "Arithmetic overflow",
            ManagerError::Underflow => "Arithmetic underflow",
            ManagerError::SignOverflow => "Value does not fit in a signed amount",

            // Configuration
            ManagerError::UnrecognizedParameter => "Unrecognized parameter",
            ManagerError::RewardDistributorNotSet => "Reward distributor not set",

            // External
            ManagerError::ClaimRejected => "Reward distributor rejected the claim",
            ManagerError::InsufficientBalance => "Ledger: insufficient balance",
        }
    }
}

impl core::fmt::Display for ManagerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

impl From<ManagerError> for OdraError {
    fn from(error: ManagerError) -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            OdraError::user(error as u16)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            OdraError::user(error as u16, error.message())
        }
    }
}
