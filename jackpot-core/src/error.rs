use crate::types::Address;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Result returned by external collaborators.
pub type CallResult<T> = std::result::Result<T, CallError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid hex value: {0}")]
    InvalidHex(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Failure reported by a collaborator outside the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    #[error("{collaborator} rejected the call: {reason}")]
    Rejected {
        collaborator: &'static str,
        reason: String,
    },

    #[error("Insufficient balance for {account}: need {need}, have {available}")]
    InsufficientBalance {
        account: Address,
        need: u128,
        available: u128,
    },

    #[error("Insufficient allowance for {spender}: need {need}, approved {approved}")]
    InsufficientAllowance {
        spender: Address,
        need: u128,
        approved: u128,
    },

    #[error("No contract deployed at {0}")]
    UnknownContract(Address),
}

impl CallError {
    pub fn rejected(collaborator: &'static str, reason: impl Into<String>) -> Self {
        Self::Rejected {
            collaborator,
            reason: reason.into(),
        }
    }
}
