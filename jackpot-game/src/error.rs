use jackpot_core::{Address, CallError, Role, SplitError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, JackpotError>;

/// Broad failure categories surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authorization,
    State,
    ArithmeticInvariant,
    ExternalCall,
}

#[derive(Error, Debug)]
pub enum JackpotError {
    #[error("Game is paused")]
    Paused,

    #[error("{principal} lacks the {role} role")]
    MissingRole { principal: Address, role: Role },

    #[error("Operation re-entered while another is in progress")]
    Reentrancy,

    #[error("No active commitment for {0}")]
    NoCommitment(Address),

    #[error("Reveal too early: ready at confirmation {ready_at}, current {current}")]
    RevealTooEarly { ready_at: u64, current: u64 },

    #[error("Revealed guess and nonce do not match the commitment")]
    CommitmentMismatch,

    #[error("No hints available")]
    NoHints,

    #[error("Hint index {index} out of range ({count} hints)")]
    HintOutOfRange { index: u64, count: u64 },

    #[error("A dependency change is already pending")]
    ChangeAlreadyPending,

    #[error("No dependency change is pending")]
    NoPendingChange,

    #[error("Dependency change not ready: {remaining_secs}s remaining")]
    TimelockActive { remaining_secs: i64 },

    #[error("Accumulated fees must be settled before swapping the token")]
    UnsettledFees,

    #[error("Game is not paused")]
    NotPaused,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid split: {0}")]
    InvalidSplit(#[from] SplitError),

    #[error("Arithmetic overflow in {0}")]
    Overflow(&'static str),

    #[error("Pools of {allocated} exceed held balance of {held}")]
    Undercollateralized { allocated: u128, held: u128 },

    #[error("Insufficient balance for payout: need {need}, have {available}")]
    InsufficientBalance { need: u128, available: u128 },

    #[error("External call failed: {0}")]
    ExternalCall(#[from] CallError),
}

impl JackpotError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Paused | Self::MissingRole { .. } => ErrorKind::Authorization,
            Self::InvalidSplit(_) | Self::Overflow(_) | Self::Undercollateralized { .. } => {
                ErrorKind::ArithmeticInvariant
            }
            Self::InsufficientBalance { .. } | Self::ExternalCall(_) => ErrorKind::ExternalCall,
            Self::Reentrancy
            | Self::NoCommitment(_)
            | Self::RevealTooEarly { .. }
            | Self::CommitmentMismatch
            | Self::NoHints
            | Self::HintOutOfRange { .. }
            | Self::ChangeAlreadyPending
            | Self::NoPendingChange
            | Self::TimelockActive { .. }
            | Self::UnsettledFees
            | Self::NotPaused
            | Self::InvalidParameter(_) => ErrorKind::State,
        }
    }
}
