//! Commit-reveal jackpot engine
//!
//! Players pay a fee token to commit to a hidden guess of the operator's
//! secret word and reveal it a few confirmations later. A correct reveal
//! wins 90% of the native-currency jackpot. Collected fees are periodically
//! burned in part, sold for native currency and spread across the jackpot,
//! the rollover pool and a marketing wallet.

pub mod commitment;
pub mod engine;
pub mod error;
pub mod events;
pub mod gate;
pub mod hints;
pub mod ledger;
pub mod state;
pub mod stats;
pub mod timelock;
pub mod treasury;

#[cfg(test)]
mod tests;

pub use commitment::{generate_nonce, guess_commitment, CommitmentScheme, SecretCommitment, Sha256Scheme};
pub use engine::{BatchReport, CallContext, JackpotGame, RevealOutcome};
pub use error::{ErrorKind, JackpotError, Result};
pub use events::{AnnouncementKind, EventBuffer, GameEvent, Notifier, TracingNotifier};
pub use hints::Hint;
pub use ledger::{PlayerCommitment, PlayerStats};
pub use state::{Deployment, GameState};
pub use stats::{GlobalStats, JackpotInfo};
pub use timelock::{Dependencies, PendingChange};
pub use treasury::{BatchPlan, JackpotState, ProceedsSplit};
