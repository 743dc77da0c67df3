use crate::{JackpotError, Result};
use chrono::{DateTime, Duration, Utc};
use jackpot_core::Address;
use serde::{Deserialize, Serialize};

/// Live references to the external token and pricing venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependencies {
    pub token: Address,
    pub market: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingChange {
    pub new_token: Address,
    pub new_market: Address,
    pub requested_at: DateTime<Utc>,
}

impl PendingChange {
    pub fn executable_at(&self, delay: Duration) -> DateTime<Utc> {
        self.requested_at + delay
    }
}

/// Single-slot delayed swap of the token and venue references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceTimelock {
    pending: Option<PendingChange>,
}

impl GovernanceTimelock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<&PendingChange> {
        self.pending.as_ref()
    }

    /// Fields left unspecified keep the current reference.
    pub fn request(
        &mut self,
        current: &Dependencies,
        new_token: Option<Address>,
        new_market: Option<Address>,
        now: DateTime<Utc>,
    ) -> Result<&PendingChange> {
        if self.pending.is_some() {
            return Err(JackpotError::ChangeAlreadyPending);
        }

        let change = PendingChange {
            new_token: new_token.unwrap_or(current.token),
            new_market: new_market.unwrap_or(current.market),
            requested_at: now,
        };
        if change.new_token.is_zero() || change.new_market.is_zero() {
            return Err(JackpotError::invalid("dependency reference cannot be zero"));
        }

        Ok(self.pending.insert(change))
    }

    /// Removes and returns the pending change once `delay` has elapsed.
    pub fn execute(&mut self, now: DateTime<Utc>, delay: Duration) -> Result<PendingChange> {
        let change = self.pending.as_ref().ok_or(JackpotError::NoPendingChange)?;

        let ready_at = change.executable_at(delay);
        if now < ready_at {
            return Err(JackpotError::TimelockActive {
                remaining_secs: (ready_at - now).num_seconds(),
            });
        }

        self.pending.take().ok_or(JackpotError::NoPendingChange)
    }

    pub fn cancel(&mut self) -> Result<PendingChange> {
        self.pending.take().ok_or(JackpotError::NoPendingChange)
    }
}
