use crate::commitment::guess_commitment;
use crate::stats::GlobalStats;
use crate::{JackpotError, Result};
use jackpot_core::{Address, Bytes32};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An outstanding, unrevealed guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerCommitment {
    pub hash: Bytes32,
    /// Confirmation unit in which the commit landed.
    pub confirmation: u64,
    /// Secret epoch the guess was made against.
    pub secret_epoch: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub guess_count: u64,
    pub has_played: bool,
    pub hints_bought: u64,
    pub wins: u64,
}

#[derive(Debug, Clone)]
pub struct CommitReceipt {
    /// Global sequence number of this guess.
    pub guess_number: u64,
    pub first_play: bool,
    /// Unrevealed commitment discarded by this one. Its fee is not refunded.
    pub replaced: Option<PlayerCommitment>,
}

/// Conditions a reveal is checked against.
#[derive(Debug, Clone, Copy)]
pub struct RevealWindow {
    pub current_confirmation: u64,
    pub reveal_delay: u64,
}

/// Per-player commit-reveal state and play statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessLedger {
    commitments: BTreeMap<Address, PlayerCommitment>,
    players: BTreeMap<Address, PlayerStats>,
}

impl GuessLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commitment(&self, player: &Address) -> Option<&PlayerCommitment> {
        self.commitments.get(player)
    }

    pub fn player(&self, player: &Address) -> Option<&PlayerStats> {
        self.players.get(player)
    }

    pub fn outstanding(&self) -> usize {
        self.commitments.len()
    }

    /// Stores `commitment` for `player`, overwriting any earlier one.
    pub fn record_commit(
        &mut self,
        player: Address,
        commitment: PlayerCommitment,
        stats: &mut GlobalStats,
    ) -> Result<CommitReceipt> {
        let guess_number = stats
            .total_guesses
            .checked_add(1)
            .ok_or(JackpotError::Overflow("total guesses"))?;

        let entry = self.players.entry(player).or_default();
        entry.guess_count = entry
            .guess_count
            .checked_add(1)
            .ok_or(JackpotError::Overflow("player guesses"))?;

        let first_play = !entry.has_played;
        if first_play {
            entry.has_played = true;
            stats.unique_players = stats
                .unique_players
                .checked_add(1)
                .ok_or(JackpotError::Overflow("unique players"))?;
        }
        stats.total_guesses = guess_number;

        let replaced = self.commitments.insert(player, commitment);
        if replaced.is_some() {
            tracing::debug!("Player {} replaced an unrevealed commitment", player);
        }

        Ok(CommitReceipt {
            guess_number,
            first_play,
            replaced,
        })
    }

    /// Verifies a reveal and removes the commitment it consumes.
    pub fn consume(
        &mut self,
        player: &Address,
        guess: &str,
        nonce: &Bytes32,
        window: RevealWindow,
    ) -> Result<PlayerCommitment> {
        let commitment = self
            .commitments
            .get(player)
            .ok_or(JackpotError::NoCommitment(*player))?;

        let ready_at = commitment
            .confirmation
            .saturating_add(window.reveal_delay);
        if window.current_confirmation < ready_at {
            return Err(JackpotError::RevealTooEarly {
                ready_at,
                current: window.current_confirmation,
            });
        }

        if guess_commitment(guess, nonce) != commitment.hash {
            return Err(JackpotError::CommitmentMismatch);
        }

        self.commitments
            .remove(player)
            .ok_or(JackpotError::NoCommitment(*player))
    }

    pub fn record_hint(&mut self, player: Address) -> Result<()> {
        let entry = self.players.entry(player).or_default();
        entry.hints_bought = entry
            .hints_bought
            .checked_add(1)
            .ok_or(JackpotError::Overflow("player hints"))?;
        Ok(())
    }

    pub fn record_win(&mut self, player: Address) -> Result<()> {
        let entry = self.players.entry(player).or_default();
        entry.wins = entry
            .wins
            .checked_add(1)
            .ok_or(JackpotError::Overflow("player wins"))?;
        Ok(())
    }
}
