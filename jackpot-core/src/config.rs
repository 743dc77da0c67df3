use crate::error::{CoreError, Result};
use crate::types::TokenAmount;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base units per whole fee token.
pub const TOKEN_UNIT: u128 = 1_000_000_000_000_000_000;

/// Share of the current pool handed to a winner.
pub const WINNER_SHARE_PCT: u8 = 90;

/// Share of the rollover pool carried into the new current pool after a win.
pub const ROLLOVER_SHARE_PCT: u8 = 90;

/// Share of the rollover pool kept as the reseeded rollover pool after a win.
pub const RESEED_SHARE_PCT: u8 = 10;

/// Delay between requesting and executing a dependency swap.
pub const GOVERNANCE_DELAY_SECS: i64 = 2 * 24 * 60 * 60;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SplitError {
    #[error("split percentages must sum to 100, got {0}")]
    BadTotal(u16),

    #[error("jackpot, rollover and marketing percentages sum to zero")]
    NoProceedsRecipient,
}

/// How a settled fee batch is divided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitConfig {
    pub burn_pct: u8,
    pub jackpot_pct: u8,
    pub next_jackpot_pct: u8,
    pub marketing_pct: u8,
}

impl SplitConfig {
    pub fn new(burn_pct: u8, jackpot_pct: u8, next_jackpot_pct: u8, marketing_pct: u8) -> Self {
        Self {
            burn_pct,
            jackpot_pct,
            next_jackpot_pct,
            marketing_pct,
        }
    }

    pub fn total(&self) -> u16 {
        self.burn_pct as u16
            + self.jackpot_pct as u16
            + self.next_jackpot_pct as u16
            + self.marketing_pct as u16
    }

    /// Sum of the shares that receive sale proceeds.
    pub fn non_burn_pct(&self) -> u16 {
        self.jackpot_pct as u16 + self.next_jackpot_pct as u16 + self.marketing_pct as u16
    }

    pub fn validate(&self) -> std::result::Result<(), SplitError> {
        let total = self.total();
        if total != 100 {
            return Err(SplitError::BadTotal(total));
        }
        if self.non_burn_pct() == 0 {
            return Err(SplitError::NoProceedsRecipient);
        }
        Ok(())
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self::new(30, 45, 15, 10)
    }
}

/// Tunables an operator may change at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub guess_cost: TokenAmount,
    pub hint_cost: TokenAmount,
    /// Confirmation units between commit and reveal.
    pub reveal_delay: u64,
    /// Zero disables batch settlement.
    pub batch_interval_minutes: u64,
    pub split: SplitConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            guess_cost: TokenAmount::new(100 * TOKEN_UNIT),
            hint_cost: TokenAmount::new(50 * TOKEN_UNIT),
            reveal_delay: 1,
            batch_interval_minutes: 60,
            split: SplitConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn validate(&self, settings: &EngineSettings) -> Result<()> {
        self.split
            .validate()
            .map_err(|e| CoreError::config(e.to_string()))?;

        if self.reveal_delay < settings.min_reveal_delay {
            return Err(CoreError::config(format!(
                "reveal delay {} is below the minimum of {}",
                self.reveal_delay, settings.min_reveal_delay
            )));
        }

        Ok(())
    }
}

/// Deployment-time constants of an engine instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    pub min_reveal_delay: u64,
    pub governance_delay_secs: i64,
    /// Fee totals at or above this amount are announced as large batches.
    pub large_batch_threshold: TokenAmount,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            min_reveal_delay: 1,
            governance_delay_secs: GOVERNANCE_DELAY_SECS,
            large_batch_threshold: TokenAmount::new(10_000 * TOKEN_UNIT),
        }
    }
}

impl EngineSettings {
    pub fn validate(&self) -> Result<()> {
        if self.min_reveal_delay == 0 {
            return Err(CoreError::config(
                "Minimum reveal delay must be at least one confirmation",
            ));
        }

        if self.governance_delay_secs <= 0 {
            return Err(CoreError::config("Governance delay must be positive"));
        }

        Ok(())
    }
}
