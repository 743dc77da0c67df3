//! Jackpot pool accounting.
//!
//! Two native-currency pools are tracked: the current jackpot and the
//! rollover pool that seeds the jackpot after the next win. Fee tokens
//! collected from players accumulate until a batch liquidates them and
//! spreads the proceeds across the pools and the marketing wallet.
//!
//! Everything here is pure bookkeeping. Calls to the token, venue and vault
//! are made by the engine around these methods.

use crate::{JackpotError, Result};
use chrono::{DateTime, Duration, Utc};
use jackpot_core::config::{RESEED_SHARE_PCT, ROLLOVER_SHARE_PCT, WINNER_SHARE_PCT};
use jackpot_core::{NativeAmount, SplitConfig, TokenAmount};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JackpotState {
    pub jackpot_amount: NativeAmount,
    pub next_jackpot_amount: NativeAmount,
    /// Fee tokens awaiting liquidation.
    pub accumulated_fees: TokenAmount,
    pub last_batch_time: DateTime<Utc>,
}

/// Pool movement caused by a win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rotation {
    pub payout: NativeAmount,
    pub jackpot: NativeAmount,
    pub next_jackpot: NativeAmount,
}

/// Winner takes 90% of the current pool; 90% of the rollover pool moves up
/// behind the remaining 10% and the rollover pool is reseeded at 10%.
pub fn rotate_pools(jackpot: NativeAmount, next_jackpot: NativeAmount) -> Result<Rotation> {
    let payout = jackpot
        .percent(WINNER_SHARE_PCT)
        .ok_or(JackpotError::Overflow("payout"))?;
    let remainder = jackpot
        .checked_sub(payout)
        .ok_or(JackpotError::Overflow("jackpot remainder"))?;
    let rollover = next_jackpot
        .percent(ROLLOVER_SHARE_PCT)
        .ok_or(JackpotError::Overflow("rollover"))?;
    let reseeded = next_jackpot
        .percent(RESEED_SHARE_PCT)
        .ok_or(JackpotError::Overflow("reseed"))?;

    Ok(Rotation {
        payout,
        jackpot: remainder
            .checked_add(rollover)
            .ok_or(JackpotError::Overflow("jackpot"))?,
        next_jackpot: reseeded,
    })
}

/// Token side of a batch: what is destroyed and what is sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchPlan {
    pub total: TokenAmount,
    pub burn: TokenAmount,
    pub to_sell: TokenAmount,
}

/// Burn is taken from the raw fee total, before any sale.
pub fn plan_batch(total: TokenAmount, split: &SplitConfig) -> Result<BatchPlan> {
    let burn = total
        .percent(split.burn_pct)
        .ok_or(JackpotError::Overflow("burn amount"))?;
    let to_sell = total
        .checked_sub(burn)
        .ok_or(JackpotError::Overflow("sell amount"))?;
    Ok(BatchPlan {
        total,
        burn,
        to_sell,
    })
}

/// Native side of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProceedsSplit {
    pub jackpot_share: NativeAmount,
    pub next_jackpot_share: NativeAmount,
    pub marketing_share: NativeAmount,
    /// Rounding dust already folded into `jackpot_share`.
    pub remainder: NativeAmount,
}

impl ProceedsSplit {
    pub fn total(&self) -> Option<NativeAmount> {
        self.jackpot_share
            .checked_add(self.next_jackpot_share)?
            .checked_add(self.marketing_share)
    }
}

/// Renormalizes the non-burn percentages over themselves and hands any
/// rounding dust to the jackpot, so the shares always sum to `received`.
pub fn split_proceeds(received: NativeAmount, split: &SplitConfig) -> Result<ProceedsSplit> {
    let non_burn = split.non_burn_pct() as u128;
    if non_burn == 0 {
        return Err(JackpotError::InvalidSplit(
            jackpot_core::SplitError::NoProceedsRecipient,
        ));
    }

    let share = |pct: u8| {
        received
            .mul_div(pct as u128, non_burn)
            .ok_or(JackpotError::Overflow("proceeds share"))
    };
    let mut jackpot_share = share(split.jackpot_pct)?;
    let next_jackpot_share = share(split.next_jackpot_pct)?;
    let marketing_share = share(split.marketing_pct)?;

    let distributed = jackpot_share
        .checked_add(next_jackpot_share)
        .and_then(|sum| sum.checked_add(marketing_share))
        .ok_or(JackpotError::Overflow("distributed proceeds"))?;
    let remainder = received.saturating_sub(distributed);
    if !remainder.is_zero() {
        jackpot_share = jackpot_share
            .checked_add(remainder)
            .ok_or(JackpotError::Overflow("jackpot share"))?;
    }

    Ok(ProceedsSplit {
        jackpot_share,
        next_jackpot_share,
        marketing_share,
        remainder,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasuryAccountant {
    state: JackpotState,
}

impl TreasuryAccountant {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            state: JackpotState {
                jackpot_amount: NativeAmount::ZERO,
                next_jackpot_amount: NativeAmount::ZERO,
                accumulated_fees: TokenAmount::ZERO,
                last_batch_time: now,
            },
        }
    }

    pub fn state(&self) -> &JackpotState {
        &self.state
    }

    pub fn fund(&mut self, amount: NativeAmount) -> Result<()> {
        if amount.is_zero() {
            return Err(JackpotError::invalid("funding amount must be positive"));
        }
        self.state.jackpot_amount = self
            .state
            .jackpot_amount
            .checked_add(amount)
            .ok_or(JackpotError::Overflow("jackpot"))?;
        Ok(())
    }

    pub fn accrue(&mut self, fee: TokenAmount) -> Result<()> {
        self.state.accumulated_fees = self
            .state
            .accumulated_fees
            .checked_add(fee)
            .ok_or(JackpotError::Overflow("accumulated fees"))?;
        Ok(())
    }

    /// Native currency owed to the pools.
    pub fn allocated(&self) -> Result<NativeAmount> {
        self.state
            .jackpot_amount
            .checked_add(self.state.next_jackpot_amount)
            .ok_or(JackpotError::Overflow("allocated pools"))
    }

    pub fn ensure_backed(&self, held: NativeAmount) -> Result<()> {
        let allocated = self.allocated()?;
        if held < allocated {
            return Err(JackpotError::Undercollateralized {
                allocated: allocated.get(),
                held: held.get(),
            });
        }
        Ok(())
    }

    /// Applies the win rotation and returns the amount owed to the winner.
    pub fn apply_win(&mut self) -> Result<Rotation> {
        let rotation = rotate_pools(self.state.jackpot_amount, self.state.next_jackpot_amount)?;
        self.state.jackpot_amount = rotation.jackpot;
        self.state.next_jackpot_amount = rotation.next_jackpot;
        Ok(rotation)
    }

    pub fn batch_due(&self, now: DateTime<Utc>, interval_minutes: u64) -> bool {
        if interval_minutes == 0 || self.state.accumulated_fees.is_zero() {
            return false;
        }
        i64::try_from(interval_minutes)
            .ok()
            .and_then(Duration::try_minutes)
            .and_then(|interval| self.state.last_batch_time.checked_add_signed(interval))
            .map_or(false, |due| now >= due)
    }

    pub fn take_fees(&mut self) -> TokenAmount {
        std::mem::take(&mut self.state.accumulated_fees)
    }

    pub fn credit(&mut self, proceeds: &ProceedsSplit) -> Result<()> {
        self.state.jackpot_amount = self
            .state
            .jackpot_amount
            .checked_add(proceeds.jackpot_share)
            .ok_or(JackpotError::Overflow("jackpot"))?;
        self.state.next_jackpot_amount = self
            .state
            .next_jackpot_amount
            .checked_add(proceeds.next_jackpot_share)
            .ok_or(JackpotError::Overflow("next jackpot"))?;
        Ok(())
    }

    pub fn mark_batch(&mut self, now: DateTime<Utc>) {
        self.state.last_batch_time = now;
    }
}
