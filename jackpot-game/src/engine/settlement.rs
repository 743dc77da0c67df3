use super::{CallContext, JackpotGame, Tx};
use crate::events::{AnnouncementKind, GameEvent};
use crate::treasury::{plan_batch, split_proceeds, BatchPlan, ProceedsSplit};
use crate::{JackpotError, Result};
use chrono::{DateTime, Utc};
use jackpot_core::{Host, NativeAmount, SplitError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub plan: BatchPlan,
    pub received: NativeAmount,
    pub proceeds: ProceedsSplit,
}

impl<H: Host> JackpotGame<H> {
    /// Rotates the pools and pays the winner. Pools and statistics are
    /// updated before value leaves the vault.
    pub(crate) fn settle_win(&self, ctx: &CallContext, guess: &str, tx: &mut Tx) -> Result<NativeAmount> {
        let rotation = self.with_state(|s| {
            let rotation = s.treasury.apply_win()?;
            s.stats.total_winners = s
                .stats
                .total_winners
                .checked_add(1)
                .ok_or(JackpotError::Overflow("total winners"))?;
            s.stats.total_payouts = s
                .stats
                .total_payouts
                .checked_add(rotation.payout)
                .ok_or(JackpotError::Overflow("total payouts"))?;
            s.stats.last_winner = Some(ctx.caller);
            s.stats.last_win_time = Some(ctx.now);
            s.ledger.record_win(ctx.caller)?;
            Ok::<_, JackpotError>(rotation)
        })?;

        let held = self.host.held_balance();
        if held < rotation.payout {
            return Err(JackpotError::InsufficientBalance {
                need: rotation.payout.get(),
                available: held.get(),
            });
        }

        if !rotation.payout.is_zero() {
            self.host.pay(&ctx.caller, rotation.payout)?;
        }

        let held = self.host.held_balance();
        self.read(|s| s.treasury.ensure_backed(held))?;

        tracing::info!(
            "Jackpot won by {}: paid {}, new jackpot {}, rollover {}",
            ctx.caller,
            rotation.payout,
            rotation.jackpot,
            rotation.next_jackpot
        );
        tx.emit(GameEvent::JackpotWon {
            winner: ctx.caller,
            amount: rotation.payout,
            guess: guess.to_string(),
        });
        tx.emit(GameEvent::announce(
            AnnouncementKind::JackpotWon,
            format!(
                "{} cracked the secret word '{}' and won {}!",
                ctx.caller, guess, rotation.payout
            ),
        ));

        Ok(rotation.payout)
    }

    /// Settles accumulated fees when the batch interval has elapsed.
    pub(crate) fn maybe_process_batch(
        &self,
        now: DateTime<Utc>,
        tx: &mut Tx,
    ) -> Result<Option<BatchReport>> {
        let due = self.read(|s| s.treasury.batch_due(now, s.config.batch_interval_minutes));
        if !due {
            return Ok(None);
        }
        self.process_batch(now, tx)
    }

    /// Burns, liquidates and distributes all accumulated fees. Any failure
    /// aborts the surrounding operation, leaving the fees accumulated for the
    /// next attempt.
    pub(crate) fn process_batch(
        &self,
        now: DateTime<Utc>,
        tx: &mut Tx,
    ) -> Result<Option<BatchReport>> {
        let (total, split, deps, marketing) = self.with_state(|s| {
            (
                s.treasury.take_fees(),
                s.config.split,
                s.dependencies,
                s.marketing_destination,
            )
        });
        if total.is_zero() {
            return Ok(None);
        }
        if split.non_burn_pct() == 0 {
            return Err(JackpotError::InvalidSplit(SplitError::NoProceedsRecipient));
        }

        let plan = plan_batch(total, &split)?;
        if !plan.burn.is_zero() {
            self.host.burn(&deps.token, plan.burn)?;
        }

        let received = if plan.to_sell.is_zero() {
            NativeAmount::ZERO
        } else {
            self.host
                .approve_for_sale(&deps.token, &deps.market, plan.to_sell)?;
            self.host.sell(&deps.market, &deps.token, plan.to_sell)?
        };

        let proceeds = split_proceeds(received, &split)?;
        self.with_state(|s| {
            s.treasury.credit(&proceeds)?;
            s.treasury.mark_batch(now);
            Ok::<_, JackpotError>(())
        })?;

        // The marketing share is still in the vault at this point.
        let held = self.host.held_balance();
        let after_marketing = held
            .checked_sub(proceeds.marketing_share)
            .unwrap_or(NativeAmount::ZERO);
        self.read(|s| s.treasury.ensure_backed(after_marketing))?;

        if !proceeds.marketing_share.is_zero() {
            self.host.pay(&marketing, proceeds.marketing_share)?;
        }

        tracing::info!(
            "Batch settled: {} fees, {} burned, {} sold for {} (jackpot +{}, rollover +{}, marketing {})",
            plan.total,
            plan.burn,
            plan.to_sell,
            received,
            proceeds.jackpot_share,
            proceeds.next_jackpot_share,
            proceeds.marketing_share
        );
        tx.emit(GameEvent::BatchProcessed {
            total: plan.total,
            burned: plan.burn,
            sold: plan.to_sell,
            received,
            jackpot_share: proceeds.jackpot_share,
            next_jackpot_share: proceeds.next_jackpot_share,
            marketing_share: proceeds.marketing_share,
        });
        if plan.total >= self.settings.large_batch_threshold {
            tx.emit(GameEvent::announce(
                AnnouncementKind::LargeBatch,
                format!(
                    "Processed {} fee tokens, adding {} to the jackpot",
                    plan.total, proceeds.jackpot_share
                ),
            ));
        }

        Ok(Some(BatchReport {
            plan,
            received,
            proceeds,
        }))
    }
}
