use super::{CallContext, JackpotGame};
use crate::events::GameEvent;
use crate::gate::AccessGate;
use crate::hints::Hint;
use crate::ledger::{PlayerCommitment, RevealWindow};
use crate::{JackpotError, Result};
use jackpot_core::{Address, Bytes32, Host, NativeAmount, TokenAmount};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealOutcome {
    pub won: bool,
    pub payout: Option<NativeAmount>,
}

impl<H: Host> JackpotGame<H> {
    /// Pays the guess fee and binds the caller to `commitment`. Returns the
    /// global guess number.
    pub fn commit(&self, ctx: &CallContext, commitment: Bytes32) -> Result<u64> {
        self.transact("commit", |tx| {
            AccessGate::new(&*self.host).open()?;
            if commitment.is_zero() {
                return Err(JackpotError::invalid("commitment hash cannot be zero"));
            }

            let (cost, token, epoch) = self.read(|s| {
                (s.config.guess_cost, s.dependencies.token, s.secret_epoch)
            });
            self.collect_fee(&token, &ctx.caller, cost)?;

            let receipt = self.with_state(|s| {
                let receipt = s.ledger.record_commit(
                    ctx.caller,
                    PlayerCommitment {
                        hash: commitment,
                        confirmation: ctx.confirmation,
                        secret_epoch: epoch,
                    },
                    &mut s.stats,
                )?;
                s.treasury.accrue(cost)?;
                Ok::<_, JackpotError>(receipt)
            })?;

            if let Some(discarded) = &receipt.replaced {
                tx.emit(GameEvent::CommitmentReplaced {
                    player: ctx.caller,
                    discarded: discarded.hash,
                });
            }
            tx.emit(GameEvent::GuessCommitted {
                player: ctx.caller,
                guess_number: receipt.guess_number,
            });
            tracing::info!(
                "Player {} committed guess #{} at confirmation {}",
                ctx.caller,
                receipt.guess_number,
                ctx.confirmation
            );

            self.maybe_process_batch(ctx.now, tx)?;
            Ok(receipt.guess_number)
        })
    }

    /// Discloses the committed guess. Consumes the commitment whether or not
    /// it wins.
    pub fn reveal(&self, ctx: &CallContext, guess: &str, nonce: Bytes32) -> Result<RevealOutcome> {
        self.transact("reveal", |tx| {
            AccessGate::new(&*self.host).open()?;

            let won = self.with_state(|s| {
                let window = RevealWindow {
                    current_confirmation: ctx.confirmation,
                    reveal_delay: s.config.reveal_delay,
                };
                let consumed = s.ledger.consume(&ctx.caller, guess, &nonce, window)?;
                // Commitments made against a replaced secret can only lose.
                let current = consumed.secret_epoch == s.secret_epoch;
                Ok::<_, JackpotError>(
                    current
                        && s.secret
                            .as_ref()
                            .map_or(false, |secret| secret.matches(guess)),
                )
            })?;

            tx.emit(GameEvent::GuessRevealed {
                player: ctx.caller,
                guess: guess.to_string(),
                won,
            });
            tracing::info!("Player {} revealed '{}' (won: {})", ctx.caller, guess, won);

            let payout = if won {
                Some(self.settle_win(ctx, guess, tx)?)
            } else {
                None
            };

            // Checked after every reveal, winning or not.
            self.maybe_process_batch(ctx.now, tx)?;
            Ok(RevealOutcome { won, payout })
        })
    }

    /// Buys the most recent hint.
    pub fn request_hint(&self, ctx: &CallContext) -> Result<Hint> {
        self.transact("request_hint", |tx| {
            AccessGate::new(&*self.host).open()?;

            let (hint, cost, token) = self.read(|s| {
                s.hints
                    .latest()
                    .map(|hint| (hint, s.config.hint_cost, s.dependencies.token))
            })?;
            self.collect_fee(&token, &ctx.caller, cost)?;

            self.with_state(|s| {
                s.treasury.accrue(cost)?;
                s.ledger.record_hint(ctx.caller)
            })?;

            tx.emit(GameEvent::HintRequested {
                player: ctx.caller,
                index: hint.index,
            });
            tracing::info!("Player {} bought hint #{}", ctx.caller, hint.index);

            self.maybe_process_batch(ctx.now, tx)?;
            Ok(hint)
        })
    }

    fn collect_fee(&self, token: &Address, from: &Address, amount: TokenAmount) -> Result<()> {
        if amount.is_zero() {
            return Ok(());
        }
        self.host.pull_fee(token, from, amount)?;
        tracing::debug!("Collected fee of {} from {}", amount, from);
        Ok(())
    }
}
