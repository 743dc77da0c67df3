use super::{BatchReport, CallContext, JackpotGame};
use crate::commitment::SecretCommitment;
use crate::events::{AnnouncementKind, GameEvent};
use crate::gate::AccessGate;
use crate::timelock::{Dependencies, PendingChange};
use crate::{JackpotError, Result};
use chrono::Duration;
use jackpot_core::{Address, Bytes32, Host, NativeAmount, Role, SplitConfig, TokenAmount};

impl<H: Host> JackpotGame<H> {
    /// Deposits native currency from the caller straight into the jackpot.
    pub fn fund_jackpot(&self, ctx: &CallContext, amount: NativeAmount) -> Result<()> {
        self.transact("fund_jackpot", |tx| {
            AccessGate::new(&*self.host).privileged(&ctx.caller, Role::Funder)?;
            if amount.is_zero() {
                return Err(JackpotError::invalid("funding amount must be positive"));
            }

            self.host.deposit(&ctx.caller, amount)?;
            let jackpot = self.with_state(|s| {
                s.treasury.fund(amount)?;
                Ok::<_, JackpotError>(s.treasury.state().jackpot_amount)
            })?;
            let held = self.host.held_balance();
            self.read(|s| s.treasury.ensure_backed(held))?;

            tracing::info!("{} funded the jackpot with {}", ctx.caller, amount);
            tx.emit(GameEvent::JackpotFunded {
                funder: ctx.caller,
                amount,
            });
            tx.emit(GameEvent::announce(
                AnnouncementKind::JackpotFunded,
                format!("The jackpot grew by {} and now stands at {}", amount, jackpot),
            ));
            Ok(())
        })
    }

    /// Replaces the secret. Unrevealed commitments made against the old
    /// secret can no longer be revealed.
    pub fn set_secret(&self, ctx: &CallContext, hash: Bytes32, salt: Bytes32) -> Result<u64> {
        self.transact("set_secret", |tx| {
            AccessGate::new(&*self.host).privileged(&ctx.caller, Role::Operator)?;
            if hash.is_zero() {
                return Err(JackpotError::invalid("secret hash cannot be zero"));
            }

            let (epoch, invalidated) = self.with_state(|s| {
                let epoch = s
                    .secret_epoch
                    .checked_add(1)
                    .ok_or(JackpotError::Overflow("secret epoch"))?;
                s.secret_epoch = epoch;
                s.secret = Some(SecretCommitment::new(hash, salt));
                Ok::<_, JackpotError>((epoch, s.ledger.outstanding()))
            })?;

            tracing::info!(
                "Secret replaced (epoch {}), {} outstanding commitments invalidated",
                epoch,
                invalidated
            );
            tx.emit(GameEvent::SecretUpdated { epoch, hash });
            tx.emit(GameEvent::announce(
                AnnouncementKind::NewSecret,
                "A new secret word has been set. Can you guess it?",
            ));
            Ok(epoch)
        })
    }

    pub fn add_hint(&self, ctx: &CallContext, text: &str) -> Result<u64> {
        self.transact("add_hint", |tx| {
            AccessGate::new(&*self.host).privileged(&ctx.caller, Role::Operator)?;

            let index = self.with_state(|s| s.hints.add(text))?;

            tracing::info!("Added hint #{}", index);
            tx.emit(GameEvent::HintAdded { index });
            tx.emit(GameEvent::announce(
                AnnouncementKind::NewHint,
                format!("Hint #{} is available to help you guess the secret word", index),
            ));
            Ok(index)
        })
    }

    pub fn update_split(
        &self,
        ctx: &CallContext,
        burn_pct: u8,
        jackpot_pct: u8,
        next_jackpot_pct: u8,
        marketing_pct: u8,
    ) -> Result<SplitConfig> {
        self.transact("update_split", |tx| {
            AccessGate::new(&*self.host).privileged(&ctx.caller, Role::Admin)?;

            let split = SplitConfig::new(burn_pct, jackpot_pct, next_jackpot_pct, marketing_pct);
            split.validate()?;
            self.with_state(|s| s.config.split = split);

            tracing::info!(
                "Split updated: burn {}%, jackpot {}%, rollover {}%, marketing {}%",
                burn_pct,
                jackpot_pct,
                next_jackpot_pct,
                marketing_pct
            );
            tx.emit(GameEvent::SplitUpdated { split });
            Ok(split)
        })
    }

    pub fn set_costs(
        &self,
        ctx: &CallContext,
        guess_cost: TokenAmount,
        hint_cost: TokenAmount,
    ) -> Result<()> {
        self.transact("set_costs", |tx| {
            AccessGate::new(&*self.host).privileged(&ctx.caller, Role::Operator)?;

            self.with_state(|s| {
                s.config.guess_cost = guess_cost;
                s.config.hint_cost = hint_cost;
            });

            tracing::info!("Costs updated: guess {}, hint {}", guess_cost, hint_cost);
            tx.emit(GameEvent::CostsUpdated {
                guess_cost,
                hint_cost,
            });
            Ok(())
        })
    }

    pub fn set_reveal_delay(&self, ctx: &CallContext, confirmations: u64) -> Result<()> {
        self.transact("set_reveal_delay", |tx| {
            AccessGate::new(&*self.host).privileged(&ctx.caller, Role::Operator)?;
            if confirmations < self.settings.min_reveal_delay {
                return Err(JackpotError::invalid(format!(
                    "reveal delay must be at least {} confirmations",
                    self.settings.min_reveal_delay
                )));
            }

            self.with_state(|s| s.config.reveal_delay = confirmations);

            tracing::info!("Reveal delay set to {} confirmations", confirmations);
            tx.emit(GameEvent::RevealDelayUpdated { confirmations });
            Ok(())
        })
    }

    /// Zero disables batch settlement.
    pub fn set_batch_interval(&self, ctx: &CallContext, minutes: u64) -> Result<()> {
        self.transact("set_batch_interval", |tx| {
            AccessGate::new(&*self.host).privileged(&ctx.caller, Role::Operator)?;

            self.with_state(|s| s.config.batch_interval_minutes = minutes);

            tracing::info!("Batch interval set to {} minutes", minutes);
            tx.emit(GameEvent::BatchIntervalUpdated { minutes });
            Ok(())
        })
    }

    pub fn set_marketing_destination(&self, ctx: &CallContext, destination: Address) -> Result<()> {
        self.transact("set_marketing_destination", |tx| {
            AccessGate::new(&*self.host).privileged(&ctx.caller, Role::Admin)?;
            if destination.is_zero() {
                return Err(JackpotError::invalid("marketing destination cannot be zero"));
            }

            self.with_state(|s| s.marketing_destination = destination);

            tracing::info!("Marketing destination set to {}", destination);
            tx.emit(GameEvent::MarketingDestinationUpdated { destination });
            Ok(())
        })
    }

    /// Runs batch settlement now, regardless of the interval.
    pub fn settle_fees(&self, ctx: &CallContext) -> Result<Option<BatchReport>> {
        self.transact("settle_fees", |tx| {
            AccessGate::new(&*self.host).privileged(&ctx.caller, Role::Operator)?;
            self.process_batch(ctx.now, tx)
        })
    }

    pub fn emit_game_update(&self, ctx: &CallContext, message: &str) -> Result<()> {
        self.transact("emit_game_update", |tx| {
            AccessGate::new(&*self.host).privileged(&ctx.caller, Role::Operator)?;
            if message.trim().is_empty() {
                return Err(JackpotError::invalid("game update message cannot be empty"));
            }

            tx.emit(GameEvent::announce(AnnouncementKind::GameUpdate, message));
            Ok(())
        })
    }

    pub fn request_change(
        &self,
        ctx: &CallContext,
        new_token: Option<Address>,
        new_market: Option<Address>,
    ) -> Result<PendingChange> {
        self.transact("request_change", |tx| {
            AccessGate::new(&*self.host).privileged(&ctx.caller, Role::Admin)?;

            let delay = self.governance_delay();
            let change = self.with_state(|s| {
                let current = s.dependencies;
                s.timelock
                    .request(&current, new_token, new_market, ctx.now)
                    .cloned()
            })?;

            let executable_at = change.executable_at(delay);
            tracing::info!(
                "Dependency change requested: token {}, market {}, executable at {}",
                change.new_token,
                change.new_market,
                executable_at
            );
            tx.emit(GameEvent::ChangeRequested {
                new_token: change.new_token,
                new_market: change.new_market,
                executable_at,
            });
            Ok(change)
        })
    }

    pub fn execute_change(&self, ctx: &CallContext) -> Result<Dependencies> {
        self.transact("execute_change", |tx| {
            AccessGate::new(&*self.host).privileged(&ctx.caller, Role::Admin)?;

            let delay = self.governance_delay();
            let deps = self.with_state(|s| -> Result<Dependencies> {
                let change = s.timelock.execute(ctx.now, delay)?;
                // Pending fees are denominated in the outgoing token.
                if change.new_token != s.dependencies.token
                    && !s.treasury.state().accumulated_fees.is_zero()
                {
                    return Err(JackpotError::UnsettledFees);
                }
                s.dependencies = Dependencies {
                    token: change.new_token,
                    market: change.new_market,
                };
                Ok(s.dependencies)
            })?;

            tracing::info!(
                "Dependency change executed: token {}, market {}",
                deps.token,
                deps.market
            );
            tx.emit(GameEvent::ChangeExecuted {
                token: deps.token,
                market: deps.market,
            });
            Ok(deps)
        })
    }

    pub fn cancel_change(&self, ctx: &CallContext) -> Result<()> {
        self.transact("cancel_change", |tx| {
            AccessGate::new(&*self.host).privileged(&ctx.caller, Role::Admin)?;

            let change = self.with_state(|s| s.timelock.cancel())?;

            tracing::info!(
                "Dependency change to token {}, market {} cancelled",
                change.new_token,
                change.new_market
            );
            tx.emit(GameEvent::ChangeCancelled);
            Ok(())
        })
    }

    pub fn pause(&self, ctx: &CallContext) -> Result<()> {
        self.transact("pause", |tx| {
            AccessGate::new(&*self.host).privileged(&ctx.caller, Role::Admin)?;
            self.host.set_paused(true);

            tracing::warn!("Game paused by {}", ctx.caller);
            tx.emit(GameEvent::Paused { by: ctx.caller });
            Ok(())
        })
    }

    pub fn unpause(&self, ctx: &CallContext) -> Result<()> {
        self.transact("unpause", |tx| {
            AccessGate::new(&*self.host).unpause(&ctx.caller)?;
            self.host.set_paused(false);

            tracing::info!("Game unpaused by {}", ctx.caller);
            tx.emit(GameEvent::Unpaused { by: ctx.caller });
            Ok(())
        })
    }

    fn governance_delay(&self) -> Duration {
        Duration::seconds(self.settings.governance_delay_secs)
    }
}
