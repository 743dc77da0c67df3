//! The settlement and commitment engine.
//!
//! Every mutating operation runs through [`JackpotGame::transact`]: the
//! reentrancy lock is taken, the state is snapshotted and a host journal
//! checkpoint is opened. Any error restores both, so an operation is applied
//! completely or not at all. Notifications are buffered and only published
//! once the operation has committed.

mod admin;
mod play;
mod settlement;

pub use play::RevealOutcome;
pub use settlement::BatchReport;

use crate::events::{GameEvent, Notifier};
use crate::gate::ReentrancyLock;
use crate::hints::Hint;
use crate::ledger::{PlayerCommitment, PlayerStats};
use crate::state::{Deployment, GameState};
use crate::stats::{GlobalStats, JackpotInfo};
use crate::timelock::{Dependencies, PendingChange};
use crate::treasury::JackpotState;
use crate::{JackpotError, Result};
use chrono::{DateTime, Utc};
use jackpot_core::{Address, Bytes32, EngineSettings, GameConfig, Host, NativeAmount, SplitConfig};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use uuid::Uuid;

/// Who is calling and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Address,
    pub now: DateTime<Utc>,
    /// Confirmation unit the call executes in.
    pub confirmation: u64,
}

impl CallContext {
    pub fn new(caller: Address, now: DateTime<Utc>, confirmation: u64) -> Self {
        Self {
            caller,
            now,
            confirmation,
        }
    }
}

/// Notifications raised by an in-flight operation.
#[derive(Debug, Default)]
pub(crate) struct Tx {
    events: Vec<GameEvent>,
}

impl Tx {
    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

pub struct JackpotGame<H: Host> {
    host: Arc<H>,
    settings: EngineSettings,
    state: Mutex<GameState>,
    lock: ReentrancyLock,
    subscribers: RwLock<Vec<Arc<dyn Notifier>>>,
}

impl<H: Host> JackpotGame<H> {
    pub fn deploy(
        host: Arc<H>,
        settings: EngineSettings,
        deployment: Deployment,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        if deployment.token.is_zero()
            || deployment.market.is_zero()
            || deployment.marketing_destination.is_zero()
        {
            return Err(JackpotError::invalid("deployment references cannot be zero"));
        }

        let state = GameState::new(deployment, now);
        let game = Self::restore(host, settings, state)?;
        tracing::info!("Deployed jackpot game {}", game.id());
        Ok(game)
    }

    /// Rebuilds an engine around previously exported state.
    pub fn restore(host: Arc<H>, settings: EngineSettings, state: GameState) -> Result<Self> {
        settings
            .validate()
            .map_err(|e| JackpotError::invalid(e.to_string()))?;
        state
            .config
            .validate(&settings)
            .map_err(|e| JackpotError::invalid(e.to_string()))?;

        Ok(Self {
            host,
            settings,
            state: Mutex::new(state),
            lock: ReentrancyLock::new(),
            subscribers: RwLock::new(Vec::new()),
        })
    }

    pub fn subscribe(&self, notifier: Arc<dyn Notifier>) {
        self.subscribers.write().push(notifier);
    }

    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn id(&self) -> Uuid {
        self.state.lock().id
    }

    /// Copy of the full state, for persistence.
    pub fn snapshot(&self) -> GameState {
        self.state.lock().clone()
    }

    pub(crate) fn transact<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut Tx) -> Result<T>,
    ) -> Result<T> {
        let guard = self.lock.enter().map_err(|e| {
            tracing::warn!("Rejected re-entrant {}", op);
            e
        })?;

        let snapshot = self.state.lock().clone();
        let checkpoint = self.host.checkpoint();
        let mut tx = Tx::default();

        match f(&mut tx) {
            Ok(value) => {
                self.host.release(checkpoint);
                drop(guard);
                tracing::debug!("{} committed with {} events", op, tx.events.len());
                self.publish(tx.events);
                Ok(value)
            }
            Err(e) => {
                *self.state.lock() = snapshot;
                self.host.rollback(checkpoint);
                tracing::warn!("{} aborted: {}", op, e);
                Err(e)
            }
        }
    }

    fn publish(&self, events: Vec<GameEvent>) {
        let subscribers = self.subscribers.read().clone();
        for event in &events {
            for subscriber in &subscribers {
                subscriber.notify(event);
            }
        }
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&GameState) -> R) -> R {
        f(&self.state.lock())
    }

    /// The state lock is never held across a host call.
    pub(crate) fn with_state<R>(&self, f: impl FnOnce(&mut GameState) -> R) -> R {
        f(&mut self.state.lock())
    }

    // Read-only accessors

    pub fn config(&self) -> GameConfig {
        self.read(|s| s.config.clone())
    }

    pub fn split(&self) -> SplitConfig {
        self.read(|s| s.config.split)
    }

    pub fn stats(&self) -> GlobalStats {
        self.read(|s| s.stats.clone())
    }

    pub fn jackpot_state(&self) -> JackpotState {
        self.read(|s| s.treasury.state().clone())
    }

    pub fn jackpot_info(&self) -> JackpotInfo {
        self.read(|s| JackpotInfo {
            jackpot: s.treasury.state().jackpot_amount,
            next_jackpot: s.treasury.state().next_jackpot_amount,
            total_guesses: s.stats.total_guesses,
            unique_players: s.stats.unique_players,
        })
    }

    pub fn hint(&self, index: u64) -> Result<Hint> {
        self.read(|s| {
            s.hints.get(index).map(|text| Hint {
                index,
                text: text.to_string(),
            })
        })
    }

    pub fn hint_count(&self) -> u64 {
        self.read(|s| s.hints.count())
    }

    pub fn player(&self, player: &Address) -> Option<PlayerStats> {
        self.read(|s| s.ledger.player(player).cloned())
    }

    pub fn commitment(&self, player: &Address) -> Option<PlayerCommitment> {
        self.read(|s| s.ledger.commitment(player).cloned())
    }

    pub fn pending_change(&self) -> Option<PendingChange> {
        self.read(|s| s.timelock.pending().cloned())
    }

    pub fn dependencies(&self) -> Dependencies {
        self.read(|s| s.dependencies)
    }

    pub fn marketing_destination(&self) -> Address {
        self.read(|s| s.marketing_destination)
    }

    pub fn secret_hash(&self) -> Option<Bytes32> {
        self.read(|s| s.secret.as_ref().map(|secret| secret.hash))
    }

    pub fn secret_epoch(&self) -> u64 {
        self.read(|s| s.secret_epoch)
    }

    /// Held native currency not owed to either pool.
    pub fn unallocated_balance(&self) -> NativeAmount {
        let held = self.host.held_balance();
        self.read(|s| {
            s.treasury
                .allocated()
                .map(|allocated| held.saturating_sub(allocated))
                .unwrap_or(NativeAmount::ZERO)
        })
    }

    pub fn is_paused(&self) -> bool {
        self.host.is_paused()
    }
}
