//! Loads the sandbox world and the engine from sqlite, and writes both back
//! together with any notifications once a command succeeds.

use crate::config::CliConfig;
use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Duration, Utc};
use jackpot_core::host::World;
use jackpot_core::{Address, Bytes32, EngineSettings, EventStore, Sandbox, SnapshotStore, Storage};
use jackpot_game::{CallContext, EventBuffer, GameState, JackpotGame, TracingNotifier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

const WORLD: &str = "world";
const GAME: &str = "game";
const SETTINGS: &str = "settings";
const CLOCK: &str = "clock";
const REVEALS: &str = "reveals";

/// Simulated wall time and confirmation counter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Clock {
    pub now: DateTime<Utc>,
    pub confirmation: u64,
}

impl Clock {
    pub fn start() -> Self {
        Self {
            now: Utc::now(),
            confirmation: 1,
        }
    }

    pub fn advance(&mut self, minutes: i64, confirmations: u64) -> Result<()> {
        if minutes < 0 {
            bail!("The clock cannot move backwards");
        }
        let step = Duration::try_minutes(minutes).ok_or_else(|| anyhow!("Too many minutes"))?;
        self.now = self
            .now
            .checked_add_signed(step)
            .ok_or_else(|| anyhow!("Clock overflow"))?;
        self.confirmation = self
            .confirmation
            .checked_add(confirmations)
            .ok_or_else(|| anyhow!("Confirmation counter overflow"))?;
        Ok(())
    }
}

/// Guess and nonce kept locally until the player reveals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingReveal {
    pub guess: String,
    pub nonce: Bytes32,
    pub committed_at: u64,
}

pub struct Session {
    storage: Storage,
    pub sandbox: Arc<Sandbox>,
    pub game: JackpotGame<Sandbox>,
    pub clock: Clock,
    pub reveals: BTreeMap<Address, PendingReveal>,
    pub caller: Address,
    pub caller_label: String,
    events: Arc<EventBuffer>,
}

impl Session {
    /// Opens the database, failing if no game has been initialized yet.
    pub async fn open(config: &CliConfig) -> Result<Self> {
        let storage = Storage::new(&config.db_path()).await?;
        let store = SnapshotStore::new(&storage);

        let world: World = store
            .load(WORLD)
            .await?
            .ok_or_else(|| anyhow!("No game found. Run 'jackpot init' first"))?;
        let state: GameState = store
            .load(GAME)
            .await?
            .context("Game state is missing from the database")?;
        let settings: EngineSettings = store.load(SETTINGS).await?.unwrap_or_default();
        let clock: Clock = store.load(CLOCK).await?.unwrap_or_else(Clock::start);
        let reveals: BTreeMap<Address, PendingReveal> =
            store.load(REVEALS).await?.unwrap_or_default();

        let sandbox = Arc::new(Sandbox::from_world(world));
        let game = JackpotGame::restore(sandbox.clone(), settings, state)?;
        tracing::debug!("Loaded game {} at confirmation {}", game.id(), clock.confirmation);

        Ok(Self::assemble(storage, sandbox, game, clock, reveals, config))
    }

    pub fn create(
        storage: Storage,
        sandbox: Arc<Sandbox>,
        game: JackpotGame<Sandbox>,
        clock: Clock,
        config: &CliConfig,
    ) -> Self {
        Self::assemble(storage, sandbox, game, clock, BTreeMap::new(), config)
    }

    fn assemble(
        storage: Storage,
        sandbox: Arc<Sandbox>,
        game: JackpotGame<Sandbox>,
        clock: Clock,
        reveals: BTreeMap<Address, PendingReveal>,
        config: &CliConfig,
    ) -> Self {
        let events = Arc::new(EventBuffer::new());
        game.subscribe(Arc::new(TracingNotifier));
        game.subscribe(events.clone());

        Self {
            storage,
            sandbox,
            game,
            clock,
            reveals,
            caller: Address::from_label(&config.caller),
            caller_label: config.caller.clone(),
            events,
        }
    }

    /// Context for the next engine call, in the current confirmation unit.
    pub fn ctx(&self) -> CallContext {
        CallContext::new(self.caller, self.clock.now, self.clock.confirmation)
    }

    /// Moves to the next confirmation unit after a successful engine call.
    pub fn confirm(&mut self) -> Result<()> {
        self.clock.advance(0, 1)
    }

    pub async fn save(&self) -> Result<()> {
        let store = SnapshotStore::new(&self.storage);
        store.save(WORLD, &self.sandbox.world()).await?;
        store.save(GAME, &self.game.snapshot()).await?;
        store.save(SETTINGS, self.game.settings()).await?;
        store.save(CLOCK, &self.clock).await?;
        store.save(REVEALS, &self.reveals).await?;

        let game_id = self.game.id().to_string();
        let log = EventStore::new(&self.storage);
        for event in self.events.drain() {
            log.append(&game_id, event.kind(), &event).await?;
        }
        Ok(())
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }
}

/// Opens storage for `init`, reporting whether a game already exists.
pub async fn open_storage(config: &CliConfig) -> Result<(Storage, bool)> {
    let storage = Storage::new(&config.db_path()).await?;
    let exists = SnapshotStore::new(&storage).exists(WORLD).await?;
    Ok((storage, exists))
}

/// Drops every saved snapshot and recorded notification.
pub async fn reset(storage: &Storage) -> Result<()> {
    let store = SnapshotStore::new(storage);
    for name in [WORLD, GAME, SETTINGS, CLOCK, REVEALS] {
        store.delete(name).await?;
    }
    let dropped = EventStore::new(storage).clear().await?;
    tracing::debug!("Dropped {} recorded events", dropped);
    Ok(())
}
