use jackpot_core::{Address, Bytes32, NativeAmount, SplitConfig, TokenAmount};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnnouncementKind {
    NewSecret,
    JackpotFunded,
    JackpotWon,
    NewHint,
    LargeBatch,
    GameUpdate,
}

/// Notifications published after an operation commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    GuessCommitted {
        player: Address,
        guess_number: u64,
    },
    CommitmentReplaced {
        player: Address,
        discarded: Bytes32,
    },
    GuessRevealed {
        player: Address,
        guess: String,
        won: bool,
    },
    JackpotWon {
        winner: Address,
        amount: NativeAmount,
        guess: String,
    },
    HintRequested {
        player: Address,
        index: u64,
    },
    HintAdded {
        index: u64,
    },
    JackpotFunded {
        funder: Address,
        amount: NativeAmount,
    },
    BatchProcessed {
        total: TokenAmount,
        burned: TokenAmount,
        sold: TokenAmount,
        received: NativeAmount,
        jackpot_share: NativeAmount,
        next_jackpot_share: NativeAmount,
        marketing_share: NativeAmount,
    },
    SecretUpdated {
        epoch: u64,
        hash: Bytes32,
    },
    SplitUpdated {
        split: SplitConfig,
    },
    CostsUpdated {
        guess_cost: TokenAmount,
        hint_cost: TokenAmount,
    },
    RevealDelayUpdated {
        confirmations: u64,
    },
    BatchIntervalUpdated {
        minutes: u64,
    },
    MarketingDestinationUpdated {
        destination: Address,
    },
    ChangeRequested {
        new_token: Address,
        new_market: Address,
        executable_at: chrono::DateTime<chrono::Utc>,
    },
    ChangeExecuted {
        token: Address,
        market: Address,
    },
    ChangeCancelled,
    Paused {
        by: Address,
    },
    Unpaused {
        by: Address,
    },
    Announcement {
        kind: AnnouncementKind,
        message: String,
    },
}

impl GameEvent {
    pub fn announce(kind: AnnouncementKind, message: impl Into<String>) -> Self {
        Self::Announcement {
            kind,
            message: message.into(),
        }
    }

    /// Short label used when persisting the event.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::GuessCommitted { .. } => "guess_committed",
            Self::CommitmentReplaced { .. } => "commitment_replaced",
            Self::GuessRevealed { .. } => "guess_revealed",
            Self::JackpotWon { .. } => "jackpot_won",
            Self::HintRequested { .. } => "hint_requested",
            Self::HintAdded { .. } => "hint_added",
            Self::JackpotFunded { .. } => "jackpot_funded",
            Self::BatchProcessed { .. } => "batch_processed",
            Self::SecretUpdated { .. } => "secret_updated",
            Self::SplitUpdated { .. } => "split_updated",
            Self::CostsUpdated { .. } => "costs_updated",
            Self::RevealDelayUpdated { .. } => "reveal_delay_updated",
            Self::BatchIntervalUpdated { .. } => "batch_interval_updated",
            Self::MarketingDestinationUpdated { .. } => "marketing_destination_updated",
            Self::ChangeRequested { .. } => "change_requested",
            Self::ChangeExecuted { .. } => "change_executed",
            Self::ChangeCancelled => "change_cancelled",
            Self::Paused { .. } => "paused",
            Self::Unpaused { .. } => "unpaused",
            Self::Announcement { .. } => "announcement",
        }
    }
}

/// Observer of published notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: &GameEvent);
}

/// Logs every notification.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, event: &GameEvent) {
        match event {
            GameEvent::Announcement { kind, message } => {
                tracing::info!("Announcement {:?}: {}", kind, message)
            }
            other => tracing::debug!("Event {}: {:?}", other.kind(), other),
        }
    }
}

/// Collects notifications in memory until drained.
#[derive(Default)]
pub struct EventBuffer {
    events: Mutex<Vec<GameEvent>>,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<GameEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn snapshot(&self) -> Vec<GameEvent> {
        self.events.lock().clone()
    }
}

impl Notifier for EventBuffer {
    fn notify(&self, event: &GameEvent) {
        self.events.lock().push(event.clone());
    }
}
