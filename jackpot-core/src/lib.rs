//! Jackpot core - shared vocabulary for the jackpot settlement engine
//!
//! This library provides the strongly-typed amounts and identities, the game
//! configuration, the interfaces of every external collaborator the engine
//! talks to (token ledger, pricing venue, native vault, role registry, pause
//! flag) and a sqlite-backed store for snapshots and notifications.

pub mod config;
pub mod error;
pub mod host;
pub mod storage;
pub mod types;

pub use config::{EngineSettings, GameConfig, SplitConfig, SplitError};
pub use error::{CallError, CallResult, CoreError, Result};
pub use host::{
    AuthorizationRegistry, Checkpoint, FeeToken, Host, Journal, NativeBank, PauseStore,
    PricingVenue, Role, Sandbox,
};
pub use storage::{EventStore, SnapshotStore, Storage};
pub use types::{Address, Bytes32, NativeAmount, TokenAmount};
