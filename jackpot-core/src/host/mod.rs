//! Interfaces of the collaborators the engine depends on but does not own.
//!
//! Contract references (`token`, `venue`) are passed explicitly so the engine
//! can swap dependencies through governance without rebuilding its host.

pub mod sandbox;

pub use sandbox::{RecipientHook, Sandbox, World};

use crate::error::{CallResult, CoreError};
use crate::types::{Address, NativeAmount, TokenAmount};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Capabilities granted by the external authorization registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Split, marketing destination, dependency swaps, pause control.
    Admin,
    /// Secret, hints, costs, timing and announcements.
    Operator,
    Funder,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Admin => "admin",
            Role::Operator => "operator",
            Role::Funder => "funder",
        };
        f.write_str(name)
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "operator" => Ok(Role::Operator),
            "funder" => Ok(Role::Funder),
            other => Err(CoreError::config(format!("Unknown role: {}", other))),
        }
    }
}

/// The fungible fee token ledger.
pub trait FeeToken {
    /// Moves `amount` from `from` into the system's account.
    fn pull_fee(&self, token: &Address, from: &Address, amount: TokenAmount) -> CallResult<()>;

    /// Destroys `amount` of the system's tokens.
    fn burn(&self, token: &Address, amount: TokenAmount) -> CallResult<()>;

    fn approve_for_sale(
        &self,
        token: &Address,
        spender: &Address,
        amount: TokenAmount,
    ) -> CallResult<()>;
}

/// Liquidation venue converting fee tokens into native currency.
pub trait PricingVenue {
    /// Sells previously approved tokens, returning native currency credited
    /// to the system.
    fn sell(&self, venue: &Address, token: &Address, amount: TokenAmount)
        -> CallResult<NativeAmount>;
}

/// The system's native currency account.
pub trait NativeBank {
    fn held_balance(&self) -> NativeAmount;

    fn deposit(&self, from: &Address, amount: NativeAmount) -> CallResult<()>;

    /// Sends value out. The recipient may execute arbitrary code, including
    /// calling back into the engine.
    fn pay(&self, to: &Address, amount: NativeAmount) -> CallResult<()>;
}

pub trait AuthorizationRegistry {
    fn has_role(&self, principal: &Address, role: Role) -> bool;
}

pub trait PauseStore {
    fn is_paused(&self) -> bool;

    fn set_paused(&self, paused: bool);
}

/// Opaque marker for a journal position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(pub usize);

/// All-or-nothing scope provided by the execution environment. Effects of
/// collaborator calls made after `checkpoint` are discarded by `rollback`.
pub trait Journal {
    fn checkpoint(&self) -> Checkpoint;

    fn rollback(&self, checkpoint: Checkpoint);

    fn release(&self, checkpoint: Checkpoint);
}

/// Everything an engine instance needs from its environment.
pub trait Host:
    FeeToken + PricingVenue + NativeBank + AuthorizationRegistry + PauseStore + Journal + Send + Sync
{
}

impl<T> Host for T where
    T: FeeToken
        + PricingVenue
        + NativeBank
        + AuthorizationRegistry
        + PauseStore
        + Journal
        + Send
        + Sync
{
}
