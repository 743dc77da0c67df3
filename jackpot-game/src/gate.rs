use crate::{JackpotError, Result};
use jackpot_core::{Address, Host, Role};
use std::sync::atomic::{AtomicBool, Ordering};

/// Consults the external pause flag and role registry before dispatch.
pub struct AccessGate<'a, H> {
    host: &'a H,
}

impl<'a, H: Host> AccessGate<'a, H> {
    pub fn new(host: &'a H) -> Self {
        Self { host }
    }

    /// Open to any caller while the game is live.
    pub fn open(&self) -> Result<()> {
        if self.host.is_paused() {
            return Err(JackpotError::Paused);
        }
        Ok(())
    }

    pub fn privileged(&self, principal: &Address, role: Role) -> Result<()> {
        self.open()?;
        self.require_role(principal, role)
    }

    /// Unpausing is the one operation that is allowed while paused.
    pub fn unpause(&self, principal: &Address) -> Result<()> {
        self.require_role(principal, Role::Admin)?;
        if !self.host.is_paused() {
            return Err(JackpotError::NotPaused);
        }
        Ok(())
    }

    fn require_role(&self, principal: &Address, role: Role) -> Result<()> {
        if !self.host.has_role(principal, role) {
            tracing::warn!("Rejected {}: missing {} role", principal, role);
            return Err(JackpotError::MissingRole {
                principal: *principal,
                role,
            });
        }
        Ok(())
    }
}

/// Rejects nested entry into state-mutating operations.
#[derive(Debug, Default)]
pub struct ReentrancyLock {
    entered: AtomicBool,
}

impl ReentrancyLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&self) -> Result<ReentrancyGuard<'_>> {
        self.entered
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| JackpotError::Reentrancy)?;
        Ok(ReentrancyGuard { lock: self })
    }

    pub fn is_held(&self) -> bool {
        self.entered.load(Ordering::Acquire)
    }
}

/// Releases the lock on drop, including on early error returns.
pub struct ReentrancyGuard<'a> {
    lock: &'a ReentrancyLock,
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        self.lock.entered.store(false, Ordering::Release);
    }
}
