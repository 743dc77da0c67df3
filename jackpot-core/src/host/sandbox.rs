//! In-memory host used for local play and tests.
//!
//! A single `World` holds every token ledger, venue, native balance, role
//! grant and the pause flag, so one journal checkpoint covers all of them.

use super::{
    AuthorizationRegistry, Checkpoint, FeeToken, Journal, NativeBank, PauseStore, PricingVenue,
    Role,
};
use crate::error::{CallError, CallResult};
use crate::types::{Address, NativeAmount, TokenAmount};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

/// Code run when an account receives native currency. Returning `false`
/// refuses the payment.
pub type RecipientHook = Arc<dyn Fn(&Address, NativeAmount) -> bool + Send + Sync>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenLedger {
    pub balances: BTreeMap<Address, TokenAmount>,
    /// Spender allowances over the system account.
    pub allowances: BTreeMap<Address, TokenAmount>,
    pub total_supply: TokenAmount,
    pub burned: TokenAmount,
}

/// Venue quoting `numerator / denominator` native units per token unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedRateVenue {
    pub numerator: u128,
    pub denominator: u128,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Account of the engine itself.
    pub system: Address,
    pub tokens: BTreeMap<Address, TokenLedger>,
    pub venues: BTreeMap<Address, FixedRateVenue>,
    pub native: BTreeMap<Address, NativeAmount>,
    pub roles: BTreeMap<Address, BTreeSet<Role>>,
    pub paused: bool,
}

impl World {
    pub fn new(system: Address) -> Self {
        Self {
            system,
            tokens: BTreeMap::new(),
            venues: BTreeMap::new(),
            native: BTreeMap::new(),
            roles: BTreeMap::new(),
            paused: false,
        }
    }

    fn ledger_mut(&mut self, token: &Address) -> CallResult<&mut TokenLedger> {
        self.tokens
            .get_mut(token)
            .ok_or(CallError::UnknownContract(*token))
    }

    fn move_native(&mut self, from: &Address, to: &Address, amount: NativeAmount) -> CallResult<()> {
        let available = self.native.get(from).copied().unwrap_or_default();
        let remaining = available
            .checked_sub(amount)
            .ok_or(CallError::InsufficientBalance {
                account: *from,
                need: amount.get(),
                available: available.get(),
            })?;
        self.native.insert(*from, remaining);

        let credited = self.native.entry(*to).or_default();
        *credited = credited
            .checked_add(amount)
            .ok_or_else(|| CallError::rejected("native", "balance overflow"))?;
        Ok(())
    }
}

fn move_tokens(
    ledger: &mut TokenLedger,
    from: &Address,
    to: &Address,
    amount: TokenAmount,
) -> CallResult<()> {
    let available = ledger.balances.get(from).copied().unwrap_or_default();
    let remaining = available
        .checked_sub(amount)
        .ok_or(CallError::InsufficientBalance {
            account: *from,
            need: amount.get(),
            available: available.get(),
        })?;
    ledger.balances.insert(*from, remaining);

    let credited = ledger.balances.entry(*to).or_default();
    *credited = credited
        .checked_add(amount)
        .ok_or_else(|| CallError::rejected("token", "balance overflow"))?;
    Ok(())
}

pub struct Sandbox {
    world: Mutex<World>,
    journal: Mutex<Vec<World>>,
    hooks: RwLock<HashMap<Address, RecipientHook>>,
}

impl Sandbox {
    pub fn new(system: Address) -> Self {
        Self::from_world(World::new(system))
    }

    pub fn from_world(world: World) -> Self {
        Self {
            world: Mutex::new(world),
            journal: Mutex::new(Vec::new()),
            hooks: RwLock::new(HashMap::new()),
        }
    }

    /// Copy of the current world, for persistence.
    pub fn world(&self) -> World {
        self.world.lock().clone()
    }

    pub fn system(&self) -> Address {
        self.world.lock().system
    }

    pub fn deploy_token(&self, token: Address) {
        self.world.lock().tokens.entry(token).or_default();
        tracing::debug!("Deployed token {}", token);
    }

    pub fn mint(&self, token: &Address, to: &Address, amount: TokenAmount) -> CallResult<()> {
        let mut world = self.world.lock();
        let ledger = world.ledger_mut(token)?;
        ledger.total_supply = ledger
            .total_supply
            .checked_add(amount)
            .ok_or_else(|| CallError::rejected("token", "supply overflow"))?;
        let balance = ledger.balances.entry(*to).or_default();
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| CallError::rejected("token", "balance overflow"))?;
        Ok(())
    }

    pub fn deploy_venue(&self, venue: Address, numerator: u128, denominator: u128) {
        self.world.lock().venues.insert(
            venue,
            FixedRateVenue {
                numerator,
                denominator,
            },
        );
        tracing::debug!("Deployed venue {} at {}/{}", venue, numerator, denominator);
    }

    pub fn credit_native(&self, account: &Address, amount: NativeAmount) {
        let mut world = self.world.lock();
        let balance = world.native.entry(*account).or_default();
        *balance = balance.checked_add(amount).unwrap_or(NativeAmount::new(u128::MAX));
    }

    pub fn native_balance(&self, account: &Address) -> NativeAmount {
        self.world
            .lock()
            .native
            .get(account)
            .copied()
            .unwrap_or_default()
    }

    pub fn token_balance(&self, token: &Address, account: &Address) -> TokenAmount {
        self.world
            .lock()
            .tokens
            .get(token)
            .and_then(|ledger| ledger.balances.get(account).copied())
            .unwrap_or_default()
    }

    pub fn burned(&self, token: &Address) -> TokenAmount {
        self.world
            .lock()
            .tokens
            .get(token)
            .map(|ledger| ledger.burned)
            .unwrap_or_default()
    }

    pub fn grant_role(&self, principal: &Address, role: Role) {
        self.world
            .lock()
            .roles
            .entry(*principal)
            .or_default()
            .insert(role);
    }

    pub fn revoke_role(&self, principal: &Address, role: Role) {
        if let Some(roles) = self.world.lock().roles.get_mut(principal) {
            roles.remove(&role);
        }
    }

    pub fn on_receive(&self, account: Address, hook: RecipientHook) {
        self.hooks.write().insert(account, hook);
    }

    pub fn clear_hook(&self, account: &Address) {
        self.hooks.write().remove(account);
    }
}

impl FeeToken for Sandbox {
    fn pull_fee(&self, token: &Address, from: &Address, amount: TokenAmount) -> CallResult<()> {
        let mut world = self.world.lock();
        let system = world.system;
        let ledger = world.ledger_mut(token)?;
        move_tokens(ledger, from, &system, amount)
    }

    fn burn(&self, token: &Address, amount: TokenAmount) -> CallResult<()> {
        let mut world = self.world.lock();
        let system = world.system;
        let ledger = world.ledger_mut(token)?;

        let available = ledger.balances.get(&system).copied().unwrap_or_default();
        let remaining = available
            .checked_sub(amount)
            .ok_or(CallError::InsufficientBalance {
                account: system,
                need: amount.get(),
                available: available.get(),
            })?;
        ledger.balances.insert(system, remaining);
        ledger.total_supply = ledger.total_supply.saturating_sub(amount);
        ledger.burned = ledger
            .burned
            .checked_add(amount)
            .ok_or_else(|| CallError::rejected("token", "burn counter overflow"))?;
        Ok(())
    }

    fn approve_for_sale(
        &self,
        token: &Address,
        spender: &Address,
        amount: TokenAmount,
    ) -> CallResult<()> {
        let mut world = self.world.lock();
        let ledger = world.ledger_mut(token)?;
        ledger.allowances.insert(*spender, amount);
        Ok(())
    }
}

impl PricingVenue for Sandbox {
    fn sell(
        &self,
        venue: &Address,
        token: &Address,
        amount: TokenAmount,
    ) -> CallResult<NativeAmount> {
        let mut world = self.world.lock();
        let system = world.system;
        let rate = world
            .venues
            .get(venue)
            .cloned()
            .ok_or(CallError::UnknownContract(*venue))?;

        let received = NativeAmount::new(amount.get())
            .mul_div(rate.numerator, rate.denominator)
            .ok_or_else(|| CallError::rejected("venue", "quote overflow"))?;

        let ledger = world.ledger_mut(token)?;
        let approved = ledger.allowances.get(venue).copied().unwrap_or_default();
        let left = approved
            .checked_sub(amount)
            .ok_or(CallError::InsufficientAllowance {
                spender: *venue,
                need: amount.get(),
                approved: approved.get(),
            })?;
        move_tokens(ledger, &system, venue, amount)?;
        ledger.allowances.insert(*venue, left);

        world.move_native(venue, &system, received)?;
        Ok(received)
    }
}

impl NativeBank for Sandbox {
    fn held_balance(&self) -> NativeAmount {
        let world = self.world.lock();
        world.native.get(&world.system).copied().unwrap_or_default()
    }

    fn deposit(&self, from: &Address, amount: NativeAmount) -> CallResult<()> {
        let mut world = self.world.lock();
        let system = world.system;
        world.move_native(from, &system, amount)
    }

    fn pay(&self, to: &Address, amount: NativeAmount) -> CallResult<()> {
        let system = {
            let mut world = self.world.lock();
            let system = world.system;
            world.move_native(&system, to, amount)?;
            system
        };

        // The world lock is released so the recipient can call back in.
        let hook = self.hooks.read().get(to).cloned();
        if let Some(hook) = hook {
            if !hook(to, amount) {
                self.world.lock().move_native(to, &system, amount)?;
                return Err(CallError::rejected("native", "recipient refused payment"));
            }
        }
        Ok(())
    }
}

impl AuthorizationRegistry for Sandbox {
    fn has_role(&self, principal: &Address, role: Role) -> bool {
        self.world
            .lock()
            .roles
            .get(principal)
            .map_or(false, |roles| roles.contains(&role))
    }
}

impl PauseStore for Sandbox {
    fn is_paused(&self) -> bool {
        self.world.lock().paused
    }

    fn set_paused(&self, paused: bool) {
        self.world.lock().paused = paused;
    }
}

impl Journal for Sandbox {
    fn checkpoint(&self) -> Checkpoint {
        let mut journal = self.journal.lock();
        journal.push(self.world.lock().clone());
        Checkpoint(journal.len() - 1)
    }

    fn rollback(&self, checkpoint: Checkpoint) {
        let mut journal = self.journal.lock();
        journal.truncate(checkpoint.0 + 1);
        if let Some(saved) = journal.pop() {
            *self.world.lock() = saved;
        }
    }

    fn release(&self, checkpoint: Checkpoint) {
        self.journal.lock().truncate(checkpoint.0);
    }
}
