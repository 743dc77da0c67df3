use crate::*;
use chrono::{DateTime, Duration, TimeZone, Utc};
use jackpot_core::{
    Address, Bytes32, EngineSettings, GameConfig, NativeAmount, NativeBank, Role, Sandbox,
    SplitConfig, TokenAmount,
};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

const GUESS_COST: u128 = 1_000_000;
const HINT_COST: u128 = 100_000;
const SECRET: &str = "rustacean";

fn native(v: u128) -> NativeAmount {
    NativeAmount::new(v)
}

fn tokens(v: u128) -> TokenAmount {
    TokenAmount::new(v)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

struct Fixture {
    sandbox: Arc<Sandbox>,
    game: Arc<JackpotGame<Sandbox>>,
    events: Arc<EventBuffer>,
    token: Address,
    market: Address,
    marketing: Address,
    admin: Address,
    operator: Address,
    funder: Address,
    alice: Address,
    bob: Address,
    start: DateTime<Utc>,
}

impl Fixture {
    fn new() -> Self {
        init_tracing();

        let sandbox = Arc::new(Sandbox::new(Address::from_label("jackpot")));
        let token = Address::from_label("token");
        let market = Address::from_label("market");
        let marketing = Address::from_label("marketing");
        let admin = Address::from_label("admin");
        let operator = Address::from_label("operator");
        let funder = Address::from_label("funder");
        let alice = Address::from_label("alice");
        let bob = Address::from_label("bob");

        sandbox.deploy_token(token);
        sandbox.deploy_venue(market, 1, 1000);
        sandbox.credit_native(&market, native(1_000_000));
        sandbox.credit_native(&funder, native(1_000_000));
        sandbox.mint(&token, &alice, tokens(10_000_000)).unwrap();
        sandbox.mint(&token, &bob, tokens(10_000_000)).unwrap();
        sandbox.grant_role(&admin, Role::Admin);
        sandbox.grant_role(&operator, Role::Operator);
        sandbox.grant_role(&funder, Role::Funder);

        let settings = EngineSettings {
            large_batch_threshold: tokens(GUESS_COST),
            ..EngineSettings::default()
        };
        let deployment = Deployment {
            token,
            market,
            marketing_destination: marketing,
            config: GameConfig {
                guess_cost: tokens(GUESS_COST),
                hint_cost: tokens(HINT_COST),
                reveal_delay: 2,
                batch_interval_minutes: 60,
                split: SplitConfig::default(),
            },
        };
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let game = Arc::new(JackpotGame::deploy(sandbox.clone(), settings, deployment, start).unwrap());

        let events = Arc::new(EventBuffer::new());
        game.subscribe(events.clone());

        Self {
            sandbox,
            game,
            events,
            token,
            market,
            marketing,
            admin,
            operator,
            funder,
            alice,
            bob,
            start,
        }
    }

    fn ctx(&self, caller: Address, minutes: i64, confirmation: u64) -> CallContext {
        CallContext::new(caller, self.start + Duration::minutes(minutes), confirmation)
    }

    fn set_secret(&self, word: &str) -> u64 {
        let secret = SecretCommitment::from_word(word);
        self.game
            .set_secret(&self.ctx(self.operator, 0, 0), secret.hash, secret.salt)
            .unwrap()
    }

    fn fund(&self, amount: u128) {
        self.game
            .fund_jackpot(&self.ctx(self.funder, 0, 0), native(amount))
            .unwrap();
    }

    fn commit(&self, player: Address, guess: &str, minutes: i64, confirmation: u64) -> Bytes32 {
        let nonce = generate_nonce();
        self.game
            .commit(
                &self.ctx(player, minutes, confirmation),
                guess_commitment(guess, &nonce),
            )
            .unwrap();
        nonce
    }
}

#[test]
fn test_winning_reveal_pays_and_rotates_pools() {
    let f = Fixture::new();
    f.set_secret(SECRET);
    f.fund(1000);

    let nonce = f.commit(f.alice, SECRET, 1, 10);
    f.events.drain();

    let outcome = f.game.reveal(&f.ctx(f.alice, 2, 12), SECRET, nonce).unwrap();
    assert!(outcome.won);
    assert_eq!(outcome.payout, Some(native(900)));

    let state = f.game.jackpot_state();
    assert_eq!(state.jackpot_amount, native(100));
    assert_eq!(state.next_jackpot_amount, native(0));
    assert_eq!(f.sandbox.native_balance(&f.alice), native(900));
    assert_eq!(f.sandbox.held_balance(), native(100));

    let stats = f.game.stats();
    assert_eq!(stats.total_winners, 1);
    assert_eq!(stats.total_payouts, native(900));
    assert_eq!(stats.last_winner, Some(f.alice));
    assert_eq!(f.game.player(&f.alice).unwrap().wins, 1);
    assert!(f.game.commitment(&f.alice).is_none());

    let events = f.events.drain();
    assert!(events.contains(&GameEvent::GuessRevealed {
        player: f.alice,
        guess: SECRET.to_string(),
        won: true,
    }));
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::JackpotWon { winner, amount, .. } if *winner == f.alice && *amount == native(900)
    )));
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::Announcement { kind: AnnouncementKind::JackpotWon, .. }
    )));
}

#[test]
fn test_losing_reveal_consumes_commitment() {
    let f = Fixture::new();
    f.set_secret(SECRET);
    f.fund(1000);

    let nonce = f.commit(f.bob, "crab", 1, 10);
    let outcome = f.game.reveal(&f.ctx(f.bob, 2, 12), "crab", nonce).unwrap();

    assert_eq!(outcome, RevealOutcome { won: false, payout: None });
    assert!(f.game.commitment(&f.bob).is_none());
    assert_eq!(f.game.jackpot_state().jackpot_amount, native(1000));

    let err = f.game.reveal(&f.ctx(f.bob, 3, 13), "crab", nonce).unwrap_err();
    assert!(matches!(err, JackpotError::NoCommitment(addr) if addr == f.bob));
}

#[test]
fn test_reveal_too_early_keeps_commitment() {
    let f = Fixture::new();
    f.set_secret(SECRET);

    let nonce = f.commit(f.alice, "crab", 0, 10);
    let err = f.game.reveal(&f.ctx(f.alice, 0, 11), "crab", nonce).unwrap_err();
    assert!(matches!(
        err,
        JackpotError::RevealTooEarly { ready_at: 12, current: 11 }
    ));
    assert!(f.game.commitment(&f.alice).is_some());

    f.game.reveal(&f.ctx(f.alice, 0, 12), "crab", nonce).unwrap();
}

#[test]
fn test_second_commit_overwrites_without_refund() {
    let f = Fixture::new();
    f.set_secret(SECRET);

    let first = f.commit(f.alice, "first", 0, 10);
    let second = f.commit(f.alice, "second", 0, 10);

    assert_eq!(
        f.sandbox.token_balance(&f.token, &f.alice),
        tokens(10_000_000 - 2 * GUESS_COST)
    );
    assert_eq!(f.game.jackpot_state().accumulated_fees, tokens(2 * GUESS_COST));
    assert_eq!(f.game.stats().total_guesses, 2);
    assert_eq!(f.game.stats().unique_players, 1);
    assert!(f
        .events
        .snapshot()
        .iter()
        .any(|e| matches!(e, GameEvent::CommitmentReplaced { player, .. } if *player == f.alice)));

    let err = f.game.reveal(&f.ctx(f.alice, 0, 12), "first", first).unwrap_err();
    assert!(matches!(err, JackpotError::CommitmentMismatch));
    f.game.reveal(&f.ctx(f.alice, 0, 12), "second", second).unwrap();
}

#[test]
fn test_commit_requires_fee_and_nonzero_hash() {
    let f = Fixture::new();
    let carol = Address::from_label("carol");

    let err = f
        .game
        .commit(&f.ctx(carol, 0, 1), guess_commitment("crab", &generate_nonce()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExternalCall);

    let err = f.game.commit(&f.ctx(f.alice, 0, 1), Bytes32::ZERO).unwrap_err();
    assert!(matches!(err, JackpotError::InvalidParameter(_)));

    assert_eq!(f.game.stats().total_guesses, 0);
    assert!(f.events.snapshot().is_empty());
}

#[test]
fn test_replaced_secret_voids_outstanding_commitments() {
    let f = Fixture::new();
    assert_eq!(f.set_secret(SECRET), 1);

    let nonce = f.commit(f.alice, SECRET, 0, 10);
    assert_eq!(f.set_secret("ferris"), 2);

    let jackpot_before = f.game.jackpot_state().jackpot_amount;
    let outcome = f.game.reveal(&f.ctx(f.alice, 0, 20), SECRET, nonce).unwrap();
    assert_eq!(outcome, RevealOutcome { won: false, payout: None });
    assert!(f.game.commitment(&f.alice).is_none());
    assert_eq!(f.game.jackpot_state().jackpot_amount, jackpot_before);
    assert_eq!(f.game.stats().total_winners, 0);
    assert_eq!(f.game.secret_epoch(), 2);
}

#[test]
fn test_pause_blocks_every_role_until_admin_unpauses() {
    let f = Fixture::new();
    f.set_secret(SECRET);

    f.game.pause(&f.ctx(f.admin, 0, 0)).unwrap();
    assert!(f.game.is_paused());

    let err = f
        .game
        .commit(&f.ctx(f.alice, 0, 1), guess_commitment("crab", &generate_nonce()))
        .unwrap_err();
    assert!(matches!(err, JackpotError::Paused));
    assert!(matches!(
        f.game.fund_jackpot(&f.ctx(f.funder, 0, 0), native(10)),
        Err(JackpotError::Paused)
    ));
    assert!(matches!(
        f.game.add_hint(&f.ctx(f.operator, 0, 0), "a hint"),
        Err(JackpotError::Paused)
    ));
    assert!(matches!(
        f.game.update_split(&f.ctx(f.admin, 0, 0), 25, 50, 15, 10),
        Err(JackpotError::Paused)
    ));
    assert!(matches!(
        f.game.unpause(&f.ctx(f.operator, 0, 0)),
        Err(JackpotError::MissingRole { role: Role::Admin, .. })
    ));

    f.game.unpause(&f.ctx(f.admin, 0, 0)).unwrap();
    assert!(!f.game.is_paused());
    assert!(matches!(
        f.game.unpause(&f.ctx(f.admin, 0, 0)),
        Err(JackpotError::NotPaused)
    ));
    f.commit(f.alice, "crab", 0, 1);
}

#[test]
fn test_privileged_operations_check_roles() {
    let f = Fixture::new();
    let secret = SecretCommitment::from_word(SECRET);

    let err = f
        .game
        .set_secret(&f.ctx(f.alice, 0, 0), secret.hash, secret.salt)
        .unwrap_err();
    assert!(matches!(
        err,
        JackpotError::MissingRole { principal, role: Role::Operator } if principal == f.alice
    ));
    assert_eq!(err.kind(), ErrorKind::Authorization);

    assert!(matches!(
        f.game.fund_jackpot(&f.ctx(f.operator, 0, 0), native(10)),
        Err(JackpotError::MissingRole { role: Role::Funder, .. })
    ));
    assert!(matches!(
        f.game.pause(&f.ctx(f.operator, 0, 0)),
        Err(JackpotError::MissingRole { role: Role::Admin, .. })
    ));
    assert!(matches!(
        f.game.update_split(&f.ctx(f.operator, 0, 0), 25, 50, 15, 10),
        Err(JackpotError::MissingRole { role: Role::Admin, .. })
    ));
    assert!(matches!(
        f.game.settle_fees(&f.ctx(f.admin, 0, 0)),
        Err(JackpotError::MissingRole { role: Role::Operator, .. })
    ));
    assert!(f.game.secret_hash().is_none());
}

#[test]
fn test_reentrant_call_from_payout_recipient_is_rejected() {
    let f = Fixture::new();
    f.set_secret(SECRET);
    f.fund(1000);
    let nonce = f.commit(f.alice, SECRET, 0, 10);

    let observed: Arc<Mutex<Option<(bool, NativeAmount)>>> = Arc::new(Mutex::new(None));
    let weak: Weak<JackpotGame<Sandbox>> = Arc::downgrade(&f.game);
    let start = f.start;
    let slot = observed.clone();
    f.sandbox.on_receive(
        f.alice,
        Arc::new(move |player: &Address, _amount: NativeAmount| {
            if let Some(game) = weak.upgrade() {
                let ctx = CallContext::new(*player, start, 13);
                let nested = game.commit(&ctx, guess_commitment("again", &generate_nonce()));
                let rejected = matches!(nested, Err(JackpotError::Reentrancy));
                *slot.lock() = Some((rejected, game.jackpot_info().jackpot));
            }
            true
        }),
    );

    let outcome = f.game.reveal(&f.ctx(f.alice, 0, 12), SECRET, nonce).unwrap();
    assert!(outcome.won);

    // Pools were already rotated when the recipient ran.
    assert_eq!(*observed.lock(), Some((true, native(100))));
    assert_eq!(f.game.stats().total_guesses, 1);
    assert!(f.game.commitment(&f.alice).is_none());
}

#[test]
fn test_refused_payout_rolls_back_everything() {
    let f = Fixture::new();
    f.set_secret(SECRET);
    f.fund(1000);
    let nonce = f.commit(f.alice, SECRET, 0, 10);
    f.events.drain();

    f.sandbox
        .on_receive(f.alice, Arc::new(|_: &Address, _: NativeAmount| false));
    let err = f.game.reveal(&f.ctx(f.alice, 0, 12), SECRET, nonce).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExternalCall);

    assert!(f.game.commitment(&f.alice).is_some());
    assert_eq!(f.game.stats().total_winners, 0);
    assert_eq!(f.game.jackpot_state().jackpot_amount, native(1000));
    assert_eq!(f.sandbox.held_balance(), native(1000));
    assert_eq!(f.sandbox.native_balance(&f.alice), native(0));
    assert!(f.events.snapshot().is_empty());

    // The same reveal succeeds once the recipient accepts payment.
    f.sandbox.clear_hook(&f.alice);
    let outcome = f.game.reveal(&f.ctx(f.alice, 0, 12), SECRET, nonce).unwrap();
    assert_eq!(outcome.payout, Some(native(900)));
}

#[test]
fn test_settle_fees_splits_proceeds() {
    let f = Fixture::new();
    f.set_secret(SECRET);
    f.commit(f.alice, "crab", 0, 1);
    f.events.drain();

    let report = f
        .game
        .settle_fees(&f.ctx(f.operator, 5, 2))
        .unwrap()
        .unwrap();
    assert_eq!(report.plan.total, tokens(1_000_000));
    assert_eq!(report.plan.burn, tokens(300_000));
    assert_eq!(report.plan.to_sell, tokens(700_000));
    assert_eq!(report.received, native(700));
    assert_eq!(report.proceeds.jackpot_share, native(450));
    assert_eq!(report.proceeds.next_jackpot_share, native(150));
    assert_eq!(report.proceeds.marketing_share, native(100));

    let state = f.game.jackpot_state();
    assert_eq!(state.jackpot_amount, native(450));
    assert_eq!(state.next_jackpot_amount, native(150));
    assert_eq!(state.accumulated_fees, TokenAmount::ZERO);
    assert_eq!(state.last_batch_time, f.start + Duration::minutes(5));

    assert_eq!(f.sandbox.burned(&f.token), tokens(300_000));
    assert_eq!(f.sandbox.native_balance(&f.marketing), native(100));
    assert_eq!(f.sandbox.held_balance(), native(600));
    assert_eq!(f.game.unallocated_balance(), native(0));

    let events = f.events.drain();
    assert!(events.iter().any(|e| matches!(e, GameEvent::BatchProcessed { .. })));
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::Announcement { kind: AnnouncementKind::LargeBatch, .. }
    )));

    // Nothing left to settle.
    assert!(f.game.settle_fees(&f.ctx(f.operator, 6, 3)).unwrap().is_none());
}

#[test]
fn test_refused_marketing_payment_aborts_the_batch() {
    let f = Fixture::new();
    f.set_secret(SECRET);
    f.commit(f.alice, "crab", 0, 1);
    f.events.drain();

    f.sandbox
        .on_receive(f.marketing, Arc::new(|_: &Address, _: NativeAmount| false));
    let err = f.game.settle_fees(&f.ctx(f.operator, 5, 2)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExternalCall);

    let state = f.game.jackpot_state();
    assert_eq!(state.accumulated_fees, tokens(GUESS_COST));
    assert_eq!(state.jackpot_amount, native(0));
    assert_eq!(state.next_jackpot_amount, native(0));
    assert_eq!(state.last_batch_time, f.start);
    assert_eq!(f.sandbox.burned(&f.token), TokenAmount::ZERO);
    assert_eq!(f.sandbox.held_balance(), native(0));
    assert_eq!(f.sandbox.native_balance(&f.marketing), native(0));
    assert!(f.events.snapshot().is_empty());

    f.sandbox.clear_hook(&f.marketing);
    let report = f.game.settle_fees(&f.ctx(f.operator, 6, 3)).unwrap().unwrap();
    assert_eq!(report.proceeds.marketing_share, native(100));
    assert_eq!(f.sandbox.native_balance(&f.marketing), native(100));
}

#[test]
fn test_reentrant_call_from_marketing_recipient_is_rejected() {
    let f = Fixture::new();
    f.set_secret(SECRET);
    f.commit(f.alice, "crab", 0, 1);

    let observed: Arc<Mutex<Option<bool>>> = Arc::new(Mutex::new(None));
    let weak: Weak<JackpotGame<Sandbox>> = Arc::downgrade(&f.game);
    let bob = f.bob;
    let start = f.start;
    let slot = observed.clone();
    f.sandbox.on_receive(
        f.marketing,
        Arc::new(move |_: &Address, _amount: NativeAmount| {
            if let Some(game) = weak.upgrade() {
                let ctx = CallContext::new(bob, start, 2);
                let nested = game.commit(&ctx, guess_commitment("again", &generate_nonce()));
                *slot.lock() = Some(matches!(nested, Err(JackpotError::Reentrancy)));
            }
            true
        }),
    );

    let report = f.game.settle_fees(&f.ctx(f.operator, 5, 2)).unwrap();
    assert!(report.is_some());
    assert_eq!(*observed.lock(), Some(true));

    assert!(f.game.commitment(&f.bob).is_none());
    assert_eq!(f.game.stats().total_guesses, 1);
    assert_eq!(f.sandbox.token_balance(&f.token, &f.bob), tokens(10_000_000));
    assert_eq!(f.sandbox.native_balance(&f.marketing), native(100));
}

#[test]
fn test_batch_runs_once_interval_elapses() {
    let f = Fixture::new();
    f.set_secret(SECRET);

    f.commit(f.alice, "crab", 0, 1);
    f.commit(f.bob, "lobster", 59, 2);
    assert_eq!(f.game.jackpot_state().accumulated_fees, tokens(2 * GUESS_COST));

    f.commit(f.alice, "shrimp", 60, 3);
    let state = f.game.jackpot_state();
    assert_eq!(state.accumulated_fees, TokenAmount::ZERO);
    // 3,000,000 fees: 900,000 burned, 2,100 native received.
    assert_eq!(state.jackpot_amount, native(1350));
    assert_eq!(state.next_jackpot_amount, native(450));
    assert_eq!(f.sandbox.native_balance(&f.marketing), native(300));
}

#[test]
fn test_batch_is_checked_after_a_win() {
    let f = Fixture::new();
    f.set_secret(SECRET);
    f.fund(1000);
    let nonce = f.commit(f.alice, SECRET, 0, 10);

    let outcome = f.game.reveal(&f.ctx(f.alice, 60, 12), SECRET, nonce).unwrap();
    assert_eq!(outcome.payout, Some(native(900)));

    // Rotation first (1000 -> 100), then the batch adds 450 and 150.
    let state = f.game.jackpot_state();
    assert_eq!(state.jackpot_amount, native(550));
    assert_eq!(state.next_jackpot_amount, native(150));
    assert_eq!(state.accumulated_fees, TokenAmount::ZERO);
    assert_eq!(f.sandbox.held_balance(), native(700));
}

#[test]
fn test_win_after_batch_rotates_both_pools() {
    let f = Fixture::new();
    f.set_secret(SECRET);
    f.fund(1000);
    let nonce = f.commit(f.alice, SECRET, 0, 10);
    f.game.settle_fees(&f.ctx(f.operator, 1, 11)).unwrap();

    let outcome = f.game.reveal(&f.ctx(f.alice, 2, 12), SECRET, nonce).unwrap();
    assert_eq!(outcome.payout, Some(native(1305)));

    let info = f.game.jackpot_info();
    assert_eq!(info.jackpot, native(280));
    assert_eq!(info.next_jackpot, native(15));
    assert_eq!(f.sandbox.held_balance(), native(295));
}

#[test]
fn test_failed_sale_keeps_fees_accumulated() {
    let f = Fixture::new();
    f.set_secret(SECRET);
    f.commit(f.alice, "crab", 0, 1);
    let nonce = f.commit(f.bob, "lobster", 0, 3);

    let broken_market = Address::from_label("no-such-market");
    f.game
        .request_change(&f.ctx(f.admin, 0, 0), None, Some(broken_market))
        .unwrap();
    f.game
        .execute_change(&f.ctx(f.admin, 48 * 60, 0))
        .unwrap();
    assert_eq!(f.game.dependencies().market, broken_market);

    let err = f.game.settle_fees(&f.ctx(f.operator, 48 * 60, 4)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExternalCall);

    assert_eq!(f.game.jackpot_state().accumulated_fees, tokens(2 * GUESS_COST));
    assert_eq!(f.sandbox.burned(&f.token), TokenAmount::ZERO);
    assert_eq!(
        f.sandbox.token_balance(&f.token, &f.sandbox.system()),
        tokens(2 * GUESS_COST)
    );

    // A reveal that trips the same batch is aborted too.
    let err = f
        .game
        .reveal(&f.ctx(f.bob, 49 * 60, 5), "lobster", nonce)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExternalCall);
    assert!(f.game.commitment(&f.bob).is_some());
}

#[test]
fn test_governance_timelock() {
    let f = Fixture::new();
    f.set_secret(SECRET);
    let new_token = Address::from_label("token-v2");
    let new_market = Address::from_label("market-v2");

    let change = f
        .game
        .request_change(&f.ctx(f.admin, 0, 0), Some(new_token), Some(new_market))
        .unwrap();
    assert_eq!(change.requested_at, f.start);
    assert!(matches!(
        f.game.request_change(&f.ctx(f.admin, 1, 0), None, None),
        Err(JackpotError::ChangeAlreadyPending)
    ));

    let boundary = 48 * 60;
    let err = f.game.execute_change(&f.ctx(f.admin, boundary - 1, 0)).unwrap_err();
    assert!(matches!(err, JackpotError::TimelockActive { remaining_secs: 60 }));

    // Fees denominated in the old token must be settled first.
    f.commit(f.alice, "crab", 10, 1);
    let err = f.game.execute_change(&f.ctx(f.admin, boundary, 0)).unwrap_err();
    assert!(matches!(err, JackpotError::UnsettledFees));
    assert!(f.game.pending_change().is_some());

    f.game.settle_fees(&f.ctx(f.operator, boundary, 2)).unwrap();
    let deps = f.game.execute_change(&f.ctx(f.admin, boundary, 0)).unwrap();
    assert_eq!(deps.token, new_token);
    assert_eq!(deps.market, new_market);
    assert!(f.game.pending_change().is_none());
    assert!(f
        .events
        .snapshot()
        .iter()
        .any(|e| matches!(e, GameEvent::ChangeExecuted { .. })));
}

#[test]
fn test_cancel_change() {
    let f = Fixture::new();
    assert!(matches!(
        f.game.cancel_change(&f.ctx(f.admin, 0, 0)),
        Err(JackpotError::NoPendingChange)
    ));

    f.game
        .request_change(&f.ctx(f.admin, 0, 0), Some(Address::from_label("token-v2")), None)
        .unwrap();
    f.game.cancel_change(&f.ctx(f.admin, 1, 0)).unwrap();
    assert!(f.game.pending_change().is_none());
    assert_eq!(f.game.dependencies().token, f.token);
    assert_eq!(f.game.dependencies().market, f.market);

    assert!(matches!(
        f.game.request_change(&f.ctx(f.admin, 2, 0), Some(Address::ZERO), None),
        Err(JackpotError::InvalidParameter(_))
    ));
}

#[test]
fn test_hints() {
    let f = Fixture::new();

    assert!(matches!(
        f.game.hint(0),
        Err(JackpotError::HintOutOfRange { index: 0, count: 0 })
    ));
    assert!(matches!(
        f.game.request_hint(&f.ctx(f.alice, 0, 1)),
        Err(JackpotError::NoHints)
    ));
    assert_eq!(f.sandbox.token_balance(&f.token, &f.alice), tokens(10_000_000));

    assert_eq!(f.game.add_hint(&f.ctx(f.operator, 0, 0), "It has claws").unwrap(), 0);
    assert_eq!(f.game.add_hint(&f.ctx(f.operator, 0, 0), "It loves memory safety").unwrap(), 1);
    assert!(f.game.add_hint(&f.ctx(f.operator, 0, 0), "  ").is_err());

    let hint = f.game.request_hint(&f.ctx(f.alice, 0, 1)).unwrap();
    assert_eq!(hint.index, 1);
    assert_eq!(hint.text, "It loves memory safety");
    assert_eq!(
        f.sandbox.token_balance(&f.token, &f.alice),
        tokens(10_000_000 - HINT_COST)
    );
    assert_eq!(f.game.player(&f.alice).unwrap().hints_bought, 1);
    assert_eq!(f.game.jackpot_state().accumulated_fees, tokens(HINT_COST));

    assert_eq!(f.game.hint(0).unwrap().text, "It has claws");
    assert!(matches!(
        f.game.hint(2),
        Err(JackpotError::HintOutOfRange { index: 2, count: 2 })
    ));
}

#[test]
fn test_rejected_split_keeps_previous_config() {
    let f = Fixture::new();

    let err = f
        .game
        .update_split(&f.ctx(f.admin, 0, 0), 30, 45, 15, 9)
        .unwrap_err();
    assert!(matches!(err, JackpotError::InvalidSplit(_)));
    assert_eq!(f.game.split(), SplitConfig::default());
    assert!(f.events.snapshot().is_empty());

    let split = f
        .game
        .update_split(&f.ctx(f.admin, 0, 0), 20, 50, 20, 10)
        .unwrap();
    assert_eq!(f.game.split(), split);
}

#[test]
fn test_operator_tunables() {
    let f = Fixture::new();
    let ctx = f.ctx(f.operator, 0, 0);

    f.game.set_costs(&ctx, tokens(5), tokens(1)).unwrap();
    assert_eq!(f.game.config().guess_cost, tokens(5));
    assert_eq!(f.game.config().hint_cost, tokens(1));

    assert!(matches!(
        f.game.set_reveal_delay(&ctx, 0),
        Err(JackpotError::InvalidParameter(_))
    ));
    f.game.set_reveal_delay(&ctx, 5).unwrap();
    assert_eq!(f.game.config().reveal_delay, 5);

    f.game.set_batch_interval(&ctx, 0).unwrap();
    f.commit(f.alice, "crab", 24 * 60, 1);
    assert_eq!(f.game.jackpot_state().accumulated_fees, tokens(5));

    assert!(f.game.emit_game_update(&ctx, "").is_err());
    f.game.emit_game_update(&ctx, "Double hints this weekend").unwrap();
    assert!(f.events.snapshot().contains(&GameEvent::announce(
        AnnouncementKind::GameUpdate,
        "Double hints this weekend"
    )));
}

#[test]
fn test_funding_and_marketing_destination() {
    let f = Fixture::new();

    assert!(matches!(
        f.game.fund_jackpot(&f.ctx(f.funder, 0, 0), NativeAmount::ZERO),
        Err(JackpotError::InvalidParameter(_))
    ));
    let err = f
        .game
        .fund_jackpot(&f.ctx(f.funder, 0, 0), native(2_000_000))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExternalCall);

    f.fund(500);
    f.fund(250);
    assert_eq!(f.game.jackpot_info().jackpot, native(750));
    assert_eq!(f.sandbox.native_balance(&f.funder), native(1_000_000 - 750));

    let admin = f.ctx(f.admin, 0, 0);
    assert!(f.game.set_marketing_destination(&admin, Address::ZERO).is_err());
    let wallet = Address::from_label("new-marketing");
    f.game.set_marketing_destination(&admin, wallet).unwrap();
    assert_eq!(f.game.marketing_destination(), wallet);
}

#[test]
fn test_snapshot_restores_engine() {
    let f = Fixture::new();
    f.set_secret(SECRET);
    f.fund(1000);
    let nonce = f.commit(f.alice, SECRET, 0, 10);

    let json = serde_json::to_string(&f.game.snapshot()).unwrap();
    let state: GameState = serde_json::from_str(&json).unwrap();
    let restored =
        JackpotGame::restore(f.sandbox.clone(), f.game.settings().clone(), state).unwrap();

    assert_eq!(restored.id(), f.game.id());
    let outcome = restored.reveal(&f.ctx(f.alice, 1, 12), SECRET, nonce).unwrap();
    assert!(outcome.won);
}
