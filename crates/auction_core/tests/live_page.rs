use std::sync::Once;

use auction_core::{
    update, AuctionPhase, BidEvent, BidOutcome, Effect, ItemSnapshot, LivePageState, Msg, Severity,
};
use pretty_assertions::assert_eq;

const T0: i64 = 1_700_000_000_000;
const T1: i64 = T0 + 3_600_000;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

fn sample_item() -> ItemSnapshot {
    ItemSnapshot {
        id: "item-1".to_string(),
        title: "Walnut writing desk".to_string(),
        description: "<p>Solid walnut, 1930s.</p>".to_string(),
        start_price: 100,
        start_ms: T0,
        end_ms: T1,
        carousels: Vec::new(),
    }
}

fn bid(user: &str, amount: u32, time_ms: i64) -> BidEvent {
    BidEvent {
        user: user.to_string(),
        bid: amount,
        time_ms,
    }
}

fn tick(state: LivePageState, now_ms: i64) -> (LivePageState, Vec<Effect>) {
    update(state, Msg::ClockTick { now_ms })
}

#[test]
fn stream_policy_follows_the_phase_windows() {
    init_logging();
    let state = LivePageState::new(sample_item(), Vec::new());

    // Two minutes before start: not started, no stream.
    let (state, effects) = tick(state, T0 - 120_000);
    assert_eq!(state.phase(), AuctionPhase::NotStarted);
    assert!(!state.stream_open());
    assert!(effects.is_empty());

    // Thirty seconds before start: still not started, but pre-connected.
    let (state, effects) = tick(state, T0 - 30_000);
    assert_eq!(state.phase(), AuctionPhase::NotStarted);
    assert!(state.stream_open());
    assert_eq!(
        effects,
        vec![Effect::OpenStream {
            item_id: "item-1".to_string()
        }]
    );

    // Just after start: in progress, stream stays open without re-opening.
    let (state, effects) = tick(state, T0 + 1);
    assert_eq!(state.phase(), AuctionPhase::InProgress);
    assert!(state.stream_open());
    assert!(effects.is_empty());

    // Just after end: ended, stream closed.
    let (state, effects) = tick(state, T1 + 1);
    assert_eq!(state.phase(), AuctionPhase::Ended);
    assert!(!state.stream_open());
    assert_eq!(effects, vec![Effect::CloseStream]);

    // Staying ended requests nothing further.
    let (_state, effects) = tick(state, T1 + 2_000);
    assert!(effects.is_empty());
}

#[test]
fn closed_stream_reopens_on_next_eligible_tick() {
    init_logging();
    let state = LivePageState::new(sample_item(), Vec::new());
    let (state, _) = tick(state, T0 + 1);
    assert!(state.stream_open());

    let (state, effects) = update(
        state,
        Msg::StreamClosed {
            reason: Some("connection reset".to_string()),
        },
    );
    assert!(!state.stream_open());
    assert!(effects.is_empty());

    // Self-healing retry rides the one-second cadence.
    let (state, effects) = tick(state, T0 + 1_001);
    assert!(state.stream_open());
    assert_eq!(
        effects,
        vec![Effect::OpenStream {
            item_id: "item-1".to_string()
        }]
    );
}

#[test]
fn teardown_always_closes_the_stream() {
    init_logging();
    // Even while not started and outside the pre-connect window.
    let state = LivePageState::new(sample_item(), Vec::new());
    let (state, _) = tick(state, T0 - 120_000);
    let (state, effects) = update(state, Msg::Teardown);
    assert_eq!(effects, vec![Effect::CloseStream]);
    assert!(!state.stream_open());
}

#[test]
fn bids_prepend_newest_first_and_replace_current() {
    init_logging();
    let state = LivePageState::new(sample_item(), Vec::new());
    let e1 = bid("alice", 110, T0 + 5_000);
    let e2 = bid("bob", 120, T0 + 9_000);

    let (state, _) = update(state, Msg::BidReceived(e1.clone()));
    let (state, _) = update(state, Msg::BidReceived(e2.clone()));

    assert_eq!(state.bid_records(), &[e2.clone(), e1]);
    assert_eq!(state.current_bid(), Some(&e2));
}

#[test]
fn duplicate_stream_events_pass_straight_through() {
    init_logging();
    // At-least-once delivery is trusted as-is; no dedup.
    let state = LivePageState::new(sample_item(), Vec::new());
    let e1 = bid("alice", 110, T0 + 5_000);
    let (state, _) = update(state, Msg::BidReceived(e1.clone()));
    let (state, _) = update(state, Msg::BidReceived(e1.clone()));
    assert_eq!(state.bid_records(), &[e1.clone(), e1]);
}

#[test]
fn snapshot_history_seeds_current_bid() {
    init_logging();
    let e1 = bid("alice", 110, T0 + 5_000);
    let e0 = bid("carol", 105, T0 + 2_000);
    let state = LivePageState::new(sample_item(), vec![e1.clone(), e0]);
    assert_eq!(state.current_bid(), Some(&e1));
}

#[test]
fn bid_entry_is_guarded_outside_in_progress() {
    init_logging();
    let state = LivePageState::new(sample_item(), Vec::new());

    // Before the start, neither input nor submission does anything.
    let (state, _) = tick(state, T0 - 120_000);
    let (state, effects) = update(state, Msg::BidAmountChanged(150));
    assert_eq!(state.entered_bid(), 0);
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::SubmitClicked);
    assert!(effects.is_empty());

    // While running, both work.
    let (state, _) = tick(state, T0 + 1);
    let (state, _) = update(state, Msg::BidAmountChanged(150));
    assert_eq!(state.entered_bid(), 150);
    let (state, effects) = update(state, Msg::SubmitClicked);
    assert_eq!(
        effects,
        vec![Effect::SubmitBid {
            item_id: "item-1".to_string(),
            amount: 150,
        }]
    );

    // After the end, submission is blocked again.
    let (state, _) = tick(state, T1 + 1);
    let (_state, effects) = update(state, Msg::SubmitClicked);
    assert!(effects.is_empty());
}

#[test]
fn zero_amount_is_never_submitted() {
    init_logging();
    let state = LivePageState::new(sample_item(), Vec::new());
    let (state, _) = tick(state, T0 + 1);
    let (_state, effects) = update(state, Msg::SubmitClicked);
    assert!(effects.is_empty());
}

#[test]
fn accepted_bid_clears_the_input_and_notifies() {
    init_logging();
    let state = LivePageState::new(sample_item(), Vec::new());
    let (state, _) = tick(state, T0 + 1);
    let (state, _) = update(state, Msg::BidAmountChanged(150));

    let (state, effects) = update(state, Msg::BidResolved(BidOutcome::Accepted));
    assert_eq!(state.entered_bid(), 0);
    assert_eq!(effects.len(), 1);
    match &effects[0] {
        Effect::Notify(notice) => assert_eq!(notice.severity, Severity::Info),
        other => panic!("unexpected effect {other:?}"),
    }
}

#[test]
fn rejected_bid_keeps_the_input_for_correction() {
    init_logging();
    let state = LivePageState::new(sample_item(), Vec::new());
    let (state, _) = tick(state, T0 + 1);
    let (state, _) = update(state, Msg::BidAmountChanged(150));

    let (state, effects) = update(state, Msg::BidResolved(BidOutcome::TooLow));
    assert_eq!(state.entered_bid(), 150);
    match &effects[0] {
        Effect::Notify(notice) => {
            assert_eq!(notice.severity, Severity::Error);
            assert!(!notice.offer_login);
        }
        other => panic!("unexpected effect {other:?}"),
    }
}

#[test]
fn unauthenticated_bid_offers_a_login_action() {
    init_logging();
    let state = LivePageState::new(sample_item(), Vec::new());
    let (_state, effects) = update(state, Msg::BidResolved(BidOutcome::Unauthenticated));
    match &effects[0] {
        Effect::Notify(notice) => assert!(notice.offer_login),
        other => panic!("unexpected effect {other:?}"),
    }
}

#[test]
fn view_targets_start_then_end_then_hides_the_timer() {
    init_logging();
    let state = LivePageState::new(sample_item(), Vec::new());

    let (state, _) = tick(state, T0 - 10_000);
    let view = state.view(T0 - 10_000);
    assert_eq!(view.countdown.unwrap().seconds, 10);
    assert!(!view.can_bid);
    assert_eq!(view.current_amount, 100);

    let (state, _) = tick(state, T1 - 90_000);
    let view = state.view(T1 - 90_000);
    let countdown = view.countdown.unwrap();
    assert_eq!((countdown.minutes, countdown.seconds), (1, 30));
    assert!(view.can_bid);

    let (state, _) = tick(state, T1 + 1);
    let view = state.view(T1 + 1);
    assert!(view.countdown.is_none());
    assert!(!view.can_bid);
}
