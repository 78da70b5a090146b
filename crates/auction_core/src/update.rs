use crate::effect::{Effect, Notice};
use crate::msg::{BidOutcome, Msg};
use crate::phase::{AuctionPhase, PRE_CONNECT_WINDOW_MS};
use crate::state::LivePageState;

/// Pure update function for the live auction page: applies a message to the
/// state and returns any effects for the shell to run.
pub fn update(mut state: LivePageState, msg: Msg) -> (LivePageState, Vec<Effect>) {
    let effects = match msg {
        Msg::ClockTick { now_ms } => {
            let phase = state.derive_phase(now_ms);
            state.set_phase(phase);

            let want_stream = match phase {
                AuctionPhase::InProgress => true,
                // Pre-connect shortly before the start so the first bid tick
                // right at the opening is not missed.
                AuctionPhase::NotStarted => now_ms >= state.item().start_ms - PRE_CONNECT_WINDOW_MS,
                AuctionPhase::Ended => false,
            };

            if want_stream && !state.stream_open() {
                state.set_stream_open(true);
                vec![Effect::OpenStream {
                    item_id: state.item().id.clone(),
                }]
            } else if !want_stream && state.stream_open() {
                state.set_stream_open(false);
                vec![Effect::CloseStream]
            } else {
                Vec::new()
            }
        }
        Msg::StreamClosed { reason: _ } => {
            // Clearing the intent flag lets the next eligible tick re-open;
            // that is the whole retry policy (1 Hz, no backoff).
            state.set_stream_open(false);
            Vec::new()
        }
        Msg::BidReceived(bid) => {
            state.record_bid(bid);
            Vec::new()
        }
        Msg::BidAmountChanged(amount) => {
            // The bid input only accepts values while the auction runs.
            if state.phase() == AuctionPhase::InProgress {
                state.set_entered_bid(amount);
            }
            Vec::new()
        }
        Msg::SubmitClicked => {
            // UI-boundary guard; the backend rejects out-of-state bids too.
            if state.phase() == AuctionPhase::InProgress && state.entered_bid() > 0 {
                vec![Effect::SubmitBid {
                    item_id: state.item().id.clone(),
                    amount: state.entered_bid(),
                }]
            } else {
                Vec::new()
            }
        }
        Msg::BidResolved(outcome) => {
            if outcome == BidOutcome::Accepted {
                state.set_entered_bid(0);
            }
            vec![Effect::Notify(bid_notice(outcome))]
        }
        Msg::Teardown => {
            // Guaranteed release: close regardless of what the flag says.
            state.set_stream_open(false);
            vec![Effect::CloseStream]
        }
    };

    (state, effects)
}

fn bid_notice(outcome: BidOutcome) -> Notice {
    match outcome {
        BidOutcome::Accepted => Notice::info("Bid placed", "Your bid has been submitted"),
        BidOutcome::AlreadyHighest => {
            Notice::info("Bid placed", "You are already the highest bidder")
        }
        BidOutcome::TooLow => Notice::error("Bid rejected", "Bid amount too low"),
        BidOutcome::Unauthenticated => {
            Notice::error("Bid rejected", "Please log in first").with_login_action()
        }
        BidOutcome::NotStarted => Notice::error("Bid rejected", "The auction has not started"),
        BidOutcome::NotFound => Notice::error("Bid rejected", "Auction not found"),
        BidOutcome::Ended => Notice::error("Bid rejected", "The auction has ended"),
        BidOutcome::Other => Notice::error("Bid rejected", "Please try again later"),
    }
}
