use crate::state::BidEvent;

/// Backend verdict on a submitted bid, one arm per documented status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidOutcome {
    /// 201: the bid was accepted as the new highest.
    Accepted,
    /// 200: the caller already holds the highest bid.
    AlreadyHighest,
    /// 400: the amount is below the current bid.
    TooLow,
    /// 401: not logged in.
    Unauthenticated,
    /// 403: the auction has not started yet.
    NotStarted,
    /// 404: no such auction.
    NotFound,
    /// 410: the auction is over.
    Ended,
    /// Anything else, including transport failures.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// One-second cadence from the shell; carries the wall clock.
    ClockTick { now_ms: i64 },
    /// The live stream closed, either on failure or server end. The next
    /// eligible tick re-opens it.
    StreamClosed { reason: Option<String> },
    /// A bid event arrived on the live stream.
    BidReceived(BidEvent),
    /// User edited the bid amount input.
    BidAmountChanged(u32),
    /// User pressed the bid button.
    SubmitClicked,
    /// The backend answered a submitted bid.
    BidResolved(BidOutcome),
    /// The page is going away; release everything.
    Teardown,
}
