use crate::phase::{AuctionPhase, TimeLeft};

/// Render model for the live auction page, derived per tick.
///
/// `countdown` targets the start time while the auction has not started and
/// the end time while it runs; once ended there is nothing left to count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivePageView {
    pub title: String,
    pub phase: AuctionPhase,
    /// Current highest bid, or the start price while there are no bids.
    pub current_amount: u32,
    pub current_bidder: Option<String>,
    pub countdown: Option<TimeLeft>,
    pub can_bid: bool,
    pub entered_bid: u32,
    pub history_len: usize,
}
