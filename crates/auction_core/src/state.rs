use crate::phase::{phase_at, AuctionPhase};
use crate::view_model::LivePageView;
use crate::{time_left, TimeLeft};

/// Read-only snapshot of an auction item as delivered by the backend.
/// Items are immutable after creation; the page never writes back to it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemSnapshot {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_price: u32,
    pub start_ms: i64,
    pub end_ms: i64,
    pub carousels: Vec<String>,
}

/// One bid as it appears in the history and on the live stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidEvent {
    pub user: String,
    pub bid: u32,
    pub time_ms: i64,
}

/// State of a live auction page.
///
/// `bid_records` is ordered newest-first and append-only from this side;
/// entries arrive either in the initial snapshot or over the live stream.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LivePageState {
    item: ItemSnapshot,
    phase: AuctionPhase,
    stream_open: bool,
    current_bid: Option<BidEvent>,
    bid_records: Vec<BidEvent>,
    entered_bid: u32,
}

impl LivePageState {
    /// Builds the initial page state from an item snapshot and its embedded
    /// bid history (newest-first; the head is the current highest bid).
    pub fn new(item: ItemSnapshot, bid_records: Vec<BidEvent>) -> Self {
        let current_bid = bid_records.first().cloned();
        Self {
            item,
            phase: AuctionPhase::NotStarted,
            stream_open: false,
            current_bid,
            bid_records,
            entered_bid: 0,
        }
    }

    pub fn item(&self) -> &ItemSnapshot {
        &self.item
    }

    pub fn phase(&self) -> AuctionPhase {
        self.phase
    }

    /// Whether the state machine currently wants the live stream open.
    pub fn stream_open(&self) -> bool {
        self.stream_open
    }

    pub fn current_bid(&self) -> Option<&BidEvent> {
        self.current_bid.as_ref()
    }

    pub fn bid_records(&self) -> &[BidEvent] {
        &self.bid_records
    }

    pub fn entered_bid(&self) -> u32 {
        self.entered_bid
    }

    pub(crate) fn set_phase(&mut self, phase: AuctionPhase) {
        self.phase = phase;
    }

    pub(crate) fn set_stream_open(&mut self, open: bool) {
        self.stream_open = open;
    }

    pub(crate) fn set_entered_bid(&mut self, amount: u32) {
        self.entered_bid = amount;
    }

    /// Records a bid arriving on the live stream: it becomes the current
    /// highest bid and is prepended to the history. Existing entries are
    /// never reordered or removed; the stream is trusted as-is.
    pub(crate) fn record_bid(&mut self, bid: BidEvent) {
        self.current_bid = Some(bid.clone());
        self.bid_records.insert(0, bid);
    }

    /// Derives the render model for `now_ms`.
    pub fn view(&self, now_ms: i64) -> LivePageView {
        let countdown: Option<(TimeLeft, AuctionPhase)> = match self.phase {
            AuctionPhase::NotStarted => {
                Some((time_left(now_ms, self.item.start_ms), self.phase))
            }
            AuctionPhase::InProgress => Some((time_left(now_ms, self.item.end_ms), self.phase)),
            AuctionPhase::Ended => None,
        };
        LivePageView {
            title: self.item.title.clone(),
            phase: self.phase,
            current_amount: self
                .current_bid
                .as_ref()
                .map(|b| b.bid)
                .unwrap_or(self.item.start_price),
            current_bidder: self.current_bid.as_ref().map(|b| b.user.clone()),
            countdown: countdown.map(|(t, _)| t),
            can_bid: self.phase == AuctionPhase::InProgress,
            entered_bid: self.entered_bid,
            history_len: self.bid_records.len(),
        }
    }

    /// Re-derives the phase from the clock; used by the tick handler.
    pub(crate) fn derive_phase(&self, now_ms: i64) -> AuctionPhase {
        phase_at(now_ms, self.item.start_ms, self.item.end_ms)
    }
}
