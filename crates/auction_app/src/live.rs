//! Shell for the live auction page.
//!
//! The page core is pure; this module feeds it messages (clock ticks,
//! stream events, bid verdicts) and runs the effects it asks for against
//! the backend client.

use std::sync::Arc;
use std::time::Duration;

use auction_client::{ApiClient, ApiError, BidSink, BidStream};
use auction_core::{
    update, AuctionPhase, BidEvent, BidOutcome, Effect, LivePageState, LivePageView, Msg, Notice,
    Severity,
};
use chrono::Utc;
use client_logging::{client_debug, client_info, client_warn, set_clock_tick};
use tokio::sync::mpsc;

/// Bridges the live bid stream into the page's message queue.
struct StreamSink {
    tx: mpsc::UnboundedSender<Msg>,
}

impl BidSink for StreamSink {
    fn on_bid(&self, bid: BidEvent) {
        let _ = self.tx.send(Msg::BidReceived(bid));
    }

    fn on_closed(&self, reason: Option<String>) {
        let _ = self.tx.send(Msg::StreamClosed { reason });
    }
}

/// One open live auction page: the core state plus the resources its
/// effects allocate (the bid stream and in-flight bid submissions).
pub struct LiveAuctionPage {
    client: ApiClient,
    state: LivePageState,
    stream: Option<BidStream>,
    msg_tx: mpsc::UnboundedSender<Msg>,
    msg_rx: mpsc::UnboundedReceiver<Msg>,
}

impl LiveAuctionPage {
    /// Loads the item and its bid history and builds the initial page.
    /// The stream is not opened here; the first clock tick decides that.
    pub async fn open(client: ApiClient, item_id: &str) -> Result<Self, ApiError> {
        let detail = client.item_detail(item_id).await?;
        let (snapshot, history) = auction_client::live_page_parts(detail);
        client_info!(
            "opened live page for '{}' with {} recorded bids",
            snapshot.title,
            history.len()
        );
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        Ok(Self {
            client,
            state: LivePageState::new(snapshot, history),
            stream: None,
            msg_tx,
            msg_rx,
        })
    }

    pub fn state(&self) -> &LivePageState {
        &self.state
    }

    pub fn view(&self, now_ms: i64) -> LivePageView {
        self.state.view(now_ms)
    }

    pub fn stream_is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Queues a user edit of the bid input.
    pub fn bid_amount_changed(&mut self, amount: u32) {
        self.apply(Msg::BidAmountChanged(amount));
    }

    /// Queues a bid submission.
    pub fn submit_clicked(&mut self) {
        self.apply(Msg::SubmitClicked);
    }

    /// Advances the page clock to `now_ms` and runs whatever the phase
    /// change implies.
    pub fn tick_at(&mut self, now_ms: i64) {
        set_clock_tick(now_ms as u64);
        self.apply(Msg::ClockTick { now_ms });
    }

    /// Drains messages queued by background tasks (stream events, resolved
    /// bids) into the core.
    pub fn pump_messages(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.apply(msg);
        }
    }

    /// Releases the stream unconditionally. Safe to call more than once.
    pub fn teardown(&mut self) {
        self.apply(Msg::Teardown);
    }

    /// Drives the page at 1 Hz until the auction has ended and the stream
    /// is released.
    pub async fn run_until_ended(&mut self) {
        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        loop {
            ticker.tick().await;
            self.pump_messages();
            let now_ms = Utc::now().timestamp_millis();
            self.tick_at(now_ms);
            self.log_view(now_ms);
            if self.state.phase() == AuctionPhase::Ended && self.stream.is_none() {
                return;
            }
        }
    }

    fn log_view(&self, now_ms: i64) {
        let view = self.state.view(now_ms);
        match view.countdown {
            Some(left) => client_debug!(
                "{:?}: {} at {} ({} bids), {}d {:02}:{:02}:{:02} left",
                view.phase,
                view.title,
                view.current_amount,
                view.history_len,
                left.days,
                left.hours,
                left.minutes,
                left.seconds
            ),
            None => client_debug!(
                "{:?}: {} closed at {} ({} bids)",
                view.phase,
                view.title,
                view.current_amount,
                view.history_len
            ),
        }
    }

    fn apply(&mut self, msg: Msg) {
        if matches!(msg, Msg::StreamClosed { .. }) {
            // The reader task is gone; drop the handle so a later
            // OpenStream effect actually reconnects.
            self.stream = None;
        }
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        for effect in effects {
            self.execute(effect);
        }
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::OpenStream { item_id } => {
                // Open-if-absent keeps re-emitted intents harmless.
                if self.stream.is_none() {
                    let sink = Arc::new(StreamSink {
                        tx: self.msg_tx.clone(),
                    });
                    self.stream = Some(self.client.open_bid_stream(&item_id, sink));
                }
            }
            Effect::CloseStream => {
                if let Some(stream) = self.stream.take() {
                    stream.close();
                }
            }
            Effect::SubmitBid { item_id, amount } => {
                let client = self.client.clone();
                let tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    let outcome = match client.place_bid(&item_id, amount).await {
                        Ok(outcome) => outcome,
                        Err(err) => {
                            client_warn!("bid submission failed in transit: {err}");
                            BidOutcome::Other
                        }
                    };
                    let _ = tx.send(Msg::BidResolved(outcome));
                });
            }
            Effect::Notify(notice) => notify(&notice),
        }
    }
}

impl Drop for LiveAuctionPage {
    fn drop(&mut self) {
        if let Some(stream) = self.stream.take() {
            stream.close();
        }
    }
}

fn notify(notice: &Notice) {
    match notice.severity {
        Severity::Info => client_info!("{}: {}", notice.title, notice.detail),
        Severity::Error if notice.offer_login => {
            client_warn!("{}: {} (log in to continue)", notice.title, notice.detail)
        }
        Severity::Error => client_warn!("{}: {}", notice.title, notice.detail),
    }
}
