use auction_core::{BidEvent, ItemSnapshot};

use crate::types::{BidEventWire, ItemDetail};

/// Wire bid event into the core's epoch-millisecond form.
pub fn bid_event(wire: BidEventWire) -> BidEvent {
    BidEvent {
        user: wire.user,
        bid: wire.bid,
        time_ms: wire.time.timestamp_millis(),
    }
}

/// Splits an item detail response into the core's immutable snapshot and
/// the newest-first bid history that seeds the live page.
pub fn live_page_parts(detail: ItemDetail) -> (ItemSnapshot, Vec<BidEvent>) {
    let snapshot = ItemSnapshot {
        id: detail.id,
        title: detail.title,
        description: detail.description,
        start_price: detail.start_price,
        start_ms: detail.start_time.timestamp_millis(),
        end_ms: detail.end_time.timestamp_millis(),
        carousels: detail.carousels,
    };
    let history = detail.bid_records.into_iter().map(bid_event).collect();
    (snapshot, history)
}
