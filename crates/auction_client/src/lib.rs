//! Auction client: typed backend access and the live bid stream.
mod client;
mod convert;
mod dates;
mod error;
mod paging;
mod params;
mod query;
mod sse;
mod types;

pub use client::{ApiClient, ClientSettings};
pub use convert::{bid_event, live_page_parts};
pub use dates::{format_iso, parse_iso};
pub use error::{ApiError, LoginUrlError, UploadError};
pub use paging::{probe_page, with_minimum_loading, ItemPager, PageFetcher, MIN_LOADING, PAGE_SIZE};
pub use params::SearchParams;
pub use query::{
    query_string, serialize_deep_object, DateRange, NumberRange, SearchQuery, SortKey, SortOrder,
    SortSpec,
};
pub use sse::{BidSink, BidStream, SseFrame, SseParser};
pub use types::{
    AuctionDraft, BidEventWire, ItemDetail, ItemSummary, ProviderLinks, SearchResult, SsoProvider,
    UnlinkOutcome, UserInfo, UsernameOutcome,
};
