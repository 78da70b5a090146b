//! Cursor-driven page fetching on top of [`SearchCursor`].
//!
//! Every page request probes one item past the display size, so reaching the
//! exact end of the result set never shows a dead "next" affordance.

use std::future::Future;
use std::ops::Range;
use std::time::Duration;

use async_trait::async_trait;
use auction_core::{Advance, CachedPage, SearchCursor};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::query::SearchQuery;
use crate::types::ItemSummary;

/// Items shown per page.
pub const PAGE_SIZE: usize = 20;

/// Floor applied to page loads so fast responses do not flash.
pub const MIN_LOADING: Duration = Duration::from_millis(500);

/// Runs `fut` and sleeps out the remainder of `floor` when it finishes early.
pub async fn with_minimum_loading<F, T>(floor: Duration, fut: F) -> T
where
    F: Future<Output = T>,
{
    let started = tokio::time::Instant::now();
    let value = fut.await;
    let elapsed = started.elapsed();
    if elapsed < floor {
        tokio::time::sleep(floor - elapsed).await;
    }
    value
}

/// Turns a probe response into a cached page. `items` holds up to
/// `PAGE_SIZE + 1` entries; the extra one only proves a next page exists and
/// is never displayed.
pub fn probe_page(mut items: Vec<ItemSummary>) -> Option<CachedPage<ItemSummary>> {
    if items.is_empty() {
        return None;
    }
    let next_cursor = if items.len() > PAGE_SIZE {
        items.truncate(PAGE_SIZE);
        items.last().map(|item| item.id.clone())
    } else {
        None
    };
    Some(CachedPage { items, next_cursor })
}

/// One page fetch, abstracted so pager behavior is testable without a server.
#[async_trait]
pub trait PageFetcher {
    async fn fetch_page(
        &self,
        query: &SearchQuery,
        cursor: Option<&str>,
    ) -> Result<Option<CachedPage<ItemSummary>>, ApiError>;
}

#[async_trait]
impl PageFetcher for ApiClient {
    async fn fetch_page(
        &self,
        query: &SearchQuery,
        cursor: Option<&str>,
    ) -> Result<Option<CachedPage<ItemSummary>>, ApiError> {
        let mut probe = query.clone();
        probe.size = Some(PAGE_SIZE as u32 + 1);
        probe.last_item_id = cursor.map(str::to_string);
        let result = self.search_items(&probe).await?;
        Ok(probe_page(result.items))
    }
}

/// Stateful pager combining a [`SearchCursor`] cache with a [`PageFetcher`].
pub struct ItemPager<F> {
    fetcher: F,
    query: SearchQuery,
    cursor: SearchCursor<ItemSummary>,
    floor: Duration,
}

impl<F: PageFetcher> ItemPager<F> {
    pub fn new(fetcher: F, query: SearchQuery) -> Self {
        Self::with_floor(fetcher, query, MIN_LOADING)
    }

    pub fn with_floor(fetcher: F, query: SearchQuery, floor: Duration) -> Self {
        Self {
            fetcher,
            query,
            cursor: SearchCursor::new(),
            floor,
        }
    }

    /// Loads the first page. Returns `false` when the search is empty.
    pub async fn load_first(&mut self) -> Result<bool, ApiError> {
        let page = with_minimum_loading(self.floor, self.fetcher.fetch_page(&self.query, None)).await?;
        let loaded = page.is_some();
        self.cursor.first_loaded(page);
        Ok(loaded)
    }

    /// Moves forward one page, fetching when past the cache. Returns `false`
    /// at the end of the result set.
    pub async fn next(&mut self) -> Result<bool, ApiError> {
        match self.cursor.next() {
            Advance::Cached => {
                with_minimum_loading(self.floor, async {}).await;
                Ok(true)
            }
            Advance::FetchNeeded { cursor } => {
                let page = with_minimum_loading(
                    self.floor,
                    self.fetcher.fetch_page(&self.query, Some(&cursor)),
                )
                .await?;
                let loaded = page.is_some();
                self.cursor.page_fetched(page);
                Ok(loaded)
            }
            Advance::AtEnd => Ok(false),
        }
    }

    /// Moves back one page; cache-only.
    pub async fn prev(&mut self) -> bool {
        if self.cursor.prev() {
            with_minimum_loading(self.floor, async {}).await;
            true
        } else {
            false
        }
    }

    /// Jumps to an already-loaded page; cache-only.
    pub async fn jump(&mut self, index: usize) -> bool {
        if self.cursor.jump(index) {
            with_minimum_loading(self.floor, async {}).await;
            true
        } else {
            false
        }
    }

    pub fn current_items(&self) -> &[ItemSummary] {
        self.cursor.current_page().map_or(&[], |page| &page.items)
    }

    pub fn has_next(&self) -> bool {
        self.cursor.has_next()
    }

    pub fn current_index(&self) -> usize {
        self.cursor.current_index()
    }

    pub fn page_count(&self) -> usize {
        self.cursor.page_count()
    }

    pub fn visible_window(&self, total: usize) -> Range<usize> {
        self.cursor.visible_window(total)
    }
}
