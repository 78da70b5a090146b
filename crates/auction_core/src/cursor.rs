use std::ops::Range;

/// One fetched page of results plus the cursor for the page after it, if
/// the fetch indicated more results exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedPage<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

/// Outcome of asking the cursor to move forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Moved onto an already-cached page.
    Cached,
    /// The caller must fetch the next page with this cursor and report back
    /// through [`SearchCursor::page_fetched`].
    FetchNeeded { cursor: String },
    /// There is no further page.
    AtEnd,
}

/// In-memory, append-only cache of fetched pages for one search request.
///
/// Forward navigation fetches at most one new page at a time; backward
/// navigation and jumps are always served from cache and never refetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCursor<T> {
    pages: Vec<CachedPage<T>>,
    current: usize,
    /// First page index known not to exist, once a fetch came back empty.
    max_page: Option<usize>,
}

impl<T> Default for SearchCursor<T> {
    fn default() -> Self {
        Self {
            pages: Vec::new(),
            current: 0,
            max_page: None,
        }
    }
}

impl<T> SearchCursor<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the result of the cursorless first fetch. `None` records an
    /// empty result set.
    pub fn first_loaded(&mut self, page: Option<CachedPage<T>>) {
        self.pages.clear();
        self.current = 0;
        match page {
            Some(page) => {
                self.pages.push(page);
                self.max_page = None;
            }
            None => self.max_page = Some(0),
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn current_page(&self) -> Option<&CachedPage<T>> {
        self.pages.get(self.current)
    }

    pub fn has_next(&self) -> bool {
        if self.current + 1 < self.pages.len() {
            return true;
        }
        if self.max_page.is_some_and(|max| self.current + 1 >= max) {
            return false;
        }
        self.current_page()
            .is_some_and(|page| page.next_cursor.is_some())
    }

    /// Moves forward: onto a cached page if one exists, otherwise asks the
    /// caller to fetch with the current page's cursor.
    pub fn next(&mut self) -> Advance {
        if self.current + 1 < self.pages.len() {
            self.current += 1;
            return Advance::Cached;
        }
        if self.max_page.is_some_and(|max| self.current + 1 >= max) {
            return Advance::AtEnd;
        }
        match self.current_page().and_then(|page| page.next_cursor.clone()) {
            Some(cursor) => Advance::FetchNeeded { cursor },
            None => Advance::AtEnd,
        }
    }

    /// Installs a page fetched after [`Advance::FetchNeeded`]. `None`
    /// records the boundary: the current page is the last one, and the
    /// index does not advance.
    pub fn page_fetched(&mut self, page: Option<CachedPage<T>>) {
        match page {
            Some(page) => {
                self.pages.push(page);
                self.current += 1;
            }
            None => self.max_page = Some(self.current + 1),
        }
    }

    /// Moves back one page within the cache. Returns false at the front.
    pub fn prev(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Jumps directly to a cached index. Returns false when out of range.
    pub fn jump(&mut self, index: usize) -> bool {
        if index >= self.pages.len() {
            return false;
        }
        self.current = index;
        true
    }

    /// Window of up to `total` page indices centered on the current page,
    /// for rendering pagination controls.
    pub fn visible_window(&self, total: usize) -> Range<usize> {
        let start = self.current.saturating_sub(total / 2);
        let end = self.pages.len().min(start + total);
        start..end
    }
}
