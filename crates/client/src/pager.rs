//! Paginated book fetching with server-authoritative cursors.
//!
//! One `BookPager` instance backs one logical list in the UI. Two screens
//! showing independent book lists get independent pagers; sharing an
//! instance shares its fetch state. Page counters are provisional until the
//! server's response overwrites them, so the list cannot drift when items
//! are added or removed server-side between requests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use stacks_shared::{ApiError, Book, Paginated, SortOrder};

use crate::cache::{self, DiskCache};

/// A resolved page request sent to the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
    pub sort_by: String,
    pub sort_order: SortOrder,
}

/// Where pages come from. The production impl is the books operation client;
/// tests inject fakes.
#[async_trait]
pub trait BookPageSource: Send + Sync {
    async fn fetch_books(&self, req: &PageRequest) -> Result<Paginated<Book>, ApiError>;
}

#[async_trait]
impl<S: BookPageSource> BookPageSource for std::sync::Arc<S> {
    async fn fetch_books(&self, req: &PageRequest) -> Result<Paginated<Book>, ApiError> {
        (**self).fetch_books(req).await
    }
}

/// Caller-facing knobs for a fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Explicit page for a fresh load; `None` means page 1.
    pub page: Option<u32>,
    /// Append the next page to the accumulated list instead of replacing it.
    pub is_loading_more: bool,
    pub limit: u32,
    pub sort_by: String,
    pub sort_order: SortOrder,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            page: None,
            is_loading_more: false,
            limit: 200,
            sort_by: "title".to_string(),
            sort_order: SortOrder::Asc,
        }
    }
}

impl FetchOptions {
    pub fn load_more() -> Self {
        Self { is_loading_more: true, ..Self::default() }
    }
}

#[derive(Debug)]
struct PagerState {
    current_page: u32,
    total_pages: u32,
    items: Vec<Book>,
}

impl Default for PagerState {
    fn default() -> Self {
        Self { current_page: 1, total_pages: 1, items: Vec::new() }
    }
}

/// Stateful page-by-page fetcher for the book collection.
pub struct BookPager<S> {
    source: S,
    cache: DiskCache<Vec<Book>>,
    // At-most-one in-flight fetch per instance. Mutations race across
    // threads here, so this is a real compare-and-swap, not a plain flag.
    loading: AtomicBool,
    state: Mutex<PagerState>,
}

impl<S: BookPageSource> BookPager<S> {
    pub fn new(source: S) -> Self {
        Self::with_cache(source, DiskCache::new("books", cache::DEFAULT_TTL))
    }

    /// Use an explicit cache slot. Tests point this at a tempdir.
    pub fn with_cache(source: S, cache: DiskCache<Vec<Book>>) -> Self {
        Self {
            source,
            cache,
            loading: AtomicBool::new(false),
            state: Mutex::new(PagerState::default()),
        }
    }

    /// Fetch a page per `opts` and return the accumulated item list.
    ///
    /// If a fetch is already in flight the current items are returned
    /// unchanged and no second request is issued. Loading-more at the last
    /// page is a no-op, not an error. The loading flag is always cleared
    /// before this returns — UI code keys off that ordering.
    pub async fn fetch_page(&self, opts: FetchOptions) -> Result<Vec<Book>, ApiError> {
        if self
            .loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(self.items());
        }

        let target_page = {
            let mut state = self.state.lock().unwrap();
            if opts.is_loading_more {
                if state.current_page >= state.total_pages {
                    let items = state.items.clone();
                    drop(state);
                    self.loading.store(false, Ordering::Release);
                    return Ok(items);
                }
                state.current_page + 1
            } else {
                let page = opts.page.unwrap_or(1);
                if page == 1 {
                    // Fresh load: back to Idle before the request goes out.
                    *state = PagerState::default();
                } else {
                    // Specific-page load: the server is about to become the
                    // source of truth for this page, but counters hold until
                    // the response lands.
                    state.items.clear();
                }
                page
            }
        };

        let request = PageRequest {
            page: target_page,
            limit: opts.limit,
            sort_by: opts.sort_by,
            sort_order: opts.sort_order,
        };

        match self.source.fetch_books(&request).await {
            Ok(page) => {
                let items = {
                    let mut state = self.state.lock().unwrap();
                    // Counters come from the server response only.
                    state.current_page = page.pagination.current_page;
                    state.total_pages = page.pagination.total_pages;
                    if opts.is_loading_more {
                        state.items.extend(page.data);
                    } else {
                        state.items = page.data;
                    }
                    state.items.clone()
                };
                self.cache.put(&items);
                self.loading.store(false, Ordering::Release);
                Ok(items)
            }
            Err(e) => {
                // Counters and items stay untouched on failure.
                self.loading.store(false, Ordering::Release);
                Err(e)
            }
        }
    }

    pub fn has_more_pages(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.total_pages > 0 && state.current_page < state.total_pages
    }

    /// Back to Idle: page counters at 1, no items.
    pub fn reset(&self) {
        *self.state.lock().unwrap() = PagerState::default();
    }

    pub fn items(&self) -> Vec<Book> {
        self.state.lock().unwrap().items.clone()
    }

    pub fn current_page(&self) -> u32 {
        self.state.lock().unwrap().current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.state.lock().unwrap().total_pages
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Last successfully fetched list, served stale-but-fast from disk.
    pub fn cached_items(&self) -> Option<Vec<Book>> {
        self.cache.get()
    }
}
