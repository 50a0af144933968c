//! Lazy page sequences over paginated forum listings.
//!
//! A [`Pages`] value fetches one page per [`Pages::next_page`] call and
//! remembers only the cursor of the page after it. Once the forum stops
//! handing out a cursor, returns an empty page, or a fetch fails, the
//! sequence is over for good; walking the listing again takes a new
//! `Pages`.

use std::future::Future;
use std::pin::Pin;

use crate::api::ForumError;

/// One page of a listing plus the cursor of the page after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// `None` on the last page.
    pub next: Option<u64>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next: Option<u64>) -> Self {
        Self { items, next }
    }

    /// A page with nothing after it.
    pub fn last(items: Vec<T>) -> Self {
        Self { items, next: None }
    }
}

/// Boxed future returned by a page fetcher. `async_trait` methods
/// already return this shape, so they can be used directly.
pub type PageFuture<'a, T> = Pin<Box<dyn Future<Output = Result<Page<T>, ForumError>> + Send + 'a>>;

type Fetch<'a, T> = Box<dyn FnMut(u64) -> PageFuture<'a, T> + Send + 'a>;

/// A finite, non-restartable sequence of pages.
pub struct Pages<'a, T> {
    fetch: Fetch<'a, T>,
    cursor: Option<u64>,
    fetched: usize,
}

impl<'a, T> Pages<'a, T> {
    /// Start a sequence at cursor `0`.
    pub fn new<F>(fetch: F) -> Self
    where
        F: FnMut(u64) -> PageFuture<'a, T> + Send + 'a,
    {
        Self {
            fetch: Box::new(fetch),
            cursor: Some(0),
            fetched: 0,
        }
    }

    /// Fetch the next page, or `Ok(None)` once the sequence is exhausted.
    pub async fn next_page(&mut self) -> Result<Option<Vec<T>>, ForumError> {
        let Some(cursor) = self.cursor.take() else {
            return Ok(None);
        };

        let page = (self.fetch)(cursor).await?;
        self.fetched += 1;
        tracing::trace!(cursor, items = page.items.len(), next = ?page.next, "fetched page");

        if page.items.is_empty() {
            return Ok(None);
        }
        // A cursor that does not move would loop forever.
        self.cursor = page.next.filter(|&next| next != cursor);
        Ok(Some(page.items))
    }

    /// Number of pages requested so far.
    pub fn pages_fetched(&self) -> usize {
        self.fetched
    }

    /// Whether another call to [`Pages::next_page`] could yield items.
    pub fn is_exhausted(&self) -> bool {
        self.cursor.is_none()
    }

    /// Drain every remaining page into one vector.
    pub async fn try_collect(mut self) -> Result<Vec<T>, ForumError> {
        let mut all = Vec::new();
        while let Some(items) = self.next_page().await? {
            all.extend(items);
        }
        Ok(all)
    }
}
