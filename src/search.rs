//! Lazy pagination over scan and query results.
//!
//! A [`SearchCursor`] buffers one page at a time and fetches the next one,
//! echoing the previous page's continuation token, only when the buffer
//! runs dry. Scan and query differ solely in the page fetch they are built
//! with.

use crate::error::Error;
use crate::model::{Item, Key, Page};
use aws_sdk_dynamodb::operation::query::QueryInput;
use aws_sdk_dynamodb::operation::scan::ScanInput;
use aws_sdk_dynamodb::types::Select;
use futures::future::BoxFuture;
use futures::stream::{self, Stream};
use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::debug;

/// Single page fetch a cursor is built on
pub type PageFetcher<I> = Arc<dyn Fn(I) -> BoxFuture<'static, Result<Page, Error>> + Send + Sync>;

/// A paginated request
pub trait SearchInput: Clone + Send + Sync + 'static {
    /// Resume after the item identified by `key`
    fn set_exclusive_start_key(&mut self, key: Option<Key>);

    /// Ask only for the number of matching items
    fn select_count(&mut self);
}

impl SearchInput for ScanInput {
    fn set_exclusive_start_key(&mut self, key: Option<Key>) {
        self.exclusive_start_key = key;
    }

    fn select_count(&mut self) {
        self.select = Some(Select::Count);
    }
}

impl SearchInput for QueryInput {
    fn set_exclusive_start_key(&mut self, key: Option<Key>) {
        self.exclusive_start_key = key;
    }

    fn select_count(&mut self) {
        self.select = Some(Select::Count);
    }
}

/// Forward-only cursor over every item matched by a scan or query
pub struct SearchCursor<I> {
    input: I,
    fetch: PageFetcher<I>,
    buffer: VecDeque<Item>,
    last_evaluated_key: Option<Key>,
    exhausted: bool,
}

impl<I: fmt::Debug> fmt::Debug for SearchCursor<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchCursor")
            .field("input", &self.input)
            .field("buffered", &self.buffer.len())
            .field("last_evaluated_key", &self.last_evaluated_key)
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}

impl<I: SearchInput> SearchCursor<I> {
    pub fn new(input: I, fetch: PageFetcher<I>) -> Self {
        Self {
            input,
            fetch,
            buffer: VecDeque::new(),
            last_evaluated_key: None,
            exhausted: false,
        }
    }

    /// Build a cursor from a plain async function
    pub fn from_fn<F, Fut>(input: I, fetch: F) -> Self
    where
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Page, Error>> + Send + 'static,
    {
        Self::new(
            input,
            Arc::new(move |input: I| -> BoxFuture<'static, Result<Page, Error>> {
                Box::pin(fetch(input))
            }),
        )
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted && self.buffer.is_empty()
    }

    /// Next item, or `None` once every page has been consumed.
    ///
    /// Pages with no items but a continuation token are skipped over. A
    /// failed fetch leaves the cursor untouched, so calling again retries
    /// the same page.
    pub async fn next(&mut self) -> Result<Option<Item>, Error> {
        while self.buffer.is_empty() && !self.exhausted {
            self.fetch_next_page().await?;
        }

        Ok(self.buffer.pop_front())
    }

    /// Total number of matching items.
    ///
    /// Runs its own count-only pagination from the start of the request and
    /// never touches the items buffered for [`next`](Self::next).
    pub async fn count(&self) -> Result<i64, Error> {
        let mut input = self.input.clone();
        input.select_count();

        let mut total: i64 = 0;
        loop {
            let page = (self.fetch)(input.clone()).await?;
            total += i64::from(page.count.unwrap_or(0));

            match page.last_evaluated_key {
                Some(key) => input.set_exclusive_start_key(Some(key)),
                None => return Ok(total),
            }
        }
    }

    /// Drain every remaining item.
    pub async fn collect_all(&mut self) -> Result<Vec<Item>, Error> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await? {
            items.push(item);
        }
        Ok(items)
    }

    /// Take up to `amount` items, fewer if the results run out first.
    pub async fn slice(&mut self, amount: usize) -> Result<Vec<Item>, Error> {
        let mut items = Vec::new();
        while items.len() < amount {
            match self.next().await? {
                Some(item) => items.push(item),
                None => break,
            }
        }
        Ok(items)
    }

    /// The remaining items as a stream; it ends after the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<Item, Error>> {
        stream::try_unfold(self, |mut cursor| async move {
            let next = cursor.next().await?;
            Ok::<_, Error>(next.map(|item| (item, cursor)))
        })
    }

    async fn fetch_next_page(&mut self) -> Result<(), Error> {
        let mut input = self.input.clone();
        if let Some(key) = &self.last_evaluated_key {
            input.set_exclusive_start_key(Some(key.clone()));
        }

        let page = (self.fetch)(input).await?;
        debug!(
            items = page.items.len(),
            last = page.last_evaluated_key.is_none(),
            "Fetched page"
        );

        self.exhausted = page.last_evaluated_key.is_none();
        self.last_evaluated_key = page.last_evaluated_key;
        self.buffer.extend(page.items);
        Ok(())
    }
}
