//! Offset/limit pagination
//!
//! [`ListIter`] fetches pages of [`PAGE_SIZE`](super::config::PAGE_SIZE)
//! items lazily, hands them out one at a time and stops at the first empty
//! page or the first 404. Any other error is sticky: [`ListIter::next`]
//! returns `false` from then on and [`ListIter::err`] reports it.

use futures_util::stream::{self, Stream};
use std::collections::VecDeque;
use std::marker::PhantomData;
use tracing::debug;

use super::config::PAGE_SIZE;
use super::executor::Api;
use crate::error::{Error, Result};

/// A page body that can be flattened into its items
///
/// Implemented for bare JSON arrays; wrapped list responses implement it to
/// pull out the inner array.
pub trait PagedResponse: serde::de::DeserializeOwned + Send {
    /// Element type
    type Item: Send;

    /// Consume the page and return its items in order
    fn into_items(self) -> Vec<Self::Item>;
}

impl<T> PagedResponse for Vec<T>
where
    T: serde::de::DeserializeOwned + Send,
{
    type Item = T;

    fn into_items(self) -> Vec<T> {
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListState {
    /// Nothing fetched yet
    Fresh,
    /// Current page still has unconsumed items
    Buffered,
    /// Current page consumed; the next call fetches
    Draining,
    /// Clean end of the list
    Done,
    /// Stopped on an error
    Failed,
}

/// Lazy iterator over a paginated collection
pub struct ListIter<P: PagedResponse> {
    api: Api,
    operation: String,
    path: String,
    page_size: u32,
    offset: u32,
    buffer: VecDeque<P::Item>,
    current: Option<P::Item>,
    state: ListState,
    error: Option<Error>,
    _page: PhantomData<fn() -> P>,
}

impl<P: PagedResponse> ListIter<P> {
    /// Iterate `path` with the default page size
    pub fn new(api: Api, operation: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            api,
            operation: operation.into(),
            path: path.into(),
            page_size: PAGE_SIZE,
            offset: 0,
            buffer: VecDeque::new(),
            current: None,
            state: ListState::Fresh,
            error: None,
            _page: PhantomData,
        }
    }

    /// Override the page size (minimum 1)
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Advance to the next item
    ///
    /// Returns `true` when [`value`](Self::value) holds a fresh item, and
    /// `false` at the end of the list or after an error.
    pub async fn next(&mut self) -> bool {
        loop {
            match self.state {
                ListState::Done | ListState::Failed => {
                    self.current = None;
                    return false;
                }
                ListState::Buffered => match self.buffer.pop_front() {
                    Some(item) => {
                        if self.buffer.is_empty() {
                            self.state = ListState::Draining;
                        }
                        self.current = Some(item);
                        return true;
                    }
                    None => self.state = ListState::Draining,
                },
                ListState::Fresh | ListState::Draining => self.fetch_page().await,
            }
        }
    }

    /// Item produced by the last successful [`next`](Self::next)
    pub fn value(&self) -> Option<&P::Item> {
        self.current.as_ref()
    }

    /// Take ownership of the current item
    pub fn take_value(&mut self) -> Option<P::Item> {
        self.current.take()
    }

    /// Error that stopped iteration, if any
    pub fn err(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Drain the remaining items into a `Vec`
    pub async fn collect_all(mut self) -> Result<Vec<P::Item>> {
        let mut items = Vec::new();
        while self.next().await {
            if let Some(item) = self.current.take() {
                items.push(item);
            }
        }
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(items),
        }
    }

    /// Adapt into a [`Stream`] yielding each item, then the error if one stopped iteration.
    pub fn into_stream(self) -> impl Stream<Item = Result<P::Item>> + Send
    where
        P: 'static,
        P::Item: 'static,
    {
        stream::unfold(self, |mut iter| async move {
            if iter.next().await {
                let item = iter.current.take()?;
                Some((Ok(item), iter))
            } else {
                iter.error.take().map(|err| (Err(err), iter))
            }
        })
    }

    async fn fetch_page(&mut self) {
        let query = [
            ("offset", self.offset.to_string()),
            ("limit", self.page_size.to_string()),
        ];
        debug!(path = %self.path, offset = self.offset, limit = self.page_size, "Fetching page");

        let result: Result<P> = self
            .api
            .get_with_query(&self.operation, &self.path, &query)
            .await;
        self.offset = self.offset.saturating_add(self.page_size);

        match result {
            Ok(page) => {
                let items = page.into_items();
                if items.is_empty() {
                    debug!(path = %self.path, "Empty page, end of list");
                    self.state = ListState::Done;
                } else {
                    debug!(path = %self.path, count = items.len(), "Fetched page");
                    self.buffer.extend(items);
                    self.state = ListState::Buffered;
                }
            }
            Err(err) if err.status() == Some(404) => {
                debug!(path = %self.path, "Page not found, end of list");
                self.state = ListState::Done;
            }
            Err(err) => {
                self.error = Some(err);
                self.state = ListState::Failed;
            }
        }
    }
}

impl<P: PagedResponse> std::fmt::Debug for ListIter<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListIter")
            .field("path", &self.path)
            .field("offset", &self.offset)
            .field("state", &self.state)
            .field("buffered", &self.buffer.len())
            .finish()
    }
}
