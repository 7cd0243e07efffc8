use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::{Stream, StreamExt, TryStreamExt};

use crate::error::{Error, Result};

/// Lazy, single-pass sequence of fallible results.
///
/// Wraps any stream of `Result<T>` (a paginated search, an in-memory asset
/// selection) and adds the quantifier operations callers chain onto a
/// query. The wrapper holds no state beyond the cursor, so it composes with
/// the paginated fetch stream without materializing pages.
pub struct ResultStream<T> {
    inner: Pin<Box<dyn Stream<Item = Result<T>> + Send>>,
}

impl<T: Send + 'static> ResultStream<T> {
    pub fn new(stream: impl Stream<Item = Result<T>> + Send + 'static) -> Self {
        Self {
            inner: Box::pin(stream),
        }
    }

    /// Wrap an already-materialized collection.
    pub fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'static,
    {
        Self::new(futures_util::stream::iter(items.into_iter().map(Ok)))
    }

    /// First item, or [`Error::EmptyResult`] if the sequence is empty.
    pub async fn first(mut self) -> Result<T> {
        match self.inner.next().await {
            Some(item) => item,
            None => Err(Error::EmptyResult),
        }
    }

    /// Exactly one item; [`Error::EmptyResult`] or [`Error::MultipleResults`]
    /// otherwise.
    pub async fn one(mut self) -> Result<T> {
        let first = match self.inner.next().await {
            Some(item) => item?,
            None => return Err(Error::EmptyResult),
        };

        match self.inner.next().await {
            None => Ok(first),
            Some(Err(e)) => Err(e),
            Some(Ok(_)) => Err(Error::MultipleResults),
        }
    }

    /// Exactly one item or `None`; [`Error::MultipleResults`] if there are
    /// more.
    pub async fn one_or_none(mut self) -> Result<Option<T>> {
        let first = match self.inner.next().await {
            Some(item) => item?,
            None => return Ok(None),
        };

        match self.inner.next().await {
            None => Ok(Some(first)),
            Some(Err(e)) => Err(e),
            Some(Ok(_)) => Err(Error::MultipleResults),
        }
    }

    /// Materialize all remaining items.
    pub async fn all(self) -> Result<Vec<T>> {
        self.inner.try_collect().await
    }
}

impl<T> std::fmt::Debug for ResultStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultStream").finish_non_exhaustive()
    }
}

impl<T> Stream for ResultStream<T> {
    type Item = Result<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().inner.as_mut().poll_next(cx)
    }
}
