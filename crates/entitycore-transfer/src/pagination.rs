use std::collections::VecDeque;
use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use entitycore_core::{Error, Result, ResultStream};

use crate::api::Api;
use crate::transport::{HttpTransport, Method, Request};

/// Pagination envelope reported by every listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PaginationInfo {
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
}

#[derive(Debug, Deserialize)]
struct ListingEnvelope {
    data: Vec<Value>,
    pagination: PaginationInfo,
}

struct PageCursor {
    page: u64,
    yielded: u64,
    buffer: VecDeque<Value>,
    done: bool,
}

/// Stream a paginated listing as a single lazy sequence of records.
///
/// Pages are requested one at a time, only when the previous page's items
/// are exhausted, so at most one page is buffered ahead. The server must
/// echo back the requested page number (and page size, when one was given);
/// a disagreement means the server re-paginated behind our back and the
/// stream fails with [`Error::PaginationMismatch`] before yielding anything
/// from the offending page.
pub fn stream_paginated<T, C>(
    api: Arc<Api<C>>,
    url: String,
    method: Method,
    query: Vec<(String, String)>,
    page_size: Option<u64>,
    limit: Option<u64>,
) -> Result<ResultStream<T>>
where
    T: DeserializeOwned + Send + 'static,
    C: HttpTransport + 'static,
{
    if let Some(0) = limit {
        return Err(Error::Validation(
            "limit must be either None or strictly positive".to_string(),
        ));
    }
    if let Some(0) = page_size {
        return Err(Error::Validation(
            "page_size must be either None or strictly positive".to_string(),
        ));
    }

    let cursor = PageCursor {
        page: 1,
        yielded: 0,
        buffer: VecDeque::new(),
        done: false,
    };

    let stream = futures_util::stream::try_unfold(cursor, move |mut cursor| {
        let api = api.clone();
        let url = url.clone();
        let query = query.clone();

        async move {
            loop {
                if limit.is_some_and(|l| cursor.yielded >= l) {
                    return Ok(None);
                }

                if let Some(item) = cursor.buffer.pop_front() {
                    cursor.yielded += 1;
                    let record: T = serde_json::from_value(item)?;
                    return Ok(Some((record, cursor)));
                }

                if cursor.done {
                    return Ok(None);
                }

                let mut page_query = query.clone();
                if let Some(size) = page_size {
                    page_query.push(("page_size".to_string(), size.to_string()));
                }
                page_query.push(("page".to_string(), cursor.page.to_string()));

                let response = api
                    .request(Request::new(method, url.clone()).query(page_query))
                    .await?;
                let envelope: ListingEnvelope = response.json()?;

                if envelope.pagination.page != cursor.page {
                    return Err(Error::PaginationMismatch {
                        field: "page",
                        expected: cursor.page,
                        actual: envelope.pagination.page,
                    });
                }
                if let Some(size) = page_size
                    && envelope.pagination.page_size != size
                {
                    return Err(Error::PaginationMismatch {
                        field: "page_size",
                        expected: size,
                        actual: envelope.pagination.page_size,
                    });
                }

                // a page shorter than the effective page size is the last one
                let effective_size = page_size.unwrap_or(envelope.pagination.page_size);
                cursor.done = (envelope.data.len() as u64) < effective_size;
                cursor.buffer = envelope.data.into();
                cursor.page += 1;

                if cursor.buffer.is_empty() {
                    return Ok(None);
                }
            }
        }
    });

    Ok(ResultStream::new(stream))
}
