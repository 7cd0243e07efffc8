//! Asset transfer subsystem of the entitycore client.
//!
//! Covers the HTTP boundary (a minimal transport trait plus the
//! authenticated catalog request layer), bounded retry with exponential
//! backoff, the paginated fetch stream, and the multipart upload
//! orchestrator. Higher-level typed operations live in `entitycore-client`.

pub use self::api::{Api, body_preview};
pub use self::multipart::{
    BACKOFF_BASE, MAX_RETRIES, PartUpload, TransferConfig, upload_asset_file,
};
pub use self::pagination::{PaginationInfo, stream_paginated};
pub use self::retry::{RetryPolicy, execute_with_retry};
pub use self::transport::{
    HttpTransport, Method, ReqwestTransport, Request, RequestBody, Response,
};

mod api;
mod multipart;
mod pagination;
mod retry;
mod transport;
