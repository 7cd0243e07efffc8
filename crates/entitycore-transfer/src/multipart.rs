use std::path::Path;
use std::time::Duration;

use bytes::Bytes;
use futures_util::TryStreamExt;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use entitycore_core::models::{Asset, LocalAssetMetadata};
use entitycore_core::{Error, Id, Result};

use crate::api::{Api, body_preview};
use crate::retry::{RetryPolicy, execute_with_retry};
use crate::transport::{HttpTransport, Method, Request};

/// Retry policy applied to each part PUT. Only transient transport failures
/// are retried; 4xx/5xx application responses are not, since the storage
/// backend gives no idempotency guarantee for them.
pub const MAX_RETRIES: u32 = 3;
pub const BACKOFF_BASE: Duration = Duration::from_millis(250);

/// Tuning knobs for asset uploads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferConfig {
    /// Files smaller than this are uploaded single-shot instead of multipart.
    pub size_threshold: u64,
    /// Upper bound on simultaneous part uploads.
    pub max_concurrency: usize,
    /// Hint to the server for how many parts to create.
    pub preferred_part_count: u32,
    /// Upload parts through a bounded worker pool instead of sequentially.
    pub use_concurrent: bool,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            size_threshold: 20 * 1024 * 1024,
            max_concurrency: 10,
            preferred_part_count: 100,
            use_concurrent: true,
        }
    }
}

/// One slice of the source file, bound to its single-use presigned URL.
///
/// The set of parts for an upload is derived once from the server's part
/// size and never recomputed mid-transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartUpload {
    /// 1-based sequential part number.
    pub part_number: u32,
    pub offset: u64,
    pub size: u64,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct InitiateResponse {
    id: Id,
    upload_meta: UploadMeta,
}

#[derive(Debug, Deserialize)]
struct UploadMeta {
    part_size: u64,
    parts: Vec<InitiatePart>,
}

#[derive(Debug, Deserialize)]
struct InitiatePart {
    part_number: u32,
    url: String,
}

/// Upload a local file in multiple parts through presigned URLs.
///
/// Initiates the upload with the backend, transfers every part (sequentially
/// or through a worker pool of `max_concurrency` tasks), then asks the
/// backend to assemble them. A failed transfer leaves the server-side upload
/// session behind for the server's own garbage collection; no cleanup is
/// attempted here.
pub async fn upload_asset_file<T: HttpTransport>(
    api: &Api<T>,
    assets_url: &str,
    path: &Path,
    metadata: &LocalAssetMetadata,
    config: &TransferConfig,
) -> Result<Asset> {
    let (asset_id, parts) = initiate_upload(api, assets_url, path, metadata, config).await?;
    upload_parts(api, path, &parts, config).await?;
    complete_upload(api, assets_url, asset_id).await
}

async fn initiate_upload<T: HttpTransport>(
    api: &Api<T>,
    assets_url: &str,
    path: &Path,
    metadata: &LocalAssetMetadata,
    config: &TransferConfig,
) -> Result<(Id, Vec<PartUpload>)> {
    let filesize = entitycore_io::file_size(path).await?;
    let digest = entitycore_io::sha256_digest(path).await?;

    let response = api
        .request(
            Request::new(Method::Post, format!("{assets_url}/multipart-upload/initiate")).json(
                json!({
                    "filename": metadata.file_name,
                    "filesize": filesize,
                    "sha256_digest": digest,
                    "content_type": metadata.content_type,
                    "label": metadata.label,
                    "preferred_part_count": config.preferred_part_count,
                }),
            ),
        )
        .await?;

    let initiate: InitiateResponse = response.json()?;
    let parts = derive_parts(filesize, initiate.upload_meta.part_size, initiate.upload_meta.parts);

    debug!(
        asset_id = %initiate.id,
        part_count = parts.len(),
        part_size = initiate.upload_meta.part_size,
        filesize,
        "initiated multipart upload"
    );

    Ok((initiate.id, parts))
}

/// Offsets and sizes are local arithmetic over the server-chosen part size;
/// server-supplied positions are never trusted. The last part carries the
/// remainder and may be shorter.
fn derive_parts(filesize: u64, part_size: u64, parts: Vec<InitiatePart>) -> Vec<PartUpload> {
    let mut parts: Vec<PartUpload> = parts
        .into_iter()
        .map(|part| {
            let offset = u64::from(part.part_number).saturating_sub(1) * part_size;
            PartUpload {
                part_number: part.part_number,
                offset,
                size: part_size.min(filesize.saturating_sub(offset)),
                url: part.url,
            }
        })
        .collect();
    parts.sort_by_key(|part| part.part_number);
    parts
}

async fn upload_parts<T: HttpTransport>(
    api: &Api<T>,
    path: &Path,
    parts: &[PartUpload],
    config: &TransferConfig,
) -> Result<()> {
    let policy = RetryPolicy::new(MAX_RETRIES, BACKOFF_BASE)?;

    if config.use_concurrent {
        debug!(max_concurrency = config.max_concurrency, "uploading parts concurrently");
        futures_util::stream::iter(parts.iter().map(Ok))
            .try_for_each_concurrent(config.max_concurrency, |part| {
                let policy = &policy;
                async move { upload_part(api, path, part, policy).await }
            })
            .await
    } else {
        debug!("uploading parts sequentially");
        for part in parts {
            upload_part(api, path, part, &policy).await?;
        }
        Ok(())
    }
}

async fn upload_part<T: HttpTransport>(
    api: &Api<T>,
    path: &Path,
    part: &PartUpload,
    policy: &RetryPolicy,
) -> Result<()> {
    // independent handle per part; a shared seek cursor would corrupt ranges
    let data = entitycore_io::read_range(path, part.offset, part.size)
        .await
        .map_err(|e| part_error(part.part_number, e.into()))?;

    execute_with_retry(
        || send_part(api, &part.url, data.clone()),
        policy,
        is_transient_transport,
    )
    .await
    .map_err(|e| part_error(part.part_number, e))?;

    debug!(
        part_number = part.part_number,
        offset = part.offset,
        size = part.size,
        "uploaded part"
    );

    Ok(())
}

/// PUT one byte range to its presigned URL. Goes through the raw transport:
/// presigned URLs encode their own authorization and take no catalog headers.
async fn send_part<T: HttpTransport>(api: &Api<T>, url: &str, data: Bytes) -> Result<()> {
    let response = api
        .transport()
        .send(Request::new(Method::Put, url).bytes(data))
        .await?;

    if !response.is_success() {
        return Err(Error::Server {
            method: "PUT".to_string(),
            url: url.to_string(),
            status: response.status,
            request: String::new(),
            response: body_preview(&response.body),
        });
    }

    Ok(())
}

fn is_transient_transport(error: &Error) -> bool {
    matches!(error, Error::Transport(t) if t.kind.is_transient())
}

fn part_error(part_number: u32, source: Error) -> Error {
    Error::PartUpload {
        part_number,
        source: Box::new(source),
    }
}

async fn complete_upload<T: HttpTransport>(
    api: &Api<T>,
    assets_url: &str,
    asset_id: Id,
) -> Result<Asset> {
    let response = api
        .request(Request::new(
            Method::Post,
            format!("{assets_url}/{asset_id}/multipart-upload/complete"),
        ))
        .await?;

    let asset: Asset = response.json()?;
    info!(asset_id = %asset.id, size = asset.size, "multipart upload complete");
    Ok(asset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initiate_parts(count: u32) -> Vec<InitiatePart> {
        (1..=count)
            .map(|part_number| InitiatePart {
                part_number,
                url: format!("http://storage/part-{part_number}"),
            })
            .collect()
    }

    #[test]
    fn test_derive_parts_with_remainder() {
        let parts = derive_parts(250, 100, initiate_parts(3));

        assert_eq!(
            parts.iter().map(|p| p.offset).collect::<Vec<_>>(),
            vec![0, 100, 200]
        );
        assert_eq!(
            parts.iter().map(|p| p.size).collect::<Vec<_>>(),
            vec![100, 100, 50]
        );
        assert_eq!(parts[2].url, "http://storage/part-3");
    }

    #[test]
    fn test_derive_parts_exact_fit() {
        let parts = derive_parts(200, 100, initiate_parts(2));
        assert_eq!(
            parts.iter().map(|p| p.size).collect::<Vec<_>>(),
            vec![100, 100]
        );
    }

    #[test]
    fn test_derive_parts_single() {
        let parts = derive_parts(42, 100, initiate_parts(1));
        assert_eq!(parts[0].offset, 0);
        assert_eq!(parts[0].size, 42);
    }

    #[test]
    fn test_transient_classification() {
        use entitycore_core::{TransportError, TransportKind};

        let transient = Error::Transport(TransportError::new(TransportKind::Connect, "down"));
        assert!(is_transient_transport(&transient));

        let fatal = Error::Transport(TransportError::new(TransportKind::Other, "bad url"));
        assert!(!is_transient_transport(&fatal));

        let server = Error::Server {
            method: "PUT".into(),
            url: "http://storage/part-1".into(),
            status: 403,
            request: String::new(),
            response: "denied".into(),
        };
        assert!(!is_transient_transport(&server));
    }
}
