//! Asset operations: listing, selection, download and upload dispatch.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures_util::{StreamExt, TryStreamExt};
use serde_json::{Map, Value};
use tracing::{debug, info};

use entitycore_core::models::{Asset, DetailedFileList, Entity, EntityType, LocalAssetMetadata};
use entitycore_core::{Error, Id, Result, ResultStream, filter_assets};
use entitycore_io::FileError;
use entitycore_transfer::{HttpTransport, Method, Request, upload_asset_file};

use crate::{Client, routes};

impl<T: HttpTransport + 'static> Client<T> {
    fn assets_url(&self, entity_type: EntityType, entity_id: Id) -> Result<String> {
        if !entity_type.has_assets() {
            return Err(Error::Validation(format!(
                "entity type {entity_type} does not carry assets"
            )));
        }
        Ok(routes::assets_endpoint(&self.api_url, entity_type, entity_id, None))
    }

    /// Stream an entity's asset records from the paginated listing endpoint.
    pub fn entity_assets(
        &self,
        entity_type: EntityType,
        entity_id: Id,
    ) -> Result<ResultStream<Asset>> {
        let url = self.assets_url(entity_type, entity_id)?;
        entitycore_transfer::stream_paginated(
            self.api.clone(),
            url,
            Method::Get,
            Vec::new(),
            self.page_size,
            None,
        )
    }

    /// Filter the assets embedded in an already-fetched entity.
    ///
    /// Callers chain a quantifier onto the result:
    /// `client.select_assets(&simulation, selection)?.one().await?`.
    pub fn select_assets<E: Entity>(
        &self,
        entity: &E,
        selection: Map<String, Value>,
    ) -> Result<ResultStream<Asset>> {
        let filtered = filter_assets(entity.assets().to_vec(), selection)?;
        Ok(ResultStream::from_items(filtered))
    }

    /// Download an asset's raw bytes. For directory assets, `asset_path`
    /// names the file inside the directory.
    pub async fn download_content(
        &self,
        entity_type: EntityType,
        entity_id: Id,
        asset_id: Id,
        asset_path: Option<&str>,
    ) -> Result<Bytes> {
        let url = routes::asset_download_endpoint(&self.api_url, entity_type, entity_id, asset_id);
        let mut request = Request::new(Method::Get, url);
        if let Some(asset_path) = asset_path {
            request = request.query(vec![("asset_path".to_string(), asset_path.to_string())]);
        }
        Ok(self.api.request(request).await?.body)
    }

    /// Download an asset to `output_path`, creating parent directories.
    pub async fn download_file(
        &self,
        entity_type: EntityType,
        entity_id: Id,
        asset_id: Id,
        output_path: &Path,
        asset_path: Option<&str>,
    ) -> Result<PathBuf> {
        let content = self
            .download_content(entity_type, entity_id, asset_id, asset_path)
            .await?;

        if let Some(parent) = output_path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(FileError::from)?;
        }
        tokio::fs::write(output_path, &content).await.map_err(FileError::from)?;

        debug!(path = %output_path.display(), bytes = content.len(), "downloaded asset file");
        Ok(output_path.to_path_buf())
    }

    /// List the contents of a directory asset.
    pub async fn list_directory(
        &self,
        entity_type: EntityType,
        entity_id: Id,
        asset_id: Id,
    ) -> Result<DetailedFileList> {
        let url = routes::asset_list_endpoint(&self.api_url, entity_type, entity_id, asset_id);
        self.api.request(Request::new(Method::Get, url)).await?.json()
    }

    /// Download every file of a directory asset into `output_dir`, fetching
    /// up to `max_concurrency` files at a time. Returns the written paths in
    /// sorted order.
    pub async fn download_directory(
        &self,
        entity_type: EntityType,
        entity_id: Id,
        asset_id: Id,
        output_dir: &Path,
        max_concurrency: usize,
    ) -> Result<Vec<PathBuf>> {
        let listing = self.list_directory(entity_type, entity_id, asset_id).await?;
        let file_count = listing.files.len();

        let mut paths: Vec<PathBuf> = futures_util::stream::iter(listing.files.into_keys())
            .map(|relative| {
                let output_path = output_dir.join(&relative);
                async move {
                    self.download_file(
                        entity_type,
                        entity_id,
                        asset_id,
                        &output_path,
                        Some(&relative),
                    )
                    .await
                }
            })
            .buffer_unordered(max_concurrency.max(1))
            .try_collect()
            .await?;
        paths.sort();

        info!(files = file_count, dir = %output_dir.display(), "downloaded directory asset");
        Ok(paths)
    }

    /// Upload in-memory content as a new asset through the single-shot form
    /// endpoint.
    pub async fn upload_content(
        &self,
        entity_type: EntityType,
        entity_id: Id,
        content: Bytes,
        metadata: &LocalAssetMetadata,
    ) -> Result<Asset> {
        let url = self.assets_url(entity_type, entity_id)?;
        let request = Request::new(Method::Post, url).file(
            "file",
            metadata.file_name.clone(),
            metadata.content_type.clone(),
            content,
        );
        self.api.request(request).await?.json()
    }

    /// Upload a local file as a new asset.
    ///
    /// Files below the configured size threshold go through the single-shot
    /// endpoint; larger ones through the multipart orchestrator.
    pub async fn upload_file(
        &self,
        entity_type: EntityType,
        entity_id: Id,
        path: &Path,
        metadata: &LocalAssetMetadata,
    ) -> Result<Asset> {
        let assets_url = self.assets_url(entity_type, entity_id)?;
        let size = entitycore_io::file_size(path).await?;

        if size < self.transfer_config.size_threshold {
            debug!(size, threshold = self.transfer_config.size_threshold, "uploading single-shot");
            let content = entitycore_io::read_range(path, 0, size).await?;
            self.upload_content(entity_type, entity_id, content, metadata).await
        } else {
            info!(size, "uploading via multipart");
            upload_asset_file(&self.api, &assets_url, path, metadata, &self.transfer_config).await
        }
    }

    /// Delete an asset; the server returns its record with a deleted status.
    pub async fn delete_asset(
        &self,
        entity_type: EntityType,
        entity_id: Id,
        asset_id: Id,
    ) -> Result<Asset> {
        let url = routes::assets_endpoint(&self.api_url, entity_type, entity_id, Some(asset_id));
        self.api.request(Request::new(Method::Delete, url)).await?.json()
    }
}
