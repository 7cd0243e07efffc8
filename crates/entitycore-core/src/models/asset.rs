use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::Id;

/// Server-side metadata of one asset attached to an entity.
///
/// The server is the source of truth: records are replaced on refetch, never
/// mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: Id,
    /// Path relative to the owning entity's asset root.
    pub path: String,
    pub full_path: String,
    pub content_type: String,
    pub size: u64,
    pub is_directory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AssetStatus>,
    /// Open, server-defined key/value metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
}

impl Asset {
    /// Field names accepted by asset selections.
    pub const FIELD_NAMES: &'static [&'static str] = &[
        "id",
        "path",
        "full_path",
        "content_type",
        "size",
        "is_directory",
        "label",
        "status",
        "meta",
    ];
}

/// Upload lifecycle of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetStatus {
    #[serde(alias = "CREATED")]
    Created,
    #[serde(alias = "UPLOADING")]
    Uploading,
    #[serde(alias = "DELETED")]
    Deleted,
}

/// Caller-side description of a file that is about to be uploaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalAssetMetadata {
    pub file_name: String,
    pub content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl LocalAssetMetadata {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            label: None,
            metadata: None,
        }
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Contents of a directory asset, keyed by path relative to the directory
/// root. Returned by the list-directory endpoint; sub-paths are never
/// embedded in the [`Asset`] record itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedFileList {
    pub files: BTreeMap<String, DirectoryFile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryFile {
    pub name: String,
    pub size: u64,
}
