//! Catalog service request and response models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::{file_name, path_key};

/// Kind of container backing an album
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlbumKind {
    Folder,
    Zip,
    /// Any kind this client does not know about yet
    #[serde(other)]
    Other,
}

impl AlbumKind {
    /// Only folders have children the client can open
    pub fn is_navigable(self) -> bool {
        matches!(self, AlbumKind::Folder)
    }
}

impl fmt::Display for AlbumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AlbumKind::Folder => "folder",
            AlbumKind::Zip => "zip",
            AlbumKind::Other => "other",
        };
        f.write_str(s)
    }
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: AlbumKind,
    pub path: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub file_count: u64,
    pub size: Option<u64>,
    pub mtime: Option<i64>,
    pub added_at: Option<i64>,
    pub cover_path: Option<String>,
}

impl Album {
    /// Name shown to the user, falling back to the last path segment
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            file_name(&self.path)
        } else {
            &self.name
        }
    }

    /// Normalized, case-folded path used for lookups
    pub fn key(&self) -> String {
        path_key(&self.path)
    }

    pub fn added_at(&self) -> Option<DateTime<Utc>> {
        self.added_at.and_then(|ts| DateTime::from_timestamp(ts, 0))
    }
}

/// One subtree of the catalog hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub album: Album,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Number of nodes in this subtree, including itself
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }
}

// Tree scope response (GET /albums?scope=tree)
#[derive(Debug, Clone, Deserialize)]
pub struct TreeResponse {
    #[serde(default)]
    pub items: Vec<TreeNode>,
}

/// One level of children plus the chain leading to it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    #[serde(default)]
    pub items: Vec<Album>,
    #[serde(default)]
    pub parent: Option<Album>,
    #[serde(default)]
    pub ancestors: Vec<Album>,
}

/// Body of POST /albums/scan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanRequest {
    pub paths: Vec<String>,
    pub options: ScanOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanOptions {
    pub folder: FolderScanOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderScanOptions {
    pub recursive: bool,
}

impl ScanRequest {
    pub fn new(paths: Vec<String>, recursive: bool) -> Self {
        Self {
            paths,
            options: ScanOptions {
                folder: FolderScanOptions { recursive },
            },
        }
    }
}

/// Result of POST /albums/refresh
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefreshSummary {
    pub checked: u64,
    pub removed: u64,
    #[serde(default)]
    pub ids: Vec<i64>,
}

/// Status carried by a scan progress notification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    Start,
    Done,
    Skip,
    #[default]
    #[serde(other)]
    Other,
}

/// Message pushed on the live event stream
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProgressEvent {
    pub path: Option<String>,
    #[serde(default)]
    pub status: ProgressStatus,
    pub reason: Option<String>,
    pub count: Option<u64>,
}

/// Server runtime settings (GET /settings)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSettings {
    pub cache_dir: Option<String>,
    pub cache_max_bytes: Option<u64>,
    pub default_quality: Option<u32>,
    pub encode_format: Option<String>,
    pub io_concurrency: Option<u32>,
    pub decode_concurrency: Option<u32>,
    pub allow_recursive: Option<bool>,
    pub max_input_pixels: Option<u64>,
}

// GET /health
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// How the server should fit a cover thumbnail into the requested box
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CoverFit {
    #[default]
    Cover,
    Contain,
}

impl CoverFit {
    pub fn as_str(self) -> &'static str {
        match self {
            CoverFit::Cover => "cover",
            CoverFit::Contain => "contain",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_album_decodes_service_payload() {
        let json = r#"{
            "id": 7, "type": "zip", "path": "D:\\Comics\\Vol 1.zip", "name": "Vol 1.zip",
            "mtime": 1700000000, "size": 1048576, "file_count": 180,
            "added_at": 1700000100, "cover_path": null
        }"#;
        let album: Album = serde_json::from_str(json).unwrap();
        assert_eq!(album.id, 7);
        assert_eq!(album.kind, AlbumKind::Zip);
        assert_eq!(album.file_count, 180);
        assert_eq!(album.key(), "d:/comics/vol 1.zip");
        assert!(album.added_at().is_some());
    }

    #[test]
    fn test_unknown_kind_is_other() {
        let json = r#"{"id": 1, "type": "rar", "path": "/x.rar", "name": "x"}"#;
        let album: Album = serde_json::from_str(json).unwrap();
        assert_eq!(album.kind, AlbumKind::Other);
        assert!(!album.kind.is_navigable());
    }

    #[test]
    fn test_display_name_falls_back_to_path() {
        let json = r#"{"id": 1, "type": "folder", "path": "/books/Saga/", "name": ""}"#;
        let album: Album = serde_json::from_str(json).unwrap();
        assert_eq!(album.display_name(), "Saga");
    }

    #[test]
    fn test_grid_snapshot_defaults_missing_chain() {
        let json = r#"{"items": [], "total": 0, "page": 1, "per_page": 0}"#;
        let grid: GridSnapshot = serde_json::from_str(json).unwrap();
        assert!(grid.parent.is_none());
        assert!(grid.ancestors.is_empty());
    }

    #[test]
    fn test_tree_node_ignores_server_path_field() {
        let json = r#"{"items": [{"album": {"id": 1, "type": "folder", "path": "/a", "name": "a"},
            "path": "/a", "children": [{"album": {"id": 2, "type": "zip", "path": "/a/b.zip", "name": "b"},
            "path": "/a/b.zip", "children": []}]}], "total": 2}"#;
        let tree: TreeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(tree.items.len(), 1);
        assert_eq!(tree.items[0].node_count(), 2);
    }

    #[test]
    fn test_scan_request_shape() {
        let body = serde_json::to_value(ScanRequest::new(vec!["/a".into()], true)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"paths": ["/a"], "options": {"folder": {"recursive": true}}})
        );
    }

    #[test]
    fn test_progress_event_status() {
        let start: ProgressEvent = serde_json::from_str(r#"{"path": "/a", "status": "start"}"#).unwrap();
        assert_eq!(start.status, ProgressStatus::Start);
        let skip: ProgressEvent =
            serde_json::from_str(r#"{"path": "/a", "status": "skip", "reason": "not_exists"}"#).unwrap();
        assert_eq!(skip.reason.as_deref(), Some("not_exists"));
        let odd: ProgressEvent = serde_json::from_str(r#"{"path": "/a", "status": "queued"}"#).unwrap();
        assert_eq!(odd.status, ProgressStatus::Other);
    }
}
