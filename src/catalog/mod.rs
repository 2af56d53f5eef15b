//! Catalog service client module

use async_trait::async_trait;

pub mod client;
pub mod error;
pub mod models;

pub use client::CatalogClient;
pub use error::{CatalogError, Result};
pub use models::*;

/// The catalog operations the navigator depends on
///
/// [`CatalogClient`] talks to the real service; tests substitute an
/// in-memory implementation.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Subtree rooted at `parent` (the whole forest for `None`), filtered by `keyword`
    async fn fetch_tree(&self, parent: Option<&str>, keyword: &str) -> Result<Vec<TreeNode>>;

    /// Direct children of `parent` sorted by name, with the ancestor chain
    async fn fetch_children(&self, parent: Option<&str>, keyword: &str) -> Result<GridSnapshot>;

    /// Queue a scan; progress arrives on the event stream
    async fn submit_scan(&self, paths: &[String], recursive: bool) -> Result<()>;

    /// Drop albums whose backing storage is gone
    async fn refresh(&self) -> Result<RefreshSummary>;

    /// Remove one catalog record (never touches storage)
    async fn delete_album(&self, id: i64) -> Result<()>;
}

#[cfg(test)]
pub mod testing {
    //! Scripted in-memory catalog

    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub fn album(id: i64, path: &str, kind: AlbumKind) -> Album {
        Album {
            id,
            kind,
            path: path.to_string(),
            name: crate::utils::file_name(path).to_string(),
            file_count: 3,
            size: None,
            mtime: None,
            added_at: None,
            cover_path: None,
        }
    }

    pub fn folder(id: i64, path: &str) -> Album {
        album(id, path, AlbumKind::Folder)
    }

    pub fn zip(id: i64, path: &str) -> Album {
        album(id, path, AlbumKind::Zip)
    }

    pub fn node(album: Album, children: Vec<TreeNode>) -> TreeNode {
        TreeNode { album, children }
    }

    /// Canned responses per `(root key, keyword)`; anything unscripted fails
    #[derive(Default)]
    pub struct FakeCatalog {
        pub trees: Mutex<HashMap<String, Vec<TreeNode>>>,
        pub grids: Mutex<HashMap<(String, String), GridSnapshot>>,
        pub failing_roots: Mutex<Vec<String>>,
        pub fail_everything: Mutex<bool>,
        pub delete_results: Mutex<VecDeque<Result<()>>>,
        pub refresh_summary: Mutex<RefreshSummary>,
        pub tree_calls: AtomicUsize,
        pub children_calls: AtomicUsize,
        pub children_roots: Mutex<Vec<Option<String>>>,
        pub scans: Mutex<Vec<(Vec<String>, bool)>>,
        pub deletes: Mutex<Vec<i64>>,
        pub refreshes: AtomicUsize,
    }

    fn root_key(root: Option<&str>) -> String {
        root.map(crate::utils::path_key).unwrap_or_default()
    }

    fn unavailable(what: &str) -> CatalogError {
        CatalogError::Status {
            status: reqwest::StatusCode::NOT_FOUND,
            body: format!("{} not found", what),
        }
    }

    impl FakeCatalog {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_tree(self, keyword: &str, tree: Vec<TreeNode>) -> Self {
            self.trees.lock().unwrap().insert(keyword.to_string(), tree);
            self
        }

        pub fn with_grid(self, root: Option<&str>, keyword: &str, grid: GridSnapshot) -> Self {
            self.grids
                .lock()
                .unwrap()
                .insert((root_key(root), keyword.to_string()), grid);
            self
        }

        pub fn fail_root(&self, root: &str) {
            self.failing_roots.lock().unwrap().push(root_key(Some(root)));
        }

        pub fn fail_everything(&self, fail: bool) {
            *self.fail_everything.lock().unwrap() = fail;
        }

        pub fn total_loads(&self) -> usize {
            self.children_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Catalog for FakeCatalog {
        async fn fetch_tree(&self, _parent: Option<&str>, keyword: &str) -> Result<Vec<TreeNode>> {
            self.tree_calls.fetch_add(1, Ordering::SeqCst);
            if *self.fail_everything.lock().unwrap() {
                return Err(unavailable("tree"));
            }
            self.trees
                .lock()
                .unwrap()
                .get(keyword)
                .cloned()
                .ok_or_else(|| unavailable("tree"))
        }

        async fn fetch_children(&self, parent: Option<&str>, keyword: &str) -> Result<GridSnapshot> {
            self.children_calls.fetch_add(1, Ordering::SeqCst);
            self.children_roots
                .lock()
                .unwrap()
                .push(parent.map(str::to_string));
            let key = root_key(parent);
            if *self.fail_everything.lock().unwrap() || self.failing_roots.lock().unwrap().contains(&key) {
                return Err(unavailable("album"));
            }
            self.grids
                .lock()
                .unwrap()
                .get(&(key, keyword.to_string()))
                .cloned()
                .ok_or_else(|| unavailable("album"))
        }

        async fn submit_scan(&self, paths: &[String], recursive: bool) -> Result<()> {
            self.scans.lock().unwrap().push((paths.to_vec(), recursive));
            Ok(())
        }

        async fn refresh(&self) -> Result<RefreshSummary> {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
            Ok(self.refresh_summary.lock().unwrap().clone())
        }

        async fn delete_album(&self, id: i64) -> Result<()> {
            self.deletes.lock().unwrap().push(id);
            self.delete_results.lock().unwrap().pop_front().unwrap_or(Ok(()))
        }
    }
}
