//! Navigation state: the single source of truth both views render from

use std::collections::HashMap;
use tracing::debug;

use crate::catalog::{Album, GridSnapshot, TreeNode};
use crate::utils::{normalize_path, path_key, same_path};

/// Lookup from normalized, case-folded path to album
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathIndex {
    albums: HashMap<String, Album>,
}

impl PathIndex {
    pub fn get(&self, path: &str) -> Option<&Album> {
        self.albums.get(&path_key(path))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.albums.contains_key(&path_key(path))
    }

    pub fn len(&self) -> usize {
        self.albums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.albums.is_empty()
    }
}

/// Walk the tree depth-first and index every album by its path
///
/// A path seen twice keeps the album visited last.
pub fn rebuild_index(tree: &[TreeNode]) -> PathIndex {
    fn walk(nodes: &[TreeNode], albums: &mut HashMap<String, Album>) {
        for node in nodes {
            if !node.album.path.is_empty() {
                let key = node.album.key();
                if let Some(previous) = albums.insert(key, node.album.clone()) {
                    debug!(
                        "Duplicate album path {:?} (ids {} and {}), keeping the later one",
                        node.album.path, previous.id, node.album.id
                    );
                }
            }
            walk(&node.children, albums);
        }
    }

    let mut albums = HashMap::new();
    walk(tree, &mut albums);
    PathIndex { albums }
}

/// Everything the tree and grid views are derived from
///
/// Replaced wholesale by the synchronizer after each successful load; never
/// edited field by field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigationState {
    current_root: Option<String>,
    keyword: String,
    tree: Vec<TreeNode>,
    index: PathIndex,
    grid: GridSnapshot,
}

impl NavigationState {
    /// Empty state shown before the first load completes
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a complete state from one load cycle's results
    pub fn from_load(
        current_root: Option<String>,
        keyword: String,
        tree: Vec<TreeNode>,
        grid: GridSnapshot,
    ) -> Self {
        let index = rebuild_index(&tree);
        Self {
            current_root: current_root
                .map(|p| normalize_path(&p))
                .filter(|p| !p.is_empty()),
            keyword,
            tree,
            index,
            grid,
        }
    }

    /// Path of the open album, `None` at the top level
    pub fn current_root(&self) -> Option<&str> {
        self.current_root.as_deref()
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn tree(&self) -> &[TreeNode] {
        &self.tree
    }

    pub fn index(&self) -> &PathIndex {
        &self.index
    }

    pub fn grid(&self) -> &GridSnapshot {
        &self.grid
    }

    /// Whether `path` is the open album
    pub fn is_current_root(&self, path: &str) -> bool {
        self.current_root
            .as_deref()
            .is_some_and(|root| same_path(root, path))
    }

    /// Path one level up according to the grid's ancestor chain
    pub fn back_target(&self) -> Option<&str> {
        self.grid.ancestors.last().map(|a| a.path.as_str())
    }
}
