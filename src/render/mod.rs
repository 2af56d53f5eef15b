//! Pure derivations from navigation state to display structures

pub mod grid;
pub mod tree;

use crate::catalog::Album;

pub use grid::{Breadcrumb, Card, CoverSize, Crumb, GridView};
pub use tree::{DisplayNode, TreeRow, TreeView};

/// What activating something in a view asks the navigator to do
#[derive(Debug, Clone, PartialEq)]
pub enum NavAction {
    /// Open an album; `None` is the top level
    Open(Option<String>),
    Delete(Album),
}

/// Entries of a node's context menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextAction {
    Open,
    Delete,
}

impl ContextAction {
    pub fn label(self) -> &'static str {
        match self {
            ContextAction::Open => "Open",
            ContextAction::Delete => "Delete from catalog",
        }
    }
}
