//! Sidebar tree derived from navigation state

use std::cmp::Ordering;
use std::collections::HashMap;

use super::{ContextAction, NavAction};
use crate::catalog::{Album, TreeNode};
use crate::nav::NavigationState;
use crate::utils::{format_count, path_key};

/// One tree row with its derived display flags
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayNode {
    pub album: Album,
    /// Normalized, case-folded path
    pub key: String,
    pub label: String,
    pub depth: usize,
    pub expanded: bool,
    /// This node is the open album
    pub active: bool,
    pub navigable: bool,
    pub children: Vec<DisplayNode>,
}

impl DisplayNode {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// `folder · 1,234 pages`
    pub fn meta(&self) -> String {
        format!("{} · {} pages", self.album.kind, format_count(self.album.file_count))
    }
}

/// Case-insensitive sibling order by name, falling back to path
fn compare_nodes(a: &TreeNode, b: &TreeNode) -> Ordering {
    let sort_name = |n: &TreeNode| n.album.display_name().to_lowercase();
    sort_name(a)
        .cmp(&sort_name(b))
        .then_with(|| path_key(&a.album.path).cmp(&path_key(&b.album.path)))
}

/// Build the display tree for the current state
///
/// A node starts expanded when a search is active, when it is a root, or when
/// it lies on the path to the open album.
pub fn derive(state: &NavigationState) -> Vec<DisplayNode> {
    let grid = state.grid();
    let mut on_active_path: Vec<String> = grid.ancestors.iter().map(Album::key).collect();
    if let Some(parent) = &grid.parent {
        on_active_path.push(parent.key());
    }
    let root_key = state.current_root().map(path_key);
    let expand_all = !state.keyword().is_empty();

    fn build(
        nodes: &[TreeNode],
        depth: usize,
        ctx: &(Vec<String>, Option<String>, bool),
    ) -> Vec<DisplayNode> {
        let (on_active_path, root_key, expand_all) = ctx;
        let mut sorted: Vec<&TreeNode> = nodes.iter().collect();
        sorted.sort_by(|a, b| compare_nodes(a, b));

        sorted
            .into_iter()
            .map(|node| {
                let key = node.album.key();
                let active = root_key.as_deref() == Some(key.as_str());
                let expanded =
                    *expand_all || depth == 0 || on_active_path.contains(&key) || active;
                DisplayNode {
                    label: node.album.display_name().to_string(),
                    navigable: node.album.kind.is_navigable(),
                    children: build(&node.children, depth + 1, ctx),
                    album: node.album.clone(),
                    key,
                    depth,
                    expanded,
                    active,
                }
            })
            .collect()
    }

    build(state.tree(), 0, &(on_active_path, root_key, expand_all))
}

/// Double-activation: folders open, archives do nothing
pub fn activate(node: &DisplayNode) -> Option<NavAction> {
    node.navigable
        .then(|| NavAction::Open(Some(node.album.path.clone())))
}

/// Actions offered on a node's context menu
///
/// Every node offers both; opening an archive resolves to nothing.
pub fn context_actions(_node: &DisplayNode) -> Vec<ContextAction> {
    vec![ContextAction::Open, ContextAction::Delete]
}

/// Turn a chosen context action into a navigation action
pub fn resolve(action: ContextAction, node: &DisplayNode) -> Option<NavAction> {
    match action {
        ContextAction::Open => activate(node),
        ContextAction::Delete => Some(NavAction::Delete(node.album.clone())),
    }
}

/// A visible row of the flattened tree
#[derive(Debug, Clone, Copy)]
pub struct TreeRow<'a> {
    pub node: &'a DisplayNode,
    pub expanded: bool,
}

/// Display tree plus the user's manual expand/collapse choices
///
/// Manual toggles last until the next state replacement, after which the
/// derived expansion applies again.
#[derive(Debug, Default)]
pub struct TreeView {
    roots: Vec<DisplayNode>,
    overrides: HashMap<String, bool>,
    revision: u64,
}

impl TreeView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-derive from state if it was replaced since the last call
    pub fn sync(&mut self, state: &NavigationState, revision: u64) -> bool {
        if revision == self.revision && !self.roots.is_empty() {
            return false;
        }
        self.roots = derive(state);
        self.overrides.clear();
        self.revision = revision;
        true
    }

    pub fn roots(&self) -> &[DisplayNode] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    fn is_expanded(&self, node: &DisplayNode) -> bool {
        self.overrides.get(&node.key).copied().unwrap_or(node.expanded)
    }

    /// Flip a node's expansion; leaves without children are ignored
    pub fn toggle(&mut self, key: &str) {
        let expanded = match self.rows().into_iter().find(|r| r.node.key == key) {
            Some(row) if row.node.has_children() => row.expanded,
            _ => return,
        };
        self.overrides.insert(key.to_string(), !expanded);
    }

    /// Visible rows in display order
    pub fn rows(&self) -> Vec<TreeRow<'_>> {
        fn walk<'a>(view: &TreeView, nodes: &'a [DisplayNode], out: &mut Vec<TreeRow<'a>>) {
            for node in nodes {
                let expanded = view.is_expanded(node);
                out.push(TreeRow { node, expanded });
                if expanded {
                    walk(view, &node.children, out);
                }
            }
        }

        let mut out = Vec::new();
        walk(self, &self.roots, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::{folder, node, zip};
    use crate::catalog::GridSnapshot;

    fn tree() -> Vec<TreeNode> {
        vec![
            node(
                folder(1, "/Comics"),
                vec![
                    node(
                        folder(2, "/Comics/saga"),
                        vec![node(folder(6, "/Comics/saga/Extras"), vec![
                            node(zip(7, "/Comics/saga/Extras/art.zip"), vec![]),
                        ])],
                    ),
                    node(zip(3, "/Comics/Akira.zip"), vec![]),
                    node(folder(4, "/Comics/Bone"), vec![node(zip(8, "/Comics/Bone/1.zip"), vec![])]),
                ],
            ),
            node(folder(5, "/Archive"), vec![]),
        ]
    }

    fn state(root: Option<&str>, keyword: &str, grid: GridSnapshot) -> NavigationState {
        NavigationState::from_load(root.map(str::to_string), keyword.to_string(), tree(), grid)
    }

    #[test]
    fn test_siblings_sorted_case_insensitively() {
        let nodes = derive(&state(None, "", GridSnapshot::default()));
        let roots: Vec<_> = nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(roots, vec!["Archive", "Comics"]);
        let children: Vec<_> = nodes[1].children.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(children, vec!["Akira.zip", "Bone", "saga"]);
    }

    #[test]
    fn test_top_level_only_roots_expanded() {
        let nodes = derive(&state(None, "", GridSnapshot::default()));
        assert!(nodes.iter().all(|n| n.expanded));
        assert!(nodes[1].children.iter().all(|n| !n.expanded));
    }

    #[test]
    fn test_path_to_open_album_expanded() {
        let grid = GridSnapshot {
            items: vec![],
            parent: Some(folder(6, "/Comics/saga/Extras")),
            ancestors: vec![folder(1, "/Comics"), folder(2, "/Comics/saga")],
        };
        let nodes = derive(&state(Some("/comics/SAGA/extras"), "", grid));
        let comics = &nodes[1];
        let saga = &comics.children[2];
        let extras = &saga.children[0];
        assert!(saga.expanded);
        assert!(extras.expanded && extras.active);
        assert!(!comics.children[1].expanded);
        assert!(!saga.active);
    }

    #[test]
    fn test_keyword_expands_everything() {
        let nodes = derive(&state(None, "art", GridSnapshot::default()));
        fn all_expanded(nodes: &[DisplayNode]) -> bool {
            nodes.iter().all(|n| n.expanded && all_expanded(&n.children))
        }
        assert!(all_expanded(&nodes));
    }

    #[test]
    fn test_activation_by_kind() {
        let nodes = derive(&state(None, "", GridSnapshot::default()));
        let comics = &nodes[1];
        assert_eq!(
            activate(comics),
            Some(NavAction::Open(Some("/Comics".to_string())))
        );
        let akira = &comics.children[0];
        assert_eq!(activate(akira), None);
        assert_eq!(context_actions(comics), vec![ContextAction::Open, ContextAction::Delete]);
        assert_eq!(context_actions(akira), vec![ContextAction::Open, ContextAction::Delete]);
        assert_eq!(resolve(ContextAction::Open, akira), None);
        assert_eq!(
            resolve(ContextAction::Open, comics),
            Some(NavAction::Open(Some("/Comics".to_string())))
        );
        assert_eq!(
            resolve(ContextAction::Delete, akira),
            Some(NavAction::Delete(akira.album.clone()))
        );
    }

    #[test]
    fn test_tree_view_toggle_and_reset() {
        let state = state(None, "", GridSnapshot::default());
        let mut view = TreeView::new();
        assert!(view.sync(&state, 1));
        assert_eq!(view.rows().len(), 5);

        view.toggle("/comics/bone");
        assert_eq!(view.rows().len(), 6);
        view.toggle("/comics");
        assert_eq!(view.rows().len(), 2);
        // Leaves do not toggle
        view.toggle("/archive");
        assert_eq!(view.rows().len(), 2);

        assert!(!view.sync(&state, 1));
        assert!(view.sync(&state, 2));
        assert_eq!(view.rows().len(), 5);
    }
}
