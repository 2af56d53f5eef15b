//! View synchronizer
//!
//! Fetches the tree and the grid for one `(root, keyword)` pair together and
//! swaps them into [`NavigationState`] in one step. A load is split into
//! three phases so the browser loop can run the network part in a background
//! task while keeping the only write to state on its own thread:
//!
//! 1. [`ViewSynchronizer::begin`] stamps the request with a new generation
//! 2. [`ViewSynchronizer::fetch`] talks to the catalog and never sees state
//! 3. [`ViewSynchronizer::apply`] drops results from superseded generations
//!    and otherwise replaces the state wholesale
//!
//! If either fetch fails for a non-top-level root, the load is retried once
//! at the top level; the album may have been deleted or moved away.

use thiserror::Error;
use tracing::{debug, warn};

use super::state::NavigationState;
use crate::catalog::{Catalog, CatalogError, GridSnapshot, TreeNode};
use crate::utils::normalize_path;

/// A load request stamped with its generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub root: Option<String>,
    pub keyword: String,
}

/// Tree and grid fetched for one root
#[derive(Debug, Clone)]
pub struct LoadedView {
    /// Root actually loaded (`None` after falling back to the top level)
    pub root: Option<String>,
    pub keyword: String,
    pub tree: Vec<TreeNode>,
    pub grid: GridSnapshot,
    pub fell_back: bool,
}

/// Both the requested load and the top-level fallback (if tried) failed
#[derive(Debug, Error)]
#[error("{}", describe_load_error(.requested_root, .fell_back, .source))]
pub struct LoadError {
    pub requested_root: Option<String>,
    pub fell_back: bool,
    #[source]
    pub source: CatalogError,
}

fn describe_load_error(root: &Option<String>, fell_back: &bool, source: &CatalogError) -> String {
    match (root, *fell_back) {
        (Some(root), true) => format!(
            "failed to load albums for {} and the top level: {}",
            root, source
        ),
        (Some(root), false) => format!("failed to load albums for {}: {}", root, source),
        (None, _) => format!("failed to load albums: {}", source),
    }
}

/// Result of one fetch, still tagged with its generation
#[derive(Debug)]
pub struct LoadOutcome {
    pub generation: u64,
    pub result: Result<LoadedView, LoadError>,
}

/// What [`ViewSynchronizer::apply`] did with an outcome
#[derive(Debug)]
pub enum Applied {
    /// State was replaced; both views should re-render now
    Replaced { fell_back: bool },
    /// The load failed; the previous snapshot is still in place
    Failed(LoadError),
    /// A newer load was started after this one; the result was dropped
    Stale,
}

#[derive(Debug, Default)]
pub struct ViewSynchronizer {
    latest: u64,
}

impl ViewSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generation of the most recent [`begin`](Self::begin)
    pub fn latest(&self) -> u64 {
        self.latest
    }

    /// Start a load, superseding every earlier one
    pub fn begin(&mut self, root: Option<&str>, keyword: &str) -> LoadTicket {
        self.latest += 1;
        let ticket = LoadTicket {
            generation: self.latest,
            root: root.map(normalize_path).filter(|p| !p.is_empty()),
            keyword: keyword.trim().to_string(),
        };
        debug!(
            "Load #{} root={:?} keyword={:?}",
            ticket.generation, ticket.root, ticket.keyword
        );
        ticket
    }

    /// Fetch tree and grid for a ticket, falling back to the top level once
    pub async fn fetch<C: Catalog + ?Sized>(catalog: &C, ticket: LoadTicket) -> LoadOutcome {
        let LoadTicket {
            generation,
            root,
            keyword,
        } = ticket;

        let first = fetch_pair(catalog, root.as_deref(), &keyword).await;
        let result = match first {
            Ok((tree, grid)) => Ok(LoadedView {
                root,
                keyword,
                tree,
                grid,
                fell_back: false,
            }),
            Err(err) if root.is_some() => {
                warn!(
                    "Load #{} for {:?} failed ({}), retrying at top level",
                    generation, root, err
                );
                match fetch_pair(catalog, None, &keyword).await {
                    Ok((tree, grid)) => Ok(LoadedView {
                        root: None,
                        keyword,
                        tree,
                        grid,
                        fell_back: true,
                    }),
                    Err(source) => Err(LoadError {
                        requested_root: root,
                        fell_back: true,
                        source,
                    }),
                }
            }
            Err(source) => Err(LoadError {
                requested_root: None,
                fell_back: false,
                source,
            }),
        };

        LoadOutcome { generation, result }
    }

    /// Apply a finished load if it is still the latest one
    pub fn apply(&self, state: &mut NavigationState, outcome: LoadOutcome) -> Applied {
        if outcome.generation != self.latest {
            debug!(
                "Dropping stale load #{} (latest is #{})",
                outcome.generation, self.latest
            );
            return Applied::Stale;
        }

        match outcome.result {
            Ok(view) => {
                let fell_back = view.fell_back;
                *state = NavigationState::from_load(view.root, view.keyword, view.tree, view.grid);
                debug!(
                    "Applied load #{}: {} indexed albums, {} grid items",
                    outcome.generation,
                    state.index().len(),
                    state.grid().items.len()
                );
                Applied::Replaced { fell_back }
            }
            Err(err) => Applied::Failed(err),
        }
    }

    /// Begin, fetch and apply in one call
    pub async fn load_view<C: Catalog + ?Sized>(
        &mut self,
        catalog: &C,
        state: &mut NavigationState,
        root: Option<&str>,
        keyword: &str,
    ) -> Result<Applied, LoadError> {
        let ticket = self.begin(root, keyword);
        let outcome = Self::fetch(catalog, ticket).await;
        match self.apply(state, outcome) {
            Applied::Failed(err) => Err(err),
            applied => Ok(applied),
        }
    }
}

/// Issue both requests concurrently; the first failure wins
async fn fetch_pair<C: Catalog + ?Sized>(
    catalog: &C,
    root: Option<&str>,
    keyword: &str,
) -> Result<(Vec<TreeNode>, GridSnapshot), CatalogError> {
    tokio::try_join!(
        catalog.fetch_tree(None, keyword),
        catalog.fetch_children(root, keyword)
    )
}
