//! Navigation actions
//!
//! [`Navigator`] owns the navigation state and is the only thing that writes
//! to it. Loads run as background tasks; their outcomes come back through
//! [`Navigator::next_event`] and are applied by whoever drives the navigator
//! (the browser loop, or [`Navigator::settle`] in commands and tests).

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::activity::ActivityLog;
use super::debounce::{Debouncer, SEARCH_DEBOUNCE};
use super::state::NavigationState;
use super::sync::{Applied, LoadOutcome, ViewSynchronizer};
use crate::catalog::{Album, Catalog, CatalogError, RefreshSummary};
use crate::utils::normalize_path;

/// Asks the user to approve a destructive action
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined; nothing was sent
    Cancelled,
    Deleted,
}

/// Something the navigator needs to react to
#[derive(Debug)]
pub enum NavEvent {
    Loaded(LoadOutcome),
    /// The search box has been quiet for the debounce period
    SearchSettled(String),
}

/// Prompt shown before deleting an album
pub fn delete_prompt(album: &Album) -> String {
    format!(
        "Delete album \"{}\" from the catalog? Files on disk are not touched.",
        album.display_name()
    )
}

pub struct Navigator<C: Catalog + ?Sized + 'static> {
    catalog: Arc<C>,
    state: NavigationState,
    sync: ViewSynchronizer,
    log: ActivityLog,
    /// Root of the most recent load request, applied or not
    target_root: Option<String>,
    /// Text currently in the search box
    search_text: String,
    /// A keystroke is waiting for the debounce period to pass
    search_outstanding: bool,
    /// Bumped every time the state is replaced
    revision: u64,
    in_flight: usize,
    loads_tx: mpsc::UnboundedSender<LoadOutcome>,
    loads_rx: mpsc::UnboundedReceiver<LoadOutcome>,
    search: Debouncer<String>,
    search_rx: mpsc::UnboundedReceiver<String>,
}

impl<C: Catalog + ?Sized + 'static> Navigator<C> {
    pub fn new(catalog: Arc<C>) -> Self {
        let (loads_tx, loads_rx) = mpsc::unbounded_channel();
        let (search_tx, search_rx) = mpsc::unbounded_channel();
        Self {
            catalog,
            state: NavigationState::new(),
            sync: ViewSynchronizer::new(),
            log: ActivityLog::new(),
            target_root: None,
            search_text: String::new(),
            search_outstanding: false,
            revision: 0,
            in_flight: 0,
            loads_tx,
            loads_rx,
            search: Debouncer::new(SEARCH_DEBOUNCE, search_tx),
            search_rx,
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut ActivityLog {
        &mut self.log
    }

    pub fn catalog(&self) -> &Arc<C> {
        &self.catalog
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Number of state replacements so far; views re-render when it changes
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Start a load for `(root, keyword)`, superseding any load in flight
    fn spawn_load(&mut self, root: Option<&str>, keyword: &str) {
        // This load already carries the latest search text
        self.search.cancel();
        self.search_outstanding = false;

        let ticket = self.sync.begin(root, keyword);
        self.target_root = ticket.root.clone();
        self.in_flight += 1;

        let catalog = Arc::clone(&self.catalog);
        let tx = self.loads_tx.clone();
        tokio::spawn(async move {
            let outcome = ViewSynchronizer::fetch(catalog.as_ref(), ticket).await;
            if tx.send(outcome).is_err() {
                debug!("Navigator dropped before load finished");
            }
        });
    }

    /// Open an album by path, or the top level for `None`
    pub fn open_album(&mut self, path: Option<&str>) {
        let keyword = self.search_text.clone();
        self.spawn_load(path, &keyword);
    }

    /// Navigate to the parent shown in the grid's ancestor chain
    pub fn go_back(&mut self) {
        let target = self.state.back_target().map(str::to_string);
        self.open_album(target.as_deref());
    }

    /// Reload the current view
    pub fn reload(&mut self) {
        let root = self.target_root.clone();
        let keyword = self.search_text.clone();
        self.spawn_load(root.as_deref(), &keyword);
    }

    /// Record a keystroke in the search box; the load runs once typing pauses
    pub fn search(&mut self, text: &str) {
        self.search_text = text.to_string();
        self.search_outstanding = true;
        self.search.schedule(text.trim().to_string());
    }

    /// Load the current root filtered by a settled search keyword
    pub fn apply_search(&mut self, keyword: &str) {
        let root = self.target_root.clone();
        self.spawn_load(root.as_deref(), keyword);
    }

    /// Wait for the next load result or settled search
    pub async fn next_event(&mut self) -> Option<NavEvent> {
        tokio::select! {
            Some(outcome) = self.loads_rx.recv() => Some(NavEvent::Loaded(outcome)),
            Some(keyword) = self.search_rx.recv() => Some(NavEvent::SearchSettled(keyword)),
            else => None,
        }
    }

    /// Handle every event that is already waiting, without blocking
    ///
    /// Returns `true` when any of them replaced the state.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        loop {
            let event = match self.loads_rx.try_recv() {
                Ok(outcome) => NavEvent::Loaded(outcome),
                Err(_) => match self.search_rx.try_recv() {
                    Ok(keyword) => NavEvent::SearchSettled(keyword),
                    Err(_) => break,
                },
            };
            changed |= self.handle(event);
        }
        changed
    }

    /// React to an event; returns `true` when the views must re-render
    pub fn handle(&mut self, event: NavEvent) -> bool {
        match event {
            NavEvent::SearchSettled(keyword) => {
                // A load issued after the keystroke already used this text;
                // a keystroke after the timer fired has its own timer pending
                if self.search_outstanding && keyword == self.search_text.trim() {
                    self.apply_search(&keyword);
                } else {
                    debug!("Ignoring settled search {:?}", keyword);
                }
                false
            }
            NavEvent::Loaded(outcome) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                self.complete_load(outcome)
            }
        }
    }

    fn complete_load(&mut self, outcome: LoadOutcome) -> bool {
        let requested = self.target_root.clone();
        match self.sync.apply(&mut self.state, outcome) {
            Applied::Replaced { fell_back } => {
                self.revision += 1;
                if fell_back {
                    self.log.warn(format!(
                        "{} is no longer available, showing the top level",
                        requested.as_deref().unwrap_or("Album")
                    ));
                }
                self.target_root = self.state.current_root().map(str::to_string);
                true
            }
            Applied::Failed(err) => {
                self.log.error(format!("Loading albums failed: {}", err));
                self.target_root = self.state.current_root().map(str::to_string);
                false
            }
            Applied::Stale => false,
        }
    }

    /// Drive events until no load or search is outstanding
    pub async fn settle(&mut self) {
        while self.in_flight > 0 || self.search_outstanding {
            match self.next_event().await {
                Some(event) => {
                    self.handle(event);
                }
                None => break,
            }
        }
    }

    /// Look up an album by path in the current snapshot
    pub fn find(&self, path: &str) -> Option<&Album> {
        self.state.index().get(path).or_else(|| {
            let key = crate::utils::path_key(path);
            self.state.grid().items.iter().find(|a| a.key() == key)
        })
    }

    /// Delete one album after confirmation, then reload the same view
    pub async fn delete_album(
        &mut self,
        album: &Album,
        confirm: &mut impl Confirm,
    ) -> Result<DeleteOutcome, CatalogError> {
        if !confirm.confirm(&delete_prompt(album)) {
            debug!("Delete of {} cancelled", album.path);
            return Ok(DeleteOutcome::Cancelled);
        }

        match self.catalog.delete_album(album.id).await {
            Ok(()) => {
                self.log.ok(format!("Deleted {}", album.display_name()));
                self.reload();
                Ok(DeleteOutcome::Deleted)
            }
            Err(err) => {
                self.log.error(format!("Deleting {} failed: {}", album.display_name(), err));
                Err(err)
            }
        }
    }

    /// Delete the album at `path` in the current snapshot
    pub async fn delete_path(
        &mut self,
        path: &str,
        confirm: &mut impl Confirm,
    ) -> Result<DeleteOutcome, CatalogError> {
        let Some(album) = self.find(path).cloned() else {
            let err = CatalogError::Validation(format!("no album at {}", path));
            self.log.error(err.to_string());
            return Err(err);
        };
        self.delete_album(&album, confirm).await
    }

    /// Submit a scan, then reload once the server has accepted it
    pub async fn scan(&mut self, paths: &[String], recursive: bool) -> Result<(), CatalogError> {
        let paths: Vec<String> = paths
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(normalize_path)
            .collect();
        if paths.is_empty() {
            let err = CatalogError::Validation("enter at least one absolute path".into());
            self.log.error(err.to_string());
            return Err(err);
        }

        self.log.info(format!(
            "Submitting scan: {} recursive={}",
            paths.join("; "),
            recursive
        ));
        if let Err(err) = self.catalog.submit_scan(&paths, recursive).await {
            self.log.error(format!("Scan failed: {}", err));
            return Err(err);
        }
        self.log.ok("Scan request submitted");
        self.reload();
        Ok(())
    }

    /// Prune albums whose storage vanished, then reload
    pub async fn refresh(&mut self) -> Result<RefreshSummary, CatalogError> {
        match self.catalog.refresh().await {
            Ok(summary) => {
                let text = format!(
                    "Refresh finished: checked={} removed={}",
                    summary.checked, summary.removed
                );
                if summary.removed > 0 {
                    self.log.warn(text);
                } else {
                    self.log.ok(text);
                }
                info!("Refresh removed ids {:?}", summary.ids);
                self.reload();
                Ok(summary)
            }
            Err(err) => {
                self.log.error(format!("Refresh failed: {}", err));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::{folder, node, zip, FakeCatalog};
    use crate::catalog::GridSnapshot;
    use crate::nav::activity::LogLevel;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn catalog() -> Arc<FakeCatalog> {
        let tree = vec![node(
            folder(1, "/Comics"),
            vec![
                node(folder(2, "/Comics/Saga"), vec![]),
                node(zip(3, "/Comics/One Shot.zip"), vec![]),
            ],
        )];
        let comics = GridSnapshot {
            items: vec![folder(2, "/Comics/Saga"), zip(3, "/Comics/One Shot.zip")],
            parent: Some(folder(1, "/Comics")),
            ancestors: vec![],
        };
        let saga = GridSnapshot {
            items: vec![],
            parent: Some(folder(2, "/Comics/Saga")),
            ancestors: vec![folder(1, "/Comics")],
        };
        let top = GridSnapshot {
            items: vec![folder(1, "/Comics")],
            parent: None,
            ancestors: vec![],
        };
        Arc::new(
            FakeCatalog::new()
                .with_tree("", tree.clone())
                .with_tree("saga", tree)
                .with_grid(None, "", top)
                .with_grid(Some("/Comics"), "", comics.clone())
                .with_grid(Some("/Comics"), "saga", comics)
                .with_grid(Some("/Comics/Saga"), "", saga),
        )
    }

    async fn navigator_at(root: Option<&str>) -> (Arc<FakeCatalog>, Navigator<FakeCatalog>) {
        let catalog = catalog();
        let mut nav = Navigator::new(Arc::clone(&catalog));
        nav.open_album(root);
        nav.settle().await;
        (catalog, nav)
    }

    #[tokio::test]
    async fn test_pump_applies_finished_loads_without_waiting() {
        let catalog = catalog();
        let mut nav = Navigator::new(Arc::clone(&catalog));
        assert!(!nav.pump());

        nav.open_album(Some("/Comics"));
        let mut replaced = false;
        for _ in 0..100 {
            tokio::task::yield_now().await;
            if nav.pump() {
                replaced = true;
                break;
            }
        }
        assert!(replaced);
        assert!(!nav.is_loading());
        assert_eq!(nav.state().current_root(), Some("/Comics"));
    }

    #[tokio::test]
    async fn test_open_album_replaces_state_once() {
        let (_, mut nav) = navigator_at(None).await;
        assert_eq!(nav.revision(), 1);

        nav.open_album(Some("/Comics"));
        nav.settle().await;
        assert_eq!(nav.revision(), 2);
        assert_eq!(nav.state().current_root(), Some("/Comics"));
        assert_eq!(nav.state().grid().items.len(), 2);
    }

    #[tokio::test]
    async fn test_go_back_uses_last_ancestor() {
        let (_, mut nav) = navigator_at(Some("/Comics/Saga")).await;
        nav.go_back();
        nav.settle().await;
        assert_eq!(nav.state().current_root(), Some("/Comics"));

        nav.go_back();
        nav.settle().await;
        assert_eq!(nav.state().current_root(), None);
    }

    #[tokio::test]
    async fn test_rapid_navigation_keeps_latest() {
        let (_, mut nav) = navigator_at(None).await;
        nav.open_album(Some("/Comics"));
        nav.open_album(Some("/Comics/Saga"));
        nav.settle().await;
        assert_eq!(nav.state().current_root(), Some("/Comics/Saga"));
    }

    #[tokio::test]
    async fn test_missing_album_falls_back_and_logs() {
        let (catalog, mut nav) = navigator_at(None).await;
        catalog.fail_root("/Comics/Gone");
        nav.open_album(Some("/Comics/Gone"));
        nav.settle().await;
        assert_eq!(nav.state().current_root(), None);
        assert_eq!(nav.log().last().map(|l| l.level), Some(LogLevel::Warn));
    }

    #[tokio::test]
    async fn test_irrecoverable_failure_keeps_snapshot() {
        let (catalog, mut nav) = navigator_at(Some("/Comics")).await;
        let before = nav.state().clone();
        catalog.fail_everything(true);
        nav.open_album(Some("/Comics/Saga"));
        nav.settle().await;
        assert_eq!(*nav.state(), before);
        assert_eq!(nav.log().last().map(|l| l.level), Some(LogLevel::Error));

        // The next reload targets what is on screen
        catalog.fail_everything(false);
        nav.reload();
        nav.settle().await;
        assert_eq!(nav.state().current_root(), Some("/Comics"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounced_search_loads_once() {
        let (catalog, mut nav) = navigator_at(Some("/Comics")).await;
        let loads_before = catalog.total_loads();

        for text in ["s", "sa", "sag", "saga"] {
            nav.search(text);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(catalog.total_loads(), loads_before);

        nav.settle().await;
        assert_eq!(catalog.total_loads(), loads_before + 1);
        assert_eq!(nav.state().keyword(), "saga");
        assert_eq!(nav.state().current_root(), Some("/Comics"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_keystroke_after_timer_fired_wins() {
        let (catalog, mut nav) = navigator_at(Some("/Comics")).await;
        let loads_before = catalog.total_loads();

        nav.search("s");
        // The timer fires and queues "s" before anyone handles it
        tokio::time::sleep(Duration::from_millis(260)).await;
        nav.search("saga");
        nav.settle().await;

        assert_eq!(catalog.total_loads(), loads_before + 1);
        assert_eq!(nav.state().keyword(), "saga");

        tokio::time::sleep(Duration::from_secs(1)).await;
        nav.pump();
        assert_eq!(nav.state().keyword(), nav.search_text());
        assert_eq!(catalog.total_loads(), loads_before + 1);
    }

    #[tokio::test]
    async fn test_declined_delete_sends_nothing() {
        let (catalog, mut nav) = navigator_at(Some("/Comics")).await;
        let before = nav.state().clone();
        let loads_before = catalog.total_loads();
        let mut prompts = Vec::new();

        let outcome = nav
            .delete_path("/comics/one shot.zip", &mut |prompt: &str| {
                prompts.push(prompt.to_string());
                false
            })
            .await
            .unwrap();
        nav.settle().await;

        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert!(prompts[0].contains("One Shot.zip"));
        assert!(catalog.deletes.lock().unwrap().is_empty());
        assert_eq!(catalog.total_loads(), loads_before);
        assert_eq!(*nav.state(), before);
    }

    #[tokio::test]
    async fn test_confirmed_delete_reloads_same_view_once() {
        let (catalog, mut nav) = navigator_at(Some("/Comics")).await;
        let loads_before = catalog.total_loads();

        let outcome = nav
            .delete_path("/Comics/One Shot.zip", &mut |_: &str| true)
            .await
            .unwrap();
        nav.settle().await;

        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(*catalog.deletes.lock().unwrap(), vec![3]);
        assert_eq!(catalog.total_loads(), loads_before + 1);
        assert_eq!(
            catalog.children_roots.lock().unwrap().last().cloned().flatten(),
            Some("/Comics".to_string())
        );
    }

    #[tokio::test]
    async fn test_deleting_open_album_reloads_same_root() {
        let (catalog, mut nav) = navigator_at(Some("/Comics/Saga")).await;
        catalog.children_roots.lock().unwrap().clear();
        // Once deleted, the album no longer resolves on the server
        catalog.fail_root("/Comics/Saga");

        nav.delete_path("/comics/saga", &mut |_: &str| true).await.unwrap();
        nav.settle().await;

        assert_eq!(
            *catalog.children_roots.lock().unwrap(),
            vec![Some("/Comics/Saga".to_string()), None]
        );
        assert_eq!(nav.state().current_root(), None);
        assert_eq!(nav.log().last().map(|l| l.level), Some(LogLevel::Warn));
    }

    #[tokio::test]
    async fn test_failed_delete_leaves_state() {
        let (catalog, mut nav) = navigator_at(Some("/Comics")).await;
        catalog
            .delete_results
            .lock()
            .unwrap()
            .push_back(Err(CatalogError::Validation("locked".into())));
        let before = nav.state().clone();
        let loads_before = catalog.total_loads();

        let result = nav.delete_path("/Comics/Saga", &mut |_: &str| true).await;
        nav.settle().await;

        assert!(result.is_err());
        assert_eq!(catalog.total_loads(), loads_before);
        assert_eq!(*nav.state(), before);
    }

    #[tokio::test]
    async fn test_delete_unknown_path_is_validation_error() {
        let (catalog, mut nav) = navigator_at(None).await;
        let result = nav.delete_path("/Nowhere", &mut |_: &str| true).await;
        assert!(matches!(result, Err(CatalogError::Validation(_))));
        assert!(catalog.deletes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_scan_validates_then_reloads() {
        let (catalog, mut nav) = navigator_at(None).await;
        let loads_before = catalog.total_loads();

        let err = nav.scan(&["  ".to_string()], true).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert!(catalog.scans.lock().unwrap().is_empty());

        nav.scan(&[" D:\\Comics\\ ".to_string()], true).await.unwrap();
        nav.settle().await;
        assert_eq!(
            *catalog.scans.lock().unwrap(),
            vec![(vec!["D:/Comics".to_string()], true)]
        );
        assert_eq!(catalog.total_loads(), loads_before + 1);
    }

    #[tokio::test]
    async fn test_refresh_logs_and_reloads() {
        let (catalog, mut nav) = navigator_at(None).await;
        *catalog.refresh_summary.lock().unwrap() = RefreshSummary {
            checked: 10,
            removed: 2,
            ids: vec![4, 5],
        };
        let loads_before = catalog.total_loads();

        let summary = nav.refresh().await.unwrap();
        nav.settle().await;

        assert_eq!(summary.removed, 2);
        assert_eq!(catalog.refreshes.load(Ordering::SeqCst), 1);
        assert_eq!(catalog.total_loads(), loads_before + 1);
        let line = nav
            .log()
            .lines()
            .find(|l| l.text.starts_with("Refresh finished"))
            .unwrap();
        assert_eq!(line.text, "Refresh finished: checked=10 removed=2");
        assert_eq!(line.level, LogLevel::Warn);
    }
}
