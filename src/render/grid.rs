//! Grid of the open album's children, plus its breadcrumb

use url::Url;

use super::NavAction;
use crate::catalog::{Album, CatalogClient, CoverFit};
use crate::nav::NavigationState;
use crate::utils::{format_count, format_size, parent_dir};

/// Thumbnail box requested for card covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverSize {
    pub width: u32,
    pub height: u32,
}

impl Default for CoverSize {
    fn default() -> Self {
        Self {
            width: 300,
            height: 400,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub album: Album,
    pub title: String,
    /// `kind · N pages`
    pub subtitle: String,
    pub size: Option<String>,
    /// Directory holding a catalog root; only set at the top level
    pub location: Option<String>,
    pub cover: Url,
    pub navigable: bool,
}

impl Card {
    /// Folders open; archives have nothing to open into
    pub fn activate(&self) -> Option<NavAction> {
        self.navigable
            .then(|| NavAction::Open(Some(self.album.path.clone())))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub label: String,
    pub path: String,
}

impl Crumb {
    pub fn activate(&self) -> NavAction {
        NavAction::Open(Some(self.path.clone()))
    }
}

/// Root-to-leaf chain ending at the open album
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub segments: Vec<Crumb>,
    /// Path one level up; `None` means the top level
    pub back: Option<String>,
}

impl Breadcrumb {
    pub fn back_action(&self) -> NavAction {
        NavAction::Open(self.back.clone())
    }

    /// `Comics / Saga / Extras`
    pub fn render(&self) -> String {
        self.segments
            .iter()
            .map(|c| c.label.as_str())
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridView {
    pub cards: Vec<Card>,
    /// Set only when there are no cards
    pub empty_message: Option<&'static str>,
    pub breadcrumb: Option<Breadcrumb>,
}

/// Text shown when the grid has no items
pub fn empty_message(state: &NavigationState) -> &'static str {
    if !state.keyword().is_empty() {
        "No matching albums."
    } else if state.current_root().is_some() {
        "This folder has no albums."
    } else {
        "No albums yet. Add a path and scan it."
    }
}

fn breadcrumb(state: &NavigationState) -> Option<Breadcrumb> {
    let grid = state.grid();
    let parent = grid.parent.as_ref()?;
    let segments = grid
        .ancestors
        .iter()
        .chain(std::iter::once(parent))
        .map(|album| Crumb {
            label: album.display_name().to_string(),
            path: album.path.clone(),
        })
        .collect();

    Some(Breadcrumb {
        segments,
        back: state.back_target().map(str::to_string),
    })
}

fn card(album: &Album, top_level: bool, client: &CatalogClient, cover: CoverSize) -> Card {
    Card {
        title: album.display_name().to_string(),
        subtitle: format!("{} · {} pages", album.kind, format_count(album.file_count)),
        size: album.size.map(format_size),
        location: top_level.then(|| parent_dir(&album.path)).flatten(),
        cover: client.cover_url(album.id, cover.width, cover.height, CoverFit::Cover),
        navigable: album.kind.is_navigable(),
        album: album.clone(),
    }
}

/// Derive the grid view for the current state
pub fn derive(state: &NavigationState, client: &CatalogClient, cover: CoverSize) -> GridView {
    let top_level = state.current_root().is_none();
    let cards: Vec<Card> = state
        .grid()
        .items
        .iter()
        .map(|album| card(album, top_level, client, cover))
        .collect();

    GridView {
        empty_message: cards.is_empty().then(|| empty_message(state)),
        breadcrumb: breadcrumb(state),
        cards,
    }
}
