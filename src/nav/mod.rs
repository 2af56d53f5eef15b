//! Navigation state and the machinery that keeps it in sync with the catalog

pub mod actions;
pub mod activity;
pub mod debounce;
pub mod state;
pub mod sync;

pub use actions::{delete_prompt, Confirm, DeleteOutcome, NavEvent, Navigator};
pub use activity::{ActivityLog, LogLevel, LogLine};
pub use state::{rebuild_index, NavigationState, PathIndex};
pub use sync::{Applied, LoadError, LoadOutcome, ViewSynchronizer};
