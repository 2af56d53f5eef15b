//! Utility functions

mod format;
pub mod paths;
pub mod tui_log;

pub use format::{format_count, format_size};
pub use paths::{file_name, normalize_path, parent_dir, path_key, same_path};
pub use tui_log::{ConditionalStderrLayer, TuiModeGuard};
