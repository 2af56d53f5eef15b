//! Keep tracing output off the terminal while the browser is drawing
//!
//! The browser owns the alternate screen; anything written to stderr in the
//! meantime would tear the layout. The fmt layer is wrapped in
//! [`ConditionalStderrLayer`] and muted while a [`TuiModeGuard`] is alive.
//! Events that matter to the user reach the activity pane instead.

use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

static TUI_MODE: AtomicBool = AtomicBool::new(false);

/// Set TUI mode on or off
pub fn set_tui_mode(enabled: bool) {
    TUI_MODE.store(enabled, Ordering::SeqCst);
}

pub fn is_tui_mode() -> bool {
    TUI_MODE.load(Ordering::SeqCst)
}

/// Enables TUI mode for its lifetime, restoring the previous value on drop
///
/// Dropping on an early `?` return from the browser still brings logging back.
pub struct TuiModeGuard {
    previous: bool,
}

impl TuiModeGuard {
    pub fn enable() -> Self {
        let previous = TUI_MODE.swap(true, Ordering::SeqCst);
        Self { previous }
    }
}

impl Drop for TuiModeGuard {
    fn drop(&mut self) {
        set_tui_mode(self.previous);
    }
}

/// Wraps a layer so it only sees events while the browser is not running
pub struct ConditionalStderrLayer<L> {
    inner: L,
}

impl<L> ConditionalStderrLayer<L> {
    pub fn new(inner: L) -> Self {
        Self { inner }
    }
}

impl<S, L> Layer<S> for ConditionalStderrLayer<L>
where
    S: tracing::Subscriber,
    L: Layer<S>,
{
    // Span bookkeeping always runs so spans opened in TUI mode format later
    fn on_new_span(&self, attrs: &tracing::span::Attributes<'_>, id: &tracing::span::Id, ctx: Context<'_, S>) {
        self.inner.on_new_span(attrs, id, ctx);
    }

    fn on_record(&self, id: &tracing::span::Id, values: &tracing::span::Record<'_>, ctx: Context<'_, S>) {
        self.inner.on_record(id, values, ctx);
    }

    fn on_close(&self, id: tracing::span::Id, ctx: Context<'_, S>) {
        self.inner.on_close(id, ctx);
    }

    fn on_event(&self, event: &tracing::Event<'_>, ctx: Context<'_, S>) {
        if !is_tui_mode() {
            self.inner.on_event(event, ctx);
        }
    }

    fn on_enter(&self, id: &tracing::span::Id, ctx: Context<'_, S>) {
        if !is_tui_mode() {
            self.inner.on_enter(id, ctx);
        }
    }

    fn on_exit(&self, id: &tracing::span::Id, ctx: Context<'_, S>) {
        if !is_tui_mode() {
            self.inner.on_exit(id, ctx);
        }
    }
}
