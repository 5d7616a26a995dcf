//! Content view state derivation
//!
//! Local state is recomputed from the tab's load error whenever either
//! changes. Only `ready` and `suppress_dialog` are genuinely stored; the
//! three visibility flags follow from them:
//!
//! ```text
//! ready=false                          → nothing derived
//! ready, no error                      → webview
//! ready, PAGE_UNRESPONSIVE, suppressed → webview
//! ready, PAGE_UNRESPONSIVE             → webview + Wait/Stop dialog
//! ready, RENDERER_CRASHED | built-in   → webview (engine error UI)
//! ready, other error                   → custom error page
//! ```

use serde::{Deserialize, Serialize};

use kestrel_tabs::TabErrorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalState {
    /// Set after the engine's first `loadcommit`
    pub ready: bool,
    pub hide_dialog: bool,
    pub hide_error_page: bool,
    pub hide_webview: bool,
    /// User chose to wait; keeps the unresponsive dialog closed
    pub suppress_dialog: bool,
}

impl Default for LocalState {
    fn default() -> Self {
        Self {
            ready: false,
            hide_dialog: true,
            hide_error_page: true,
            hide_webview: true,
            suppress_dialog: false,
        }
    }
}

impl LocalState {
    /// State after the user stops an unresponsive page
    pub fn stop(&mut self) {
        self.hide_dialog = true;
        self.hide_error_page = false;
        self.hide_webview = true;
        self.ready = false;
    }

    pub fn apply(&mut self, patch: StatePatch) {
        if let Some(suppress) = patch.suppress_dialog {
            self.suppress_dialog = suppress;
        }
        self.hide_dialog = patch.hide_dialog;
        self.hide_error_page = patch.hide_error_page;
        self.hide_webview = patch.hide_webview;
    }

    /// Classify the state for display and logging
    pub fn phase(&self, error: Option<&TabErrorKind>) -> ViewPhase {
        if !self.ready {
            return if self.hide_error_page {
                ViewPhase::Loading
            } else {
                ViewPhase::Stopped
            };
        }

        if !self.hide_dialog {
            return ViewPhase::UnresponsiveShown;
        }
        if !self.hide_error_page {
            return ViewPhase::ErrorPage;
        }

        match error {
            None => ViewPhase::NoError,
            Some(TabErrorKind::PageUnresponsive) => ViewPhase::UnresponsiveSuppressed,
            Some(_) => ViewPhase::EngineErrorUi,
        }
    }
}

/// Visibility flags produced by [`derive_state`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatePatch {
    /// `None` leaves the stored flag untouched
    pub suppress_dialog: Option<bool>,
    pub hide_dialog: bool,
    pub hide_error_page: bool,
    pub hide_webview: bool,
}

impl StatePatch {
    fn webview_only() -> Self {
        Self {
            suppress_dialog: None,
            hide_dialog: true,
            hide_error_page: true,
            hide_webview: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DeriveInput<'a> {
    pub error: Option<&'a TabErrorKind>,
    /// Let the engine render every load error itself
    pub use_built_in_error_pages: bool,
}

/// Recompute visibility from the current error. Returns `None` until ready.
pub fn derive_state(prev: &LocalState, input: &DeriveInput<'_>) -> Option<StatePatch> {
    if !prev.ready {
        return None;
    }

    let patch = match input.error {
        None => StatePatch {
            suppress_dialog: Some(false),
            ..StatePatch::webview_only()
        },
        Some(TabErrorKind::PageUnresponsive) => StatePatch {
            hide_dialog: prev.suppress_dialog,
            ..StatePatch::webview_only()
        },
        Some(TabErrorKind::RendererCrashed) => StatePatch::webview_only(),
        Some(_) if input.use_built_in_error_pages => StatePatch::webview_only(),
        Some(_) => StatePatch {
            suppress_dialog: None,
            hide_dialog: true,
            hide_error_page: false,
            hide_webview: true,
        },
    };

    Some(patch)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewPhase {
    /// Waiting for the first load commit
    Loading,
    /// User stopped the page; error page until the next load
    Stopped,
    NoError,
    UnresponsiveSuppressed,
    UnresponsiveShown,
    /// Crash or built-in error pages: the engine draws its own error UI
    EngineErrorUi,
    ErrorPage,
}

impl ViewPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewPhase::Loading => "loading",
            ViewPhase::Stopped => "stopped",
            ViewPhase::NoError => "no_error",
            ViewPhase::UnresponsiveSuppressed => "unresponsive_suppressed",
            ViewPhase::UnresponsiveShown => "unresponsive_shown",
            ViewPhase::EngineErrorUi => "engine_error_ui",
            ViewPhase::ErrorPage => "error_page",
        }
    }
}

impl std::fmt::Display for ViewPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
