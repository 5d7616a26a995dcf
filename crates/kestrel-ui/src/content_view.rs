//! Per-tab content view
//!
//! Hosts one tab's engine surface, derives which of webview / error page /
//! unresponsive dialog is visible, and forwards Wait and Stop.

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;

use kestrel_tabs::{TabErrorKind, TabId, TabListSnapshot, TabListSource};
use kestrel_utils::{EventEmitter, Subscription};

use crate::engine::{ContentEngine, EngineEvent, LOAD_COMMIT_EVENT};
use crate::i18n::Localizer;
use crate::view_state::{derive_state, DeriveInput, LocalState, ViewPhase};

pub const WEBVIEW_CONTAINER_SUFFIX: &str = "_webview";

/// How long the unresponsive dialog stays closed after Wait
pub const DIALOG_SUPPRESS_TIMEOUT: Duration = Duration::from_secs(30);

/// Emitted with the new [`LocalState`] after every change
pub const STATE_CHANGE_EVENT: &str = "statechange";

pub const UNRESPONSIVE_MESSAGE: &str =
    "The current page has become unresponsive. You can wait for it to become responsive.";
pub const WAIT_LABEL: &str = "Wait";
pub const STOP_LABEL: &str = "Stop";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebViewContainer {
    pub id: String,
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPageView {
    pub error_msg: Option<String>,
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresponsiveDialog {
    pub open: bool,
    pub message: String,
    pub wait_label: String,
    pub stop_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentViewModel {
    pub container: WebViewContainer,
    pub error_page: ErrorPageView,
    pub dialog: UnresponsiveDialog,
}

/// State shared with engine callbacks and the suppression timer
struct Inner {
    id: TabId,
    source: Arc<dyn TabListSource>,
    use_built_in_error_pages: bool,
    local: RwLock<LocalState>,
    changes: EventEmitter<LocalState>,
}

impl Inner {
    fn current_error(&self) -> Option<TabErrorKind> {
        self.source.tab(&self.id).and_then(|tab| tab.error)
    }

    /// Apply `f`, re-derive from the tab's error, notify on change
    fn set_state<F>(&self, f: F)
    where
        F: FnOnce(&mut LocalState),
    {
        let mut error = self.current_error();
        let mut changed = self.apply(error.as_ref(), f).is_some();

        // The source is never read under the local lock, so the error may
        // have moved on while we derived from it. Re-derive until it holds.
        loop {
            let latest = self.current_error();
            if latest == error {
                break;
            }
            error = latest;
            changed |= self.apply(error.as_ref(), |_| {}).is_some();
        }

        if !changed {
            return;
        }
        let next = *self.local.read();

        tracing::debug!(
            tab_id = %self.id,
            phase = %next.phase(error.as_ref()),
            "Content view state changed"
        );

        self.changes.emit(STATE_CHANGE_EVENT, &next);
    }

    /// Returns the new state if `f` plus derivation changed it
    fn apply<F>(&self, error: Option<&TabErrorKind>, f: F) -> Option<LocalState>
    where
        F: FnOnce(&mut LocalState),
    {
        let input = DeriveInput {
            error,
            use_built_in_error_pages: self.use_built_in_error_pages,
        };

        let mut local = self.local.write();
        let before = *local;

        f(&mut local);
        if let Some(patch) = derive_state(&local, &input) {
            local.apply(patch);
        }

        (*local != before).then_some(*local)
    }

    fn on_load_commit(&self, event: &EngineEvent) {
        tracing::debug!(
            tab_id = %self.id,
            event = %event.name,
            url = ?event.url,
            "Load committed"
        );
        self.set_state(|state| state.ready = true);
    }

    fn enable_dialog(&self) {
        self.set_state(|state| state.suppress_dialog = false);
    }

    fn refresh(&self) {
        self.set_state(|_| {});
    }
}

struct Mounted {
    load_commit: Subscription,
    tab_list: Subscription,
}

pub struct ContentView {
    inner: Arc<Inner>,
    engine: Arc<dyn ContentEngine>,
    localizer: Arc<dyn Localizer>,
    runtime: Handle,
    mounted: Mutex<Option<Mounted>>,
}

impl ContentView {
    pub fn new(
        id: TabId,
        engine: Arc<dyn ContentEngine>,
        source: Arc<dyn TabListSource>,
        localizer: Arc<dyn Localizer>,
        use_built_in_error_pages: bool,
        runtime: Handle,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                id,
                source,
                use_built_in_error_pages,
                local: RwLock::new(LocalState::default()),
                changes: EventEmitter::new(),
            }),
            engine,
            localizer,
            runtime,
            mounted: Mutex::new(None),
        }
    }

    pub fn id(&self) -> &TabId {
        &self.inner.id
    }

    pub fn container_id(&self) -> String {
        format!("{}{}", self.inner.id, WEBVIEW_CONTAINER_SUFFIX)
    }

    /// Attach the engine surface and start listening for load commits
    /// and tab list changes. Mounting twice is a no-op.
    pub fn mount(&self) {
        let mut mounted = self.mounted.lock();
        if mounted.is_some() {
            return;
        }

        self.engine.insert_into_dom(&self.container_id());

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let load_commit = self.engine.add_event_listener(
            LOAD_COMMIT_EVENT,
            Arc::new(move |event: &EngineEvent| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_load_commit(event);
                }
            }),
        );

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let tab_list = self
            .inner
            .source
            .subscribe(Arc::new(move |_: &TabListSnapshot| {
                if let Some(inner) = weak.upgrade() {
                    inner.refresh();
                }
            }));

        *mounted = Some(Mounted {
            load_commit,
            tab_list,
        });

        tracing::info!(tab_id = %self.inner.id, "Mounted content view");
    }

    /// Drop the listeners added by [`mount`](Self::mount).
    /// A pending suppression timer keeps running.
    pub fn unmount(&self) {
        let Some(mounted) = self.mounted.lock().take() else {
            return;
        };

        self.engine.remove_event_listener(&mounted.load_commit);
        self.inner.source.unsubscribe(&mounted.tab_list);

        tracing::info!(tab_id = %self.inner.id, "Unmounted content view");
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.lock().is_some()
    }

    pub fn on_load_commit(&self, event: &EngineEvent) {
        self.inner.on_load_commit(event);
    }

    /// Keep the unresponsive dialog closed for [`DIALOG_SUPPRESS_TIMEOUT`].
    ///
    /// The timer is detached: stop, a new load or unmounting do not cancel
    /// it, and when it fires it re-enables the dialog for whatever load is
    /// current by then.
    pub fn on_wait(&self) {
        let inner = Arc::clone(&self.inner);
        self.runtime.spawn(async move {
            tokio::time::sleep(DIALOG_SUPPRESS_TIMEOUT).await;
            tracing::debug!(tab_id = %inner.id, "Dialog suppression expired");
            inner.enable_dialog();
        });

        tracing::info!(tab_id = %self.inner.id, "User chose to wait for page");
        self.inner.set_state(|state| state.suppress_dialog = true);
    }

    /// Deactivate the engine and fall back to the error page until the
    /// next load commit
    pub fn on_stop(&self) {
        self.engine.deactivate();

        tracing::info!(tab_id = %self.inner.id, "User stopped unresponsive page");
        self.inner.set_state(LocalState::stop);
    }

    /// Re-derive from the tab's current error
    pub fn refresh(&self) {
        self.inner.refresh();
    }

    pub fn state(&self) -> LocalState {
        *self.inner.local.read()
    }

    pub fn phase(&self) -> ViewPhase {
        let error = self.inner.current_error();
        self.state().phase(error.as_ref())
    }

    /// Called with the new local state after every change
    pub fn on_change<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&LocalState) + Send + Sync + 'static,
    {
        self.inner.changes.subscribe(STATE_CHANGE_EVENT, handler)
    }

    pub fn remove_change_listener(&self, subscription: &Subscription) -> bool {
        self.inner.changes.unsubscribe(subscription)
    }

    pub fn render(&self) -> ContentViewModel {
        let state = self.state();
        let error = self.inner.current_error();

        ContentViewModel {
            container: WebViewContainer {
                id: self.container_id(),
                hidden: state.hide_webview,
            },
            error_page: ErrorPageView {
                error_msg: error.map(String::from),
                hidden: state.hide_error_page,
            },
            dialog: UnresponsiveDialog {
                open: !state.hide_dialog,
                message: self.localizer.translate(UNRESPONSIVE_MESSAGE),
                wait_label: self.localizer.translate(WAIT_LABEL),
                stop_label: self.localizer.translate(STOP_LABEL),
            },
        }
    }
}

impl Drop for ContentView {
    fn drop(&mut self) {
        self.unmount();
    }
}
