//! Kestrel Tab UI
//!
//! Render-runtime independent tab bar and per-tab content view. Components
//! produce plain view models; the hosting runtime draws them and calls the
//! `on_*` handlers on user input.

mod content_view;
mod engine;
mod error;
mod i18n;
mod tab_bar;
mod view_state;

pub use content_view::{
    ContentView, ContentViewModel, ErrorPageView, UnresponsiveDialog, WebViewContainer,
    DIALOG_SUPPRESS_TIMEOUT, STATE_CHANGE_EVENT, STOP_LABEL, UNRESPONSIVE_MESSAGE, WAIT_LABEL,
    WEBVIEW_CONTAINER_SUFFIX,
};
pub use engine::{ContentEngine, EngineEvent, EngineFactory, EngineListener, LOAD_COMMIT_EVENT};
pub use error::UiError;
pub use i18n::{Catalog, IdentityLocalizer, Localizer};
pub use tab_bar::{TabBar, TabBarView, TabView, NEW_TAB_BUTTON_CEILING};
pub use view_state::{derive_state, DeriveInput, LocalState, StatePatch, ViewPhase};

pub type Result<T> = std::result::Result<T, UiError>;
