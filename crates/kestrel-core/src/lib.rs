//! Kestrel Core
//!
//! Central coordination layer: configuration, logging, and the browser
//! object that ties the tab list to the tab bar and the content views.

mod browser;
mod config;
mod error;

pub use browser::Browser;
pub use config::Config;
pub use error::CoreError;

// Re-export core components
pub use kestrel_tabs::{
    NavState, TabEntry, TabError, TabErrorKind, TabId, TabList, TabListMutator,
    TabListSnapshot, TabListSource,
};
pub use kestrel_ui::{
    Catalog, ContentEngine, ContentView, ContentViewModel, EngineEvent, EngineFactory,
    IdentityLocalizer, LocalState, Localizer, TabBar, TabBarView, UiError, ViewPhase,
};
pub use kestrel_utils::{url_with_prefix, EventEmitter, Subscription, UrlPrefixResolver};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
