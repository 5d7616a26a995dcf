//! Per-tab content engine handle
//!
//! The embedded rendering engine is implemented elsewhere; this is the
//! surface the content view drives.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use kestrel_tabs::TabId;
use kestrel_utils::{Handler, Subscription};

/// Fired once the engine has committed the first load of a document
pub const LOAD_COMMIT_EVENT: &str = "loadcommit";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineEvent {
    pub name: String,
    pub url: Option<String>,
}

impl EngineEvent {
    pub fn load_commit(url: impl Into<String>) -> Self {
        Self {
            name: LOAD_COMMIT_EVENT.to_string(),
            url: Some(url.into()),
        }
    }
}

pub type EngineListener = Handler<EngineEvent>;

pub trait ContentEngine: Send + Sync {
    /// Attach the engine's surface to the container with this id
    fn insert_into_dom(&self, container_id: &str);

    fn add_event_listener(&self, event: &str, listener: EngineListener) -> Subscription;

    fn remove_event_listener(&self, subscription: &Subscription);

    /// Stop the page and release its content process
    fn deactivate(&self);
}

/// Creates one engine handle per tab
pub trait EngineFactory: Send + Sync {
    fn create(&self, tab_id: &TabId) -> Arc<dyn ContentEngine>;
}
