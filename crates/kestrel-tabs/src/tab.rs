//! Tab entry
//!
//! Metadata and navigation state of one open tab. The tab bar displays:
//! - Title
//! - Type
//! - Loading indicator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::{NavState, TabErrorKind};

/// Opaque tab identifier, stable for the tab's lifetime
pub type TabId = String;

pub const NEW_TAB_TITLE: &str = "New Tab";
pub const NEW_TAB_TYPE: &str = "newtab";
pub const WEB_TAB_TYPE: &str = "webview";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabEntry {
    /// Unique identifier
    pub id: TabId,
    /// Page title, used as a localisation key when rendered
    pub title: String,
    /// Kind of tab (new tab page, web content, ...)
    #[serde(rename = "type")]
    pub kind: String,
    /// Current URL
    pub url: String,
    pub nav_state: NavState,
    /// Last load error reported by the content engine
    pub error: Option<TabErrorKind>,
    pub created_at: DateTime<Utc>,
}

impl TabEntry {
    pub fn new(kind: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: NEW_TAB_TITLE.to_string(),
            kind: kind.into(),
            url: url.into(),
            nav_state: NavState::default(),
            error: None,
            created_at: Utc::now(),
        }
    }

    /// Point the tab at a new URL; clears the previous error
    pub fn navigate(&mut self, url: String) {
        self.url = url;
        self.kind = WEB_TAB_TYPE.to_string();
        self.title = String::new();
        self.error = None;
        self.nav_state.is_loading = true;
    }

    pub fn set_loading(&mut self, is_loading: bool) {
        self.nav_state.is_loading = is_loading;
    }

    pub fn set_error(&mut self, error: Option<TabErrorKind>) {
        self.error = error;
    }

    pub fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub fn is_loading(&self) -> bool {
        self.nav_state.is_loading
    }

    /// Get display title (with fallback to URL)
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.url
        } else {
            &self.title
        }
    }
}
