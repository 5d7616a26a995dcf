//! Kestrel Utilities
//!
//! Small helpers shared by the tab list and the UI layer:
//! - URL prefix resolution for address bar input
//! - A generic event emitter for decoupled notifications

mod event_emitter;
mod url_prefix;

pub use event_emitter::{EventEmitter, Handler, Subscription};
pub use url_prefix::{
    is_fully_qualified, url_with_prefix, Resolution, UrlPrefixResolver, BLANK_PAGE,
    DEFAULT_SCHEME, DEFAULT_SEARCH_TEMPLATE,
};
