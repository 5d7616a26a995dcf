//! Kestrel Tab List
//!
//! Tab entries and the ordered list that owns them. The list is the single
//! source of truth for the tab bar and the content views; they read it
//! through [`TabListSource`] and request changes through [`TabListMutator`].

mod error;
mod interface;
mod list;
mod state;
mod tab;

pub use error::TabError;
pub use interface::{TabListMutator, TabListSource};
pub use list::{TabList, TabListSnapshot, CHANGE_EVENT};
pub use state::{NavState, TabErrorKind};
pub use tab::{TabEntry, TabId, NEW_TAB_TITLE, NEW_TAB_TYPE, WEB_TAB_TYPE};

pub type Result<T> = std::result::Result<T, TabError>;
