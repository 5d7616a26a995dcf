//! Seams between the tab list and the components that use it
//!
//! UI components only ever read through [`TabListSource`] and request
//! changes through [`TabListMutator`]; neither holds tab state itself.

use kestrel_utils::{Handler, Subscription};

use crate::list::TabListSnapshot;
use crate::tab::{TabEntry, TabId};
use crate::Result;

/// Read-only view of the tab list with change notifications
pub trait TabListSource: Send + Sync {
    fn snapshot(&self) -> TabListSnapshot;

    fn tab(&self, id: &str) -> Option<TabEntry>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Called with the new snapshot after every mutation
    fn subscribe(&self, handler: Handler<TabListSnapshot>) -> Subscription;

    fn unsubscribe(&self, subscription: &Subscription) -> bool;
}

/// Requests that change the tab list
pub trait TabListMutator: Send + Sync {
    /// Upper bound on the number of open tabs
    fn max_tabs(&self) -> usize;

    fn create_new_tab(&self) -> Result<TabId>;

    fn move_tab(&self, from: usize, to: usize) -> Result<()>;

    /// Close the tab at `index`, returning its id
    fn close_tab(&self, index: usize) -> Result<TabId>;

    fn select_tab(&self, index: usize) -> Result<()>;
}
