//! Tab list store
//!
//! Ordered tab ids, the selected index and the entries themselves.
//! Every mutation emits [`CHANGE_EVENT`] with the resulting snapshot.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use kestrel_utils::{EventEmitter, Handler, Subscription, BLANK_PAGE};

use crate::error::TabError;
use crate::interface::{TabListMutator, TabListSource};
use crate::state::TabErrorKind;
use crate::tab::{TabEntry, TabId, NEW_TAB_TYPE};
use crate::Result;

pub const CHANGE_EVENT: &str = "change";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabListSnapshot {
    /// Tab ids in display order
    pub ids: Vec<TabId>,
    /// Index into `ids` of the selected tab
    pub selected_index: usize,
    pub tabs: HashMap<TabId, TabEntry>,
}

impl TabListSnapshot {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn selected_id(&self) -> Option<&TabId> {
        self.ids.get(self.selected_index)
    }

    pub fn get(&self, id: &str) -> Option<&TabEntry> {
        self.tabs.get(id)
    }

    pub fn entry_at(&self, index: usize) -> Option<&TabEntry> {
        self.ids.get(index).and_then(|id| self.tabs.get(id))
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|t| t == id)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.ids.len() {
            Ok(())
        } else {
            Err(TabError::IndexOutOfRange {
                index,
                len: self.ids.len(),
            })
        }
    }
}

pub struct TabList {
    state: Arc<RwLock<TabListSnapshot>>,
    events: EventEmitter<TabListSnapshot>,
    max_tabs: usize,
}

impl TabList {
    pub fn new(max_tabs: usize) -> Self {
        Self {
            state: Arc::new(RwLock::new(TabListSnapshot::default())),
            events: EventEmitter::new(),
            max_tabs,
        }
    }

    /// Append a tab and select it
    pub fn create_tab(&self, kind: &str, url: &str) -> Result<TabId> {
        let tab = TabEntry::new(kind, url);
        let id = tab.id.clone();

        self.mutate(|state| {
            if state.ids.len() >= self.max_tabs {
                return Err(TabError::LimitReached(self.max_tabs));
            }

            state.ids.push(id.clone());
            state.tabs.insert(id.clone(), tab);
            state.selected_index = state.ids.len() - 1;
            Ok(())
        })?;

        tracing::info!(tab_id = %id, url = %url, "Created new tab");

        Ok(id)
    }

    /// Point a tab at a new URL
    pub fn navigate(&self, tab_id: &str, url: String) -> Result<()> {
        self.update_tab(tab_id, |tab| tab.navigate(url))
    }

    pub fn set_loading(&self, tab_id: &str, is_loading: bool) -> Result<()> {
        self.update_tab(tab_id, |tab| tab.set_loading(is_loading))
    }

    pub fn set_error(&self, tab_id: &str, error: Option<TabErrorKind>) -> Result<()> {
        if let Some(error) = &error {
            tracing::warn!(tab_id = %tab_id, error = %error, "Tab reported load error");
        }
        self.update_tab(tab_id, |tab| tab.set_error(error))
    }

    pub fn set_title(&self, tab_id: &str, title: String) -> Result<()> {
        self.update_tab(tab_id, |tab| tab.set_title(title))
    }

    pub fn selected_id(&self) -> Option<TabId> {
        self.state.read().selected_id().cloned()
    }

    fn update_tab<F>(&self, tab_id: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut TabEntry),
    {
        self.mutate(|state| {
            let tab = state
                .tabs
                .get_mut(tab_id)
                .ok_or_else(|| TabError::NotFound(tab_id.to_string()))?;
            f(tab);
            Ok(())
        })
    }

    /// Apply `f` under the write lock and notify subscribers on success.
    /// The lock is released before handlers run.
    fn mutate<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut TabListSnapshot) -> Result<T>,
    {
        let (result, snapshot) = {
            let mut state = self.state.write();
            let result = f(&mut state)?;
            (result, state.clone())
        };

        self.events.emit(CHANGE_EVENT, &snapshot);

        Ok(result)
    }
}

impl TabListSource for TabList {
    fn snapshot(&self) -> TabListSnapshot {
        self.state.read().clone()
    }

    fn tab(&self, id: &str) -> Option<TabEntry> {
        self.state.read().tabs.get(id).cloned()
    }

    fn len(&self) -> usize {
        self.state.read().ids.len()
    }

    fn subscribe(&self, handler: Handler<TabListSnapshot>) -> Subscription {
        self.events.subscribe_handler(CHANGE_EVENT, handler)
    }

    fn unsubscribe(&self, subscription: &Subscription) -> bool {
        self.events.unsubscribe(subscription)
    }
}

impl TabListMutator for TabList {
    fn max_tabs(&self) -> usize {
        self.max_tabs
    }

    fn create_new_tab(&self) -> Result<TabId> {
        self.create_tab(NEW_TAB_TYPE, BLANK_PAGE)
    }

    fn move_tab(&self, from: usize, to: usize) -> Result<()> {
        if from == to {
            return self.state.read().check_index(from);
        }

        self.mutate(|state| {
            state.check_index(from)?;
            state.check_index(to)?;

            let selected = state.selected_id().cloned();
            let id = state.ids.remove(from);
            state.ids.insert(to, id);

            if let Some(index) = selected.and_then(|id| state.index_of(&id)) {
                state.selected_index = index;
            }
            Ok(())
        })?;

        tracing::debug!(from = from, to = to, "Moved tab");

        Ok(())
    }

    fn close_tab(&self, index: usize) -> Result<TabId> {
        let id = self.mutate(|state| {
            state.check_index(index)?;
            if state.ids.len() <= 1 {
                return Err(TabError::LastTab);
            }

            let id = state.ids.remove(index);
            state.tabs.remove(&id);

            if index < state.selected_index {
                state.selected_index -= 1;
            } else if state.selected_index >= state.ids.len() {
                state.selected_index = state.ids.len() - 1;
            }
            Ok(id)
        })?;

        tracing::info!(tab_id = %id, "Closed tab");

        Ok(id)
    }

    fn select_tab(&self, index: usize) -> Result<()> {
        self.mutate(|state| {
            state.check_index(index)?;
            state.selected_index = index;
            Ok(())
        })
    }
}

impl Clone for TabList {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            events: self.events.clone(),
            max_tabs: self.max_tabs,
        }
    }
}
