//! Tab bar
//!
//! Renders the ordered tab list and forwards create / move / close /
//! select requests to the tab list mutator. Two independent limits apply:
//! the "new tab" button disappears at [`NEW_TAB_BUTTON_CEILING`] tabs,
//! while creation itself is refused at the mutator's `max_tabs`.

use serde::Serialize;
use std::sync::Arc;

use kestrel_tabs::{TabId, TabListMutator, TabListSnapshot, TabListSource};

use crate::i18n::Localizer;
use crate::Result;

/// Tab count at which the "new tab" button is no longer rendered
pub const NEW_TAB_BUTTON_CEILING: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabView {
    pub key: usize,
    pub index: usize,
    pub id: TabId,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub is_loading: bool,
    pub selected: bool,
    pub closable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabBarView {
    pub tabs: Vec<TabView>,
    pub show_new_tab_button: bool,
}

pub struct TabBar {
    source: Arc<dyn TabListSource>,
    mutator: Arc<dyn TabListMutator>,
    localizer: Arc<dyn Localizer>,
}

impl TabBar {
    pub fn new(
        source: Arc<dyn TabListSource>,
        mutator: Arc<dyn TabListMutator>,
        localizer: Arc<dyn Localizer>,
    ) -> Self {
        Self {
            source,
            mutator,
            localizer,
        }
    }

    pub fn render(&self) -> TabBarView {
        self.render_snapshot(&self.source.snapshot())
    }

    pub fn render_snapshot(&self, snapshot: &TabListSnapshot) -> TabBarView {
        let num_of_tabs = snapshot.len();
        let closable = num_of_tabs > 1;

        let tabs = snapshot
            .ids
            .iter()
            .enumerate()
            .map(|(index, id)| {
                let entry = snapshot.get(id);
                TabView {
                    key: index,
                    index,
                    id: id.clone(),
                    title: entry.map(|tab| self.localizer.translate(&tab.title)),
                    kind: entry.map(|tab| self.localizer.translate(&tab.kind)),
                    is_loading: entry.is_some_and(|tab| tab.is_loading()),
                    selected: index == snapshot.selected_index,
                    closable,
                }
            })
            .collect();

        TabBarView {
            tabs,
            show_new_tab_button: num_of_tabs < NEW_TAB_BUTTON_CEILING,
        }
    }

    /// Create a tab unless the list is already at `max_tabs`
    pub fn on_new(&self) -> Result<Option<TabId>> {
        let num_of_tabs = self.source.len();
        let max_tabs = self.mutator.max_tabs();

        if num_of_tabs >= max_tabs {
            tracing::debug!(num_of_tabs, max_tabs, "Ignoring new tab request at limit");
            return Ok(None);
        }

        Ok(Some(self.mutator.create_new_tab()?))
    }

    /// Forward the final position of a dragged tab
    pub fn on_move(&self, from_index: usize, to_index: usize) -> Result<()> {
        self.mutator.move_tab(from_index, to_index)?;
        Ok(())
    }

    /// Close a tab; ignored while only one tab is open
    pub fn on_close(&self, index: usize) -> Result<Option<TabId>> {
        if self.source.len() <= 1 {
            return Ok(None);
        }

        Ok(Some(self.mutator.close_tab(index)?))
    }

    pub fn on_select(&self, index: usize) -> Result<()> {
        self.mutator.select_tab(index)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Catalog, IdentityLocalizer};
    use kestrel_tabs::{TabErrorKind, TabList};
    use parking_lot::Mutex;

    /// Records requests without applying them
    struct RecordingMutator {
        max_tabs: usize,
        calls: Mutex<Vec<String>>,
    }

    impl RecordingMutator {
        fn new(max_tabs: usize) -> Self {
            Self {
                max_tabs,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    impl TabListMutator for RecordingMutator {
        fn max_tabs(&self) -> usize {
            self.max_tabs
        }

        fn create_new_tab(&self) -> kestrel_tabs::Result<TabId> {
            self.calls.lock().push("create".to_string());
            Ok("created".to_string())
        }

        fn move_tab(&self, from: usize, to: usize) -> kestrel_tabs::Result<()> {
            self.calls.lock().push(format!("move {} {}", from, to));
            Ok(())
        }

        fn close_tab(&self, index: usize) -> kestrel_tabs::Result<TabId> {
            self.calls.lock().push(format!("close {}", index));
            Ok(format!("closed-{}", index))
        }

        fn select_tab(&self, index: usize) -> kestrel_tabs::Result<()> {
            self.calls.lock().push(format!("select {}", index));
            Ok(())
        }
    }

    fn source_with(count: usize) -> Arc<TabList> {
        let list = Arc::new(TabList::new(64));
        for _ in 0..count {
            list.create_new_tab().unwrap();
        }
        list
    }

    fn bar(source: Arc<TabList>, mutator: Arc<RecordingMutator>) -> TabBar {
        TabBar::new(source, mutator, Arc::new(IdentityLocalizer))
    }

    #[test]
    fn test_on_new_below_and_at_limit() {
        let max_tabs = 5;
        for count in 1..=8 {
            let mutator = Arc::new(RecordingMutator::new(max_tabs));
            let tab_bar = bar(source_with(count), mutator.clone());

            let created = tab_bar.on_new().unwrap();

            let expected = usize::from(count < max_tabs);
            assert_eq!(mutator.calls().len(), expected, "count {}", count);
            assert_eq!(created.is_some(), count < max_tabs);
        }
    }

    #[test]
    fn test_closable_only_with_several_tabs() {
        let mutator = Arc::new(RecordingMutator::new(10));

        let single = bar(source_with(1), mutator.clone()).render();
        assert!(single.tabs.iter().all(|t| !t.closable));

        for count in 2..=6 {
            let view = bar(source_with(count), mutator.clone()).render();
            assert_eq!(view.tabs.len(), count);
            assert!(view.tabs.iter().all(|t| t.closable));
        }
    }

    #[test]
    fn test_button_ceiling_is_independent_of_max_tabs() {
        // Button visible, creation refused
        let mutator = Arc::new(RecordingMutator::new(3));
        let tab_bar = bar(source_with(3), mutator.clone());
        assert!(tab_bar.render().show_new_tab_button);
        assert_eq!(tab_bar.on_new().unwrap(), None);
        assert!(mutator.calls().is_empty());

        // Button hidden, creation still allowed
        let mutator = Arc::new(RecordingMutator::new(20));
        let tab_bar = bar(source_with(NEW_TAB_BUTTON_CEILING), mutator.clone());
        assert!(!tab_bar.render().show_new_tab_button);
        assert_eq!(tab_bar.on_new().unwrap(), Some("created".to_string()));

        let tab_bar = bar(source_with(NEW_TAB_BUTTON_CEILING - 1), mutator);
        assert!(tab_bar.render().show_new_tab_button);
    }

    #[test]
    fn test_render_marks_selected_and_loading() {
        let source = source_with(3);
        let snapshot = source.snapshot();
        source.select_tab(1).unwrap();
        source.set_loading(&snapshot.ids[2], true).unwrap();

        let view = bar(source, Arc::new(RecordingMutator::new(10))).render();

        let selected: Vec<bool> = view.tabs.iter().map(|t| t.selected).collect();
        assert_eq!(selected, vec![false, true, false]);
        let loading: Vec<bool> = view.tabs.iter().map(|t| t.is_loading).collect();
        assert_eq!(loading, vec![false, false, true]);
        assert_eq!(view.tabs[0].key, 0);
        assert_eq!(view.tabs[2].id, snapshot.ids[2]);
    }

    #[test]
    fn test_render_localizes_title_and_type() {
        let source = source_with(1);
        let mut catalog = Catalog::new("es");
        catalog.insert("New Tab", "Nueva pestaña");

        let tab_bar = TabBar::new(
            source.clone(),
            Arc::new(RecordingMutator::new(4)),
            Arc::new(catalog),
        );
        let view = tab_bar.render();

        assert_eq!(view.tabs[0].title.as_deref(), Some("Nueva pestaña"));
        assert_eq!(view.tabs[0].kind.as_deref(), Some("newtab"));
    }

    #[test]
    fn test_render_tolerates_missing_entry() {
        let tab_bar = bar(source_with(0), Arc::new(RecordingMutator::new(4)));
        let mut snapshot = TabListSnapshot::default();
        snapshot.ids.push("ghost".to_string());

        let view = tab_bar.render_snapshot(&snapshot);
        assert_eq!(view.tabs[0].title, None);
        assert!(!view.tabs[0].is_loading);
        assert!(!view.tabs[0].closable);
    }

    #[test]
    fn test_move_close_select_are_forwarded() {
        let mutator = Arc::new(RecordingMutator::new(10));
        let tab_bar = bar(source_with(3), mutator.clone());

        tab_bar.on_move(2, 0).unwrap();
        tab_bar.on_select(1).unwrap();
        assert_eq!(tab_bar.on_close(1).unwrap(), Some("closed-1".to_string()));

        assert_eq!(mutator.calls(), vec!["move 2 0", "select 1", "close 1"]);
    }

    #[test]
    fn test_close_ignored_for_single_tab() {
        let mutator = Arc::new(RecordingMutator::new(10));
        let tab_bar = bar(source_with(1), mutator.clone());

        assert_eq!(tab_bar.on_close(0).unwrap(), None);
        assert!(mutator.calls().is_empty());
    }

    #[test]
    fn test_store_errors_propagate() {
        let source = source_with(2);
        let tab_bar = TabBar::new(
            source.clone(),
            source.clone(),
            Arc::new(IdentityLocalizer),
        );

        assert!(tab_bar.on_move(0, 9).is_err());
        source
            .set_error(&source.snapshot().ids[0], Some(TabErrorKind::RendererCrashed))
            .unwrap();
        assert!(tab_bar.on_select(1).is_ok());
    }
}
