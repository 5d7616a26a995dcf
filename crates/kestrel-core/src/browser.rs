//! Main browser state container
//!
//! Owns the tab list and wires it to the tab bar and to one content view
//! per open tab. The list stays the single source of truth; views are
//! mounted and unmounted to follow it.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tokio::runtime::Handle;

use kestrel_tabs::{
    TabErrorKind, TabId, TabList, TabListMutator, TabListSnapshot, TabListSource,
    NEW_TAB_TYPE,
};
use kestrel_ui::{ContentView, EngineFactory, Localizer, TabBar};
use kestrel_utils::{Resolution, Subscription, UrlPrefixResolver};

use crate::config::Config;
use crate::error::CoreError;
use crate::Result;

/// One mounted content view per tab in the list
struct ContentViews {
    tabs: Arc<TabList>,
    engines: Arc<dyn EngineFactory>,
    localizer: Arc<dyn Localizer>,
    use_built_in_error_pages: bool,
    /// Runtime the dialog suppression timers are spawned on
    runtime: Handle,
    views: RwLock<HashMap<TabId, Arc<ContentView>>>,
}

impl ContentViews {
    fn get(&self, tab_id: &str) -> Option<Arc<ContentView>> {
        self.views.read().get(tab_id).cloned()
    }

    fn len(&self) -> usize {
        self.views.read().len()
    }

    /// Mount views for new tabs and unmount views of closed ones
    fn sync(&self, ids: &[TabId]) {
        let removed: Vec<Arc<ContentView>> = {
            let mut views = self.views.write();

            for id in ids {
                if views.contains_key(id) {
                    continue;
                }

                let view = Arc::new(ContentView::new(
                    id.clone(),
                    self.engines.create(id),
                    self.tabs.clone(),
                    Arc::clone(&self.localizer),
                    self.use_built_in_error_pages,
                    self.runtime.clone(),
                ));
                view.mount();
                views.insert(id.clone(), view);
            }

            let stale: Vec<TabId> = views
                .keys()
                .filter(|id| !ids.contains(id))
                .cloned()
                .collect();
            stale.iter().filter_map(|id| views.remove(id)).collect()
        };

        for view in removed {
            tracing::debug!(tab_id = %view.id(), "Dropping content view of closed tab");
            view.unmount();
        }
    }
}

pub struct Browser {
    config: Config,
    tabs: Arc<TabList>,
    tab_bar: TabBar,
    resolver: UrlPrefixResolver,
    views: Arc<ContentViews>,
    /// Keeps `views` following every change to `tabs`, whoever makes it
    tab_list: Subscription,
}

impl Browser {
    /// Create a browser with a single tab showing the homepage
    pub fn new(
        config: Config,
        engines: Arc<dyn EngineFactory>,
        localizer: Arc<dyn Localizer>,
        runtime: Handle,
    ) -> Result<Self> {
        config.validate()?;

        let tabs = Arc::new(TabList::new(config.max_tabs));
        let views = Arc::new(ContentViews {
            tabs: tabs.clone(),
            engines,
            localizer: Arc::clone(&localizer),
            use_built_in_error_pages: config.use_built_in_error_pages,
            runtime,
            views: RwLock::new(HashMap::new()),
        });

        let weak: Weak<ContentViews> = Arc::downgrade(&views);
        let tab_list = tabs.subscribe(Arc::new(move |snapshot: &TabListSnapshot| {
            if let Some(views) = weak.upgrade() {
                views.sync(&snapshot.ids);
            }
        }));

        if let Err(e) = tabs.create_tab(NEW_TAB_TYPE, &config.homepage) {
            tabs.unsubscribe(&tab_list);
            return Err(e.into());
        }

        let tab_bar = TabBar::new(tabs.clone(), tabs.clone(), localizer);
        let resolver = config.url_resolver();

        tracing::info!(max_tabs = config.max_tabs, "Browser initialized");

        Ok(Self {
            config,
            tabs,
            tab_bar,
            resolver,
            views,
            tab_list,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tabs(&self) -> &Arc<TabList> {
        &self.tabs
    }

    pub fn tab_bar(&self) -> &TabBar {
        &self.tab_bar
    }

    pub fn content_view(&self, tab_id: &str) -> Option<Arc<ContentView>> {
        self.views.get(tab_id)
    }

    /// Content view of the selected tab
    pub fn active_content_view(&self) -> Option<Arc<ContentView>> {
        let id = self.tabs.selected_id()?;
        self.content_view(&id)
    }

    // === Tab bar operations ===

    pub fn create_new_tab(&self) -> Result<Option<TabId>> {
        Ok(self.tab_bar.on_new()?)
    }

    pub fn move_tab(&self, from_index: usize, to_index: usize) -> Result<()> {
        Ok(self.tab_bar.on_move(from_index, to_index)?)
    }

    pub fn close_tab(&self, index: usize) -> Result<Option<TabId>> {
        Ok(self.tab_bar.on_close(index)?)
    }

    pub fn select_tab(&self, index: usize) -> Result<()> {
        Ok(self.tab_bar.on_select(index)?)
    }

    // === Navigation ===

    /// Resolve address bar text and point the selected tab at it
    pub fn navigate(&self, input: &str) -> Result<String> {
        let tab_id = self.tabs.selected_id().ok_or(CoreError::NoSelection)?;

        let resolution = self.resolver.classify(input);
        if let Resolution::Search(_) = resolution {
            tracing::debug!(tab_id = %tab_id, "Address bar input treated as search");
        }
        let url = resolution.into_url();

        self.tabs.navigate(&tab_id, url.clone())?;

        tracing::info!(tab_id = %tab_id, url = %url, "Navigating tab");

        Ok(url)
    }

    // === Engine reports ===

    pub fn report_error(&self, tab_id: &str, error: Option<TabErrorKind>) -> Result<()> {
        Ok(self.tabs.set_error(tab_id, error)?)
    }

    pub fn report_loading(&self, tab_id: &str, is_loading: bool) -> Result<()> {
        Ok(self.tabs.set_loading(tab_id, is_loading)?)
    }

    pub fn report_title(&self, tab_id: &str, title: String) -> Result<()> {
        Ok(self.tabs.set_title(tab_id, title)?)
    }

    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    pub fn max_tabs(&self) -> usize {
        self.tabs.max_tabs()
    }
}

impl Drop for Browser {
    fn drop(&mut self) {
        self.tabs.unsubscribe(&self.tab_list);
    }
}
