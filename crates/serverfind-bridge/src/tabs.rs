//! Tabs hosting content endpoints, and the async transport to reach them.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serverfind_common::BridgeError;
use serverfind_matcher::{DocumentAdapter, HighlightStyle, Highlighter};
use tracing::{debug, info};

use crate::content::ContentEndpoint;
use crate::protocol::{Request, Response};

pub type TabId = u32;

/// The tab a control surface acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabInfo {
    pub id: TabId,
    pub url: String,
}

/// Page load lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLoadState {
    Started,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabEvent {
    PageLoad {
        tab_id: TabId,
        state: PageLoadState,
        url: String,
    },
    Closed {
        tab_id: TabId,
    },
}

/// Browser-side services the control surface depends on.
#[async_trait]
pub trait TabHost: Send + Sync {
    /// The currently focused tab, if any.
    async fn active_tab(&self) -> Option<TabInfo>;

    /// Deliver `request` to the content endpoint of `tab` and await its reply.
    async fn send(&self, tab: TabId, request: Request) -> Result<Response, BridgeError>;

    /// Reload `tab`, replacing its document.
    async fn reload(&self, tab: TabId) -> Result<(), BridgeError>;
}

/// Builds the document for a freshly loaded page.
pub type PageBuilder<D> = Box<dyn Fn() -> D + Send + Sync>;

struct TabEntry<D: DocumentAdapter> {
    url: String,
    /// `None` when the page has no content receiver.
    endpoint: Option<ContentEndpoint<D>>,
}

struct TabsInner<D: DocumentAdapter> {
    tabs: HashMap<TabId, TabEntry<D>>,
    active: Option<TabId>,
    next_id: TabId,
}

/// In-process tabs whose content endpoints are reached through the JSON
/// wire format.
pub struct LocalTabs<D: DocumentAdapter> {
    inner: Mutex<TabsInner<D>>,
    events: Mutex<Vec<TabEvent>>,
    style: HighlightStyle,
    builder: PageBuilder<D>,
}

impl<D: DocumentAdapter> LocalTabs<D> {
    pub fn new(style: HighlightStyle, builder: PageBuilder<D>) -> Self {
        Self {
            inner: Mutex::new(TabsInner {
                tabs: HashMap::new(),
                active: None,
                next_id: 1,
            }),
            events: Mutex::new(Vec::new()),
            style,
            builder,
        }
    }

    /// Open `url` with a content endpoint attached and make it active.
    pub fn open(&self, url: &str) -> Result<TabId, BridgeError> {
        self.insert(url, true)
    }

    /// Open `url` without a content endpoint and make it active.
    pub fn open_detached(&self, url: &str) -> Result<TabId, BridgeError> {
        self.insert(url, false)
    }

    fn insert(&self, url: &str, attached: bool) -> Result<TabId, BridgeError> {
        let endpoint = attached.then(|| self.load_endpoint());
        let id = {
            let mut inner = self.lock()?;
            let id = inner.next_id;
            inner.next_id += 1;
            inner.tabs.insert(
                id,
                TabEntry {
                    url: url.to_string(),
                    endpoint,
                },
            );
            inner.active = Some(id);
            id
        };
        info!(tab_id = id, url, attached, "tab opened");
        self.push_load_events(id, url);
        Ok(id)
    }

    /// Focus `tab`. Returns `false` if it does not exist.
    pub fn activate(&self, tab: TabId) -> bool {
        let Ok(mut inner) = self.inner.lock() else {
            return false;
        };
        if inner.tabs.contains_key(&tab) {
            inner.active = Some(tab);
            true
        } else {
            false
        }
    }

    /// Close `tab`. Returns `false` if it does not exist.
    pub fn close(&self, tab: TabId) -> bool {
        let removed = match self.inner.lock() {
            Ok(mut inner) => {
                let removed = inner.tabs.remove(&tab).is_some();
                if inner.active == Some(tab) {
                    inner.active = None;
                }
                removed
            }
            Err(_) => false,
        };
        if removed {
            debug!(tab_id = tab, "tab closed");
            self.push_event(TabEvent::Closed { tab_id: tab });
        }
        removed
    }

    /// Run `f` against the content endpoint of `tab`.
    pub fn with_content<R>(
        &self,
        tab: TabId,
        f: impl FnOnce(&mut ContentEndpoint<D>) -> R,
    ) -> Result<R, BridgeError> {
        let mut inner = self.lock()?;
        let endpoint = inner
            .tabs
            .get_mut(&tab)
            .and_then(|entry| entry.endpoint.as_mut())
            .ok_or(BridgeError::NoReceiver(tab))?;
        Ok(f(endpoint))
    }

    /// Take every pending tab event.
    pub fn drain_events(&self) -> Vec<TabEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(_) => Vec::new(),
        }
    }

    pub fn count(&self) -> usize {
        self.inner.lock().map(|inner| inner.tabs.len()).unwrap_or(0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, TabsInner<D>>, BridgeError> {
        self.inner
            .lock()
            .map_err(|_| BridgeError::Transport("tab registry lock poisoned".into()))
    }

    fn load_endpoint(&self) -> ContentEndpoint<D> {
        ContentEndpoint::new(Highlighter::new((self.builder)(), self.style.clone()))
    }

    fn push_load_events(&self, tab_id: TabId, url: &str) {
        for state in [PageLoadState::Started, PageLoadState::Finished] {
            self.push_event(TabEvent::PageLoad {
                tab_id,
                state,
                url: url.to_string(),
            });
        }
    }

    fn push_event(&self, event: TabEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[async_trait]
impl<D> TabHost for LocalTabs<D>
where
    D: DocumentAdapter + Send + 'static,
    D::Handle: Send,
{
    async fn active_tab(&self) -> Option<TabInfo> {
        let inner = self.inner.lock().ok()?;
        let id = inner.active?;
        inner.tabs.get(&id).map(|entry| TabInfo {
            id,
            url: entry.url.clone(),
        })
    }

    async fn send(&self, tab: TabId, request: Request) -> Result<Response, BridgeError> {
        let body = request.to_json()?;
        let reply = self.with_content(tab, |endpoint| endpoint.handle_raw(&body))??;
        Response::from_json(&reply)
    }

    async fn reload(&self, tab: TabId) -> Result<(), BridgeError> {
        let url = {
            let mut inner = self.lock()?;
            let entry = inner.tabs.get_mut(&tab).ok_or(BridgeError::NoActiveTab)?;
            if entry.endpoint.is_some() {
                entry.endpoint = Some(self.load_endpoint());
            }
            entry.url.clone()
        };
        info!(tab_id = tab, url = %url, "tab reloaded");
        self.push_load_events(tab, &url);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
