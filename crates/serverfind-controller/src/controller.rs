//! Drives the content endpoint of the active tab from user actions.

use std::sync::Arc;
use std::time::Duration;

use serverfind_bridge::{is_target_url, Request, Response, TabHost, TabInfo};
use serverfind_common::ActivityLog;
use serverfind_config::{normalize_color, ServerfindConfig};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::poller::{PollEvent, ReadinessProbe, ReadyPoller};
use crate::preferences::{
    Preferences, PreferenceValue, KEY_ADVANCED_SEARCH, KEY_AUTO_SCROLL, KEY_HIGHLIGHT_COLOR,
    KEY_LAST_QUERY,
};
use crate::store::PreferenceStore;
use crate::view::{Indicator, PopupView};

const NO_TAB: &str = "No active tab found.";
const NO_RESULTS: &str = "0 servers found";

/// One control-surface session.
///
/// All methods take `&mut self`, so actions are handled one at a time.
/// Readiness probes arrive on an internal channel; feed them back through
/// [`Controller::next_poll_event`] or [`Controller::poll_readiness_events`].
pub struct Controller {
    host: Arc<dyn TabHost>,
    store: Arc<dyn PreferenceStore>,
    target_host: String,
    default_color: String,
    view: PopupView,
    log: ActivityLog,
    poller: ReadyPoller,
    probe_tx: mpsc::UnboundedSender<PollEvent>,
    probe_rx: mpsc::UnboundedReceiver<PollEvent>,
}

impl Controller {
    pub fn new(
        host: Arc<dyn TabHost>,
        store: Arc<dyn PreferenceStore>,
        config: &ServerfindConfig,
    ) -> Self {
        let (probe_tx, probe_rx) = mpsc::unbounded_channel();
        let default_color = config.highlight.default_color.clone();
        let prefs = Preferences::with_color(&default_color);
        Self {
            host,
            store,
            target_host: config.controller.target_host.clone(),
            view: PopupView {
                color: prefs.highlight_color,
                auto_scroll: prefs.auto_scroll,
                advanced: prefs.advanced_search,
                ..Default::default()
            },
            default_color,
            log: ActivityLog::new(config.controller.log_capacity as usize),
            poller: ReadyPoller::new(Duration::from_millis(u64::from(
                config.controller.poll_interval_ms,
            ))),
            probe_tx,
            probe_rx,
        }
    }

    /// Restore preferences, begin readiness polling, and verify the active
    /// tab is on the target site.
    pub async fn start(&mut self) {
        match Preferences::load(self.store.as_ref(), &self.default_color).await {
            Ok(prefs) => {
                self.view.color = prefs.highlight_color;
                self.view.auto_scroll = prefs.auto_scroll;
                self.view.advanced = prefs.advanced_search;
                self.view.query = prefs.last_query.unwrap_or_default();
            }
            Err(e) => {
                warn!(error = %e, "failed to load preferences, using defaults");
                self.log.error("Error: Unable to load preferences.");
            }
        }

        self.log.info("Extension loaded. Ready to search.");
        self.poller.start(self.host.clone(), self.probe_tx.clone());
        self.check_target().await;
    }

    /// Compare the active tab against the target host. Stops polling and
    /// offers a reload when the tab is elsewhere.
    pub async fn check_target(&mut self) -> bool {
        let Some(tab) = self.host.active_tab().await else {
            debug!("target check skipped: no active tab");
            return false;
        };
        if is_target_url(&tab.url, &self.target_host) {
            self.view.reload_visible = false;
            self.log.info(format!("User is on {}.", self.target_host));
            true
        } else {
            self.view.page_status = format!("Error: You are not on {}!", self.target_host);
            self.view.reload_visible = true;
            self.log.error(format!("User is not on {}.", self.target_host));
            self.poller.stop();
            false
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.view.query = query.into();
    }

    /// Submit the query input.
    pub async fn search(&mut self) {
        let query = self.view.query.trim().to_string();
        if query.is_empty() {
            self.view.prompt = Some("Please enter a search term.".into());
            self.log.error("Search attempted with empty query.");
            return;
        }

        let prefs = Preferences {
            highlight_color: self.view.color.clone(),
            auto_scroll: self.view.auto_scroll,
            advanced_search: self.view.advanced,
            last_query: Some(query.clone()),
        };
        self.persist(&prefs.entries()).await;
        self.log.info("Search initiated.");
        self.send_search(query).await;
    }

    async fn send_search(&mut self, query: String) {
        let Some(tab) = self.active_tab().await else {
            return;
        };
        let request = Request::Search {
            query,
            color: self.view.color.clone(),
            auto_scroll: self.view.auto_scroll,
            advanced_search: self.view.advanced,
        };

        let response = match self.host.send(tab.id, request).await {
            Ok(response) => response,
            Err(e) => {
                error!(tab_id = tab.id, error = %e, "search request failed");
                self.log.error("Error: Unable to retrieve search results.");
                self.view.result_text = "Error: Unable to retrieve results.".into();
                self.view.next_enabled = false;
                return;
            }
        };

        match response.into_count() {
            Ok(count) => {
                self.view.result_text = format!("{count} server(s) found");
                self.log
                    .info(format!("Search completed. {count} server(s) found."));
                self.view.next_enabled = count > 1;
                if count > 1 {
                    self.log
                        .feature("Multiple matches found. \"Next\" button enabled.");
                } else {
                    self.log
                        .feature("Single or no match found. \"Next\" button disabled.");
                }
            }
            Err(e) => {
                warn!(error = %e, "malformed search response");
                self.view.result_text = NO_RESULTS.into();
                self.log.info("Search completed. No servers found.");
                self.view.next_enabled = false;
            }
        }
    }

    /// Empty the query, remove highlights, and forget the stored query.
    pub async fn clear(&mut self) {
        self.view.query.clear();

        if let Some(tab) = self.active_tab().await {
            if let Err(e) = self.host.send(tab.id, Request::Clear).await {
                error!(tab_id = tab.id, error = %e, "clear request failed");
                self.log
                    .error("Error: Unable to communicate with content script.");
            }
            self.view.result_text = NO_RESULTS.into();
            self.view.next_enabled = false;
            self.log.info("Highlights cleared.");
        }

        match self.store.remove(KEY_LAST_QUERY).await {
            Ok(()) => self.log.info("Search query cleared from storage."),
            Err(e) => {
                error!(error = %e, "failed to remove stored query");
                self.log.error("Error: Unable to update preferences.");
            }
        }
    }

    /// Move to the next match. Does nothing while navigation is disabled.
    pub async fn next(&mut self) {
        if !self.view.next_enabled {
            debug!("next ignored: navigation disabled");
            return;
        }
        let Some(tab) = self.active_tab().await else {
            return;
        };
        match self
            .host
            .send(tab.id, Request::Next)
            .await
            .and_then(Response::into_scrolled)
        {
            Ok(true) => self.log.info("Navigated to the next matching server."),
            Ok(false) => self.log.info("No matching server to navigate to."),
            Err(e) => {
                error!(tab_id = tab.id, error = %e, "next request failed");
                self.log
                    .error("Error: Unable to communicate with content script.");
            }
        }
    }

    /// Change the highlight color. Invalid colors are reported and the
    /// previous color is kept.
    pub async fn set_color(&mut self, color: &str) {
        let color = match normalize_color(color) {
            Ok(c) => c,
            Err(e) => {
                warn!(color, error = %e, "rejected highlight color");
                self.log.error(format!("Error: Invalid highlight color {color:?}."));
                return;
            }
        };
        self.view.color = color.clone();
        self.persist(&[
            (KEY_HIGHLIGHT_COLOR, color.into()),
            (KEY_AUTO_SCROLL, self.view.auto_scroll.into()),
            (KEY_ADVANCED_SEARCH, self.view.advanced.into()),
        ])
        .await;
        self.log.feature("Highlight color changed.");
        self.refresh_search().await;
    }

    pub async fn set_auto_scroll(&mut self, enabled: bool) {
        self.view.auto_scroll = enabled;
        self.persist(&[
            (KEY_AUTO_SCROLL, enabled.into()),
            (KEY_ADVANCED_SEARCH, self.view.advanced.into()),
        ])
        .await;
        self.log
            .feature(format!("Auto-Scroll {}.", enabled_word(enabled)));
        self.refresh_search().await;
    }

    pub async fn set_advanced(&mut self, enabled: bool) {
        self.view.advanced = enabled;
        self.persist(&[(KEY_ADVANCED_SEARCH, enabled.into())]).await;
        self.log
            .feature(format!("Advanced Search {}.", enabled_word(enabled)));
        self.refresh_search().await;
    }

    /// Re-run the current query after a preference change.
    async fn refresh_search(&mut self) {
        let query = self.view.query.trim().to_string();
        if query.is_empty() {
            return;
        }
        self.persist(&[(KEY_LAST_QUERY, query.as_str().into())]).await;
        self.send_search(query).await;
    }

    /// Reload the active tab and poll for readiness again.
    pub async fn reload(&mut self) {
        let Some(tab) = self.active_tab().await else {
            return;
        };
        if let Err(e) = self.host.reload(tab.id).await {
            error!(tab_id = tab.id, error = %e, "reload failed");
            self.log.error("Error: Unable to reload the page.");
            return;
        }
        info!(tab_id = tab.id, "page reload requested");
        self.log.feature("Reloading the page.");
        self.view.reload_visible = false;
        self.view.indicator = Indicator::Pending;
        self.view.page_status = "Reloading...".into();
        self.view.next_enabled = false;
        self.poller.start(self.host.clone(), self.probe_tx.clone());
    }

    /// Apply one readiness probe. Probes from a stopped or replaced run
    /// are dropped.
    pub fn handle_probe(&mut self, event: PollEvent) {
        if !self.poller.accepts(&event) {
            debug!(generation = event.generation, "stale readiness probe dropped");
            return;
        }
        match event.probe {
            ReadinessProbe::Ready => {
                self.view.indicator = Indicator::Ready;
                self.view.page_status = "Page loaded: Discord servers found.".into();
                self.view.reload_visible = false;
                self.log.info("Page fully loaded and ready.");
                self.poller.stop();
            }
            ReadinessProbe::NotReady => {
                self.view.indicator = Indicator::Pending;
                self.view.page_status = "Waiting for Discord servers...".into();
            }
            ReadinessProbe::Failed(e) => {
                warn!(error = %e, "readiness check failed");
                self.view.indicator = Indicator::Pending;
                self.view.page_status = "Waiting for Discord servers...".into();
                self.view.reload_visible = true;
                self.log.error("Error: Unable to check page readiness.");
            }
        }
    }

    /// Apply every probe that has already arrived. Returns how many were
    /// received.
    pub fn poll_readiness_events(&mut self) -> usize {
        let mut received = 0;
        while let Ok(event) = self.probe_rx.try_recv() {
            self.handle_probe(event);
            received += 1;
        }
        received
    }

    /// Wait for the next probe. Cancel-safe, for use in `tokio::select!`.
    pub async fn next_poll_event(&mut self) -> Option<PollEvent> {
        self.probe_rx.recv().await
    }

    /// Stop polling. The session can still be used for actions.
    pub fn shutdown(&mut self) {
        if self.poller.stop() {
            info!("readiness polling cancelled");
        }
    }

    pub fn view(&self) -> &PopupView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut PopupView {
        &mut self.view
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_running()
    }

    async fn active_tab(&mut self) -> Option<TabInfo> {
        let tab = self.host.active_tab().await;
        if tab.is_none() {
            self.log.error(NO_TAB);
        }
        tab
    }

    async fn persist(&mut self, entries: &[(&str, PreferenceValue)]) {
        if let Err(e) = self.store.set(entries).await {
            error!(error = %e, "failed to persist preferences");
            self.log.error("Error: Unable to save preferences.");
        }
    }
}

fn enabled_word(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}

#[cfg(test)]
mod tests;
