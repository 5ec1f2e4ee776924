use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serverfind_bridge::{LocalTabs, TabId};
use serverfind_common::{BridgeError, LogLevel, StoreError};
use serverfind_config::schema::SidebarConfig;
use serverfind_matcher::document::render_server_list;
use serverfind_matcher::{DocumentAdapter, HighlightStyle, MemoryDocument};

use super::*;
use crate::store::MemoryStore;

const SERVERS: [&str; 4] = ["General Chat", "Gaming Lounge", "Music", "art-talk"];
const DISCORD: &str = "https://discord.com/channels/@me";

fn config() -> ServerfindConfig {
    let mut config = ServerfindConfig::default();
    config.controller.poll_interval_ms = 10;
    config.controller.log_capacity = 50;
    config
}

fn rendered_tabs() -> Arc<LocalTabs<MemoryDocument>> {
    Arc::new(LocalTabs::new(
        HighlightStyle::default(),
        Box::new(|| {
            let mut doc = MemoryDocument::new(&SidebarConfig::default()).expect("default selectors");
            render_server_list(&mut doc, &SERVERS);
            doc
        }),
    ))
}

fn blank_tabs() -> Arc<LocalTabs<MemoryDocument>> {
    Arc::new(LocalTabs::new(
        HighlightStyle::default(),
        Box::new(|| MemoryDocument::new(&SidebarConfig::default()).expect("default selectors")),
    ))
}

struct Harness {
    tabs: Arc<LocalTabs<MemoryDocument>>,
    store: Arc<MemoryStore>,
    tab: TabId,
    controller: Controller,
}

fn harness_with(tabs: Arc<LocalTabs<MemoryDocument>>, url: &str) -> Harness {
    let tab = tabs.open(url).unwrap();
    let store = Arc::new(MemoryStore::new());
    let controller = Controller::new(tabs.clone(), store.clone(), &config());
    Harness {
        tabs,
        store,
        tab,
        controller,
    }
}

fn harness() -> Harness {
    harness_with(rendered_tabs(), DISCORD)
}

fn messages(c: &Controller) -> Vec<String> {
    c.log().entries().map(|e| e.message.clone()).collect()
}

fn last_message(c: &Controller) -> (LogLevel, String) {
    let entry = c.log().latest().expect("log entry");
    (entry.level, entry.message.clone())
}

async fn next_event(c: &mut Controller) -> PollEvent {
    tokio::time::timeout(Duration::from_secs(2), c.next_poll_event())
        .await
        .expect("probe before timeout")
        .expect("channel open")
}

fn match_count(h: &Harness) -> usize {
    h.tabs
        .with_content(h.tab, |ep| ep.highlighter().matches().len())
        .unwrap()
}

// ---------------------------------------------------------------------------
// Start-up
// ---------------------------------------------------------------------------

#[tokio::test]
async fn start_restores_preferences() {
    let mut h = harness();
    h.store
        .set(&[
            (KEY_HIGHLIGHT_COLOR, "#ff0000".into()),
            (KEY_AUTO_SCROLL, false.into()),
            (KEY_ADVANCED_SEARCH, true.into()),
            (KEY_LAST_QUERY, "music".into()),
        ])
        .await
        .unwrap();

    h.controller.start().await;
    let view = h.controller.view();
    assert_eq!(view.color, "#ff0000");
    assert!(!view.auto_scroll);
    assert!(view.advanced);
    assert_eq!(view.query, "music");
    assert_eq!(
        messages(&h.controller),
        vec!["Extension loaded. Ready to search.", "User is on discord.com."]
    );
    assert!(h.controller.is_polling());
    h.controller.shutdown();
}

#[tokio::test]
async fn start_uses_config_color_by_default() {
    let mut h = harness();
    h.controller.start().await;
    assert_eq!(h.controller.view().color, "#9ef01a");
    assert!(h.controller.view().auto_scroll);
    assert!(!h.controller.view().advanced);
    h.controller.shutdown();
}

#[tokio::test]
async fn wrong_site_stops_polling_and_offers_reload() {
    let mut h = harness_with(rendered_tabs(), "https://example.com/?q=discord.com");
    h.controller.start().await;

    let view = h.controller.view();
    assert_eq!(view.page_status, "Error: You are not on discord.com!");
    assert!(view.reload_visible);
    assert!(!h.controller.is_polling());
    assert_eq!(
        last_message(&h.controller),
        (LogLevel::Error, "User is not on discord.com.".to_string())
    );
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blank_query_prompts_without_request() {
    let mut h = harness();
    h.controller.set_query("   ");
    h.controller.search().await;

    assert_eq!(
        h.controller.view_mut().take_prompt().as_deref(),
        Some("Please enter a search term.")
    );
    assert_eq!(
        last_message(&h.controller),
        (LogLevel::Error, "Search attempted with empty query.".to_string())
    );
    assert_eq!(h.store.get(KEY_LAST_QUERY).await.unwrap(), None);
    assert_eq!(h.controller.view().result_text, "");
}

#[tokio::test]
async fn search_with_several_matches_enables_next() {
    let mut h = harness();
    h.controller.set_advanced(true).await;
    h.controller.set_query("  ga ");
    h.controller.search().await;

    let view = h.controller.view();
    assert_eq!(view.result_text, "2 server(s) found");
    assert!(view.next_enabled);
    assert_eq!(match_count(&h), 2);

    let log = messages(&h.controller);
    assert!(log.contains(&"Search initiated.".to_string()));
    assert!(log.contains(&"Search completed. 2 server(s) found.".to_string()));
    assert_eq!(
        last_message(&h.controller),
        (
            LogLevel::Feature,
            "Multiple matches found. \"Next\" button enabled.".to_string()
        )
    );
}

#[tokio::test]
async fn search_persists_all_preferences() {
    let mut h = harness();
    h.controller.set_query("ga");
    h.controller.search().await;

    assert_eq!(
        h.store.get(KEY_LAST_QUERY).await.unwrap(),
        Some(PreferenceValue::Text("ga".into()))
    );
    assert_eq!(
        h.store.get(KEY_HIGHLIGHT_COLOR).await.unwrap(),
        Some(PreferenceValue::Text("#9ef01a".into()))
    );
    assert_eq!(
        h.store.get(KEY_AUTO_SCROLL).await.unwrap(),
        Some(PreferenceValue::Bool(true))
    );
    assert_eq!(
        h.store.get(KEY_ADVANCED_SEARCH).await.unwrap(),
        Some(PreferenceValue::Bool(false))
    );
}

#[tokio::test]
async fn single_match_keeps_next_disabled() {
    let mut h = harness();
    h.controller.set_query("ga");
    h.controller.search().await;

    assert_eq!(h.controller.view().result_text, "1 server(s) found");
    assert!(!h.controller.view().next_enabled);
    assert_eq!(
        last_message(&h.controller).1,
        "Single or no match found. \"Next\" button disabled."
    );
}

#[tokio::test]
async fn search_without_receiver_reports_error() {
    let tabs = rendered_tabs();
    let tab = tabs.open_detached(DISCORD).unwrap();
    let mut h = harness_with(tabs, DISCORD);
    assert!(h.tabs.activate(tab));

    h.controller.set_query("music");
    h.controller.search().await;

    let view = h.controller.view();
    assert_eq!(view.result_text, "Error: Unable to retrieve results.");
    assert!(!view.next_enabled);
    assert_eq!(
        last_message(&h.controller),
        (
            LogLevel::Error,
            "Error: Unable to retrieve search results.".to_string()
        )
    );
}

#[tokio::test]
async fn actions_without_tab_log_error() {
    let tabs = rendered_tabs();
    let store = Arc::new(MemoryStore::new());
    let mut controller = Controller::new(tabs, store, &config());

    controller.set_query("music");
    controller.search().await;
    assert_eq!(last_message(&controller).1, "No active tab found.");

    controller.reload().await;
    assert_eq!(last_message(&controller).1, "No active tab found.");
}

/// A store whose writes always fail.
struct BrokenStore;

#[async_trait]
impl PreferenceStore for BrokenStore {
    async fn get(&self, _key: &str) -> Result<Option<PreferenceValue>, StoreError> {
        Ok(None)
    }

    async fn set(&self, _entries: &[(&str, PreferenceValue)]) -> Result<(), StoreError> {
        Err(StoreError::Encoding("read-only".into()))
    }

    async fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Encoding("read-only".into()))
    }
}

#[tokio::test]
async fn store_failure_does_not_block_search() {
    let tabs = rendered_tabs();
    tabs.open(DISCORD).unwrap();
    let mut controller = Controller::new(tabs, Arc::new(BrokenStore), &config());

    controller.set_query("music");
    controller.search().await;

    assert_eq!(controller.view().result_text, "1 server(s) found");
    assert!(messages(&controller).contains(&"Error: Unable to save preferences.".to_string()));
}

// ---------------------------------------------------------------------------
// Clear / Next
// ---------------------------------------------------------------------------

#[tokio::test]
async fn clear_resets_query_results_and_storage() {
    let mut h = harness();
    h.controller.set_query("a");
    h.controller.search().await;
    assert!(match_count(&h) > 0);

    h.controller.clear().await;
    let view = h.controller.view();
    assert_eq!(view.query, "");
    assert_eq!(view.result_text, "0 servers found");
    assert!(!view.next_enabled);
    assert_eq!(match_count(&h), 0);
    assert_eq!(h.store.get(KEY_LAST_QUERY).await.unwrap(), None);

    let marked = h
        .tabs
        .with_content(h.tab, |ep| {
            ep.highlighter()
                .document()
                .marked("discord-search-highlight")
                .len()
        })
        .unwrap();
    assert_eq!(marked, 0);
    assert_eq!(
        last_message(&h.controller).1,
        "Search query cleared from storage."
    );
}

#[tokio::test]
async fn next_advances_cursor() {
    let mut h = harness();
    h.controller.set_query("a");
    h.controller.search().await;
    assert!(h.controller.view().next_enabled);

    h.controller.next().await;
    assert_eq!(
        last_message(&h.controller),
        (
            LogLevel::Info,
            "Navigated to the next matching server.".to_string()
        )
    );
    let cursor = h
        .tabs
        .with_content(h.tab, |ep| ep.highlighter().matches().cursor())
        .unwrap();
    assert_eq!(cursor, Some(1));
}

#[tokio::test]
async fn next_is_ignored_while_disabled() {
    let mut h = harness();
    h.controller.set_query("music");
    h.controller.search().await;
    let before = messages(&h.controller);

    h.controller.next().await;
    assert_eq!(messages(&h.controller), before);
}

#[tokio::test]
async fn next_failure_is_logged() {
    let mut h = harness();
    h.controller.set_query("a");
    h.controller.search().await;
    h.tabs.close(h.tab);
    let other = h.tabs.open_detached(DISCORD).unwrap();
    assert!(h.tabs.activate(other));

    h.controller.next().await;
    assert_eq!(
        last_message(&h.controller),
        (
            LogLevel::Error,
            "Error: Unable to communicate with content script.".to_string()
        )
    );
}

// ---------------------------------------------------------------------------
// Preference changes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_color_is_rejected() {
    let mut h = harness();
    h.controller.set_color("not-a-color").await;
    assert_eq!(h.controller.view().color, "#9ef01a");
    assert_eq!(last_message(&h.controller).0, LogLevel::Error);
    assert_eq!(h.store.get(KEY_HIGHLIGHT_COLOR).await.unwrap(), None);
}

#[tokio::test]
async fn color_change_reapplies_search() {
    let mut h = harness();
    h.controller.set_query("music");
    h.controller.search().await;

    h.controller.set_color("#FF0000").await;
    assert_eq!(h.controller.view().color, "#ff0000");
    assert_eq!(
        h.store.get(KEY_HIGHLIGHT_COLOR).await.unwrap(),
        Some(PreferenceValue::Text("#ff0000".into()))
    );

    let shadow = h
        .tabs
        .with_content(h.tab, |ep| {
            let highlighter = ep.highlighter();
            let node = highlighter.matches().items()[0];
            highlighter
                .document()
                .style(node, "box-shadow")
                .map(String::from)
        })
        .unwrap();
    assert_eq!(shadow.as_deref(), Some("0 0 0 2px #ff0000"));
    assert!(messages(&h.controller).contains(&"Highlight color changed.".to_string()));
}

#[tokio::test]
async fn toggling_advanced_reruns_non_empty_query() {
    let mut h = harness();
    h.controller.set_query("ga");
    h.controller.search().await;
    assert_eq!(h.controller.view().result_text, "1 server(s) found");

    h.controller.set_advanced(true).await;
    assert_eq!(h.controller.view().result_text, "2 server(s) found");
    assert!(messages(&h.controller).contains(&"Advanced Search enabled.".to_string()));
    assert_eq!(
        h.store.get(KEY_ADVANCED_SEARCH).await.unwrap(),
        Some(PreferenceValue::Bool(true))
    );
}

#[tokio::test]
async fn toggling_with_empty_query_sends_nothing() {
    let mut h = harness();
    h.controller.set_auto_scroll(false).await;
    assert_eq!(
        last_message(&h.controller),
        (LogLevel::Feature, "Auto-Scroll disabled.".to_string())
    );
    assert_eq!(h.controller.view().result_text, "");
    assert_eq!(h.store.get(KEY_LAST_QUERY).await.unwrap(), None);
}

// ---------------------------------------------------------------------------
// Readiness
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ready_probe_stops_polling() {
    let mut h = harness();
    h.controller.start().await;

    let event = next_event(&mut h.controller).await;
    assert_eq!(event.probe, ReadinessProbe::Ready);
    h.controller.handle_probe(event);

    let view = h.controller.view();
    assert_eq!(view.indicator, Indicator::Ready);
    assert_eq!(view.page_status, "Page loaded: Discord servers found.");
    assert!(!view.reload_visible);
    assert!(!h.controller.is_polling());
    assert_eq!(last_message(&h.controller).1, "Page fully loaded and ready.");
}

#[tokio::test]
async fn waits_until_list_renders() {
    let mut h = harness_with(blank_tabs(), DISCORD);
    h.controller.start().await;

    let event = next_event(&mut h.controller).await;
    assert_eq!(event.probe, ReadinessProbe::NotReady);
    h.controller.handle_probe(event);
    assert_eq!(h.controller.view().page_status, "Waiting for Discord servers...");
    assert!(h.controller.is_polling());

    h.tabs
        .with_content(h.tab, |ep| {
            render_server_list(ep.highlighter_mut().document_mut(), &SERVERS);
        })
        .unwrap();

    loop {
        let event = next_event(&mut h.controller).await;
        let ready = event.probe == ReadinessProbe::Ready;
        h.controller.handle_probe(event);
        if ready {
            break;
        }
    }
    assert_eq!(h.controller.view().indicator, Indicator::Ready);
    assert!(!h.controller.is_polling());
}

#[tokio::test]
async fn failed_probe_reveals_reload() {
    let tabs = rendered_tabs();
    let mut h = harness_with(tabs, DISCORD);
    h.tabs.close(h.tab);
    let detached = h.tabs.open_detached(DISCORD).unwrap();
    h.controller.start().await;

    let event = next_event(&mut h.controller).await;
    assert_eq!(
        event.probe,
        ReadinessProbe::Failed(BridgeError::NoReceiver(detached))
    );
    h.controller.handle_probe(event);
    assert!(h.controller.view().reload_visible);
    assert!(h.controller.is_polling());
    assert_eq!(
        last_message(&h.controller),
        (
            LogLevel::Error,
            "Error: Unable to check page readiness.".to_string()
        )
    );
    h.controller.shutdown();
}

#[tokio::test]
async fn probe_after_shutdown_is_dropped() {
    let mut h = harness_with(blank_tabs(), DISCORD);
    h.controller.start().await;
    let event = next_event(&mut h.controller).await;

    h.controller.shutdown();
    h.controller.shutdown();
    let before = h.controller.view().clone();
    h.controller.handle_probe(event);
    assert_eq!(h.controller.view(), &before);
}

#[tokio::test]
async fn poll_readiness_events_drains_pending() {
    let mut h = harness();
    h.controller.start().await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(h.controller.poll_readiness_events(), 1);
    assert_eq!(h.controller.view().indicator, Indicator::Ready);
    assert_eq!(h.controller.poll_readiness_events(), 0);
}

#[tokio::test]
async fn reload_restarts_polling() {
    let mut h = harness();
    h.controller.start().await;
    let event = next_event(&mut h.controller).await;
    h.controller.handle_probe(event);
    assert!(!h.controller.is_polling());

    h.controller.set_query("a");
    h.controller.search().await;
    h.controller.reload().await;

    let view = h.controller.view();
    assert_eq!(view.page_status, "Reloading...");
    assert_eq!(view.indicator, Indicator::Pending);
    assert!(!view.next_enabled);
    assert!(h.controller.is_polling());
    assert_eq!(match_count(&h), 0);
    assert!(messages(&h.controller).contains(&"Reloading the page.".to_string()));

    let event = next_event(&mut h.controller).await;
    h.controller.handle_probe(event);
    assert_eq!(h.controller.view().indicator, Indicator::Ready);
}

// ---------------------------------------------------------------------------
// Log
// ---------------------------------------------------------------------------

#[tokio::test]
async fn log_is_bounded_by_config() {
    let tabs = rendered_tabs();
    tabs.open(DISCORD).unwrap();
    let mut config = config();
    config.controller.log_capacity = 4;
    let mut controller = Controller::new(tabs, Arc::new(MemoryStore::new()), &config);

    for query in ["a", "ga", "music", "zzz"] {
        controller.set_query(query);
        controller.search().await;
    }
    assert_eq!(controller.log().len(), 4);
    assert_eq!(
        controller.log().latest().map(|e| e.message.as_str()),
        Some("Single or no match found. \"Next\" button disabled.")
    );
}
