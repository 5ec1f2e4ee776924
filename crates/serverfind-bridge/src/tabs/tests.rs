use super::*;
use serverfind_config::schema::SidebarConfig;
use serverfind_matcher::document::render_server_list;
use serverfind_matcher::MemoryDocument;

fn tabs() -> LocalTabs<MemoryDocument> {
    LocalTabs::new(
        HighlightStyle::default(),
        Box::new(|| {
            let mut doc = MemoryDocument::new(&SidebarConfig::default()).expect("default selectors");
            render_server_list(&mut doc, &["General Chat", "Gaming Lounge", "Music"]);
            doc
        }),
    )
}

fn search(query: &str) -> Request {
    Request::Search {
        query: query.into(),
        color: "#9ef01a".into(),
        auto_scroll: false,
        advanced_search: false,
    }
}

#[tokio::test]
async fn no_active_tab_initially() {
    let tabs = tabs();
    assert_eq!(tabs.active_tab().await, None);
    assert_eq!(tabs.count(), 0);
}

#[tokio::test]
async fn open_makes_tab_active() {
    let tabs = tabs();
    let first = tabs.open("https://discord.com/app").unwrap();
    let second = tabs.open("https://example.com").unwrap();
    assert_ne!(first, second);
    assert_eq!(tabs.active_tab().await.unwrap().id, second);

    assert!(tabs.activate(first));
    assert_eq!(
        tabs.active_tab().await,
        Some(TabInfo {
            id: first,
            url: "https://discord.com/app".into(),
        })
    );
    assert!(!tabs.activate(99));
}

#[tokio::test]
async fn send_round_trips_through_endpoint() {
    let tabs = tabs();
    let id = tabs.open("https://discord.com/app").unwrap();

    let reply = tabs.send(id, search("ga")).await.unwrap();
    assert_eq!(reply, Response::Count { count: 1 });
    let reply = tabs.send(id, Request::Next).await.unwrap();
    assert_eq!(reply, Response::Scrolled { scrolled: true });
    let reply = tabs.send(id, Request::CheckReady).await.unwrap();
    assert_eq!(reply, Response::Ready { ready: true });
}

#[tokio::test]
async fn detached_tab_has_no_receiver() {
    let tabs = tabs();
    let id = tabs.open_detached("https://example.com").unwrap();
    let err = tabs.send(id, Request::CheckReady).await.unwrap_err();
    assert_eq!(err, BridgeError::NoReceiver(id));
}

#[tokio::test]
async fn unknown_tab_has_no_receiver() {
    let tabs = tabs();
    let err = tabs.send(42, Request::Clear).await.unwrap_err();
    assert_eq!(err, BridgeError::NoReceiver(42));
}

#[tokio::test]
async fn reload_replaces_document_and_match_state() {
    let tabs = tabs();
    let id = tabs.open("https://discord.com/app").unwrap();
    tabs.send(id, search("")).await.unwrap();
    assert_eq!(
        tabs.with_content(id, |ep| ep.highlighter().matches().len()).unwrap(),
        3
    );

    tabs.reload(id).await.unwrap();
    let (matches, marked) = tabs
        .with_content(id, |ep| {
            let h = ep.highlighter();
            (h.matches().len(), h.document().marked("discord-search-highlight").len())
        })
        .unwrap();
    assert_eq!(matches, 0);
    assert_eq!(marked, 0);
}

#[tokio::test]
async fn reload_unknown_tab_fails() {
    let tabs = tabs();
    assert_eq!(tabs.reload(7).await, Err(BridgeError::NoActiveTab));
}

#[tokio::test]
async fn events_record_loads_and_close() {
    let tabs = tabs();
    let id = tabs.open("https://discord.com/app").unwrap();
    tabs.reload(id).await.unwrap();
    assert!(tabs.close(id));
    assert!(!tabs.close(id));

    let events = tabs.drain_events();
    let loads = events
        .iter()
        .filter(|e| {
            matches!(
                e,
                TabEvent::PageLoad {
                    state: PageLoadState::Finished,
                    ..
                }
            )
        })
        .count();
    assert_eq!(loads, 2);
    assert_eq!(events.last(), Some(&TabEvent::Closed { tab_id: id }));
    assert!(tabs.drain_events().is_empty());
    assert_eq!(tabs.active_tab().await, None);
}
