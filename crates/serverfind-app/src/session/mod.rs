//! `serverfind run`: an interactive session against an in-process tab.

mod command;
mod render;

use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serverfind_bridge::{is_target_url, LocalTabs, PageLoadState, TabEvent, TabId};
use serverfind_common::Result;
use serverfind_config::ServerfindConfig;
use serverfind_controller::{Controller, FileStore, MemoryStore, PreferenceStore};
use serverfind_matcher::document::render_server_list;
use serverfind_matcher::{HighlightStyle, MemoryDocument};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::fixture::Fixture;
pub use command::{parse_command, ReplCommand, HELP};
pub use render::render;

const TAB_EVENT_PERIOD: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub fixture: Option<PathBuf>,
    pub url: String,
    pub render_delay: Duration,
    pub ephemeral: bool,
}

/// Tabs whose pages render `fixture`, either at load or `render_delay`
/// after each load.
pub fn build_tabs(
    config: &ServerfindConfig,
    fixture: &Fixture,
    render_delay: Duration,
) -> Result<LocalTabs<MemoryDocument>> {
    let page = if render_delay.is_zero() {
        fixture.render(&config.sidebar)?
    } else {
        MemoryDocument::new(&config.sidebar)?
    };
    Ok(LocalTabs::new(
        HighlightStyle::from(&config.highlight),
        Box::new(move || page.clone()),
    ))
}

fn open_store(ephemeral: bool) -> Arc<dyn PreferenceStore> {
    if ephemeral {
        return Arc::new(MemoryStore::new());
    }
    match FileStore::default_path().and_then(FileStore::open) {
        Ok(store) => {
            info!(path = %store.path().display(), "using preference file");
            Arc::new(store)
        }
        Err(e) => {
            warn!(error = %e, "preference file unavailable, keeping preferences in memory");
            Arc::new(MemoryStore::new())
        }
    }
}

/// Render the fixture into `tab` after `delay`, as a slow page would.
fn schedule_render(
    tabs: &Arc<LocalTabs<MemoryDocument>>,
    tab: TabId,
    servers: &Arc<Vec<String>>,
    delay: Duration,
) {
    let tabs = Arc::clone(tabs);
    let servers = Arc::clone(servers);
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let rendered = tabs.with_content(tab, |endpoint| {
            render_server_list(endpoint.highlighter_mut().document_mut(), servers.as_slice());
        });
        match rendered {
            Ok(()) => debug!(tab_id = tab, "server list rendered"),
            Err(e) => debug!(tab_id = tab, error = %e, "server list not rendered"),
        }
    });
}

/// Apply one command to the controller.
pub async fn execute(controller: &mut Controller, command: ReplCommand) {
    match command {
        ReplCommand::Search(query) => {
            if let Some(query) = query {
                controller.set_query(query);
            }
            controller.search().await;
        }
        ReplCommand::Next => controller.next().await,
        ReplCommand::Clear => controller.clear().await,
        ReplCommand::Color(color) => controller.set_color(&color).await,
        ReplCommand::AutoScroll(on) => controller.set_auto_scroll(on).await,
        ReplCommand::Advanced(on) => controller.set_advanced(on).await,
        ReplCommand::Reload => controller.reload().await,
        ReplCommand::Status | ReplCommand::Help | ReplCommand::Quit => {}
    }
}

fn show(controller: &mut Controller) {
    if let Some(prompt) = controller.view_mut().take_prompt() {
        println!("! {prompt}");
    }
    println!("{}", render(controller.view(), controller.log()));
}

fn prompt() {
    print!("serverfind> ");
    let _ = std::io::stdout().flush();
}

pub async fn run(config: ServerfindConfig, options: RunOptions) -> Result<()> {
    let fixture = Fixture::load_or_sample(options.fixture.as_deref())?;
    let tabs = Arc::new(build_tabs(&config, &fixture, options.render_delay)?);
    let servers = Arc::new(fixture.servers);

    if is_target_url(&options.url, &config.controller.target_host) {
        tabs.open(&options.url)?;
    } else {
        tabs.open_detached(&options.url)?;
    }

    let store = open_store(options.ephemeral);
    let mut controller = Controller::new(tabs.clone(), store, &config);
    controller.start().await;
    show(&mut controller);
    println!("type `help` for commands");
    prompt();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tab_ticker = tokio::time::interval(TAB_EVENT_PERIOD);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        error!(error = %e, "failed to read input");
                        break;
                    }
                };
                match parse_command(&line) {
                    Ok(None) => {}
                    Ok(Some(ReplCommand::Quit)) => break,
                    Ok(Some(ReplCommand::Help)) => println!("{HELP}"),
                    Ok(Some(command)) => {
                        execute(&mut controller, command).await;
                        show(&mut controller);
                    }
                    Err(message) => println!("{message}"),
                }
                prompt();
            }
            Some(event) = controller.next_poll_event() => {
                let before = controller.view().clone();
                controller.handle_probe(event);
                if *controller.view() != before {
                    println!();
                    show(&mut controller);
                    prompt();
                }
            }
            _ = tab_ticker.tick() => {
                for event in tabs.drain_events() {
                    if let TabEvent::PageLoad { tab_id, state: PageLoadState::Finished, .. } = event {
                        if !options.render_delay.is_zero() {
                            schedule_render(&tabs, tab_id, &servers, options.render_delay);
                        }
                    }
                }
            }
        }
    }

    controller.shutdown();
    println!();
    info!("session ended");
    Ok(())
}
