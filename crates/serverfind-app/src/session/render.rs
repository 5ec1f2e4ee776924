//! Text rendering of the control surface.

use std::fmt::Write;

use serverfind_common::{ActivityLog, LogLevel};
use serverfind_controller::{Indicator, PopupView};

pub fn render(view: &PopupView, log: &ActivityLog) -> String {
    let mut out = String::new();

    let indicator = match view.indicator {
        Indicator::Ready => "ready",
        Indicator::Pending => "waiting",
    };
    let _ = writeln!(out, "[{indicator}] {}", view.page_status);
    if view.reload_visible {
        let _ = writeln!(out, "(reload available: type `reload`)");
    }
    let _ = writeln!(
        out,
        "query: {:?}  color: {}  auto-scroll: {}  advanced: {}",
        view.query,
        view.color,
        on_off(view.auto_scroll),
        on_off(view.advanced),
    );
    if !view.result_text.is_empty() {
        let next = if view.next_enabled { "enabled" } else { "disabled" };
        let _ = writeln!(out, "{}  (next: {next})", view.result_text);
    }

    for (i, entry) in log.entries().enumerate() {
        let marker = if log.is_latest(i) { ">" } else { " " };
        let tag = match entry.level {
            LogLevel::Error => " !",
            LogLevel::Feature => " *",
            LogLevel::Info => "",
        };
        let _ = writeln!(out, "{marker}{tag} {}", entry.render());
    }

    out.trim_end().to_string()
}

fn on_off(v: bool) -> &'static str {
    if v {
        "on"
    } else {
        "off"
    }
}
