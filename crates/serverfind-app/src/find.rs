//! `serverfind find`: one search over a fixture, printed.

use serde::Serialize;
use serverfind_common::Result;
use serverfind_config::{SelectorTree, ServerfindConfig};
use serverfind_matcher::{
    HighlightStyle, Highlighter, MatchMode, MemoryDocument, NodeId, SearchParams,
};

use crate::fixture::Fixture;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct FindReport {
    pub query: String,
    pub mode: MatchMode,
    pub count: usize,
    pub matches: Vec<String>,
}

/// Search `fixture` for `query` with the configured selectors and style.
pub fn find(
    config: &ServerfindConfig,
    fixture: &Fixture,
    query: &str,
    advanced: bool,
) -> Result<FindReport> {
    let document = fixture.render(&config.sidebar)?;
    let mut highlighter = Highlighter::new(document, HighlightStyle::from(&config.highlight));
    let mode = MatchMode::from_advanced(advanced);

    let count = highlighter.search(&SearchParams {
        query: query.to_string(),
        color: config.highlight.default_color.clone(),
        auto_scroll: false,
        mode,
    });
    let matches = matched_names(
        highlighter.document(),
        highlighter.matches().items(),
        &config.sidebar.name_attribute,
    );

    Ok(FindReport {
        query: query.to_string(),
        mode,
        count,
        matches,
    })
}

fn matched_names(doc: &MemoryDocument, nodes: &[NodeId], attribute: &str) -> Vec<String> {
    nodes
        .iter()
        .filter_map(|node| doc.attribute(*node, attribute).map(String::from))
        .collect()
}

impl FindReport {
    pub fn render_text(&self) -> String {
        let mut out = format!("{} server(s) found", self.count);
        for name in &self.matches {
            out.push_str("\n  ");
            out.push_str(name);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Fixture {
        Fixture {
            servers: ["General Chat", "Gaming Lounge", "Music", "art-talk"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    #[test]
    fn normal_and_advanced_counts() {
        let config = ServerfindConfig::default();
        let normal = find(&config, &fixture(), "ga", false).unwrap();
        assert_eq!(normal.count, 1);
        assert_eq!(normal.matches, vec!["Gaming Lounge"]);

        let advanced = find(&config, &fixture(), "ga", true).unwrap();
        assert_eq!(advanced.count, 2);
        assert_eq!(advanced.matches, vec!["General Chat", "Gaming Lounge"]);
    }

    #[test]
    fn text_output_lists_names() {
        let report = find(&ServerfindConfig::default(), &fixture(), "music", false).unwrap();
        assert_eq!(report.render_text(), "1 server(s) found\n  Music");
    }

    #[test]
    fn report_serializes_mode_lowercase() {
        let report = find(&ServerfindConfig::default(), &fixture(), "zzz", true).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["mode"], "letters");
        assert_eq!(json["count"], 0);
    }

    #[test]
    fn bad_selector_config_is_an_error() {
        let mut config = ServerfindConfig::default();
        config.sidebar.item_selector = "div[".into();
        assert!(find(&config, &fixture(), "a", false).is_err());
    }
}
