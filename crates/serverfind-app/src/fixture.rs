//! Sidebar fixtures: the server names a simulated page renders.

use std::path::Path;

use serde::Deserialize;
use serverfind_common::ConfigError;
use serverfind_config::schema::SidebarConfig;
use serverfind_matcher::document::render_server_list;
use serverfind_matcher::MemoryDocument;

const SAMPLE_SERVERS: &[&str] = &[
    "General Chat",
    "Gaming Lounge",
    "Music",
    "art-talk",
    "",
    "Rust Programming",
    "Book Club",
    "Lo-fi Study Room",
];

/// Server names in sidebar order. An empty name is an entry without a
/// name element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Fixture {
    pub servers: Vec<String>,
}

impl Fixture {
    pub fn sample() -> Self {
        Self {
            servers: SAMPLE_SERVERS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound(path.to_path_buf())
            } else {
                ConfigError::ParseError(format!("failed to read {}: {e}", path.display()))
            }
        })?;
        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("invalid fixture {}: {e}", path.display())))
    }

    /// The fixture at `path`, or the built-in sample.
    pub fn load_or_sample(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::sample()),
        }
    }

    /// A page with the server list already rendered.
    pub fn render(&self, sidebar: &SidebarConfig) -> Result<MemoryDocument, ConfigError> {
        let mut doc = MemoryDocument::new(sidebar)?;
        render_server_list(&mut doc, self.servers.as_slice());
        Ok(doc)
    }
}
