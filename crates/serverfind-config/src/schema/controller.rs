//! Control surface behaviour.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Host the active tab must be on for searches to make sense.
    pub target_host: String,
    /// Readiness poll period in milliseconds (valid range: 100-60000).
    pub poll_interval_ms: u32,
    /// Lines kept in the activity log (valid range: 1-50).
    pub log_capacity: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            target_host: "discord.com".into(),
            poll_interval_ms: 2000,
            log_capacity: 4,
        }
    }
}
