//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod controller;
mod highlight;
mod sidebar;
mod system;

pub use controller::*;
pub use highlight::*;
pub use sidebar::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerfindConfig {
    pub sidebar: SidebarConfig,
    pub highlight: HighlightConfig,
    pub controller: ControllerConfig,
    pub logging: LoggingConfig,
}
