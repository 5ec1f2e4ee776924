//! Default TOML config template with inline documentation comments.

pub(crate) fn default_config_toml() -> &'static str {
    r##"# serverfind configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[sidebar]
# Structural selectors for the chat client's server list. Update these when
# the client changes its markup.
# root_selector = "div[aria-label=\"Servers\"]"
# item_selector = "div.listItem__650eb"
# name_selector = "div > div[data-dnd-name]"
# name_attribute = "data-dnd-name"

[highlight]
# marker_class = "discord-search-highlight"
# default_color = "#9ef01a"
# outline_width_px = 2           # 1-8
# border_radius = "0.5rem"
# background = "rgba(158, 240, 26, 0.2)"

[controller]
# target_host = "discord.com"
# poll_interval_ms = 2000        # 100-60000
# log_capacity = 4               # 1-50

[logging]
# level = "info"                 # trace, debug, info, warn, error
"##
}
