//! Per-section validators.

use crate::schema::ServerfindConfig;

use super::helpers::{
    validate_color_field, validate_non_empty, validate_range, validate_selector_field,
};

pub(crate) fn validate_sidebar(errors: &mut Vec<String>, config: &ServerfindConfig) {
    let sidebar = &config.sidebar;
    validate_selector_field(errors, "sidebar.root_selector", &sidebar.root_selector);
    validate_selector_field(errors, "sidebar.item_selector", &sidebar.item_selector);
    validate_selector_field(errors, "sidebar.name_selector", &sidebar.name_selector);
    validate_non_empty(errors, "sidebar.name_attribute", &sidebar.name_attribute);
}

pub(crate) fn validate_highlight(errors: &mut Vec<String>, config: &ServerfindConfig) {
    let highlight = &config.highlight;
    validate_non_empty(errors, "highlight.marker_class", &highlight.marker_class);
    if highlight.marker_class.chars().any(char::is_whitespace) {
        errors.push("highlight.marker_class must be a single class name".into());
    }
    validate_color_field(errors, "highlight.default_color", &highlight.default_color);
    validate_color_field(errors, "highlight.background", &highlight.background);
    validate_range(
        errors,
        "highlight.outline_width_px",
        highlight.outline_width_px,
        1,
        8,
    );
}

pub(crate) fn validate_controller(errors: &mut Vec<String>, config: &ServerfindConfig) {
    let controller = &config.controller;
    validate_non_empty(errors, "controller.target_host", &controller.target_host);
    validate_range(
        errors,
        "controller.poll_interval_ms",
        controller.poll_interval_ms,
        100,
        60_000,
    );
    validate_range(
        errors,
        "controller.log_capacity",
        controller.log_capacity,
        1,
        50,
    );
}
