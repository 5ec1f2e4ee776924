//! Shared validation helpers.

use crate::colors::validate_color;
use crate::selector::parse_selector;

/// Push an error if `value` is outside `[min, max]`.
pub(crate) fn validate_range(errors: &mut Vec<String>, name: &str, value: u32, min: u32, max: u32) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

/// Push an error if `value` is not a recognized color.
pub(crate) fn validate_color_field(errors: &mut Vec<String>, name: &str, value: &str) {
    if !validate_color(value) {
        errors.push(format!("{name} = {value:?} is not a valid color"));
    }
}

/// Push an error if `value` does not parse as a selector.
pub(crate) fn validate_selector_field(errors: &mut Vec<String>, name: &str, value: &str) {
    if let Err(e) = parse_selector(value) {
        errors.push(format!("{name}: {e}"));
    }
}

/// Push an error if `value` is empty or whitespace.
pub(crate) fn validate_non_empty(errors: &mut Vec<String>, name: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(format!("{name} must not be empty"));
    }
}
