//! Full configuration validation.
//!
//! Each section has its own validator; this orchestrator runs them all and
//! collects every problem into a single `ConfigError`.

mod helpers;
mod sections;


use crate::schema::ServerfindConfig;
use serverfind_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ServerfindConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    sections::validate_sidebar(&mut errors, config);
    sections::validate_highlight(&mut errors, config);
    sections::validate_controller(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
