use crate::utils::error::{ForwarderError, Result};
use tracing::level_filters::LevelFilter;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ForwarderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty".to_string(),
        });
    }
    Ok(())
}

/// Entry point names are plain identifiers, never filesystem paths.
pub fn validate_application_name(field_name: &str, name: &str) -> Result<()> {
    validate_non_empty_string(field_name, name)?;

    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(ForwarderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: format!(
                "Unexpected character '{}'; use letters, digits, '-', '_' or '.'",
                c
            ),
        });
    }

    Ok(())
}

pub fn validate_log_level(field_name: &str, level: &str) -> Result<()> {
    level
        .parse::<LevelFilter>()
        .map(|_| ())
        .map_err(|_| ForwarderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: level.to_string(),
            reason: "Expected one of: off, error, warn, info, debug, trace".to_string(),
        })
}
