//! Rules a configuration must satisfy before the callback may run.
//!
//! Rules are checked in a fixed order and only the first violation is
//! reported.

use crate::config::{
    API_KEY, API_SECRET, BASE_URL, CONNECTION_TIMEOUT, Configuration, FROM, READ_TIMEOUT, TEXT, TO,
};
use crate::error::ConfigurationError;

pub const REQUIRED_SCHEME: &str = "https://";

pub fn validate(config: &Configuration) -> Result<(), ConfigurationError> {
    require_string(config, BASE_URL)?;
    if !config
        .get_string(BASE_URL)
        .is_some_and(|url| url.starts_with(REQUIRED_SCHEME))
    {
        return Err(ConfigurationError::new(
            BASE_URL,
            format!("{BASE_URL} should start with {REQUIRED_SCHEME}."),
        ));
    }
    require_string(config, API_KEY)?;
    require_string(config, API_SECRET)?;
    require_int(config, CONNECTION_TIMEOUT)?;
    require_int(config, READ_TIMEOUT)?;
    require_string(config, FROM)?;
    require_string(config, TO)?;
    if config
        .get_string(TO)
        .is_some_and(|to| recipients(to).any(str::is_empty))
    {
        return Err(ConfigurationError::new(
            TO,
            format!("{TO}: cannot submit empty phone number."),
        ));
    }
    require_string(config, TEXT)?;
    Ok(())
}

/// Recipient tokens of a `to` value, in order, trimmed.
pub fn recipients(to: &str) -> impl Iterator<Item = &str> {
    to.split(',').map(str::trim)
}

fn require_string(config: &Configuration, field: &str) -> Result<(), ConfigurationError> {
    if config.string_is_set(field) {
        Ok(())
    } else {
        Err(ConfigurationError::mandatory(field))
    }
}

fn require_int(config: &Configuration, field: &str) -> Result<(), ConfigurationError> {
    if config.int_is_set(field) {
        Ok(())
    } else {
        Err(ConfigurationError::mandatory(field))
    }
}
