use sms_core::SmsError;

use crate::dispatch::Delivery;

/// A configuration rule was violated. Always names exactly one field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ConfigurationError {
    field: String,
    message: String,
}

impl ConfigurationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The field is absent, empty, or of the wrong type.
    pub fn mandatory(field: &str) -> Self {
        Self::new(
            field,
            format!("{field} is mandatory and must not be null or empty."),
        )
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Setting up the transport client failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InitializeError {
    #[error("{field} is mandatory to create the SMS client")]
    MissingField { field: &'static str },
    #[error("{field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
    #[error("could not create SMS client: {0}")]
    Client(#[from] SmsError),
}

/// Sending the alert failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// No usable transport client; carries the reason when one is known.
    #[error("SMS client not initialized: {0}")]
    NotInitialized(String),
    #[error("{field} is not configured")]
    MissingField { field: &'static str },
    /// The gateway rejected one recipient. Everything in `delivered` was
    /// already accepted and stays sent.
    #[error("sending to {recipient} failed: {source}")]
    Transport {
        recipient: String,
        delivered: Vec<Delivery>,
        #[source]
        source: SmsError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(String),
    #[error("unknown log format {0:?}, expected json or pretty")]
    Format(String),
    #[error("a global subscriber is already installed: {0}")]
    AlreadyInstalled(String),
}
