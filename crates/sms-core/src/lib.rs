//! # SMS Core
//!
//! Core types for submitting text messages to an SMS gateway.
//!
//! This crate provides the building blocks shared by the alarm callback and
//! its transport:
//! - [`SmsClient`] trait for sending SMS messages
//! - [`SendRequest`] / [`SendResponse`] for one submission
//! - [`SmsError`] for everything a gateway can fail with
//!
//! ## Example
//!
//! ```rust,ignore
//! use sms_core::{SendRequest, SmsClient};
//!
//! // Any SMS gateway implements SmsClient
//! let response = client.send(SendRequest {
//!     to: "+1234567890",
//!     from: "Graylog",
//!     text: "Hello world!"
//! })?;
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during SMS operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SmsError {
    /// HTTP communication error
    #[error("http error: {0}")]
    Http(String),
    /// Authentication/authorization error
    #[error("authentication error: {0}")]
    Auth(String),
    /// Invalid request parameters
    #[error("invalid request: {0}")]
    Invalid(String),
    /// SMS provider returned an error
    #[error("provider error: {0}")]
    Provider(String),
    /// Unexpected error occurred
    #[error("unexpected: {0}")]
    Unexpected(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRequest<'a> {
    pub to: &'a str,
    pub from: &'a str,
    pub text: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendResponse {
    pub id: String,
    /// Name of the gateway that produced the response, e.g. "nexmo".
    pub provider: &'static str,
    /// Raw provider payload for debugging / audit.
    pub raw: serde_json::Value,
}

/// A gateway able to submit one text message at a time.
///
/// `send` blocks until the gateway has accepted or rejected the message.
pub trait SmsClient: Send + Sync {
    /// Send a single text SMS.
    fn send(&self, req: SendRequest<'_>) -> Result<SendResponse, SmsError>;
}

impl<T: SmsClient + ?Sized> SmsClient for std::sync::Arc<T> {
    fn send(&self, req: SendRequest<'_>) -> Result<SendResponse, SmsError> {
        (**self).send(req)
    }
}

impl<T: SmsClient + ?Sized> SmsClient for Box<T> {
    fn send(&self, req: SendRequest<'_>) -> Result<SendResponse, SmsError> {
        (**self).send(req)
    }
}

/// Utility to create a pseudo id if a provider doesn't return one.
pub fn fallback_id() -> String {
    Uuid::new_v4().to_string()
}
