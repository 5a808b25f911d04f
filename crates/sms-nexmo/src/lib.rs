//! # Nexmo SMS Provider
//!
//! Blocking client for the Nexmo (Vonage) SMS REST API.
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use sms_core::{SendRequest, SmsClient};
//! use sms_nexmo::NexmoClient;
//!
//! let client = NexmoClient::builder("https://rest.nexmo.com", "key", "secret")
//!     .connection_timeout(Duration::from_millis(5000))
//!     .read_timeout(Duration::from_millis(30000))
//!     .build()?;
//! client.send(SendRequest { to: "447700900000", from: "Graylog", text: "hi" })?;
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sms_core::{SendRequest, SendResponse, SmsClient, SmsError};
use tracing::{debug, error};

const PROVIDER: &str = "nexmo";

pub const DEFAULT_BASE_URL: &str = "https://rest.nexmo.com";
pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_millis(5000);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(30000);

/// Nexmo REST client.
#[derive(Clone)]
pub struct NexmoClient {
    api_key: String,
    api_secret: String,
    /// API base URL; override for testing/mocking.
    base_url: String,
    http: reqwest::blocking::Client,
}

impl fmt::Debug for NexmoClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NexmoClient")
            .field("api_key", &self.api_key)
            .field("api_secret", &"****")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Builder for [`NexmoClient`]. Proxies and custom TLS settings are never
/// applied.
#[derive(Debug, Clone)]
pub struct NexmoClientBuilder {
    base_url: String,
    api_key: String,
    api_secret: String,
    connection_timeout: Duration,
    read_timeout: Duration,
}

impl NexmoClientBuilder {
    /// Timeout for establishing the TCP/TLS connection.
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Timeout for a whole request, from send until the body is read.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn build(self) -> Result<NexmoClient, SmsError> {
        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| SmsError::Invalid(format!("base url {:?}: {}", self.base_url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(SmsError::Invalid(format!(
                "base url {:?} cannot be used as a base",
                self.base_url
            )));
        }
        if self.api_key.is_empty() || self.api_secret.is_empty() {
            return Err(SmsError::Auth("api key and secret are required".into()));
        }

        let http = reqwest::blocking::Client::builder()
            .connect_timeout(self.connection_timeout)
            .timeout(self.read_timeout)
            .no_proxy()
            .build()
            .map_err(|e| SmsError::Http(e.to_string()))?;

        Ok(NexmoClient {
            api_key: self.api_key,
            api_secret: self.api_secret,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }
}

impl NexmoClient {
    pub fn builder(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> NexmoClientBuilder {
        NexmoClientBuilder {
            base_url: base_url.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    /// Client against the public endpoint with default timeouts.
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Result<Self, SmsError> {
        Self::builder(DEFAULT_BASE_URL, api_key, api_secret).build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

#[derive(Debug, Serialize)]
struct NexmoSendRequest<'a> {
    api_key: &'a str,
    api_secret: &'a str,
    from: &'a str,
    to: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize, Serialize)]
struct NexmoSendResponse {
    #[serde(rename = "message-count")]
    message_count: String,
    messages: Vec<NexmoMessageStatus>,
}

#[derive(Debug, Deserialize, Serialize)]
struct NexmoMessageStatus {
    to: Option<String>,
    #[serde(rename = "message-id")]
    message_id: Option<String>,
    status: String,
    #[serde(rename = "error-text")]
    error_text: Option<String>,
}

impl NexmoMessageStatus {
    fn into_error(self) -> SmsError {
        let detail = format!(
            "status {}: {}",
            self.status,
            self.error_text.as_deref().unwrap_or("no error text")
        );
        match self.status.as_str() {
            // Missing or invalid parameters
            "2" | "3" => SmsError::Invalid(detail),
            // Invalid credentials, account barred
            "4" | "8" => SmsError::Auth(detail),
            _ => SmsError::Provider(detail),
        }
    }
}

impl SmsClient for NexmoClient {
    fn send(&self, req: SendRequest<'_>) -> Result<SendResponse, SmsError> {
        let url = format!("{}/sms/json", self.base_url);
        let payload = NexmoSendRequest {
            api_key: &self.api_key,
            api_secret: &self.api_secret,
            from: req.from,
            to: req.to,
            text: req.text,
        };
        debug!(to = req.to, "submitting message to nexmo");

        let res = self
            .http
            .post(url)
            .form(&payload)
            .send()
            .map_err(|e| {
                error!(to = req.to, error = %e, "nexmo request failed");
                SmsError::Http(e.to_string())
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().unwrap_or_default();
            error!(%status, "nexmo rejected request");
            return Err(SmsError::Provider(format!("HTTP {}: {}", status, body)));
        }

        let raw_json: serde_json::Value = res
            .json()
            .map_err(|e| SmsError::Unexpected(format!("response is not JSON: {}", e)))?;
        let parsed: NexmoSendResponse = serde_json::from_value(raw_json.clone())
            .map_err(|e| SmsError::Unexpected(format!("unrecognised response: {}", e)))?;

        // A long text is split into several parts; any failed part fails the send.
        let mut id = None;
        for part in parsed.messages {
            if part.status != "0" {
                let err = part.into_error();
                error!(to = req.to, error = %err, "nexmo did not accept message");
                return Err(err);
            }
            if id.is_none() {
                id = part.message_id;
            }
        }

        debug!(to = req.to, parts = %parsed.message_count, "nexmo accepted message");
        Ok(SendResponse {
            id: id.unwrap_or_else(sms_core::fallback_id),
            provider: PROVIDER,
            raw: raw_json,
        })
    }
}
