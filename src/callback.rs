//! The contract a host alerting system drives, and its Nexmo implementation.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use sms_core::SmsClient;
use sms_nexmo::NexmoClient;
use tracing::{error, info};

use crate::config::{API_KEY, API_SECRET, BASE_URL, CONNECTION_TIMEOUT, Configuration, READ_TIMEOUT};
use crate::dispatch::{DispatchContext, DispatchReport, MessageDispatcher};
use crate::error::{ConfigurationError, DispatchError, InitializeError};
use crate::schema::ConfigurationRequest;
use crate::validation;

pub const NAME: &str = "Nexmo Alarm Callback";

/// Hooks a host calls on an alert callback.
pub trait AlarmCallback: Send + Sync {
    /// Store the configuration and prepare the transport.
    fn initialize(&mut self, config: Configuration) -> Result<(), InitializeError>;

    fn check_configuration(&self) -> Result<(), ConfigurationError>;

    /// Notify about a fired alert.
    fn call(&self, context: &DispatchContext) -> Result<DispatchReport, DispatchError>;

    /// Configuration for display; secrets are masked.
    fn attributes(&self) -> BTreeMap<String, Value>;

    fn requested_configuration(&self) -> ConfigurationRequest;

    fn name(&self) -> &'static str;
}

enum ClientState {
    Uninitialized,
    Ready(Arc<dyn SmsClient>),
    Failed(InitializeError),
}

/// Sends alerts as SMS through Nexmo.
pub struct NexmoAlarmCallback {
    configuration: Option<Configuration>,
    client: ClientState,
}

impl Default for NexmoAlarmCallback {
    fn default() -> Self {
        Self::new()
    }
}

impl NexmoAlarmCallback {
    pub fn new() -> Self {
        Self {
            configuration: None,
            client: ClientState::Uninitialized,
        }
    }

    /// Replace the transport, e.g. with a gateway double in tests.
    pub fn set_client(&mut self, client: Arc<dyn SmsClient>) {
        self.client = ClientState::Ready(client);
    }

    pub fn configuration(&self) -> Option<&Configuration> {
        self.configuration.as_ref()
    }

    pub fn has_client(&self) -> bool {
        matches!(self.client, ClientState::Ready(_))
    }
}

fn timeout(config: &Configuration, field: &'static str) -> Result<Duration, InitializeError> {
    let millis = config
        .get_int(field)
        .ok_or(InitializeError::MissingField { field })?;
    let millis = u64::try_from(millis).map_err(|_| InitializeError::InvalidField {
        field,
        message: format!("must not be negative, got {millis}"),
    })?;
    Ok(Duration::from_millis(millis))
}

fn text(config: &Configuration, field: &'static str) -> Result<String, InitializeError> {
    config
        .get_string(field)
        .map(str::to_string)
        .ok_or(InitializeError::MissingField { field })
}

/// Build the Nexmo client from the connection fields of `config`.
pub fn build_client(config: &Configuration) -> Result<NexmoClient, InitializeError> {
    let client = NexmoClient::builder(
        text(config, BASE_URL)?,
        text(config, API_KEY)?,
        text(config, API_SECRET)?,
    )
    .connection_timeout(timeout(config, CONNECTION_TIMEOUT)?)
    .read_timeout(timeout(config, READ_TIMEOUT)?)
    .build()?;
    Ok(client)
}

impl AlarmCallback for NexmoAlarmCallback {
    /// The configuration is kept even when the client cannot be built, so
    /// `check_configuration` can still explain what is wrong.
    fn initialize(&mut self, config: Configuration) -> Result<(), InitializeError> {
        let built = build_client(&config);
        self.configuration = Some(config);
        match built {
            Ok(client) => {
                info!(base_url = client.base_url(), "nexmo client ready");
                self.client = ClientState::Ready(Arc::new(client));
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "could not create nexmo client");
                self.client = ClientState::Failed(err.clone());
                Err(err)
            }
        }
    }

    fn check_configuration(&self) -> Result<(), ConfigurationError> {
        let config = self.configuration.as_ref().ok_or_else(|| {
            ConfigurationError::new("configuration", "callback has not been initialized.")
        })?;
        validation::validate(config)
    }

    fn call(&self, context: &DispatchContext) -> Result<DispatchReport, DispatchError> {
        let client = match &self.client {
            ClientState::Ready(client) => client,
            ClientState::Failed(err) => return Err(DispatchError::NotInitialized(err.to_string())),
            ClientState::Uninitialized => {
                return Err(DispatchError::NotInitialized(
                    "initialize was never called".to_string(),
                ));
            }
        };
        let config = self.configuration.as_ref().ok_or_else(|| {
            DispatchError::NotInitialized("no configuration stored".to_string())
        })?;
        MessageDispatcher::new(config, client.as_ref()).dispatch(context)
    }

    fn attributes(&self) -> BTreeMap<String, Value> {
        self.configuration
            .as_ref()
            .map(Configuration::redacted)
            .unwrap_or_default()
    }

    fn requested_configuration(&self) -> ConfigurationRequest {
        ConfigurationRequest::nexmo()
    }

    fn name(&self) -> &'static str {
        NAME
    }
}
