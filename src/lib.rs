//! # Nexmo Alarm Callback
//!
//! Sends an SMS through Nexmo to one or more recipients when an alert fires.
//!
//! ## Features
//!
//! - **Validation**: ordered configuration rules, first violation reported
//! - **Templating**: `[source]` and `[stream]` placeholders in the text
//! - **Multi-recipient**: comma-separated `to`, sent in order, stops at the first failure
//! - **Masked display**: the API secret never leaves through [`AlarmCallback::attributes`]
//! - **Observability**: structured logging through `tracing`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use nexmo_alarm_callback::prelude::*;
//!
//! let mut callback = NexmoAlarmCallback::new();
//! callback.initialize(Configuration::load()?)?;
//! callback.check_configuration()?;
//!
//! let context = DispatchContext::new("Production errors")
//!     .with_message(MessageSummary::new("web-01"));
//! let report = callback.call(&context)?;
//! println!("delivered to {} recipients", report.delivered.len());
//! ```

pub mod callback;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod schema;
pub mod validation;

pub use callback::{AlarmCallback, NexmoAlarmCallback};
pub use config::{Configuration, LoggingConfig};
pub use dispatch::{DispatchContext, DispatchReport, MessageDispatcher, MessageSummary};
pub use error::{ConfigurationError, DispatchError, InitializeError};

/// Common imports for callback usage
pub mod prelude {
    pub use crate::callback::{AlarmCallback, NexmoAlarmCallback};
    pub use crate::config::{Configuration, LoggingConfig};
    pub use crate::dispatch::{
        Delivery, DispatchContext, DispatchReport, MessageDispatcher, MessageSummary,
        OutboundMessage,
    };
    pub use crate::error::{ConfigurationError, DispatchError, InitializeError, LoggingError};
    pub use crate::metadata::PluginMetadata;
    pub use crate::schema::ConfigurationRequest;
    pub use sms_core::*;
}
