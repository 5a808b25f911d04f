use std::collections::BTreeMap;
use std::fmt;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::{ConfigurationRequest, FieldType};

pub const BASE_URL: &str = "base_url";
pub const API_KEY: &str = "api_key";
pub const API_SECRET: &str = "api_secret";
pub const CONNECTION_TIMEOUT: &str = "connection_timeout";
pub const READ_TIMEOUT: &str = "read_timeout";
pub const FROM: &str = "from";
pub const TO: &str = "to";
pub const TEXT: &str = "text";

/// Replacement shown for the API secret in [`Configuration::redacted`].
pub const MASK: &str = "****";

/// Flat key/value configuration handed over by the host.
///
/// The value is never mutated after construction; display code goes through
/// [`Configuration::redacted`], and so does `Debug` output.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration {
    source: BTreeMap<String, Value>,
}

impl Configuration {
    pub fn new(source: BTreeMap<String, Value>) -> Self {
        Self { source }
    }

    /// Build from `(key, value)` pairs, e.g. `[("to", "123".into())]`.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect()
    }

    pub fn source(&self) -> &BTreeMap<String, Value> {
        &self.source
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.source.get(key).and_then(Value::as_str)
    }

    /// True when `key` holds a non-empty string.
    pub fn string_is_set(&self, key: &str) -> bool {
        self.get_string(key).is_some_and(|s| !s.is_empty())
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.source.get(key).and_then(Value::as_i64)
    }

    /// True when `key` holds an integer.
    pub fn int_is_set(&self, key: &str) -> bool {
        self.get_int(key).is_some()
    }

    /// Every entry as stored, except the API secret which reads as [`MASK`].
    pub fn redacted(&self) -> BTreeMap<String, Value> {
        self.source
            .iter()
            .map(|(key, value)| {
                let value = if key == API_SECRET {
                    Value::String(MASK.to_string())
                } else {
                    value.clone()
                };
                (key.clone(), value)
            })
            .collect()
    }

    /// Load configuration from files and environment variables
    ///
    /// Sources, lowest precedence first: schema defaults, `config/nexmo.*`,
    /// `NEXMO__<FIELD>` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config/nexmo")
    }

    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let env = Environment::with_prefix("NEXMO").prefix_separator("__");
        Self::load_with(path, env)
    }

    fn load_with(path: &str, env: Environment) -> Result<Self, ConfigError> {
        let schema = ConfigurationRequest::nexmo();

        let mut builder = Config::builder();
        for field in schema.fields() {
            builder = match &field.default_value {
                Value::String(s) if !s.is_empty() => {
                    builder.set_default(field.name, s.as_str())?
                }
                Value::Number(n) => match n.as_i64() {
                    Some(n) => builder.set_default(field.name, n)?,
                    None => builder,
                },
                _ => builder,
            };
        }

        let raw: BTreeMap<String, Value> = builder
            .add_source(File::with_name(path).required(false))
            .add_source(env)
            .build()?
            .try_deserialize()?;

        Ok(Self::new(coerce(&schema, raw)))
    }
}

/// Environment variables always arrive as strings and file values may be
/// numbers where text is expected (phone numbers); bring both in line with
/// the declared field type.
fn coerce(
    schema: &ConfigurationRequest,
    raw: BTreeMap<String, Value>,
) -> BTreeMap<String, Value> {
    raw.into_iter()
        .map(|(key, value)| {
            let value = match (schema.field(&key).map(|f| f.field_type), value) {
                (Some(FieldType::Number), Value::String(s)) => match s.trim().parse::<i64>() {
                    Ok(n) => Value::from(n),
                    Err(_) => Value::String(s),
                },
                (Some(FieldType::Text), Value::Number(n)) => Value::String(n.to_string()),
                (_, value) => value,
            };
            (key, value)
        })
        .collect()
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("source", &self.redacted())
            .finish()
    }
}

impl FromIterator<(String, Value)> for Configuration {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level (default: info)
    pub level: String,
    /// Log format: json or pretty (default: json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
        }
    }
}
