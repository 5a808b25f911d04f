//! Declaration of the fields the callback asks the host to collect.

use serde::Serialize;
use serde_json::Value;

use crate::config::{
    API_KEY, API_SECRET, BASE_URL, CONNECTION_TIMEOUT, FROM, READ_TIMEOUT, TEXT, TO,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldAttribute {
    /// Input is masked in forms.
    IsPassword,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigurationField {
    pub name: &'static str,
    pub human_name: &'static str,
    pub default_value: Value,
    pub description: &'static str,
    pub optional: bool,
    pub field_type: FieldType,
    pub attributes: Vec<FieldAttribute>,
}

impl ConfigurationField {
    pub fn text(
        name: &'static str,
        human_name: &'static str,
        default_value: &str,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            human_name,
            default_value: Value::String(default_value.to_string()),
            description,
            optional: false,
            field_type: FieldType::Text,
            attributes: Vec::new(),
        }
    }

    pub fn number(
        name: &'static str,
        human_name: &'static str,
        default_value: i64,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            human_name,
            default_value: Value::from(default_value),
            description,
            optional: false,
            field_type: FieldType::Number,
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: FieldAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn is_password(&self) -> bool {
        self.attributes.contains(&FieldAttribute::IsPassword)
    }
}

/// Ordered set of fields, serializable for the host's configuration form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfigurationRequest {
    fields: Vec<ConfigurationField>,
}

impl ConfigurationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_field(&mut self, field: ConfigurationField) -> &mut Self {
        self.fields.push(field);
        self
    }

    pub fn fields(&self) -> &[ConfigurationField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&ConfigurationField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The eight mandatory fields of the Nexmo callback.
    pub fn nexmo() -> Self {
        let mut request = Self::new();
        request
            .add_field(ConfigurationField::text(
                BASE_URL,
                "Base URL",
                sms_nexmo::DEFAULT_BASE_URL,
                "The base url of the Nexmo API.",
            ))
            .add_field(ConfigurationField::text(API_KEY, "API Key", "", ""))
            .add_field(
                ConfigurationField::text(API_SECRET, "API Secret", "", "")
                    .with_attribute(FieldAttribute::IsPassword),
            )
            .add_field(ConfigurationField::number(
                CONNECTION_TIMEOUT,
                "Connection Timeout",
                5000,
                "The connection timeout in milliseconds.",
            ))
            .add_field(ConfigurationField::number(
                READ_TIMEOUT,
                "Read Timeout",
                30000,
                "The read timeout in milliseconds.",
            ))
            .add_field(ConfigurationField::text(FROM, "From", "Graylog", ""))
            .add_field(ConfigurationField::text(
                TO,
                "To",
                "",
                "The phone number(s) that should be texted. Can be a comma separated list.",
            ))
            .add_field(ConfigurationField::text(
                TEXT,
                "Text",
                "",
                "The text to send. Replacements: [source] will be replaced by the source field, \
                 [stream] will be replaced by the stream title.",
            ));
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn declares_all_fields_in_order() {
        let request = ConfigurationRequest::nexmo();
        let names: Vec<_> = request.fields().iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            [
                BASE_URL,
                API_KEY,
                API_SECRET,
                CONNECTION_TIMEOUT,
                READ_TIMEOUT,
                FROM,
                TO,
                TEXT,
            ]
        );
        assert!(request.fields().iter().all(|f| !f.optional));
    }

    #[test]
    fn defaults_match_gateway() {
        let request = ConfigurationRequest::nexmo();
        let default = |name: &str| request.field(name).unwrap().default_value.clone();
        assert_eq!(default(BASE_URL), json!("https://rest.nexmo.com"));
        assert_eq!(default(CONNECTION_TIMEOUT), json!(5000));
        assert_eq!(default(READ_TIMEOUT), json!(30000));
        assert_eq!(default(FROM), json!("Graylog"));
        assert_eq!(default(TO), json!(""));
    }

    #[test]
    fn only_secret_is_a_password() {
        let request = ConfigurationRequest::nexmo();
        let passwords: Vec<_> = request
            .fields()
            .iter()
            .filter(|f| f.is_password())
            .map(|f| f.name)
            .collect();
        assert_eq!(passwords, [API_SECRET]);
        assert_eq!(
            request.field(CONNECTION_TIMEOUT).unwrap().field_type,
            FieldType::Number
        );
    }

    #[test]
    fn serializes_for_forms() {
        let value = serde_json::to_value(ConfigurationRequest::nexmo()).unwrap();
        assert_eq!(value["fields"][2]["attributes"], json!(["is_password"]));
        assert_eq!(value["fields"][3]["field_type"], json!("number"));
    }
}
