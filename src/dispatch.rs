//! Turning an alert into one text message per recipient.

use serde::{Deserialize, Serialize};
use sms_core::{SendRequest, SmsClient};
use tracing::{debug, error, info};

use crate::config::{Configuration, FROM, TEXT, TO};
use crate::error::DispatchError;
use crate::validation::recipients;

pub const SOURCE_PLACEHOLDER: &str = "[source]";
pub const STREAM_PLACEHOLDER: &str = "[stream]";

/// Summary of a message that matched the alert condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSummary {
    pub source: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl MessageSummary {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            id: None,
            message: None,
        }
    }
}

/// What the host knows about the alert being fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchContext {
    pub stream_title: String,
    #[serde(default)]
    pub matching_messages: Vec<MessageSummary>,
}

impl DispatchContext {
    pub fn new(stream_title: impl Into<String>) -> Self {
        Self {
            stream_title: stream_title.into(),
            matching_messages: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: MessageSummary) -> Self {
        self.matching_messages.push(message);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub from: String,
    pub to: String,
    pub body: String,
}

impl OutboundMessage {
    pub fn as_request(&self) -> SendRequest<'_> {
        SendRequest {
            to: &self.to,
            from: &self.from,
            text: &self.body,
        }
    }
}

/// A recipient the gateway accepted, with the gateway's message id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub recipient: String,
    pub message_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReport {
    pub body: String,
    pub delivered: Vec<Delivery>,
}

/// Fill in `[source]` (first matching message only) and `[stream]`.
///
/// Without matching messages `[source]` stays as written.
pub fn expand_template(template: &str, context: &DispatchContext) -> String {
    let text = match context.matching_messages.first() {
        Some(first) => template.replace(SOURCE_PLACEHOLDER, &first.source),
        None => template.to_string(),
    };
    text.replace(STREAM_PLACEHOLDER, &context.stream_title)
}

/// Sends the alert text to each configured recipient through one client.
pub struct MessageDispatcher<'a, C: SmsClient + ?Sized> {
    config: &'a Configuration,
    client: &'a C,
}

impl<'a, C: SmsClient + ?Sized> MessageDispatcher<'a, C> {
    pub fn new(config: &'a Configuration, client: &'a C) -> Self {
        Self { config, client }
    }

    fn field(&self, field: &'static str) -> Result<&'a str, DispatchError> {
        self.config
            .get_string(field)
            .ok_or(DispatchError::MissingField { field })
    }

    /// Submit to every recipient in order, stopping at the first failure.
    ///
    /// Recipients accepted before a failure are reported in the error and
    /// are not revoked.
    pub fn dispatch(&self, context: &DispatchContext) -> Result<DispatchReport, DispatchError> {
        let body = expand_template(self.field(TEXT)?, context);
        let from = self.field(FROM)?;
        let to = self.field(TO)?;

        info!(stream = %context.stream_title, "dispatching alert");

        let report = recipients(to).try_fold(
            DispatchReport {
                body: body.clone(),
                delivered: Vec::new(),
            },
            |mut report, recipient| {
                let message = OutboundMessage {
                    from: from.to_string(),
                    to: recipient.to_string(),
                    body: body.clone(),
                };
                match self.client.send(message.as_request()) {
                    Ok(response) => {
                        debug!(to = %message.to, id = %response.id, "message accepted");
                        report.delivered.push(Delivery {
                            recipient: message.to,
                            message_id: response.id,
                        });
                        Ok(report)
                    }
                    Err(source) => {
                        error!(
                            to = %message.to,
                            delivered = report.delivered.len(),
                            error = %source,
                            "message rejected, skipping remaining recipients"
                        );
                        Err(DispatchError::Transport {
                            recipient: message.to,
                            delivered: report.delivered,
                            source,
                        })
                    }
                }
            },
        )?;

        info!(
            stream = %context.stream_title,
            recipients = report.delivered.len(),
            "alert dispatched"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sms_core::{SendResponse, SmsError};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<OutboundMessage>>,
        fail_on: Option<usize>,
    }

    impl SmsClient for Recorder {
        fn send(&self, req: SendRequest<'_>) -> Result<SendResponse, SmsError> {
            let mut sent = self.sent.lock().unwrap();
            if self.fail_on == Some(sent.len()) {
                return Err(SmsError::Http("connection reset".into()));
            }
            sent.push(OutboundMessage {
                from: req.from.into(),
                to: req.to.into(),
                body: req.text.into(),
            });
            Ok(SendResponse {
                id: format!("id-{}", sent.len()),
                provider: "recorder",
                raw: serde_json::Value::Null,
            })
        }
    }

    fn config(to: &str, text: &str) -> Configuration {
        Configuration::from_pairs([
            (FROM, json!("test_from")),
            (TO, json!(to)),
            (TEXT, json!(text)),
        ])
    }

    #[test]
    fn expands_both_placeholders() {
        let ctx = DispatchContext::new("Stream title")
            .with_message(MessageSummary::new("test_source1"))
            .with_message(MessageSummary::new("test_source2"));
        assert_eq!(
            expand_template("Testing [stream] and [source]", &ctx),
            "Testing Stream title and test_source1"
        );
    }

    #[test]
    fn replaces_every_occurrence() {
        let ctx = DispatchContext::new("s").with_message(MessageSummary::new("h"));
        assert_eq!(
            expand_template("[source][stream][source] [stream]", &ctx),
            "hsh s"
        );
    }

    #[test]
    fn source_left_alone_without_matches() {
        let ctx = DispatchContext::new("Stream title");
        assert_eq!(
            expand_template("[source] in [stream]", &ctx),
            "[source] in Stream title"
        );
    }

    #[test]
    fn single_recipient_gets_plain_text() {
        let client = Recorder::default();
        let config = config("3654323423423", "Testing");
        let report = MessageDispatcher::new(&config, &client)
            .dispatch(&DispatchContext::new("Stream title"))
            .unwrap();

        let sent = client.sent.lock().unwrap();
        assert_eq!(
            *sent,
            [OutboundMessage {
                from: "test_from".into(),
                to: "3654323423423".into(),
                body: "Testing".into(),
            }]
        );
        assert_eq!(report.body, "Testing");
        assert_eq!(report.delivered[0].message_id, "id-1");
    }

    #[test]
    fn recipients_are_trimmed_and_ordered() {
        let client = Recorder::default();
        let config = config(" 3654323423423, 36542343 ,365432433", "Testing");
        MessageDispatcher::new(&config, &client)
            .dispatch(&DispatchContext::new("t"))
            .unwrap();

        let sent = client.sent.lock().unwrap();
        let to: Vec<_> = sent.iter().map(|m| m.to.as_str()).collect();
        assert_eq!(to, ["3654323423423", "36542343", "365432433"]);
    }

    #[test]
    fn failure_stops_remaining_sends() {
        let client = Recorder {
            fail_on: Some(1),
            ..Default::default()
        };
        let config = config("1,2,3", "Testing");
        let err = MessageDispatcher::new(&config, &client)
            .dispatch(&DispatchContext::new("t"))
            .unwrap_err();

        match err {
            DispatchError::Transport {
                recipient,
                delivered,
                source,
            } => {
                assert_eq!(recipient, "2");
                assert_eq!(delivered.len(), 1);
                assert_eq!(delivered[0].recipient, "1");
                assert_eq!(source, SmsError::Http("connection reset".into()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(client.sent.lock().unwrap().len(), 1);
    }

    #[test]
    fn missing_template_is_reported() {
        let client = Recorder::default();
        let config = Configuration::from_pairs([(FROM, "f"), (TO, "1")]);
        let err = MessageDispatcher::new(&config, &client)
            .dispatch(&DispatchContext::new("t"))
            .unwrap_err();
        assert_eq!(err, DispatchError::MissingField { field: TEXT });
        assert!(client.sent.lock().unwrap().is_empty());
    }
}
