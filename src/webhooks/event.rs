use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::errors::WebhookError;

/// Event tags Laneful currently emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WebhookEventType {
    EmailSent,
    EmailDelivered,
    EmailOpened,
    EmailClicked,
    EmailBounced,
    EmailComplained,
    EmailUnsubscribed,
    EmailFailed,
}

impl WebhookEventType {
    pub const ALL: [WebhookEventType; 8] = [
        WebhookEventType::EmailSent,
        WebhookEventType::EmailDelivered,
        WebhookEventType::EmailOpened,
        WebhookEventType::EmailClicked,
        WebhookEventType::EmailBounced,
        WebhookEventType::EmailComplained,
        WebhookEventType::EmailUnsubscribed,
        WebhookEventType::EmailFailed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WebhookEventType::EmailSent => "email.sent",
            WebhookEventType::EmailDelivered => "email.delivered",
            WebhookEventType::EmailOpened => "email.opened",
            WebhookEventType::EmailClicked => "email.clicked",
            WebhookEventType::EmailBounced => "email.bounced",
            WebhookEventType::EmailComplained => "email.complained",
            WebhookEventType::EmailUnsubscribed => "email.unsubscribed",
            WebhookEventType::EmailFailed => "email.failed",
        }
    }
}

impl fmt::Display for WebhookEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WebhookEventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WebhookEventType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown webhook event type: {s}"))
    }
}

impl From<WebhookEventType> for String {
    fn from(kind: WebhookEventType) -> Self {
        kind.as_str().to_string()
    }
}

/// Raw webhook input: either undecoded body bytes or an already-decoded JSON value.
#[derive(Debug, Clone, Copy)]
pub enum WebhookPayload<'a> {
    Raw(&'a [u8]),
    Json(&'a Value),
}

impl<'a> From<&'a str> for WebhookPayload<'a> {
    fn from(body: &'a str) -> Self {
        WebhookPayload::Raw(body.as_bytes())
    }
}

impl<'a> From<&'a String> for WebhookPayload<'a> {
    fn from(body: &'a String) -> Self {
        WebhookPayload::Raw(body.as_bytes())
    }
}

impl<'a> From<&'a [u8]> for WebhookPayload<'a> {
    fn from(body: &'a [u8]) -> Self {
        WebhookPayload::Raw(body)
    }
}

impl<'a> From<&'a Vec<u8>> for WebhookPayload<'a> {
    fn from(body: &'a Vec<u8>) -> Self {
        WebhookPayload::Raw(body.as_slice())
    }
}

impl<'a> From<&'a Value> for WebhookPayload<'a> {
    fn from(value: &'a Value) -> Self {
        WebhookPayload::Json(value)
    }
}

/// One decoded webhook notification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub event_type: String,
    pub message_id: String,
    pub email: String,
    pub timestamp: i64,
    pub data: Map<String, Value>,
}

impl WebhookEvent {
    /// Decodes a webhook payload.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::InvalidPayload`] when a raw payload is not valid
    /// JSON. Already-decoded values never fail.
    pub fn parse<'a>(payload: impl Into<WebhookPayload<'a>>) -> Result<Self, WebhookError> {
        match payload.into() {
            WebhookPayload::Raw(body) => {
                let value: Value = serde_json::from_slice(body)
                    .map_err(|e| WebhookError::InvalidPayload(e.to_string()))?;
                Ok(Self::from_value(&value))
            }
            WebhookPayload::Json(value) => Ok(Self::from_value(value)),
        }
    }

    /// Builds an event from a decoded structure. Missing or mistyped fields
    /// fall back to empty strings, zero and an empty map.
    ///
    /// A non-string `event_type` therefore becomes `""`, and dispatch sends
    /// such events to a callback registered for `""` if there is one.
    /// Fractional timestamps are truncated toward zero; out-of-range values
    /// saturate.
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Self {
            event_type: text("event_type"),
            message_id: text("message_id"),
            email: text("email"),
            timestamp: value
                .get("timestamp")
                .and_then(|t| t.as_i64().or_else(|| t.as_f64().map(|f| f as i64)))
                .unwrap_or_default(),
            data: value
                .get("data")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
        }
    }

    /// The event tag as a known variant, if Laneful documents it.
    pub fn kind(&self) -> Option<WebhookEventType> {
        self.event_type.parse().ok()
    }

    /// `timestamp` as a UTC instant. `None` when unset.
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        if self.timestamp == 0 {
            return None;
        }
        DateTime::from_timestamp(self.timestamp, 0)
    }

    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}
