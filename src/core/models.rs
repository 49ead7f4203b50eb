use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

use crate::errors::LanefulError;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static regex compile"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Address {
    /// # Errors
    ///
    /// Returns [`LanefulError::Validation`] if `email` is not an address.
    pub fn new(email: impl Into<String>) -> Result<Self, LanefulError> {
        let email = email.into();
        if !EMAIL_RE.is_match(&email) {
            return Err(LanefulError::Validation(format!(
                "Invalid email address: '{email}'"
            )));
        }
        Ok(Self { email, name: None })
    }

    /// # Errors
    ///
    /// Returns [`LanefulError::Validation`] if `email` is not an address.
    pub fn with_name(email: impl Into<String>, name: impl Into<String>) -> Result<Self, LanefulError> {
        let mut address = Self::new(email)?;
        address.name = Some(name.into());
        Ok(address)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub file_name: String,
    /// Base64-encoded file content.
    pub content: String,
    pub content_type: String,
}

impl Attachment {
    /// Encodes `bytes`; the content type is guessed from `file_name` when not given.
    pub fn from_bytes(file_name: impl Into<String>, bytes: &[u8], content_type: Option<&str>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type.map_or_else(
            || {
                mime_guess::from_path(&file_name)
                    .first_or_octet_stream()
                    .essence_str()
                    .to_string()
            },
            ToString::to_string,
        );

        Self {
            content: STANDARD.encode(bytes),
            file_name,
            content_type,
        }
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LanefulError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                LanefulError::Validation(format!("Attachment path has no file name: {}", path.display()))
            })?;
        Ok(Self::from_bytes(file_name, &bytes, None))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingSettings {
    pub opens: bool,
    pub clicks: bool,
    pub unsubscribes: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Email {
    pub from: Address,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<Address>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<Address>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<Address>,
    /// Unix seconds at which the provider should send the message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_data: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking: Option<TrackingSettings>,
}

impl Email {
    pub fn builder(from: Address) -> EmailBuilder {
        EmailBuilder::new(from)
    }

    /// Checks that the email has a recipient and some content.
    ///
    /// # Errors
    ///
    /// Returns [`LanefulError::Validation`] describing the first problem found.
    pub fn validate(&self) -> Result<(), LanefulError> {
        if self.to.is_empty() && self.cc.is_empty() && self.bcc.is_empty() {
            return Err(LanefulError::Validation(
                "Email must have at least one recipient".into(),
            ));
        }

        let has_content = self.text_content.as_deref().is_some_and(|s| !s.is_empty())
            || self.html_content.as_deref().is_some_and(|s| !s.is_empty())
            || self.template_id.as_deref().is_some_and(|s| !s.is_empty());
        if !has_content {
            return Err(LanefulError::Validation(
                "Email must have text content, HTML content, or a template".into(),
            ));
        }

        Ok(())
    }
}

/// Builds and validates an [`Email`].
#[derive(Debug, Clone)]
pub struct EmailBuilder {
    email: Email,
}

impl EmailBuilder {
    pub fn new(from: Address) -> Self {
        Self {
            email: Email {
                from,
                to: Vec::new(),
                cc: Vec::new(),
                bcc: Vec::new(),
                subject: None,
                text_content: None,
                html_content: None,
                template_id: None,
                template_data: None,
                attachments: Vec::new(),
                headers: BTreeMap::new(),
                reply_to: None,
                send_time: None,
                webhook_data: None,
                tag: None,
                tracking: None,
            },
        }
    }

    #[must_use]
    pub fn to(mut self, address: Address) -> Self {
        self.email.to.push(address);
        self
    }

    #[must_use]
    pub fn cc(mut self, address: Address) -> Self {
        self.email.cc.push(address);
        self
    }

    #[must_use]
    pub fn bcc(mut self, address: Address) -> Self {
        self.email.bcc.push(address);
        self
    }

    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.email.subject = Some(subject.into());
        self
    }

    #[must_use]
    pub fn text_content(mut self, text: impl Into<String>) -> Self {
        self.email.text_content = Some(text.into());
        self
    }

    #[must_use]
    pub fn html_content(mut self, html: impl Into<String>) -> Self {
        self.email.html_content = Some(html.into());
        self
    }

    #[must_use]
    pub fn template(mut self, template_id: impl Into<String>, data: Option<Value>) -> Self {
        self.email.template_id = Some(template_id.into());
        self.email.template_data = data;
        self
    }

    #[must_use]
    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.email.attachments.push(attachment);
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.email.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn reply_to(mut self, address: Address) -> Self {
        self.email.reply_to = Some(address);
        self
    }

    #[must_use]
    pub fn send_at(mut self, when: DateTime<Utc>) -> Self {
        self.email.send_time = Some(when.timestamp());
        self
    }

    #[must_use]
    pub fn webhook_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.email
            .webhook_data
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.email.tag = Some(tag.into());
        self
    }

    #[must_use]
    pub fn tracking(mut self, tracking: TrackingSettings) -> Self {
        self.email.tracking = Some(tracking);
        self
    }

    /// # Errors
    ///
    /// Returns [`LanefulError::Validation`] if the email fails [`Email::validate`].
    pub fn build(self) -> Result<Email, LanefulError> {
        self.email.validate()?;
        Ok(self.email)
    }
}

/// Result of a send request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

/// Delivery state of a previously sent message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailStatus {
    #[serde(default)]
    pub message_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
