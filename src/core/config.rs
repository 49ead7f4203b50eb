use std::env;
use url::Url;

use crate::errors::LanefulError;
use crate::webhooks::DEFAULT_SIGNATURE_HEADER;

pub const DEFAULT_BASE_URL: &str = "https://api.laneful.net";

/// Settings for the inbound webhook receiver.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub webhook_secret: Option<String>,
    pub signature_header: String,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            webhook_secret: None,
            signature_header: DEFAULT_SIGNATURE_HEADER.to_string(),
        }
    }
}

impl WebhookConfig {
    /// Reads `LANEFUL_WEBHOOK_SECRET` and `LANEFUL_SIGNATURE_HEADER`. Both are
    /// optional; an unset or empty secret disables verification.
    pub fn from_env() -> Self {
        Self {
            webhook_secret: env::var("LANEFUL_WEBHOOK_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
            signature_header: env::var("LANEFUL_SIGNATURE_HEADER")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SIGNATURE_HEADER.into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LanefulConfig {
    pub base_url: String,
    pub api_token: String,
    pub webhook: WebhookConfig,
}

impl LanefulConfig {
    /// # Errors
    ///
    /// Returns [`LanefulError::Config`] if the base URL is not an absolute
    /// http(s) URL or the token is empty.
    pub fn new(base_url: &str, api_token: &str) -> Result<Self, LanefulError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            api_token: validate_token(api_token)?,
            webhook: WebhookConfig::default(),
        })
    }

    #[must_use]
    pub fn with_webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook.webhook_secret = Some(secret.into());
        self
    }

    /// Reads `LANEFUL_BASE_URL`, `LANEFUL_API_TOKEN`, `LANEFUL_WEBHOOK_SECRET`
    /// and `LANEFUL_SIGNATURE_HEADER`.
    ///
    /// # Errors
    ///
    /// Returns [`LanefulError::Config`] when the token is missing or a value is
    /// malformed.
    pub fn from_env() -> Result<Self, LanefulError> {
        let base_url = env::var("LANEFUL_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let api_token = env::var("LANEFUL_API_TOKEN")
            .map_err(|e| LanefulError::Config(format!("LANEFUL_API_TOKEN: {e}")))?;

        Ok(Self {
            base_url: normalize_base_url(&base_url)?,
            api_token: validate_token(&api_token)?,
            webhook: WebhookConfig::from_env(),
        })
    }
}

fn normalize_base_url(raw: &str) -> Result<String, LanefulError> {
    let parsed = Url::parse(raw.trim())
        .map_err(|e| LanefulError::Config(format!("LANEFUL_BASE_URL '{raw}': {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(LanefulError::Config(format!(
            "LANEFUL_BASE_URL must use http or https, got '{}'",
            parsed.scheme()
        )));
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

fn validate_token(token: &str) -> Result<String, LanefulError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(LanefulError::Config("API token must not be empty".into()));
    }
    Ok(token.to_string())
}
