//! The public webhook contract: register callbacks, verify, parse, dispatch.

use tracing::warn;

use super::event::{WebhookEvent, WebhookPayload};
use super::router::EventRouter;
use super::signature::SignatureVerifier;
use crate::core::config::WebhookConfig;
use crate::errors::WebhookError;

/// Verifies and routes Laneful webhook notifications.
///
/// Signature verification is a separate step from processing so callers can
/// check the raw body before anything decodes it:
///
/// ```
/// use laneful::webhooks::{WebhookHandler, WebhookEvent};
///
/// let mut handler = WebhookHandler::new(Some("your-webhook-secret".to_string()));
/// handler.on("email.delivered", |event: &WebhookEvent| {
///     println!("Email {} was delivered to {}", event.message_id, event.email);
///     Ok(())
/// });
///
/// let body = r#"{"event_type":"email.delivered","message_id":"msg_1"}"#;
/// let signature = laneful::webhooks::sign(body, "your-webhook-secret");
/// if handler.verify_signature(body, &signature) {
///     handler.process_webhook(body).unwrap();
/// }
/// ```
#[derive(Debug, Clone)]
pub struct WebhookHandler {
    verifier: SignatureVerifier,
    router: EventRouter,
}

impl Default for WebhookHandler {
    /// Same as [`WebhookHandler::without_secret`], including its warning.
    fn default() -> Self {
        Self::new(None)
    }
}

impl WebhookHandler {
    /// Creates a handler. With no secret every signature is accepted, which is
    /// only suitable for local testing.
    pub fn new(webhook_secret: Option<String>) -> Self {
        let verifier = SignatureVerifier::new(webhook_secret);
        if !verifier.is_enabled() {
            warn!("No webhook secret configured; signature verification is disabled");
        }
        Self {
            verifier,
            router: EventRouter::new(),
        }
    }

    pub fn with_secret(webhook_secret: impl Into<String>) -> Self {
        Self::new(Some(webhook_secret.into()))
    }

    pub fn without_secret() -> Self {
        Self::new(None)
    }

    /// ```
    /// use laneful::core::config::LanefulConfig;
    /// use laneful::webhooks::WebhookHandler;
    ///
    /// let config = LanefulConfig::new("https://api.laneful.net", "token")?
    ///     .with_webhook_secret("your-webhook-secret");
    /// let handler = WebhookHandler::from_config(&config.webhook);
    /// assert_eq!(handler.webhook_secret(), Some("your-webhook-secret"));
    /// # Ok::<(), laneful::LanefulError>(())
    /// ```
    pub fn from_config(config: &WebhookConfig) -> Self {
        Self::new(config.webhook_secret.clone())
    }

    pub fn webhook_secret(&self) -> Option<&str> {
        self.verifier.secret()
    }

    /// Registers `callback` for `event_type` and returns `self` for chaining.
    pub fn on<F>(&mut self, event_type: impl Into<String>, callback: F) -> &mut Self
    where
        F: Fn(&WebhookEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.router.register(event_type, callback);
        self
    }

    /// Registers `callback` for `event_type`. A later registration for the
    /// same type replaces this one.
    pub fn register_handler<F>(&mut self, event_type: impl Into<String>, callback: F)
    where
        F: Fn(&WebhookEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.router.register(event_type, callback);
    }

    pub fn has_handler(&self, event_type: &str) -> bool {
        self.router.contains(event_type)
    }

    pub fn handler_count(&self) -> usize {
        self.router.len()
    }

    /// Checks the signature header sent alongside `payload`.
    pub fn verify_signature(&self, payload: impl AsRef<[u8]>, signature: &str) -> bool {
        self.verifier.verify(payload, signature)
    }

    /// Parses `payload` and dispatches it to the matching callback.
    ///
    /// This does not verify the signature; call [`Self::verify_signature`]
    /// on the raw body first.
    ///
    /// # Errors
    ///
    /// [`WebhookError::InvalidPayload`] for undecodable text and
    /// [`WebhookError::Handler`] when the callback fails.
    pub fn process_webhook<'a>(
        &self,
        payload: impl Into<WebhookPayload<'a>>,
    ) -> Result<(), WebhookError> {
        let event = WebhookEvent::parse(payload)?;
        self.router.dispatch(&event.event_type, &event)
    }

    /// Dispatches an already-built event, bypassing parsing.
    ///
    /// # Errors
    ///
    /// [`WebhookError::Handler`] when the callback fails.
    pub fn handle_event(&self, event_type: &str, event: &WebhookEvent) -> Result<(), WebhookError> {
        self.router.dispatch(event_type, event)
    }
}
