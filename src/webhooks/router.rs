use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use super::event::WebhookEvent;
use crate::errors::WebhookError;

/// A registered webhook callback.
pub type EventCallback = Arc<dyn Fn(&WebhookEvent) -> anyhow::Result<()> + Send + Sync>;

/// Event-type string to callback table. One callback per key, exact match only.
#[derive(Default, Clone)]
pub struct EventRouter {
    handlers: HashMap<String, EventCallback>,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `callback` under `event_type`, replacing any earlier registration.
    pub fn register<F>(&mut self, event_type: impl Into<String>, callback: F)
    where
        F: Fn(&WebhookEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let event_type = event_type.into();
        if self
            .handlers
            .insert(event_type.clone(), Arc::new(callback))
            .is_some()
        {
            debug!(event_type = %event_type, "Replaced webhook handler");
        }
    }

    /// Invokes the callback registered for `event_type`, if any.
    ///
    /// # Errors
    ///
    /// A failing callback surfaces as [`WebhookError::Handler`].
    pub fn dispatch(&self, event_type: &str, event: &WebhookEvent) -> Result<(), WebhookError> {
        let Some(callback) = self.handlers.get(event_type) else {
            debug!(event_type = %event_type, "No webhook handler registered");
            return Ok(());
        };

        info!(
            event_type = %event_type,
            message_id = %event.message_id,
            "Dispatching webhook event"
        );
        callback(event).map_err(WebhookError::Handler)
    }

    pub fn contains(&self, event_type: &str) -> bool {
        self.handlers.contains_key(event_type)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn event_types(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}

impl fmt::Debug for EventRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRouter")
            .field("event_types", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
