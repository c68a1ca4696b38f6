//! BackgroundHandler - Runs an event handler on its own task.
//!
//! The in-memory bus awaits subscribers before `publish` returns. Wrapping a
//! slow subscriber (such as the deferred notifier) moves its work off the
//! publishing request.
//!
//! ```ignore
//! let notifier = NotifyAssignedMemberHandler::new(repo, sender, bus.clone());
//! bus.subscribe(
//!     NotifyAssignedMemberHandler::EVENT_TYPE,
//!     Arc::new(BackgroundHandler::new(notifier)),
//! );
//! ```
//!
//! Failures of the inner handler are logged; the bus never sees them.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::EventHandler;

/// Decorates an `EventHandler` so each event is handled on a spawned task.
pub struct BackgroundHandler<H: EventHandler> {
    inner: Arc<H>,
}

impl<H: EventHandler + 'static> BackgroundHandler<H> {
    pub fn new(inner: H) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }
}

#[async_trait]
impl<H: EventHandler + 'static> EventHandler for BackgroundHandler<H> {
    async fn handle(&self, envelope: EventEnvelope) -> Result<(), DomainError> {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let event_id = envelope.event_id.clone();
            if let Err(e) = inner.handle(envelope).await {
                tracing::warn!(
                    handler = inner.name(),
                    event_id = %event_id,
                    error = %e,
                    "Background event handler failed"
                );
            }
        });
        Ok(())
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
