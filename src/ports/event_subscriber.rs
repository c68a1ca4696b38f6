//! EventSubscriber port - registers handlers for domain event types.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Handler for processing domain events.
///
/// Handlers must be idempotent; an error in one handler does not stop the
/// others.
///
/// ```ignore
/// #[async_trait]
/// impl EventHandler for NotifyAssignedMemberHandler {
///     async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
///         let payload: MemberAssigned = event.payload_as()?;
///         // ...
///     }
///
///     fn name(&self) -> &'static str {
///         "NotifyAssignedMemberHandler"
///     }
/// }
/// ```
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Handler name for logging.
    fn name(&self) -> &'static str;
}

/// Port for subscribing to domain events.
pub trait EventSubscriber: Send + Sync {
    /// Subscribe handler to a specific event type.
    fn subscribe(&self, event_type: &str, handler: Arc<dyn EventHandler>);

    /// Subscribe the same handler to several event types.
    fn subscribe_all(&self, event_types: &[&str], handler: Arc<dyn EventHandler>);
}

/// An event bus both publishes and dispatches.
pub trait EventBus: super::EventPublisher + EventSubscriber {}

impl<T: super::EventPublisher + EventSubscriber> EventBus for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_ports_are_object_safe() {
        fn _handler(_: &dyn EventHandler) {}
        fn _subscriber(_: &dyn EventSubscriber) {}
    }
}
