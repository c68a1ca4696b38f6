//! Event publication after a durable change.
//!
//! The change is already committed when these run, so a failed publish is
//! logged rather than reported to the caller.

use crate::domain::foundation::{CommandMetadata, EventEnvelope, SerializableDomainEvent};
use crate::ports::EventPublisher;

/// Wraps `event` with the command's correlation and operator.
pub(crate) fn envelope_for<E: SerializableDomainEvent>(
    event: &E,
    metadata: &CommandMetadata,
) -> EventEnvelope {
    event
        .to_envelope()
        .with_correlation_id(metadata.correlation_id())
        .with_user_id(metadata.user_id.to_string())
}

pub(crate) async fn publish_or_warn(publisher: &dyn EventPublisher, envelope: EventEnvelope) {
    let event_type = envelope.event_type.clone();
    let aggregate_id = envelope.aggregate_id.clone();
    if let Err(e) = publisher.publish(envelope).await {
        tracing::warn!(
            event_type = %event_type,
            aggregate_id = %aggregate_id,
            error = %e,
            "Failed to publish domain event"
        );
    }
}
