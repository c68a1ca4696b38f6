//! NotifyAssignedMemberHandler - Event handler for deferred notifications.
//!
//! Subscribed to `assignment.created.v1` when notifications run in deferred
//! mode. Only assignments still `pending` are notified, so redelivered
//! events do not notify twice.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::foundation::{
    DomainError, ErrorCode, EventEnvelope, EventId, SerializableDomainEvent, Timestamp,
};
use crate::domain::member::Member;
use crate::domain::planning::{AssignmentNotificationRecorded, MemberAssigned, NotificationStatus};
use crate::ports::{
    EventHandler, EventPublisher, NotificationContext, NotificationSender, PlanningRepository,
};

pub struct NotifyAssignedMemberHandler {
    repository: Arc<dyn PlanningRepository>,
    sender: Arc<dyn NotificationSender>,
    publisher: Arc<dyn EventPublisher>,
}

impl NotifyAssignedMemberHandler {
    pub const EVENT_TYPE: &'static str = "assignment.created.v1";

    pub fn new(
        repository: Arc<dyn PlanningRepository>,
        sender: Arc<dyn NotificationSender>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            sender,
            publisher,
        }
    }
}

#[async_trait]
impl EventHandler for NotifyAssignedMemberHandler {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let assigned: MemberAssigned = serde_json::from_value(event.payload.clone())
            .map_err(|e| DomainError::new(ErrorCode::ValidationFailed, e.to_string()))?;

        if !assigned.notification_requested {
            return Ok(());
        }

        // Skip if unassigned since, or already handled
        let Some(assignment) = self.repository.find_assignment(&assigned.assignment_id).await?
        else {
            tracing::debug!(
                assignment_id = %assigned.assignment_id,
                "Assignment gone; skipping notification"
            );
            return Ok(());
        };
        if !assignment.notification().is_pending() {
            return Ok(());
        }

        let Some(slot) = self.repository.find_slot(assignment.slot_id()).await? else {
            return Ok(());
        };
        let Some(planning) = self.repository.find_planning(slot.planning_id()).await? else {
            return Ok(());
        };

        let member: Member = assignment.member().clone().into();
        let delivered = self
            .sender
            .notify(&member, &slot, &NotificationContext::for_planning(&planning))
            .await;
        let status = NotificationStatus::from_outcome(delivered, Timestamp::now());
        if !delivered {
            tracing::warn!(
                assignment_id = %assignment.id(),
                member_id = %member.id,
                "Deferred assignment notification failed"
            );
        }

        if !self
            .repository
            .record_notification(assignment.id(), &status)
            .await?
        {
            return Ok(());
        }

        let recorded = AssignmentNotificationRecorded {
            event_id: EventId::new(),
            planning_id: assigned.planning_id,
            assignment_id: assigned.assignment_id,
            status,
            recorded_at: Timestamp::now(),
        };
        let mut envelope = recorded.to_envelope().with_causation_id(event.event_id.as_str());
        if let Some(correlation_id) = event.metadata.correlation_id.clone() {
            envelope = envelope.with_correlation_id(correlation_id);
        }
        if let Err(e) = self.publisher.publish(envelope).await {
            tracing::warn!(
                assignment_id = %assigned.assignment_id,
                error = %e,
                "Failed to publish notification outcome"
            );
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "NotifyAssignedMemberHandler"
    }
}
