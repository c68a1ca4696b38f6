//! AssignMemberHandler - Command handler for placing a member on a slot.
//!
//! Capacity and uniqueness are enforced by the repository's atomic insert.
//! The pre-reads here only order the errors a caller sees.
//!
//! When a notification is requested it is sent after the assignment is
//! stored, either inline or by `NotifyAssignedMemberHandler` reacting to
//! `assignment.created.v1`. Its outcome never fails the assignment.

use std::sync::Arc;

use crate::application::handlers::publish::{envelope_for, publish_or_warn};
use crate::domain::foundation::{CommandMetadata, EventId, MemberId, SlotId, Timestamp};
use crate::domain::member::Member;
use crate::domain::planning::{
    Assignment, MemberAssigned, NotificationStatus, Planning, PlanningError, Slot,
};
use crate::ports::{
    AssignmentInsert, EventPublisher, MemberDirectory, NotificationContext, NotificationSender,
    PlanningRepository,
};

/// Command to assign a member to a slot.
#[derive(Debug, Clone)]
pub struct AssignMemberCommand {
    pub slot_id: SlotId,
    pub member_id: MemberId,
    pub send_notification: bool,
}

/// Result of a successful assignment.
#[derive(Debug, Clone)]
pub struct AssignMemberResult {
    pub assignment: Assignment,
    /// True if the member had been notified when the call returned.
    pub notification_sent: bool,
}

pub struct AssignMemberHandler {
    repository: Arc<dyn PlanningRepository>,
    directory: Arc<dyn MemberDirectory>,
    sender: Arc<dyn NotificationSender>,
    publisher: Arc<dyn EventPublisher>,
    deferred: bool,
}

impl AssignMemberHandler {
    pub fn new(
        repository: Arc<dyn PlanningRepository>,
        directory: Arc<dyn MemberDirectory>,
        sender: Arc<dyn NotificationSender>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            directory,
            sender,
            publisher,
            deferred: false,
        }
    }

    /// Builder: leave requested notifications `pending` for an event
    /// subscriber instead of sending them during the call.
    pub fn with_deferred_notifications(mut self) -> Self {
        self.deferred = true;
        self
    }

    pub async fn handle(
        &self,
        cmd: AssignMemberCommand,
        metadata: CommandMetadata,
    ) -> Result<AssignMemberResult, PlanningError> {
        // 1. Slot exists
        let slot = self
            .repository
            .find_slot(&cmd.slot_id)
            .await?
            .ok_or(PlanningError::SlotNotFound(cmd.slot_id))?;

        // 2. Planning accepts changes
        let planning = self
            .repository
            .find_planning(slot.planning_id())
            .await?
            .ok_or(PlanningError::SlotNotFound(cmd.slot_id))?;
        planning.ensure_mutable()?;

        // 3. Member exists
        let member = self
            .directory
            .find_member(&cmd.member_id)
            .await?
            .ok_or_else(|| PlanningError::MemberNotFound(cmd.member_id.clone()))?;

        // 4. Atomic insert: slot, archive, capacity, duplicate
        let initial = if cmd.send_notification {
            NotificationStatus::Pending
        } else {
            NotificationStatus::NotRequested
        };
        let mut assignment = Assignment::new(cmd.slot_id, &member, initial);
        match self.repository.insert_assignment(&assignment).await? {
            AssignmentInsert::Inserted => {}
            AssignmentInsert::SlotMissing => return Err(PlanningError::SlotNotFound(cmd.slot_id)),
            AssignmentInsert::PlanningArchived => {
                return Err(PlanningError::Archived(*planning.id()))
            }
            AssignmentInsert::CapacityExceeded { required_people } => {
                return Err(PlanningError::CapacityExceeded {
                    slot_id: cmd.slot_id,
                    required_people,
                })
            }
            AssignmentInsert::Duplicate => {
                return Err(PlanningError::DuplicateAssignment {
                    slot_id: cmd.slot_id,
                    member_id: cmd.member_id,
                })
            }
        }

        tracing::info!(
            planning_id = %planning.id(),
            slot_id = %cmd.slot_id,
            member_id = %cmd.member_id,
            assignment_id = %assignment.id(),
            "Member assigned"
        );

        // 5. Inline notification, after the assignment is durable
        let notification_sent = if cmd.send_notification && !self.deferred {
            let status = self.notify(&member, &slot, &planning, &assignment).await;
            assignment.record_notification(status);
            status.is_sent()
        } else {
            false
        };

        // 6. Publish
        let event = MemberAssigned {
            event_id: EventId::new(),
            planning_id: *planning.id(),
            slot_id: cmd.slot_id,
            assignment_id: *assignment.id(),
            member_id: assignment.member_id().clone(),
            notification_requested: cmd.send_notification && self.deferred,
            assigned_by: metadata.user_id.clone(),
            assigned_at: *assignment.created_at(),
        };
        publish_or_warn(self.publisher.as_ref(), envelope_for(&event, &metadata)).await;

        // 7. Deferred: report what the subscriber has recorded so far
        if cmd.send_notification && self.deferred {
            assignment = self.stored_or(assignment).await;
        }
        let notification_sent = notification_sent || assignment.notification_sent();

        Ok(AssignMemberResult {
            assignment,
            notification_sent,
        })
    }

    async fn stored_or(&self, assignment: Assignment) -> Assignment {
        match self.repository.find_assignment(assignment.id()).await {
            Ok(Some(stored)) => stored,
            Ok(None) => assignment,
            Err(e) => {
                tracing::warn!(
                    assignment_id = %assignment.id(),
                    error = %e,
                    "Failed to re-read assignment after publish"
                );
                assignment
            }
        }
    }

    async fn notify(
        &self,
        member: &Member,
        slot: &Slot,
        planning: &Planning,
        assignment: &Assignment,
    ) -> NotificationStatus {
        let context = NotificationContext::for_planning(planning);
        let delivered = self.sender.notify(member, slot, &context).await;
        let status = NotificationStatus::from_outcome(delivered, Timestamp::now());

        if !delivered {
            tracing::warn!(
                assignment_id = %assignment.id(),
                member_id = %member.id,
                "Assignment notification failed; assignment kept"
            );
        }

        match self.repository.record_notification(assignment.id(), &status).await {
            Ok(true) => {}
            Ok(false) => tracing::debug!(
                assignment_id = %assignment.id(),
                "Assignment removed before notification outcome was recorded"
            ),
            Err(e) => tracing::warn!(
                assignment_id = %assignment.id(),
                error = %e,
                "Failed to record notification outcome"
            ),
        }

        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::RecordingNotificationSender;
    use crate::application::handlers::test_support::{
        member, member_id, metadata, FailingPublisher, Fixture,
    };
    use crate::domain::planning::PlanningErrorKind;

    fn handler(fx: &Fixture) -> AssignMemberHandler {
        AssignMemberHandler::new(
            fx.repo.clone(),
            fx.directory.clone(),
            fx.sender.clone(),
            fx.bus.clone(),
        )
    }

    fn command(slot: &Slot, who: &str, notify: bool) -> AssignMemberCommand {
        AssignMemberCommand {
            slot_id: *slot.id(),
            member_id: member_id(who),
            send_notification: notify,
        }
    }

    #[tokio::test]
    async fn assigns_and_notifies_inline() {
        let fx = Fixture::new();
        let planning = fx.planning().await;
        let slot = fx.slot(&planning, 2).await;

        let result = handler(&fx)
            .handle(command(&slot, "alice", true), metadata())
            .await
            .unwrap();

        assert!(result.notification_sent);
        assert!(result.assignment.notified_at().is_some());
        assert_eq!(result.assignment.member().display_name, "Alice");
        assert_eq!(fx.sender.call_count().await, 1);

        let stored = fx
            .repo
            .find_assignment(result.assignment.id())
            .await
            .unwrap()
            .unwrap();
        assert!(stored.notification_sent());

        let events = fx.bus.events_of_type("assignment.created.v1");
        assert_eq!(events.len(), 1);
        let payload: MemberAssigned = events[0].payload_as().unwrap();
        assert!(!payload.notification_requested);
    }

    #[tokio::test]
    async fn without_notification_nothing_is_sent() {
        let fx = Fixture::new();
        let planning = fx.planning().await;
        let slot = fx.slot(&planning, 2).await;

        let result = handler(&fx)
            .handle(command(&slot, "alice", false), metadata())
            .await
            .unwrap();

        assert!(!result.notification_sent);
        assert_eq!(result.assignment.notification(), NotificationStatus::NotRequested);
        assert_eq!(fx.sender.call_count().await, 0);
    }

    #[tokio::test]
    async fn failing_sender_still_assigns() {
        let fx = Fixture {
            sender: Arc::new(RecordingNotificationSender::failing()),
            ..Fixture::new()
        };
        let planning = fx.planning().await;
        let slot = fx.slot(&planning, 2).await;

        let result = handler(&fx)
            .handle(command(&slot, "alice", true), metadata())
            .await
            .unwrap();

        assert!(!result.notification_sent);
        assert!(matches!(
            result.assignment.notification(),
            NotificationStatus::Failed { .. }
        ));
        assert_eq!(fx.repo.assignment_count().await, 1);
    }

    #[tokio::test]
    async fn deferred_mode_leaves_notification_pending() {
        let fx = Fixture::new();
        let planning = fx.planning().await;
        let slot = fx.slot(&planning, 2).await;
        let handler = handler(&fx).with_deferred_notifications();

        let result = handler
            .handle(command(&slot, "alice", true), metadata())
            .await
            .unwrap();

        assert!(!result.notification_sent);
        assert!(result.assignment.notification().is_pending());
        assert_eq!(fx.sender.call_count().await, 0);
        let payload: MemberAssigned = fx.bus.events_of_type("assignment.created.v1")[0]
            .payload_as()
            .unwrap();
        assert!(payload.notification_requested);
    }

    #[tokio::test]
    async fn full_slot_is_capacity_exceeded() {
        let fx = Fixture::new();
        let planning = fx.planning().await;
        let slot = fx.slot(&planning, 1).await;
        let handler = handler(&fx);
        handler.handle(command(&slot, "alice", false), metadata()).await.unwrap();

        let err = handler
            .handle(command(&slot, "bob", false), metadata())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), PlanningErrorKind::CapacityExceeded);
        assert_eq!(err.code().to_string(), "SLOT_FULL");
    }

    #[tokio::test]
    async fn same_member_twice_is_duplicate() {
        let fx = Fixture::new();
        let planning = fx.planning().await;
        let slot = fx.slot(&planning, 3).await;
        let handler = handler(&fx);
        handler.handle(command(&slot, "alice", false), metadata()).await.unwrap();

        let err = handler
            .handle(command(&slot, "alice", false), metadata())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), PlanningErrorKind::DuplicateAssignment);
        assert_eq!(fx.repo.assignment_count().await, 1);
    }

    #[tokio::test]
    async fn full_slot_wins_over_duplicate() {
        let fx = Fixture::new();
        let planning = fx.planning().await;
        let slot = fx.slot(&planning, 1).await;
        let handler = handler(&fx);
        handler.handle(command(&slot, "alice", false), metadata()).await.unwrap();

        let err = handler
            .handle(command(&slot, "alice", false), metadata())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), PlanningErrorKind::CapacityExceeded);
    }

    #[tokio::test]
    async fn errors_follow_validation_order() {
        let fx = Fixture::new();
        let planning = fx.planning().await;
        let slot = fx.slot(&planning, 1).await;
        let handler = handler(&fx);

        let missing_slot = handler
            .handle(
                AssignMemberCommand {
                    slot_id: SlotId::new(),
                    member_id: member_id("nobody"),
                    send_notification: false,
                },
                metadata(),
            )
            .await
            .unwrap_err();
        assert!(matches!(missing_slot, PlanningError::SlotNotFound(_)));

        let missing_member = handler
            .handle(command(&slot, "nobody", false), metadata())
            .await
            .unwrap_err();
        assert!(matches!(missing_member, PlanningError::MemberNotFound(_)));

        fx.archive(&planning).await;
        let archived = handler
            .handle(command(&slot, "nobody", false), metadata())
            .await
            .unwrap_err();
        assert_eq!(archived, PlanningError::Archived(*planning.id()));
    }

    #[tokio::test]
    async fn publish_failure_does_not_fail_assignment() {
        let fx = Fixture::new();
        let planning = fx.planning().await;
        let slot = fx.slot(&planning, 1).await;
        let handler = AssignMemberHandler::new(
            fx.repo.clone(),
            fx.directory.clone(),
            fx.sender.clone(),
            Arc::new(FailingPublisher),
        );

        let result = handler.handle(command(&slot, "alice", true), metadata()).await;

        assert!(result.is_ok());
        assert_eq!(fx.repo.assignment_count().await, 1);
    }

    #[tokio::test]
    async fn concurrent_assigns_fill_exactly_the_free_places() {
        let fx = Fixture::new();
        let planning = fx.planning().await;
        let slot = fx.slot(&planning, 3).await;
        for i in 0..12 {
            fx.directory
                .upsert(member(&format!("m{}", i), "Volunteer"))
                .await;
        }
        let handler = Arc::new(handler(&fx));

        let tasks: Vec<_> = (0..12)
            .map(|i| {
                let handler = handler.clone();
                let cmd = command(&slot, &format!("m{}", i), false);
                tokio::spawn(async move { handler.handle(cmd, metadata()).await })
            })
            .collect();

        let mut ok = 0;
        let mut full = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => ok += 1,
                Err(e) if e.kind() == PlanningErrorKind::CapacityExceeded => full += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        assert_eq!(ok, 3);
        assert_eq!(full, 9);
        assert_eq!(fx.repo.assignment_count().await, 3);
    }
}
