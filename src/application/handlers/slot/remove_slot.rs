//! RemoveSlotHandler - Command handler for deleting a slot with its
//! assignments.

use std::sync::Arc;

use crate::application::handlers::publish::{envelope_for, publish_or_warn};
use crate::domain::foundation::{CommandMetadata, EventId, SlotId, Timestamp};
use crate::domain::planning::{PlanningError, SlotRemoved};
use crate::ports::{EventPublisher, PlanningRepository, SlotRemoval};

#[derive(Debug, Clone)]
pub struct RemoveSlotCommand {
    pub slot_id: SlotId,
}

/// Result of a slot removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveSlotResult {
    pub assignments_removed: u32,
}

pub struct RemoveSlotHandler {
    repository: Arc<dyn PlanningRepository>,
    publisher: Arc<dyn EventPublisher>,
}

impl RemoveSlotHandler {
    pub fn new(
        repository: Arc<dyn PlanningRepository>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: RemoveSlotCommand,
        metadata: CommandMetadata,
    ) -> Result<RemoveSlotResult, PlanningError> {
        let slot = self
            .repository
            .find_slot(&cmd.slot_id)
            .await?
            .ok_or(PlanningError::SlotNotFound(cmd.slot_id))?;
        let planning_id = *slot.planning_id();

        let assignments_removed = match self.repository.delete_slot(&cmd.slot_id).await? {
            SlotRemoval::Removed {
                assignments_removed,
            } => assignments_removed,
            SlotRemoval::Missing => return Err(PlanningError::SlotNotFound(cmd.slot_id)),
            SlotRemoval::PlanningArchived => return Err(PlanningError::Archived(planning_id)),
        };

        let event = SlotRemoved {
            event_id: EventId::new(),
            planning_id,
            slot_id: cmd.slot_id,
            assignments_removed,
            removed_at: Timestamp::now(),
        };
        publish_or_warn(self.publisher.as_ref(), envelope_for(&event, &metadata)).await;

        tracing::info!(
            planning_id = %planning_id,
            slot_id = %cmd.slot_id,
            assignments_removed,
            "Slot removed"
        );

        Ok(RemoveSlotResult {
            assignments_removed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{member, metadata, Fixture};
    use crate::domain::planning::{Assignment, NotificationStatus, PlanningErrorKind};

    #[tokio::test]
    async fn removes_slot_and_its_assignments_only() {
        let fx = Fixture::new();
        let planning = fx.planning().await;
        let doomed = fx.slot(&planning, 2).await;
        let kept = fx.slot(&planning, 2).await;
        for (slot, who) in [(&doomed, "alice"), (&doomed, "bob"), (&kept, "carol")] {
            let assignment =
                Assignment::new(*slot.id(), &member(who, who), NotificationStatus::NotRequested);
            fx.repo.insert_assignment(&assignment).await.unwrap();
        }
        let handler = RemoveSlotHandler::new(fx.repo.clone(), fx.bus.clone());

        let result = handler
            .handle(
                RemoveSlotCommand {
                    slot_id: *doomed.id(),
                },
                metadata(),
            )
            .await
            .unwrap();

        assert_eq!(result.assignments_removed, 2);
        assert!(fx.repo.find_slot(doomed.id()).await.unwrap().is_none());
        let remaining = fx.repo.list_assignments(planning.id()).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].slot_id(), kept.id());
        assert!(fx.bus.has_event("slot.removed.v1"));
    }

    #[tokio::test]
    async fn archived_planning_keeps_its_slots() {
        let fx = Fixture::new();
        let planning = fx.planning().await;
        let slot = fx.slot(&planning, 1).await;
        fx.archive(&planning).await;
        let handler = RemoveSlotHandler::new(fx.repo.clone(), fx.bus.clone());

        let err = handler
            .handle(RemoveSlotCommand { slot_id: *slot.id() }, metadata())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), PlanningErrorKind::InvalidState);
        assert_eq!(fx.repo.slot_count().await, 1);
    }

    #[tokio::test]
    async fn unknown_slot_is_not_found() {
        let fx = Fixture::new();
        let handler = RemoveSlotHandler::new(fx.repo.clone(), fx.bus.clone());

        let err = handler
            .handle(RemoveSlotCommand { slot_id: SlotId::new() }, metadata())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), PlanningErrorKind::NotFound);
    }
}
