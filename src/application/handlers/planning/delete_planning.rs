//! DeletePlanningHandler - Command handler for removing a planning.
//!
//! Deletion cascades to every slot and assignment and is allowed in any
//! status, including `archived`.

use std::sync::Arc;

use crate::application::handlers::publish::{envelope_for, publish_or_warn};
use crate::domain::foundation::{CommandMetadata, EventId, PlanningId, Timestamp};
use crate::domain::planning::{PlanningDeleted, PlanningError};
use crate::ports::{CascadeSummary, EventPublisher, PlanningRepository};

/// Command to delete a planning and everything under it.
#[derive(Debug, Clone)]
pub struct DeletePlanningCommand {
    pub planning_id: PlanningId,
}

pub struct DeletePlanningHandler {
    repository: Arc<dyn PlanningRepository>,
    publisher: Arc<dyn EventPublisher>,
}

impl DeletePlanningHandler {
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
        cmd: DeletePlanningCommand,
        metadata: CommandMetadata,
    ) -> Result<CascadeSummary, PlanningError> {
        let summary = self
            .repository
            .delete_planning(&cmd.planning_id)
            .await?
            .ok_or(PlanningError::PlanningNotFound(cmd.planning_id))?;

        let event = PlanningDeleted {
            event_id: EventId::new(),
            planning_id: cmd.planning_id,
            slots_removed: summary.slots_removed,
            assignments_removed: summary.assignments_removed,
            deleted_by: metadata.user_id.clone(),
            deleted_at: Timestamp::now(),
        };
        publish_or_warn(self.publisher.as_ref(), envelope_for(&event, &metadata)).await;

        tracing::info!(
            planning_id = %cmd.planning_id,
            slots_removed = summary.slots_removed,
            assignments_removed = summary.assignments_removed,
            "Planning deleted"
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{member, metadata, Fixture};
    use crate::domain::planning::{Assignment, NotificationStatus, PlanningErrorKind};
    use crate::ports::AssignmentInsert;

    #[tokio::test]
    async fn cascades_to_slots_and_assignments() {
        let fx = Fixture::new();
        let planning = fx.planning().await;
        let first = fx.slot(&planning, 2).await;
        let second = fx.slot(&planning, 1).await;
        for (slot, who) in [(&first, "alice"), (&first, "bob"), (&second, "carol")] {
            let assignment = Assignment::new(
                *slot.id(),
                &member(who, who),
                NotificationStatus::NotRequested,
            );
            assert_eq!(
                fx.repo.insert_assignment(&assignment).await.unwrap(),
                AssignmentInsert::Inserted
            );
        }
        let handler = DeletePlanningHandler::new(fx.repo.clone(), fx.bus.clone());

        let summary = handler
            .handle(
                DeletePlanningCommand {
                    planning_id: *planning.id(),
                },
                metadata(),
            )
            .await
            .unwrap();

        assert_eq!(summary.slots_removed, 2);
        assert_eq!(summary.assignments_removed, 3);
        assert_eq!(fx.repo.planning_count().await, 0);
        assert_eq!(fx.repo.slot_count().await, 0);
        assert_eq!(fx.repo.assignment_count().await, 0);
        assert!(fx.bus.has_event("planning.deleted.v1"));
    }

    #[tokio::test]
    async fn archived_planning_can_be_deleted() {
        let fx = Fixture::new();
        let planning = fx.planning().await;
        fx.archive(&planning).await;
        let handler = DeletePlanningHandler::new(fx.repo.clone(), fx.bus.clone());

        let result = handler
            .handle(
                DeletePlanningCommand {
                    planning_id: *planning.id(),
                },
                metadata(),
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn deleting_twice_is_not_found() {
        let fx = Fixture::new();
        let planning = fx.planning().await;
        let handler = DeletePlanningHandler::new(fx.repo.clone(), fx.bus.clone());
        let cmd = DeletePlanningCommand {
            planning_id: *planning.id(),
        };

        handler.handle(cmd.clone(), metadata()).await.unwrap();
        let err = handler.handle(cmd, metadata()).await.unwrap_err();

        assert_eq!(err.kind(), PlanningErrorKind::NotFound);
    }
}
