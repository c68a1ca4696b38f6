//! SetPlanningStatusHandler - Command handler for lifecycle transitions.

use std::sync::Arc;

use crate::application::handlers::publish::{envelope_for, publish_or_warn};
use crate::domain::foundation::{CommandMetadata, EventId, PlanningId, PlanningStatus, Timestamp};
use crate::domain::planning::{Planning, PlanningError, PlanningStatusChanged};
use crate::ports::{EventPublisher, PlanningRepository, StatusUpdate};

/// Command to move a planning to another status.
///
/// The target arrives as text so that an unknown status is reported as
/// invalid input rather than rejected at the transport.
#[derive(Debug, Clone)]
pub struct SetPlanningStatusCommand {
    pub planning_id: PlanningId,
    pub status: String,
}

/// Handler for planning status transitions.
pub struct SetPlanningStatusHandler {
    repository: Arc<dyn PlanningRepository>,
    publisher: Arc<dyn EventPublisher>,
}

impl SetPlanningStatusHandler {
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
        cmd: SetPlanningStatusCommand,
        metadata: CommandMetadata,
    ) -> Result<Planning, PlanningError> {
        // 1. Parse target
        let target: PlanningStatus = cmd.status.trim().parse()?;

        // 2. Load and validate against the current status
        let planning = self
            .repository
            .find_planning(&cmd.planning_id)
            .await?
            .ok_or(PlanningError::PlanningNotFound(cmd.planning_id))?;
        let from = planning.status();
        planning.check_transition(target)?;

        // 3. Compare-and-set against the validated status
        let updated = match self
            .repository
            .update_status(&cmd.planning_id, from, target, Timestamp::now())
            .await?
        {
            StatusUpdate::Updated(updated) => updated,
            StatusUpdate::Missing => return Err(PlanningError::PlanningNotFound(cmd.planning_id)),
            StatusUpdate::Conflict(current) => {
                tracing::debug!(
                    planning_id = %cmd.planning_id,
                    expected = %from,
                    current = %current,
                    "Planning status changed concurrently"
                );
                // Refusals from the stored status win; otherwise the caller retries
                planning.with_stored_status(current, Timestamp::now()).check_transition(target)?;
                return Err(PlanningError::StatusChanged {
                    expected: from,
                    current,
                });
            }
        };

        // 4. Publish
        let event = PlanningStatusChanged {
            event_id: EventId::new(),
            planning_id: cmd.planning_id,
            from,
            to: target,
            changed_by: metadata.user_id.clone(),
            changed_at: *updated.updated_at(),
        };
        publish_or_warn(self.publisher.as_ref(), envelope_for(&event, &metadata)).await;

        tracing::info!(
            planning_id = %cmd.planning_id,
            from = %from,
            to = %target,
            "Planning status changed"
        );

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::adapters::memory::InMemoryPlanningRepository;
    use crate::application::handlers::test_support::{metadata, Fixture};
    use crate::domain::foundation::{AssignmentId, DomainError, ErrorCode, SlotId};
    use crate::domain::planning::{
        Assignment, NotificationStatus, PlanningErrorKind, Slot, SlotDraft,
    };
    use crate::ports::{
        AssignmentInsert, AssignmentRemoval, CascadeSummary, SlotInsert, SlotRemoval, SlotUpdate,
    };

    /// Serves a snapshot taken before another writer changed the status.
    struct StaleReadRepository {
        inner: Arc<InMemoryPlanningRepository>,
        snapshot: Planning,
    }

    #[async_trait]
    impl PlanningRepository for StaleReadRepository {
        async fn save_planning(&self, planning: &Planning) -> Result<(), DomainError> {
            self.inner.save_planning(planning).await
        }

        async fn find_planning(&self, _id: &PlanningId) -> Result<Option<Planning>, DomainError> {
            Ok(Some(self.snapshot.clone()))
        }

        async fn list_plannings(
            &self,
            status: Option<PlanningStatus>,
        ) -> Result<Vec<Planning>, DomainError> {
            self.inner.list_plannings(status).await
        }

        async fn update_status(
            &self,
            id: &PlanningId,
            expected: PlanningStatus,
            status: PlanningStatus,
            updated_at: Timestamp,
        ) -> Result<StatusUpdate, DomainError> {
            self.inner.update_status(id, expected, status, updated_at).await
        }

        async fn delete_planning(
            &self,
            id: &PlanningId,
        ) -> Result<Option<CascadeSummary>, DomainError> {
            self.inner.delete_planning(id).await
        }

        async fn insert_slot(&self, draft: SlotDraft) -> Result<SlotInsert, DomainError> {
            self.inner.insert_slot(draft).await
        }

        async fn update_slot(&self, slot: &Slot) -> Result<SlotUpdate, DomainError> {
            self.inner.update_slot(slot).await
        }

        async fn find_slot(&self, id: &SlotId) -> Result<Option<Slot>, DomainError> {
            self.inner.find_slot(id).await
        }

        async fn list_slots(&self, planning_id: &PlanningId) -> Result<Vec<Slot>, DomainError> {
            self.inner.list_slots(planning_id).await
        }

        async fn delete_slot(&self, id: &SlotId) -> Result<SlotRemoval, DomainError> {
            self.inner.delete_slot(id).await
        }

        async fn insert_assignment(
            &self,
            assignment: &Assignment,
        ) -> Result<AssignmentInsert, DomainError> {
            self.inner.insert_assignment(assignment).await
        }

        async fn find_assignment(
            &self,
            id: &AssignmentId,
        ) -> Result<Option<Assignment>, DomainError> {
            self.inner.find_assignment(id).await
        }

        async fn list_assignments(
            &self,
            planning_id: &PlanningId,
        ) -> Result<Vec<Assignment>, DomainError> {
            self.inner.list_assignments(planning_id).await
        }

        async fn delete_assignment(
            &self,
            id: &AssignmentId,
        ) -> Result<AssignmentRemoval, DomainError> {
            self.inner.delete_assignment(id).await
        }

        async fn record_notification(
            &self,
            id: &AssignmentId,
            status: &NotificationStatus,
        ) -> Result<bool, DomainError> {
            self.inner.record_notification(id, status).await
        }
    }

    /// Stores `current` behind the handler's back, then asks for `target`.
    async fn set_after_concurrent_change(
        current: PlanningStatus,
        target: &str,
    ) -> (Fixture, Result<Planning, PlanningError>) {
        let fx = Fixture::new();
        let snapshot = fx.planning().await;
        fx.repo
            .update_status(snapshot.id(), snapshot.status(), current, Timestamp::now())
            .await
            .unwrap();

        let repo = Arc::new(StaleReadRepository {
            inner: fx.repo.clone(),
            snapshot: snapshot.clone(),
        });
        let handler = SetPlanningStatusHandler::new(repo, fx.bus.clone());
        let result = handler.handle(command(*snapshot.id(), target), metadata()).await;
        (fx, result)
    }

    fn command(planning_id: PlanningId, status: &str) -> SetPlanningStatusCommand {
        SetPlanningStatusCommand {
            planning_id,
            status: status.to_string(),
        }
    }

    #[tokio::test]
    async fn walks_through_the_lifecycle() {
        let fx = Fixture::new();
        let planning = fx.planning().await;
        let handler = SetPlanningStatusHandler::new(fx.repo.clone(), fx.bus.clone());

        let published = handler
            .handle(command(*planning.id(), "published"), metadata())
            .await
            .unwrap();
        assert_eq!(published.status(), PlanningStatus::Published);

        let draft = handler
            .handle(command(*planning.id(), "draft"), metadata())
            .await
            .unwrap();
        assert_eq!(draft.status(), PlanningStatus::Draft);

        let archived = handler
            .handle(command(*planning.id(), "archived"), metadata())
            .await
            .unwrap();
        assert_eq!(archived.status(), PlanningStatus::Archived);

        assert_eq!(fx.bus.events_of_type("planning.status_changed.v1").len(), 3);
    }

    #[tokio::test]
    async fn leaving_archived_is_invalid_state() {
        let fx = Fixture::new();
        let planning = fx.planning().await;
        fx.archive(&planning).await;
        let handler = SetPlanningStatusHandler::new(fx.repo.clone(), fx.bus.clone());

        for target in ["draft", "published", "archived"] {
            let err = handler
                .handle(command(*planning.id(), target), metadata())
                .await
                .unwrap_err();
            assert_eq!(err.kind(), PlanningErrorKind::InvalidState);
        }
        assert_eq!(fx.bus.event_count(), 0);
    }

    #[tokio::test]
    async fn same_state_and_unknown_targets_are_invalid_input() {
        let fx = Fixture::new();
        let planning = fx.planning().await;
        let handler = SetPlanningStatusHandler::new(fx.repo.clone(), fx.bus.clone());

        let same = handler
            .handle(command(*planning.id(), "draft"), metadata())
            .await
            .unwrap_err();
        assert_eq!(same.kind(), PlanningErrorKind::InvalidInput);

        let unknown = handler
            .handle(command(*planning.id(), "closed"), metadata())
            .await
            .unwrap_err();
        assert_eq!(unknown.kind(), PlanningErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn unknown_planning_is_not_found() {
        let fx = Fixture::new();
        let handler = SetPlanningStatusHandler::new(fx.repo.clone(), fx.bus.clone());

        let err = handler
            .handle(command(PlanningId::new(), "published"), metadata())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), PlanningErrorKind::NotFound);
    }

    #[tokio::test]
    async fn racing_transitions_apply_once() {
        let fx = Fixture::new();
        let planning = fx.planning().await;
        let handler = Arc::new(SetPlanningStatusHandler::new(fx.repo.clone(), fx.bus.clone()));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let handler = handler.clone();
                let id = *planning.id();
                tokio::spawn(async move {
                    handler.handle(command(id, "published"), metadata()).await
                })
            })
            .collect();

        let mut applied = 0;
        for task in tasks {
            if task.await.unwrap().is_ok() {
                applied += 1;
            }
        }

        assert_eq!(applied, 1);
        assert_eq!(fx.bus.events_of_type("planning.status_changed.v1").len(), 1);
    }

    #[tokio::test]
    async fn lost_race_with_a_legal_transition_reports_concurrent_change() {
        // draft -> archived validated, but another writer published first;
        // published -> archived is legal, so this is not an illegal transition
        let (fx, result) = set_after_concurrent_change(PlanningStatus::Published, "archived").await;

        let err = result.unwrap_err();
        assert_eq!(
            err,
            PlanningError::StatusChanged {
                expected: PlanningStatus::Draft,
                current: PlanningStatus::Published,
            }
        );
        assert_eq!(err.kind(), PlanningErrorKind::InvalidState);
        assert_eq!(err.code(), ErrorCode::ConcurrentModification);
        assert_eq!(fx.bus.event_count(), 0);
    }

    #[tokio::test]
    async fn lost_race_into_archived_is_still_illegal() {
        let (fx, result) = set_after_concurrent_change(PlanningStatus::Archived, "published").await;

        assert_eq!(
            result.unwrap_err(),
            PlanningError::IllegalTransition {
                from: PlanningStatus::Archived,
                to: PlanningStatus::Published,
            }
        );
        assert_eq!(fx.bus.event_count(), 0);
    }
}
