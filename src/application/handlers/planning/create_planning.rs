//! CreatePlanningHandler - Command handler for creating plannings.

use chrono::NaiveDate;
use std::sync::Arc;

use crate::application::handlers::publish::{envelope_for, publish_or_warn};
use crate::domain::foundation::{CommandMetadata, EventId, PlanningId, Timestamp};
use crate::domain::planning::{EventContext, Planning, PlanningCreated, PlanningError};
use crate::ports::{EventPublisher, PlanningRepository};

/// Command to create a new planning.
#[derive(Debug, Clone)]
pub struct CreatePlanningCommand {
    pub name: String,
    pub description: Option<String>,
    pub reference_date: NaiveDate,
    pub event: Option<EventContext>,
}

/// Result of successful planning creation.
#[derive(Debug, Clone)]
pub struct CreatePlanningResult {
    pub planning: Planning,
    pub event: PlanningCreated,
}

/// Handler for creating plannings. New plannings start in `draft`.
pub struct CreatePlanningHandler {
    repository: Arc<dyn PlanningRepository>,
    publisher: Arc<dyn EventPublisher>,
}

impl CreatePlanningHandler {
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
        cmd: CreatePlanningCommand,
        metadata: CommandMetadata,
    ) -> Result<CreatePlanningResult, PlanningError> {
        // 1. Validate and build the aggregate
        let planning = Planning::new(
            PlanningId::new(),
            cmd.name,
            cmd.description,
            cmd.reference_date,
            cmd.event,
        )?;

        // 2. Persist
        self.repository.save_planning(&planning).await?;

        // 3. Publish
        let event = PlanningCreated {
            event_id: EventId::new(),
            planning_id: *planning.id(),
            name: planning.name().to_string(),
            reference_date: planning.reference_date(),
            created_by: metadata.user_id.clone(),
            created_at: Timestamp::now(),
        };
        publish_or_warn(self.publisher.as_ref(), envelope_for(&event, &metadata)).await;

        tracing::info!(
            planning_id = %planning.id(),
            reference_date = %planning.reference_date(),
            "Planning created"
        );

        Ok(CreatePlanningResult { planning, event })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{metadata, FailingPublisher, Fixture};
    use crate::domain::foundation::PlanningStatus;
    use crate::domain::planning::PlanningErrorKind;

    fn command(name: &str) -> CreatePlanningCommand {
        CreatePlanningCommand {
            name: name.to_string(),
            description: Some("Volunteers for the fair".to_string()),
            reference_date: NaiveDate::from_ymd_opt(2026, 6, 21).unwrap(),
            event: Some(EventContext::new("evt-1", "Summer fair")),
        }
    }

    #[tokio::test]
    async fn creates_draft_planning_and_publishes_event() {
        let fx = Fixture::new();
        let handler = CreatePlanningHandler::new(fx.repo.clone(), fx.bus.clone());

        let result = handler.handle(command("  Fair crew "), metadata()).await.unwrap();

        assert_eq!(result.planning.name(), "Fair crew");
        assert_eq!(result.planning.status(), PlanningStatus::Draft);
        assert!(fx.repo.find_planning(result.planning.id()).await.unwrap().is_some());

        let events = fx.bus.events_of_type("planning.created.v1");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].metadata.correlation_id.as_deref(), Some("req-1"));
        assert_eq!(events[0].metadata.user_id.as_deref(), Some("operator-1"));
    }

    #[tokio::test]
    async fn rejects_empty_name_without_storing() {
        let fx = Fixture::new();
        let handler = CreatePlanningHandler::new(fx.repo.clone(), fx.bus.clone());

        let err = handler.handle(command("   "), metadata()).await.unwrap_err();

        assert_eq!(err.kind(), PlanningErrorKind::InvalidInput);
        assert_eq!(fx.repo.planning_count().await, 0);
        assert_eq!(fx.bus.event_count(), 0);
    }

    #[tokio::test]
    async fn publish_failure_does_not_fail_creation() {
        let fx = Fixture::new();
        let handler = CreatePlanningHandler::new(fx.repo.clone(), Arc::new(FailingPublisher));

        let result = handler.handle(command("Fair crew"), metadata()).await;

        assert!(result.is_ok());
        assert_eq!(fx.repo.planning_count().await, 1);
    }
}
