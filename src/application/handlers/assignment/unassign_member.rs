//! UnassignMemberHandler - Command handler for removing an assignment.
//!
//! No notification is sent on removal.

use std::sync::Arc;

use crate::application::handlers::publish::{envelope_for, publish_or_warn};
use crate::domain::foundation::{AssignmentId, CommandMetadata, EventId, Timestamp};
use crate::domain::planning::{Assignment, MemberUnassigned, PlanningError};
use crate::ports::{AssignmentRemoval, EventPublisher, PlanningRepository};

#[derive(Debug, Clone)]
pub struct UnassignMemberCommand {
    pub assignment_id: AssignmentId,
}

pub struct UnassignMemberHandler {
    repository: Arc<dyn PlanningRepository>,
    publisher: Arc<dyn EventPublisher>,
}

impl UnassignMemberHandler {
    pub fn new(
        repository: Arc<dyn PlanningRepository>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            publisher,
        }
    }

    /// Removes the assignment and returns it.
    pub async fn handle(
        &self,
        cmd: UnassignMemberCommand,
        metadata: CommandMetadata,
    ) -> Result<Assignment, PlanningError> {
        let not_found = || PlanningError::AssignmentNotFound(cmd.assignment_id);

        // 1. Resolve the owning planning
        let existing = self
            .repository
            .find_assignment(&cmd.assignment_id)
            .await?
            .ok_or_else(not_found)?;
        let slot = self
            .repository
            .find_slot(existing.slot_id())
            .await?
            .ok_or_else(not_found)?;
        let planning_id = *slot.planning_id();

        // 2. Remove atomically
        let removed = match self.repository.delete_assignment(&cmd.assignment_id).await? {
            AssignmentRemoval::Removed(assignment) => assignment,
            AssignmentRemoval::Missing => return Err(not_found()),
            AssignmentRemoval::PlanningArchived => return Err(PlanningError::Archived(planning_id)),
        };

        // 3. Publish
        let event = MemberUnassigned {
            event_id: EventId::new(),
            planning_id,
            slot_id: *removed.slot_id(),
            assignment_id: *removed.id(),
            member_id: removed.member_id().clone(),
            unassigned_by: metadata.user_id.clone(),
            unassigned_at: Timestamp::now(),
        };
        publish_or_warn(self.publisher.as_ref(), envelope_for(&event, &metadata)).await;

        tracing::info!(
            planning_id = %planning_id,
            slot_id = %removed.slot_id(),
            member_id = %removed.member_id(),
            "Member unassigned"
        );

        Ok(removed)
    }
}
