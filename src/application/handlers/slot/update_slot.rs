//! UpdateSlotHandler - Command handler for editing a slot.

use std::sync::Arc;

use crate::application::handlers::publish::{envelope_for, publish_or_warn};
use crate::domain::foundation::{CommandMetadata, EventId, SlotId, Timestamp};
use crate::domain::planning::{PlanningError, Slot, SlotChanges, SlotUpdated};
use crate::ports::{EventPublisher, PlanningRepository, SlotUpdate};

/// Command to change some of a slot's fields.
#[derive(Debug, Clone)]
pub struct UpdateSlotCommand {
    pub slot_id: SlotId,
    pub changes: SlotChanges,
}

pub struct UpdateSlotHandler {
    repository: Arc<dyn PlanningRepository>,
    publisher: Arc<dyn EventPublisher>,
}

impl UpdateSlotHandler {
    pub fn new(
        repository: Arc<dyn PlanningRepository>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            publisher,
        }
    }

    /// Applies the changes; `required_people` may not drop below the number
    /// of members already assigned.
    pub async fn handle(
        &self,
        cmd: UpdateSlotCommand,
        metadata: CommandMetadata,
    ) -> Result<Slot, PlanningError> {
        // 1. Load current slot
        let current = self
            .repository
            .find_slot(&cmd.slot_id)
            .await?
            .ok_or(PlanningError::SlotNotFound(cmd.slot_id))?;
        let planning_id = *current.planning_id();

        // 2. Validate merged fields
        let changed = current.with_changes(cmd.changes)?;

        // 3. Store, re-checking archive and assignment count atomically
        let slot = match self.repository.update_slot(&changed).await? {
            SlotUpdate::Updated(slot) => slot,
            SlotUpdate::Missing => return Err(PlanningError::SlotNotFound(cmd.slot_id)),
            SlotUpdate::PlanningArchived => return Err(PlanningError::Archived(planning_id)),
            SlotUpdate::BelowAssigned { assigned } => {
                return Err(PlanningError::invalid_input(
                    "required_people",
                    format!(
                        "cannot be lower than the {} members already assigned",
                        assigned
                    ),
                ))
            }
        };

        // 4. Publish
        let event = SlotUpdated {
            event_id: EventId::new(),
            planning_id,
            slot_id: *slot.id(),
            required_people: slot.required_people(),
            updated_at: Timestamp::now(),
        };
        publish_or_warn(self.publisher.as_ref(), envelope_for(&event, &metadata)).await;

        tracing::info!(planning_id = %planning_id, slot_id = %slot.id(), "Slot updated");

        Ok(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{at, member, metadata, Fixture};
    use crate::domain::planning::{Assignment, NotificationStatus, PlanningErrorKind};

    fn command(slot_id: SlotId, changes: SlotChanges) -> UpdateSlotCommand {
        UpdateSlotCommand { slot_id, changes }
    }

    #[tokio::test]
    async fn updates_fields_and_keeps_position() {
        let fx = Fixture::new();
        let planning = fx.planning().await;
        let slot = fx.slot(&planning, 2).await;
        let handler = UpdateSlotHandler::new(fx.repo.clone(), fx.bus.clone());

        let updated = handler
            .handle(
                command(
                    *slot.id(),
                    SlotChanges {
                        location: Some("Kitchen".to_string()),
                        end: Some(at(11)),
                        required_people: Some(4),
                        notes: Some(Some("bring aprons".to_string())),
                        ..Default::default()
                    },
                ),
                metadata(),
            )
            .await
            .unwrap();

        assert_eq!(updated.location(), "Kitchen");
        assert_eq!(updated.end(), at(11));
        assert_eq!(updated.required_people(), 4);
        assert_eq!(updated.notes(), Some("bring aprons"));
        assert_eq!(updated.position(), slot.position());
        assert!(fx.bus.has_event("slot.updated.v1"));
    }

    #[tokio::test]
    async fn cannot_drop_below_assigned_count() {
        let fx = Fixture::new();
        let planning = fx.planning().await;
        let slot = fx.slot(&planning, 3).await;
        for who in ["alice", "bob"] {
            let assignment =
                Assignment::new(*slot.id(), &member(who, who), NotificationStatus::NotRequested);
            fx.repo.insert_assignment(&assignment).await.unwrap();
        }
        let handler = UpdateSlotHandler::new(fx.repo.clone(), fx.bus.clone());

        let err = handler
            .handle(
                command(
                    *slot.id(),
                    SlotChanges {
                        required_people: Some(1),
                        ..Default::default()
                    },
                ),
                metadata(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), PlanningErrorKind::InvalidInput);

        let lowered = handler
            .handle(
                command(
                    *slot.id(),
                    SlotChanges {
                        required_people: Some(2),
                        ..Default::default()
                    },
                ),
                metadata(),
            )
            .await
            .unwrap();
        assert_eq!(lowered.required_people(), 2);
    }

    #[tokio::test]
    async fn moving_end_before_start_is_invalid_range() {
        let fx = Fixture::new();
        let planning = fx.planning().await;
        let slot = fx.slot(&planning, 1).await;
        let handler = UpdateSlotHandler::new(fx.repo.clone(), fx.bus.clone());

        let err = handler
            .handle(
                command(
                    *slot.id(),
                    SlotChanges {
                        end: Some(at(7)),
                        ..Default::default()
                    },
                ),
                metadata(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), PlanningErrorKind::InvalidRange);
    }

    #[tokio::test]
    async fn archived_planning_rejects_updates() {
        let fx = Fixture::new();
        let planning = fx.planning().await;
        let slot = fx.slot(&planning, 1).await;
        fx.archive(&planning).await;
        let handler = UpdateSlotHandler::new(fx.repo.clone(), fx.bus.clone());

        let err = handler
            .handle(
                command(
                    *slot.id(),
                    SlotChanges {
                        required_people: Some(5),
                        ..Default::default()
                    },
                ),
                metadata(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), PlanningErrorKind::InvalidState);
    }

    #[tokio::test]
    async fn unknown_slot_is_not_found() {
        let fx = Fixture::new();
        let handler = UpdateSlotHandler::new(fx.repo.clone(), fx.bus.clone());

        let err = handler
            .handle(command(SlotId::new(), SlotChanges::default()), metadata())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), PlanningErrorKind::NotFound);
    }
}
