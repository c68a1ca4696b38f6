//! AddSlotHandler - Command handler for adding slots to a planning.

use std::sync::Arc;

use crate::application::handlers::publish::{envelope_for, publish_or_warn};
use crate::domain::foundation::{CommandMetadata, EventId, PlanningId, Timestamp};
use crate::domain::planning::{PlanningError, Slot, SlotAdded, SlotDraft};
use crate::ports::{EventPublisher, PlanningRepository, SlotInsert};

/// Command to add a slot.
///
/// `required_people` is signed so that zero and negative values reach
/// validation instead of failing deserialization.
#[derive(Debug, Clone)]
pub struct AddSlotCommand {
    pub planning_id: PlanningId,
    pub location: String,
    pub start: Timestamp,
    pub end: Timestamp,
    pub required_people: i64,
    pub notes: Option<String>,
}

pub struct AddSlotHandler {
    repository: Arc<dyn PlanningRepository>,
    publisher: Arc<dyn EventPublisher>,
}

impl AddSlotHandler {
    pub fn new(
        repository: Arc<dyn PlanningRepository>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            publisher,
        }
    }

    /// Appends a slot at the next position.
    ///
    /// # Errors
    ///
    /// Checked in order: `InvalidRange`, `InvalidInput`, `PlanningNotFound`,
    /// `Archived`.
    pub async fn handle(
        &self,
        cmd: AddSlotCommand,
        metadata: CommandMetadata,
    ) -> Result<Slot, PlanningError> {
        // 1. Validate fields
        let draft = SlotDraft::new(
            cmd.planning_id,
            &cmd.location,
            cmd.start,
            cmd.end,
            cmd.required_people,
            cmd.notes,
        )?;

        // 2. Insert; the store checks the planning and assigns the position
        let slot = match self.repository.insert_slot(draft).await? {
            SlotInsert::Inserted(slot) => slot,
            SlotInsert::PlanningMissing => {
                return Err(PlanningError::PlanningNotFound(cmd.planning_id))
            }
            SlotInsert::PlanningArchived => return Err(PlanningError::Archived(cmd.planning_id)),
        };

        // 3. Publish
        let event = SlotAdded {
            event_id: EventId::new(),
            planning_id: *slot.planning_id(),
            slot_id: *slot.id(),
            location: slot.location().to_string(),
            start: slot.start(),
            end: slot.end(),
            required_people: slot.required_people(),
            position: slot.position(),
            added_at: *slot.created_at(),
        };
        publish_or_warn(self.publisher.as_ref(), envelope_for(&event, &metadata)).await;

        tracing::info!(
            planning_id = %slot.planning_id(),
            slot_id = %slot.id(),
            position = slot.position(),
            required_people = slot.required_people(),
            "Slot added"
        );

        Ok(slot)
    }
}
