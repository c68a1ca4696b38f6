//! Planning domain events.
//!
//! - `PlanningCreated` - New planning in draft
//! - `PlanningStatusChanged` - Lifecycle transition applied
//! - `PlanningDeleted` - Planning and its contents removed
//! - `SlotAdded` / `SlotUpdated` / `SlotRemoved` - Slot changes
//! - `MemberAssigned` - Assignment recorded (`assignment.created.v1`)
//! - `MemberUnassigned` - Assignment removed
//! - `AssignmentNotificationRecorded` - Notification outcome stored

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    domain_event, AssignmentId, EventId, MemberId, PlanningId, PlanningStatus, SlotId, Timestamp,
    UserId,
};

use super::NotificationStatus;

// ════════════════════════════════════════════════════════════════════════════
// PlanningCreated
// ════════════════════════════════════════════════════════════════════════════

/// Published when a planning is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningCreated {
    pub event_id: EventId,
    pub planning_id: PlanningId,
    pub name: String,
    pub reference_date: NaiveDate,
    pub created_by: UserId,
    pub created_at: Timestamp,
}

domain_event!(
    PlanningCreated,
    event_type = "planning.created.v1",
    aggregate_id = planning_id,
    aggregate_type = "Planning",
    occurred_at = created_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// PlanningStatusChanged
// ════════════════════════════════════════════════════════════════════════════

/// Published when a planning moves through its lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningStatusChanged {
    pub event_id: EventId,
    pub planning_id: PlanningId,
    pub from: PlanningStatus,
    pub to: PlanningStatus,
    pub changed_by: UserId,
    pub changed_at: Timestamp,
}

domain_event!(
    PlanningStatusChanged,
    event_type = "planning.status_changed.v1",
    aggregate_id = planning_id,
    aggregate_type = "Planning",
    occurred_at = changed_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// PlanningDeleted
// ════════════════════════════════════════════════════════════════════════════

/// Published after a planning and everything under it is removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningDeleted {
    pub event_id: EventId,
    pub planning_id: PlanningId,
    pub slots_removed: u32,
    pub assignments_removed: u32,
    pub deleted_by: UserId,
    pub deleted_at: Timestamp,
}

domain_event!(
    PlanningDeleted,
    event_type = "planning.deleted.v1",
    aggregate_id = planning_id,
    aggregate_type = "Planning",
    occurred_at = deleted_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// Slots
// ════════════════════════════════════════════════════════════════════════════

/// Published when a slot is added to a planning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotAdded {
    pub event_id: EventId,
    pub planning_id: PlanningId,
    pub slot_id: SlotId,
    pub location: String,
    pub start: Timestamp,
    pub end: Timestamp,
    pub required_people: u32,
    pub position: u32,
    pub added_at: Timestamp,
}

domain_event!(
    SlotAdded,
    event_type = "slot.added.v1",
    aggregate_id = planning_id,
    aggregate_type = "Planning",
    occurred_at = added_at,
    event_id = event_id
);

/// Published when a slot's mutable fields change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotUpdated {
    pub event_id: EventId,
    pub planning_id: PlanningId,
    pub slot_id: SlotId,
    pub required_people: u32,
    pub updated_at: Timestamp,
}

domain_event!(
    SlotUpdated,
    event_type = "slot.updated.v1",
    aggregate_id = planning_id,
    aggregate_type = "Planning",
    occurred_at = updated_at,
    event_id = event_id
);

/// Published when a slot and its assignments are removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotRemoved {
    pub event_id: EventId,
    pub planning_id: PlanningId,
    pub slot_id: SlotId,
    pub assignments_removed: u32,
    pub removed_at: Timestamp,
}

domain_event!(
    SlotRemoved,
    event_type = "slot.removed.v1",
    aggregate_id = planning_id,
    aggregate_type = "Planning",
    occurred_at = removed_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// Assignments
// ════════════════════════════════════════════════════════════════════════════

/// Published when a member is placed on a slot.
///
/// When `notification_requested` is set and the assignment is still
/// pending, a subscriber is expected to deliver the notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberAssigned {
    pub event_id: EventId,
    pub planning_id: PlanningId,
    pub slot_id: SlotId,
    pub assignment_id: AssignmentId,
    pub member_id: MemberId,
    pub notification_requested: bool,
    pub assigned_by: UserId,
    pub assigned_at: Timestamp,
}

domain_event!(
    MemberAssigned,
    event_type = "assignment.created.v1",
    aggregate_id = planning_id,
    aggregate_type = "Planning",
    occurred_at = assigned_at,
    event_id = event_id
);

/// Published when an assignment is removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberUnassigned {
    pub event_id: EventId,
    pub planning_id: PlanningId,
    pub slot_id: SlotId,
    pub assignment_id: AssignmentId,
    pub member_id: MemberId,
    pub unassigned_by: UserId,
    pub unassigned_at: Timestamp,
}

domain_event!(
    MemberUnassigned,
    event_type = "assignment.removed.v1",
    aggregate_id = planning_id,
    aggregate_type = "Planning",
    occurred_at = unassigned_at,
    event_id = event_id
);

/// Published once a deferred notification outcome is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentNotificationRecorded {
    pub event_id: EventId,
    pub planning_id: PlanningId,
    pub assignment_id: AssignmentId,
    pub status: NotificationStatus,
    pub recorded_at: Timestamp,
}

domain_event!(
    AssignmentNotificationRecorded,
    event_type = "assignment.notification_recorded.v1",
    aggregate_id = planning_id,
    aggregate_type = "Planning",
    occurred_at = recorded_at,
    event_id = event_id
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DomainEvent, SerializableDomainEvent};

    #[test]
    fn member_assigned_uses_assignment_created_type() {
        let event = MemberAssigned {
            event_id: EventId::new(),
            planning_id: PlanningId::new(),
            slot_id: SlotId::new(),
            assignment_id: AssignmentId::new(),
            member_id: MemberId::new("m-1").unwrap(),
            notification_requested: true,
            assigned_by: UserId::system(),
            assigned_at: Timestamp::now(),
        };

        assert_eq!(event.event_type(), "assignment.created.v1");
        assert_eq!(event.schema_version(), 1);
        assert_eq!(event.aggregate_id(), event.planning_id.to_string());

        let envelope = event.to_envelope();
        let restored: MemberAssigned = envelope.payload_as().unwrap();
        assert_eq!(restored.assignment_id, event.assignment_id);
        assert!(restored.notification_requested);
    }

    #[test]
    fn status_change_payload_uses_snake_case_statuses() {
        let event = PlanningStatusChanged {
            event_id: EventId::new(),
            planning_id: PlanningId::new(),
            from: PlanningStatus::Draft,
            to: PlanningStatus::Published,
            changed_by: UserId::system(),
            changed_at: Timestamp::now(),
        };
        let envelope = event.to_envelope();
        assert_eq!(envelope.payload["to"], "published");
        assert_eq!(envelope.aggregate_type, "Planning");
    }
}
