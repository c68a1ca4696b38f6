//! Planning repository port.
//!
//! Stores plannings, their slots and the assignments on those slots.
//!
//! # Atomicity
//!
//! Every mutation that depends on existing state is a single conditional
//! store operation. Its outcome enum reports which precondition failed, so
//! callers never need a read-then-write sequence to keep the capacity,
//! uniqueness and archive invariants under concurrency.

use async_trait::async_trait;

use crate::domain::foundation::{
    AssignmentId, DomainError, PlanningId, PlanningStatus, SlotId, Timestamp,
};
use crate::domain::planning::{Assignment, NotificationStatus, Planning, Slot, SlotDraft};

/// Result of a compare-and-set status update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    Updated(Planning),
    Missing,
    /// The stored status no longer matches the expected one.
    Conflict(PlanningStatus),
}

/// Counts of what a planning deletion removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CascadeSummary {
    pub slots_removed: u32,
    pub assignments_removed: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotInsert {
    Inserted(Slot),
    PlanningMissing,
    PlanningArchived,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotUpdate {
    Updated(Slot),
    Missing,
    PlanningArchived,
    /// The new capacity is below the number of current assignments.
    BelowAssigned { assigned: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRemoval {
    Removed { assignments_removed: u32 },
    Missing,
    PlanningArchived,
}

/// Result of a conditional assignment insert.
///
/// Preconditions are checked in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentInsert {
    Inserted,
    SlotMissing,
    PlanningArchived,
    CapacityExceeded { required_people: u32 },
    Duplicate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentRemoval {
    Removed(Assignment),
    Missing,
    PlanningArchived,
}

/// Repository port for plannings, slots and assignments.
#[async_trait]
pub trait PlanningRepository: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────
    // Plannings
    // ─────────────────────────────────────────────────────────────────────

    /// Save a new planning.
    async fn save_planning(&self, planning: &Planning) -> Result<(), DomainError>;

    async fn find_planning(&self, id: &PlanningId) -> Result<Option<Planning>, DomainError>;

    /// Lists plannings ordered by reference date, then name.
    async fn list_plannings(
        &self,
        status: Option<PlanningStatus>,
    ) -> Result<Vec<Planning>, DomainError>;

    /// Sets `status` only if the stored status is still `expected`.
    async fn update_status(
        &self,
        id: &PlanningId,
        expected: PlanningStatus,
        status: PlanningStatus,
        updated_at: Timestamp,
    ) -> Result<StatusUpdate, DomainError>;

    /// Deletes a planning with all its slots and assignments.
    ///
    /// Returns `None` if the planning does not exist.
    async fn delete_planning(&self, id: &PlanningId)
        -> Result<Option<CascadeSummary>, DomainError>;

    // ─────────────────────────────────────────────────────────────────────
    // Slots
    // ─────────────────────────────────────────────────────────────────────

    /// Inserts a slot at the next display position of its planning.
    async fn insert_slot(&self, draft: SlotDraft) -> Result<SlotInsert, DomainError>;

    /// Replaces a slot's mutable fields.
    async fn update_slot(&self, slot: &Slot) -> Result<SlotUpdate, DomainError>;

    async fn find_slot(&self, id: &SlotId) -> Result<Option<Slot>, DomainError>;

    /// Lists the slots of a planning ordered by position.
    async fn list_slots(&self, planning_id: &PlanningId) -> Result<Vec<Slot>, DomainError>;

    /// Deletes a slot together with its assignments.
    async fn delete_slot(&self, id: &SlotId) -> Result<SlotRemoval, DomainError>;

    // ─────────────────────────────────────────────────────────────────────
    // Assignments
    // ─────────────────────────────────────────────────────────────────────

    /// Inserts an assignment if the slot exists, its planning is mutable,
    /// the slot has a free place and the member is not already on it.
    async fn insert_assignment(
        &self,
        assignment: &Assignment,
    ) -> Result<AssignmentInsert, DomainError>;

    async fn find_assignment(&self, id: &AssignmentId)
        -> Result<Option<Assignment>, DomainError>;

    /// Lists every assignment on the slots of a planning.
    async fn list_assignments(
        &self,
        planning_id: &PlanningId,
    ) -> Result<Vec<Assignment>, DomainError>;

    async fn delete_assignment(&self, id: &AssignmentId)
        -> Result<AssignmentRemoval, DomainError>;

    /// Stores a notification outcome. Returns false if the assignment is gone.
    async fn record_notification(
        &self,
        id: &AssignmentId,
        status: &NotificationStatus,
    ) -> Result<bool, DomainError>;
}
