//! Planning domain module.
//!
//! Plannings own slots; slots own assignments. Statistics are derived from
//! stored records on every read and never cached.
//!
//! # Events
//!
//! - `PlanningCreated`, `PlanningStatusChanged`, `PlanningDeleted`
//! - `SlotAdded`, `SlotUpdated`, `SlotRemoved`
//! - `MemberAssigned`, `MemberUnassigned`, `AssignmentNotificationRecorded`

mod aggregate;
mod assignment;
mod errors;
mod events;
mod read_model;
mod slot;
mod stats;

pub use aggregate::{EventContext, Planning, MAX_NAME_LENGTH};
pub use assignment::{AssignedMember, Assignment, NotificationStatus};
pub use errors::{PlanningError, PlanningErrorKind};
pub use events::{
    AssignmentNotificationRecorded, MemberAssigned, MemberUnassigned, PlanningCreated,
    PlanningDeleted, PlanningStatusChanged, SlotAdded, SlotRemoved, SlotUpdated,
};
pub use read_model::{PlanningSummary, PlanningView, SlotView};
pub use slot::{
    Slot, SlotChanges, SlotDraft, TimeRange, MAX_LOCATION_LENGTH, MAX_REQUIRED_PEOPLE,
};
pub use stats::{compute_planning_stats, compute_slot_stats, PlanningStats, SlotStats};
