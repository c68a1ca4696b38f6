//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.
//!
//! ## Modules
//!
//! - `planning` - Create, status transitions, delete, listing, view, export
//! - `slot` - Add, update, remove and list slots
//! - `assignment` - Assign and unassign members, deferred notifications

pub mod assignment;
pub mod planning;
pub mod slot;

mod publish;

#[cfg(test)]
pub(crate) mod test_support;

pub use assignment::{
    AssignMemberCommand, AssignMemberHandler, AssignMemberResult, NotifyAssignedMemberHandler,
    UnassignMemberCommand, UnassignMemberHandler,
};
pub use planning::{
    CreatePlanningCommand, CreatePlanningHandler, CreatePlanningResult, DeletePlanningCommand,
    DeletePlanningHandler, ExportPlanningHandler, ExportPlanningQuery,
    GetPlanningWithStatsHandler, GetPlanningWithStatsQuery, ListPlanningsHandler,
    ListPlanningsQuery, SetPlanningStatusCommand, SetPlanningStatusHandler,
};
pub use slot::{
    AddSlotCommand, AddSlotHandler, ListSlotsHandler, ListSlotsQuery, RemoveSlotCommand,
    RemoveSlotHandler, RemoveSlotResult, UpdateSlotCommand, UpdateSlotHandler,
};
