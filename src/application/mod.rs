//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod handlers;

pub use handlers::{
    // Planning handlers
    CreatePlanningCommand, CreatePlanningHandler, CreatePlanningResult,
    DeletePlanningCommand, DeletePlanningHandler,
    ExportPlanningHandler, ExportPlanningQuery,
    GetPlanningWithStatsHandler, GetPlanningWithStatsQuery,
    ListPlanningsHandler, ListPlanningsQuery,
    SetPlanningStatusCommand, SetPlanningStatusHandler,
    // Slot handlers
    AddSlotCommand, AddSlotHandler,
    ListSlotsHandler, ListSlotsQuery,
    RemoveSlotCommand, RemoveSlotHandler, RemoveSlotResult,
    UpdateSlotCommand, UpdateSlotHandler,
    // Assignment handlers
    AssignMemberCommand, AssignMemberHandler, AssignMemberResult,
    NotifyAssignedMemberHandler,
    UnassignMemberCommand, UnassignMemberHandler,
};
