//! Planning lifecycle command and query handlers.

mod create_planning;
mod delete_planning;
mod export_planning;
mod get_planning_with_stats;
mod list_plannings;
mod set_planning_status;

pub use create_planning::{CreatePlanningCommand, CreatePlanningHandler, CreatePlanningResult};
pub use delete_planning::{DeletePlanningCommand, DeletePlanningHandler};
pub use export_planning::{ExportPlanningHandler, ExportPlanningQuery};
pub use get_planning_with_stats::{GetPlanningWithStatsHandler, GetPlanningWithStatsQuery};
pub use list_plannings::{ListPlanningsHandler, ListPlanningsQuery};
pub use set_planning_status::{SetPlanningStatusCommand, SetPlanningStatusHandler};
