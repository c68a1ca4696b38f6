//! HTTP routes for planning, slot and assignment endpoints.

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use super::handlers::{
    add_slot, assign_member, create_planning, delete_planning, export_planning, get_planning,
    list_plannings, list_slots, remove_slot, set_planning_status, unassign_member, update_slot,
    PlanningHandlers,
};

/// Creates the planning router; meant to be nested under `/api/plannings`.
pub fn planning_routes(handlers: PlanningHandlers) -> Router {
    Router::new()
        .route("/", post(create_planning).get(list_plannings))
        .route("/:id", get(get_planning).delete(delete_planning))
        .route("/:id/status", post(set_planning_status))
        .route("/:id/export", get(export_planning))
        .route("/:id/slots", get(list_slots).post(add_slot))
        .route("/slots/:slot_id", patch(update_slot).delete(remove_slot))
        .route("/slots/:slot_id/assignments", post(assign_member))
        .route("/assignments/:assignment_id", delete(unassign_member))
        .with_state(handlers)
}
