//! HTTP adapter for planning endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    AddSlotRequest, AssignMemberRequest, AssignMemberResponse, AssignmentResponse,
    CreatePlanningRequest, DeletePlanningResponse, ErrorResponse, EventContextDto,
    PlanningResponse, PlanningSummaryResponse, PlanningViewResponse, RemoveSlotResponse,
    SetStatusRequest, SlotResponse, SlotViewResponse, UpdateSlotRequest,
};
pub use handlers::{PlanningHandlers, PlanningPorts};
pub use routes::planning_routes;
