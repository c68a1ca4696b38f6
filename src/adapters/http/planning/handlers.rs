//! HTTP handlers for planning, slot and assignment endpoints.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::adapters::http::operator::Operator;
use crate::application::handlers::{
    AddSlotCommand, AddSlotHandler, AssignMemberCommand, AssignMemberHandler,
    CreatePlanningCommand, CreatePlanningHandler, DeletePlanningCommand, DeletePlanningHandler,
    ExportPlanningHandler, ExportPlanningQuery, GetPlanningWithStatsHandler,
    GetPlanningWithStatsQuery, ListPlanningsHandler, ListPlanningsQuery, ListSlotsHandler,
    ListSlotsQuery, RemoveSlotCommand, RemoveSlotHandler, SetPlanningStatusCommand,
    SetPlanningStatusHandler, UnassignMemberCommand, UnassignMemberHandler, UpdateSlotCommand,
    UpdateSlotHandler,
};
use crate::domain::foundation::{
    AssignmentId, MemberId, PlanningId, PlanningStatus, SlotId, Timestamp,
};
use crate::domain::planning::{PlanningError, PlanningErrorKind};
use crate::ports::{
    EventPublisher, ExportFormat, MemberDirectory, NotificationSender, PlanningExporter,
    PlanningRepository,
};

use super::dto::{
    AddSlotRequest, AssignMemberRequest, AssignMemberResponse, AssignmentResponse,
    CreatePlanningRequest, DeletePlanningResponse, ErrorResponse, ExportParams,
    ListPlanningsParams, PlanningResponse, PlanningSummaryResponse, PlanningViewResponse,
    RemoveSlotResponse, SetStatusRequest, SlotResponse, UpdateSlotRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct PlanningHandlers {
    pub create: Arc<CreatePlanningHandler>,
    pub set_status: Arc<SetPlanningStatusHandler>,
    pub delete: Arc<DeletePlanningHandler>,
    pub list: Arc<ListPlanningsHandler>,
    pub view: Arc<GetPlanningWithStatsHandler>,
    pub export: Arc<ExportPlanningHandler>,
    pub add_slot: Arc<AddSlotHandler>,
    pub update_slot: Arc<UpdateSlotHandler>,
    pub remove_slot: Arc<RemoveSlotHandler>,
    pub list_slots: Arc<ListSlotsHandler>,
    pub assign: Arc<AssignMemberHandler>,
    pub unassign: Arc<UnassignMemberHandler>,
}

/// Ports the HTTP handlers are built from.
#[derive(Clone)]
pub struct PlanningPorts {
    pub repository: Arc<dyn PlanningRepository>,
    pub directory: Arc<dyn MemberDirectory>,
    pub sender: Arc<dyn NotificationSender>,
    pub publisher: Arc<dyn EventPublisher>,
    pub exporter: Arc<dyn PlanningExporter>,
    /// Leave requested notifications to an event subscriber
    pub deferred_notifications: bool,
}

impl PlanningHandlers {
    pub fn new(ports: PlanningPorts) -> Self {
        let repo = ports.repository;
        let publisher = ports.publisher;

        let mut assign = AssignMemberHandler::new(
            repo.clone(),
            ports.directory,
            ports.sender,
            publisher.clone(),
        );
        if ports.deferred_notifications {
            assign = assign.with_deferred_notifications();
        }

        Self {
            create: Arc::new(CreatePlanningHandler::new(repo.clone(), publisher.clone())),
            set_status: Arc::new(SetPlanningStatusHandler::new(repo.clone(), publisher.clone())),
            delete: Arc::new(DeletePlanningHandler::new(repo.clone(), publisher.clone())),
            list: Arc::new(ListPlanningsHandler::new(repo.clone())),
            view: Arc::new(GetPlanningWithStatsHandler::new(repo.clone())),
            export: Arc::new(ExportPlanningHandler::new(repo.clone(), ports.exporter)),
            add_slot: Arc::new(AddSlotHandler::new(repo.clone(), publisher.clone())),
            update_slot: Arc::new(UpdateSlotHandler::new(repo.clone(), publisher.clone())),
            remove_slot: Arc::new(RemoveSlotHandler::new(repo.clone(), publisher.clone())),
            list_slots: Arc::new(ListSlotsHandler::new(repo.clone())),
            assign: Arc::new(assign),
            unassign: Arc::new(UnassignMemberHandler::new(repo, publisher)),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Plannings
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/plannings - Create a planning
pub async fn create_planning(
    State(handlers): State<PlanningHandlers>,
    Operator(metadata): Operator,
    Json(req): Json<CreatePlanningRequest>,
) -> Response {
    let cmd = CreatePlanningCommand {
        name: req.name,
        description: req.description,
        reference_date: req.reference_date,
        event: req.event.map(Into::into),
    };

    match handlers.create.handle(cmd, metadata).await {
        Ok(result) => (
            StatusCode::CREATED,
            Json(PlanningResponse::from(&result.planning)),
        )
            .into_response(),
        Err(e) => handle_planning_error(e),
    }
}

/// GET /api/plannings?status= - List plannings with totals
pub async fn list_plannings(
    State(handlers): State<PlanningHandlers>,
    Query(params): Query<ListPlanningsParams>,
) -> Response {
    let status = match params.status.as_deref().map(PlanningStatus::from_str).transpose() {
        Ok(status) => status,
        Err(e) => return handle_planning_error(e.into()),
    };

    match handlers.list.handle(ListPlanningsQuery { status }).await {
        Ok(summaries) => {
            let body: Vec<PlanningSummaryResponse> = summaries.iter().map(Into::into).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => handle_planning_error(e),
    }
}

/// GET /api/plannings/:id - Planning with slots, assignments and stats
pub async fn get_planning(
    State(handlers): State<PlanningHandlers>,
    Path(planning_id): Path<String>,
) -> Response {
    let planning_id = match parse_id::<PlanningId>(&planning_id, "planning") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.view.handle(GetPlanningWithStatsQuery { planning_id }).await {
        Ok(view) => (StatusCode::OK, Json(PlanningViewResponse::from(&view))).into_response(),
        Err(e) => handle_planning_error(e),
    }
}

/// DELETE /api/plannings/:id - Delete a planning and everything under it
pub async fn delete_planning(
    State(handlers): State<PlanningHandlers>,
    Operator(metadata): Operator,
    Path(planning_id): Path<String>,
) -> Response {
    let planning_id = match parse_id::<PlanningId>(&planning_id, "planning") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .delete
        .handle(DeletePlanningCommand { planning_id }, metadata)
        .await
    {
        Ok(summary) => (
            StatusCode::OK,
            Json(DeletePlanningResponse::new(planning_id, summary)),
        )
            .into_response(),
        Err(e) => handle_planning_error(e),
    }
}

/// POST /api/plannings/:id/status - Lifecycle transition
pub async fn set_planning_status(
    State(handlers): State<PlanningHandlers>,
    Operator(metadata): Operator,
    Path(planning_id): Path<String>,
    Json(req): Json<SetStatusRequest>,
) -> Response {
    let planning_id = match parse_id::<PlanningId>(&planning_id, "planning") {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = SetPlanningStatusCommand {
        planning_id,
        status: req.status,
    };

    match handlers.set_status.handle(cmd, metadata).await {
        Ok(planning) => (StatusCode::OK, Json(PlanningResponse::from(&planning))).into_response(),
        Err(e) => handle_planning_error(e),
    }
}

/// GET /api/plannings/:id/export?format=csv|md - Download a planning
pub async fn export_planning(
    State(handlers): State<PlanningHandlers>,
    Path(planning_id): Path<String>,
    Query(params): Query<ExportParams>,
) -> Response {
    let planning_id = match parse_id::<PlanningId>(&planning_id, "planning") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let format = match params.format.as_deref().map(ExportFormat::from_str).transpose() {
        Ok(format) => format.unwrap_or_default(),
        Err(e) => {
            return handle_planning_error(PlanningError::invalid_input("format", e.to_string()))
        }
    };

    match handlers
        .export
        .handle(ExportPlanningQuery {
            planning_id,
            format,
        })
        .await
    {
        Ok(document) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, document.format.content_type().to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", document.file_name),
                ),
            ],
            document.content,
        )
            .into_response(),
        Err(e) => handle_planning_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Slots
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/plannings/:id/slots - Slots in position order
pub async fn list_slots(
    State(handlers): State<PlanningHandlers>,
    Path(planning_id): Path<String>,
) -> Response {
    let planning_id = match parse_id::<PlanningId>(&planning_id, "planning") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.list_slots.handle(ListSlotsQuery { planning_id }).await {
        Ok(slots) => {
            let body: Vec<SlotResponse> = slots.iter().map(Into::into).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => handle_planning_error(e),
    }
}

/// POST /api/plannings/:id/slots - Add a slot
pub async fn add_slot(
    State(handlers): State<PlanningHandlers>,
    Operator(metadata): Operator,
    Path(planning_id): Path<String>,
    Json(req): Json<AddSlotRequest>,
) -> Response {
    let planning_id = match parse_id::<PlanningId>(&planning_id, "planning") {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = AddSlotCommand {
        planning_id,
        location: req.location,
        start: Timestamp::from_datetime(req.start),
        end: Timestamp::from_datetime(req.end),
        required_people: req.required_people,
        notes: req.notes,
    };

    match handlers.add_slot.handle(cmd, metadata).await {
        Ok(slot) => (StatusCode::CREATED, Json(SlotResponse::from(&slot))).into_response(),
        Err(e) => handle_planning_error(e),
    }
}

/// PATCH /api/plannings/slots/:slot_id - Edit a slot
pub async fn update_slot(
    State(handlers): State<PlanningHandlers>,
    Operator(metadata): Operator,
    Path(slot_id): Path<String>,
    Json(req): Json<UpdateSlotRequest>,
) -> Response {
    let slot_id = match parse_id::<SlotId>(&slot_id, "slot") {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = UpdateSlotCommand {
        slot_id,
        changes: req.into(),
    };

    match handlers.update_slot.handle(cmd, metadata).await {
        Ok(slot) => (StatusCode::OK, Json(SlotResponse::from(&slot))).into_response(),
        Err(e) => handle_planning_error(e),
    }
}

/// DELETE /api/plannings/slots/:slot_id - Remove a slot and its assignments
pub async fn remove_slot(
    State(handlers): State<PlanningHandlers>,
    Operator(metadata): Operator,
    Path(slot_id): Path<String>,
) -> Response {
    let slot_id = match parse_id::<SlotId>(&slot_id, "slot") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .remove_slot
        .handle(RemoveSlotCommand { slot_id }, metadata)
        .await
    {
        Ok(result) => (
            StatusCode::OK,
            Json(RemoveSlotResponse {
                slot_id: slot_id.to_string(),
                assignments_removed: result.assignments_removed,
            }),
        )
            .into_response(),
        Err(e) => handle_planning_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Assignments
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/plannings/slots/:slot_id/assignments - Assign a member
pub async fn assign_member(
    State(handlers): State<PlanningHandlers>,
    Operator(metadata): Operator,
    Path(slot_id): Path<String>,
    Json(req): Json<AssignMemberRequest>,
) -> Response {
    let slot_id = match parse_id::<SlotId>(&slot_id, "slot") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let member_id = match MemberId::new(req.member_id) {
        Ok(id) => id,
        Err(e) => return handle_planning_error(e.into()),
    };

    let cmd = AssignMemberCommand {
        slot_id,
        member_id,
        send_notification: req.send_notification,
    };

    match handlers.assign.handle(cmd, metadata).await {
        Ok(result) => (
            StatusCode::CREATED,
            Json(AssignMemberResponse::from(&result)),
        )
            .into_response(),
        Err(e) => handle_planning_error(e),
    }
}

/// DELETE /api/plannings/assignments/:assignment_id - Unassign
pub async fn unassign_member(
    State(handlers): State<PlanningHandlers>,
    Operator(metadata): Operator,
    Path(assignment_id): Path<String>,
) -> Response {
    let assignment_id = match parse_id::<AssignmentId>(&assignment_id, "assignment") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .unassign
        .handle(UnassignMemberCommand { assignment_id }, metadata)
        .await
    {
        Ok(removed) => (StatusCode::OK, Json(AssignmentResponse::from(&removed))).into_response(),
        Err(e) => handle_planning_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, Response> {
    raw.parse::<T>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(format!("Invalid {} ID", what))),
        )
            .into_response()
    })
}

fn status_for(kind: PlanningErrorKind) -> StatusCode {
    match kind {
        PlanningErrorKind::NotFound => StatusCode::NOT_FOUND,
        PlanningErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        PlanningErrorKind::InvalidRange => StatusCode::UNPROCESSABLE_ENTITY,
        PlanningErrorKind::InvalidState
        | PlanningErrorKind::CapacityExceeded
        | PlanningErrorKind::DuplicateAssignment => StatusCode::CONFLICT,
        PlanningErrorKind::Infrastructure => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn handle_planning_error(error: PlanningError) -> Response {
    let status = status_for(error.kind());
    let mut body = ErrorResponse::new(error.code().to_string(), error.to_string());

    match &error {
        PlanningError::InvalidInput { field, .. } => {
            body = body.with_details(json!({ "field": field }));
        }
        PlanningError::Infrastructure(message) => {
            tracing::error!(error = %message, "Request failed with infrastructure error");
            body.message = "Internal server error".to_string();
        }
        _ => {}
    }

    (status, Json(body)).into_response()
}
