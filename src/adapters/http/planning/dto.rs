//! HTTP DTOs for planning endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::application::handlers::AssignMemberResult;
use crate::domain::foundation::{PlanningStatus, Timestamp};
use crate::domain::planning::{
    Assignment, EventContext, NotificationStatus, Planning, PlanningStats, PlanningSummary,
    PlanningView, Slot, SlotChanges, SlotStats, SlotView,
};
use crate::ports::CascadeSummary;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventContextDto {
    pub id: String,
    pub name: String,
}

impl From<EventContextDto> for EventContext {
    fn from(dto: EventContextDto) -> Self {
        EventContext::new(dto.id, dto.name)
    }
}

impl From<&EventContext> for EventContextDto {
    fn from(event: &EventContext) -> Self {
        Self {
            id: event.id.clone(),
            name: event.name.clone(),
        }
    }
}

/// Request to create a planning.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlanningRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub reference_date: NaiveDate,
    #[serde(default)]
    pub event: Option<EventContextDto>,
}

/// Request to change a planning's status.
#[derive(Debug, Clone, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

/// Query parameters for listing plannings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPlanningsParams {
    #[serde(default)]
    pub status: Option<String>,
}

/// Query parameters for exports; CSV when omitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportParams {
    #[serde(default)]
    pub format: Option<String>,
}

/// Request to add a slot.
#[derive(Debug, Clone, Deserialize)]
pub struct AddSlotRequest {
    pub location: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub required_people: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial slot update. `"notes": null` clears the notes; an absent field
/// keeps the current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSlotRequest {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub required_people: Option<i64>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
}

impl From<UpdateSlotRequest> for SlotChanges {
    fn from(req: UpdateSlotRequest) -> Self {
        SlotChanges {
            location: req.location,
            start: req.start.map(Timestamp::from_datetime),
            end: req.end.map(Timestamp::from_datetime),
            required_people: req.required_people,
            notes: req.notes,
        }
    }
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Request to assign a member to a slot.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignMemberRequest {
    pub member_id: String,
    #[serde(default)]
    pub send_notification: bool,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct PlanningResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub reference_date: NaiveDate,
    pub status: PlanningStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<EventContextDto>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Planning> for PlanningResponse {
    fn from(planning: &Planning) -> Self {
        Self {
            id: planning.id().to_string(),
            name: planning.name().to_string(),
            description: planning.description().map(str::to_string),
            reference_date: planning.reference_date(),
            status: planning.status(),
            event: planning.event().map(EventContextDto::from),
            created_at: rfc3339(planning.created_at()),
            updated_at: rfc3339(planning.updated_at()),
        }
    }
}

/// Planning with totals, as returned by the listing.
#[derive(Debug, Clone, Serialize)]
pub struct PlanningSummaryResponse {
    #[serde(flatten)]
    pub planning: PlanningResponse,
    pub stats: PlanningStats,
}

impl From<&PlanningSummary> for PlanningSummaryResponse {
    fn from(summary: &PlanningSummary) -> Self {
        Self {
            planning: (&summary.planning).into(),
            stats: summary.stats,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotResponse {
    pub id: String,
    pub planning_id: String,
    pub location: String,
    pub start: String,
    pub end: String,
    pub required_people: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub position: u32,
    pub created_at: String,
}

impl From<&Slot> for SlotResponse {
    fn from(slot: &Slot) -> Self {
        Self {
            id: slot.id().to_string(),
            planning_id: slot.planning_id().to_string(),
            location: slot.location().to_string(),
            start: rfc3339(&slot.start()),
            end: rfc3339(&slot.end()),
            required_people: slot.required_people(),
            notes: slot.notes().map(str::to_string),
            position: slot.position(),
            created_at: rfc3339(slot.created_at()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignedMemberResponse {
    pub id: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignmentResponse {
    pub id: String,
    pub slot_id: String,
    pub member: AssignedMemberResponse,
    pub created_at: String,
    pub notification: NotificationStatus,
    pub notification_sent: bool,
}

impl From<&Assignment> for AssignmentResponse {
    fn from(assignment: &Assignment) -> Self {
        let member = assignment.member();
        Self {
            id: assignment.id().to_string(),
            slot_id: assignment.slot_id().to_string(),
            member: AssignedMemberResponse {
                id: member.id.to_string(),
                display_name: member.display_name.clone(),
                email: member.email.clone(),
                role: member.role.clone(),
            },
            created_at: rfc3339(assignment.created_at()),
            notification: assignment.notification(),
            notification_sent: assignment.notification_sent(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotViewResponse {
    #[serde(flatten)]
    pub slot: SlotResponse,
    pub assignments: Vec<AssignmentResponse>,
    pub stats: SlotStats,
}

impl From<&SlotView> for SlotViewResponse {
    fn from(view: &SlotView) -> Self {
        Self {
            slot: (&view.slot).into(),
            assignments: view.assignments.iter().map(Into::into).collect(),
            stats: view.stats,
        }
    }
}

/// Planning with slots, assignments and statistics.
#[derive(Debug, Clone, Serialize)]
pub struct PlanningViewResponse {
    #[serde(flatten)]
    pub planning: PlanningResponse,
    pub slots: Vec<SlotViewResponse>,
    pub stats: PlanningStats,
}

impl From<&PlanningView> for PlanningViewResponse {
    fn from(view: &PlanningView) -> Self {
        Self {
            planning: (&view.planning).into(),
            slots: view.slots.iter().map(Into::into).collect(),
            stats: view.stats,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignMemberResponse {
    pub assignment: AssignmentResponse,
    pub notification_sent: bool,
    pub message: String,
}

impl From<&AssignMemberResult> for AssignMemberResponse {
    fn from(result: &AssignMemberResult) -> Self {
        let message = if result.notification_sent {
            "Member assigned and notified"
        } else {
            "Member assigned"
        };
        Self {
            assignment: (&result.assignment).into(),
            notification_sent: result.notification_sent,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletePlanningResponse {
    pub planning_id: String,
    pub slots_removed: u32,
    pub assignments_removed: u32,
}

impl DeletePlanningResponse {
    pub fn new(planning_id: impl ToString, summary: CascadeSummary) -> Self {
        Self {
            planning_id: planning_id.to_string(),
            slots_removed: summary.slots_removed,
            assignments_removed: summary.assignments_removed,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RemoveSlotResponse {
    pub slot_id: String,
    pub assignments_removed: u32,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

fn rfc3339(ts: &Timestamp) -> String {
    ts.as_datetime().to_rfc3339()
}
