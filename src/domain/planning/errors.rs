//! Planning-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Kind | HTTP Status |
//! |------|-------------|
//! | NotFound | 404 |
//! | InvalidInput | 400 |
//! | InvalidRange | 422 |
//! | InvalidState | 409 |
//! | CapacityExceeded | 409 |
//! | DuplicateAssignment | 409 |
//! | Infrastructure | 500 |

use thiserror::Error;

use crate::domain::foundation::{
    AssignmentId, DomainError, ErrorCode, MemberId, PlanningId, PlanningStatus, SlotId,
    Timestamp, ValidationError,
};

/// Coarse error category, stable across variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanningErrorKind {
    NotFound,
    InvalidInput,
    InvalidRange,
    InvalidState,
    CapacityExceeded,
    DuplicateAssignment,
    Infrastructure,
}

/// Errors returned by planning, slot and assignment operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanningError {
    #[error("Planning not found: {0}")]
    PlanningNotFound(PlanningId),

    #[error("Slot not found: {0}")]
    SlotNotFound(SlotId),

    #[error("Assignment not found: {0}")]
    AssignmentNotFound(AssignmentId),

    #[error("Member not found: {0}")]
    MemberNotFound(MemberId),

    #[error("Validation failed for '{field}': {message}")]
    InvalidInput { field: String, message: String },

    #[error("End time {end:?} must be after start time {start:?}")]
    InvalidRange { start: Timestamp, end: Timestamp },

    #[error("Planning {0} is archived and read-only")]
    Archived(PlanningId),

    #[error("Cannot change planning status from {from} to {to}")]
    IllegalTransition {
        from: PlanningStatus,
        to: PlanningStatus,
    },

    #[error("Planning status changed from {expected} to {current} while updating; reload and retry")]
    StatusChanged {
        expected: PlanningStatus,
        current: PlanningStatus,
    },

    #[error("Slot {slot_id} is full ({required_people} people required)")]
    CapacityExceeded {
        slot_id: SlotId,
        required_people: u32,
    },

    #[error("Member {member_id} is already assigned to slot {slot_id}")]
    DuplicateAssignment { slot_id: SlotId, member_id: MemberId },

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl PlanningError {
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        PlanningError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        PlanningError::Infrastructure(message.into())
    }

    /// Returns the error category.
    pub fn kind(&self) -> PlanningErrorKind {
        match self {
            PlanningError::PlanningNotFound(_)
            | PlanningError::SlotNotFound(_)
            | PlanningError::AssignmentNotFound(_)
            | PlanningError::MemberNotFound(_) => PlanningErrorKind::NotFound,
            PlanningError::InvalidInput { .. } => PlanningErrorKind::InvalidInput,
            PlanningError::InvalidRange { .. } => PlanningErrorKind::InvalidRange,
            PlanningError::Archived(_)
            | PlanningError::IllegalTransition { .. }
            | PlanningError::StatusChanged { .. } => PlanningErrorKind::InvalidState,
            PlanningError::CapacityExceeded { .. } => PlanningErrorKind::CapacityExceeded,
            PlanningError::DuplicateAssignment { .. } => PlanningErrorKind::DuplicateAssignment,
            PlanningError::Infrastructure(_) => PlanningErrorKind::Infrastructure,
        }
    }

    /// Returns the machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            PlanningError::PlanningNotFound(_) => ErrorCode::PlanningNotFound,
            PlanningError::SlotNotFound(_) => ErrorCode::SlotNotFound,
            PlanningError::AssignmentNotFound(_) => ErrorCode::AssignmentNotFound,
            PlanningError::MemberNotFound(_) => ErrorCode::MemberNotFound,
            PlanningError::InvalidInput { .. } => ErrorCode::ValidationFailed,
            PlanningError::InvalidRange { .. } => ErrorCode::InvalidTimeRange,
            PlanningError::Archived(_) => ErrorCode::PlanningArchived,
            PlanningError::IllegalTransition { .. } => ErrorCode::InvalidStateTransition,
            PlanningError::StatusChanged { .. } => ErrorCode::ConcurrentModification,
            PlanningError::CapacityExceeded { .. } => ErrorCode::SlotFull,
            PlanningError::DuplicateAssignment { .. } => ErrorCode::DuplicateAssignment,
            PlanningError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<ValidationError> for PlanningError {
    fn from(err: ValidationError) -> Self {
        PlanningError::InvalidInput {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for PlanningError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => PlanningError::InvalidInput {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => PlanningError::Infrastructure(err.to_string()),
        }
    }
}
