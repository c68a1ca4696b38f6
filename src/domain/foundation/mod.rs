//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the planning domain.

mod command;
mod errors;
mod events;
mod ids;
mod percentage;
mod planning_status;
mod state_machine;
mod timestamp;

pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{
    domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent,
};
pub use ids::{AssignmentId, MemberId, PlanningId, SlotId, UserId};
pub use percentage::Percentage;
pub use planning_status::PlanningStatus;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
