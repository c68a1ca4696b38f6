//! Planning aggregate entity.
//!
//! A planning is a named schedule for a single reference date. It owns its
//! slots, and through them their assignments; deleting a planning removes
//! both.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PlanningId, PlanningStatus, StateMachine, Timestamp};

use super::PlanningError;

/// Maximum length for planning names.
pub const MAX_NAME_LENGTH: usize = 200;

/// Opaque link to an event managed elsewhere (registration, fair, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventContext {
    pub id: String,
    pub name: String,
}

impl EventContext {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Planning aggregate.
///
/// # Invariants
///
/// - `name` is 1-200 characters after trimming
/// - `archived` is terminal
/// - Archived plannings reject slot and assignment mutations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Planning {
    id: PlanningId,
    name: String,
    description: Option<String>,
    reference_date: NaiveDate,
    status: PlanningStatus,
    event: Option<EventContext>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Planning {
    /// Create a new planning in `draft`.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the name is empty or too long
    pub fn new(
        id: PlanningId,
        name: impl Into<String>,
        description: Option<String>,
        reference_date: NaiveDate,
        event: Option<EventContext>,
    ) -> Result<Self, PlanningError> {
        let name = Self::validate_name(name.into())?;
        let description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        let now = Timestamp::now();
        Ok(Self {
            id,
            name,
            description,
            reference_date,
            status: PlanningStatus::Draft,
            event,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a planning from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: PlanningId,
        name: String,
        description: Option<String>,
        reference_date: NaiveDate,
        status: PlanningStatus,
        event: Option<EventContext>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            name,
            description,
            reference_date,
            status,
            event,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &PlanningId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    pub fn status(&self) -> PlanningStatus {
        self.status
    }

    pub fn event(&self) -> Option<&EventContext> {
        self.event.as_ref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Returns an error if slots and assignments may not change.
    pub fn ensure_mutable(&self) -> Result<(), PlanningError> {
        if self.status.is_mutable() {
            Ok(())
        } else {
            Err(PlanningError::Archived(self.id))
        }
    }

    /// Checks that `target` is a legal next status without applying it.
    ///
    /// Leaving `archived` is an `InvalidState`; any other refused target
    /// (including the current status) is an `InvalidInput`.
    pub fn check_transition(&self, target: PlanningStatus) -> Result<(), PlanningError> {
        if self.status.is_terminal() {
            return Err(PlanningError::IllegalTransition {
                from: self.status,
                to: target,
            });
        }
        if !self.status.can_transition_to(&target) {
            return Err(PlanningError::invalid_input(
                "status",
                format!(
                    "cannot change status from {} to {}; allowed: {}",
                    self.status,
                    target,
                    self.status
                        .valid_transitions()
                        .iter()
                        .map(|s| s.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            ));
        }
        Ok(())
    }

    /// Copy with a stored status written over, for persistence adapters.
    pub fn with_stored_status(&self, status: PlanningStatus, updated_at: Timestamp) -> Self {
        Self {
            status,
            updated_at,
            ..self.clone()
        }
    }

    fn validate_name(name: String) -> Result<String, PlanningError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(PlanningError::invalid_input("name", "name cannot be empty"));
        }
        if trimmed.chars().count() > MAX_NAME_LENGTH {
            return Err(PlanningError::invalid_input(
                "name",
                format!("name must be at most {} characters", MAX_NAME_LENGTH),
            ));
        }
        Ok(trimmed.to_string())
    }
}
