//! Slot entity and its validated inputs.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PlanningId, SlotId, Timestamp};

use super::PlanningError;

/// Maximum length for slot locations.
pub const MAX_LOCATION_LENGTH: usize = 200;

/// Largest headcount a slot may require; stored as a 32-bit signed column.
pub const MAX_REQUIRED_PEOPLE: u32 = i32::MAX as u32;

/// Half-open time span with `end` strictly after `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    start: Timestamp,
    end: Timestamp,
}

impl TimeRange {
    /// # Errors
    ///
    /// - `InvalidRange` if `end <= start`
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, PlanningError> {
        if !end.is_after(&start) {
            return Err(PlanningError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }
}

fn validate_location(location: &str) -> Result<String, PlanningError> {
    let trimmed = location.trim();
    if trimmed.is_empty() {
        return Err(PlanningError::invalid_input(
            "location",
            "location cannot be empty",
        ));
    }
    if trimmed.chars().count() > MAX_LOCATION_LENGTH {
        return Err(PlanningError::invalid_input(
            "location",
            format!("location must be at most {} characters", MAX_LOCATION_LENGTH),
        ));
    }
    Ok(trimmed.to_string())
}

fn validate_required_people(required_people: i64) -> Result<u32, PlanningError> {
    if required_people < 1 {
        return Err(PlanningError::invalid_input(
            "required_people",
            format!("required_people must be at least 1, got {}", required_people),
        ));
    }
    match u32::try_from(required_people) {
        Ok(required) if required <= MAX_REQUIRED_PEOPLE => Ok(required),
        _ => Err(PlanningError::invalid_input(
            "required_people",
            format!(
                "required_people must be at most {}, got {}",
                MAX_REQUIRED_PEOPLE, required_people
            ),
        )),
    }
}

fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

/// A time-bounded unit of work inside a planning.
///
/// # Invariants
///
/// - `location` is 1-200 characters
/// - `time_range.end > time_range.start`
/// - `required_people >= 1`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    id: SlotId,
    planning_id: PlanningId,
    location: String,
    time_range: TimeRange,
    required_people: u32,
    notes: Option<String>,
    position: u32,
    created_at: Timestamp,
}

impl Slot {
    /// Reconstitute a slot from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: SlotId,
        planning_id: PlanningId,
        location: String,
        time_range: TimeRange,
        required_people: u32,
        notes: Option<String>,
        position: u32,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            planning_id,
            location,
            time_range,
            required_people,
            notes,
            position,
            created_at,
        }
    }

    pub fn id(&self) -> &SlotId {
        &self.id
    }

    pub fn planning_id(&self) -> &PlanningId {
        &self.planning_id
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn time_range(&self) -> TimeRange {
        self.time_range
    }

    pub fn start(&self) -> Timestamp {
        self.time_range.start
    }

    pub fn end(&self) -> Timestamp {
        self.time_range.end
    }

    pub fn required_people(&self) -> u32 {
        self.required_people
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns a copy of this slot with `changes` applied and validated.
    ///
    /// The capacity check against current assignments is left to the store,
    /// which can see the count atomically.
    pub fn with_changes(&self, changes: SlotChanges) -> Result<Slot, PlanningError> {
        let location = match changes.location {
            Some(location) => validate_location(&location)?,
            None => self.location.clone(),
        };
        let time_range = TimeRange::new(
            changes.start.unwrap_or(self.time_range.start),
            changes.end.unwrap_or(self.time_range.end),
        )?;
        let required_people = match changes.required_people {
            Some(required) => validate_required_people(required)?,
            None => self.required_people,
        };
        let notes = match changes.notes {
            Some(notes) => normalize_notes(notes),
            None => self.notes.clone(),
        };

        Ok(Slot {
            location,
            time_range,
            required_people,
            notes,
            ..self.clone()
        })
    }
}

/// A validated slot that has not been stored yet.
///
/// The store assigns the display position when it inserts the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotDraft {
    id: SlotId,
    planning_id: PlanningId,
    location: String,
    time_range: TimeRange,
    required_people: u32,
    notes: Option<String>,
    created_at: Timestamp,
}

impl SlotDraft {
    /// # Errors
    ///
    /// - `InvalidRange` if `end <= start`
    /// - `InvalidInput` if the location is empty or too long, or
    ///   `required_people < 1`
    pub fn new(
        planning_id: PlanningId,
        location: &str,
        start: Timestamp,
        end: Timestamp,
        required_people: i64,
        notes: Option<String>,
    ) -> Result<Self, PlanningError> {
        let time_range = TimeRange::new(start, end)?;
        let location = validate_location(location)?;
        let required_people = validate_required_people(required_people)?;

        Ok(Self {
            id: SlotId::new(),
            planning_id,
            location,
            time_range,
            required_people,
            notes: normalize_notes(notes),
            created_at: Timestamp::now(),
        })
    }

    pub fn id(&self) -> &SlotId {
        &self.id
    }

    pub fn planning_id(&self) -> &PlanningId {
        &self.planning_id
    }

    /// Materializes the slot at the given display position.
    pub fn into_slot(self, position: u32) -> Slot {
        Slot {
            id: self.id,
            planning_id: self.planning_id,
            location: self.location,
            time_range: self.time_range,
            required_people: self.required_people,
            notes: self.notes,
            position,
            created_at: self.created_at,
        }
    }
}

/// Partial update of a slot's mutable fields.
///
/// `notes: Some(None)` clears the notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotChanges {
    pub location: Option<String>,
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
    pub required_people: Option<i64>,
    pub notes: Option<Option<String>>,
}

impl SlotChanges {
    pub fn is_empty(&self) -> bool {
        self == &SlotChanges::default()
    }
}
