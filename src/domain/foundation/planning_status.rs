//! PlanningStatus enum for tracking the lifecycle of plannings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{StateMachine, ValidationError};

/// Lifecycle status of a planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanningStatus {
    /// Being prepared; slots and assignments may change.
    #[default]
    Draft,
    /// Visible to members; still mutable.
    Published,
    /// Read-only and terminal.
    Archived,
}

impl PlanningStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [PlanningStatus; 3] = [
        PlanningStatus::Draft,
        PlanningStatus::Published,
        PlanningStatus::Archived,
    ];

    /// Returns true if slots and assignments may be mutated.
    pub fn is_mutable(&self) -> bool {
        !matches!(self, PlanningStatus::Archived)
    }

    /// Stable lowercase name, used for storage and transport.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanningStatus::Draft => "draft",
            PlanningStatus::Published => "published",
            PlanningStatus::Archived => "archived",
        }
    }
}

impl StateMachine for PlanningStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PlanningStatus::*;
        matches!(
            (self, target),
            (Draft, Published) | (Draft, Archived) | (Published, Archived) | (Published, Draft)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PlanningStatus::*;
        match self {
            Draft => vec![Published, Archived],
            Published => vec![Archived, Draft],
            Archived => vec![],
        }
    }
}

impl fmt::Display for PlanningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PlanningStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(PlanningStatus::Draft),
            "published" => Ok(PlanningStatus::Published),
            "archived" => Ok(PlanningStatus::Archived),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown planning status '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_is_draft() {
        assert_eq!(PlanningStatus::default(), PlanningStatus::Draft);
    }

    #[test]
    fn only_archived_is_immutable() {
        assert!(PlanningStatus::Draft.is_mutable());
        assert!(PlanningStatus::Published.is_mutable());
        assert!(!PlanningStatus::Archived.is_mutable());
    }

    #[test]
    fn draft_can_publish_or_archive() {
        assert!(PlanningStatus::Draft.can_transition_to(&PlanningStatus::Published));
        assert!(PlanningStatus::Draft.can_transition_to(&PlanningStatus::Archived));
    }

    #[test]
    fn published_can_unpublish_or_archive() {
        assert!(PlanningStatus::Published.can_transition_to(&PlanningStatus::Draft));
        assert!(PlanningStatus::Published.can_transition_to(&PlanningStatus::Archived));
    }

    #[test]
    fn archived_is_terminal() {
        assert!(PlanningStatus::Archived.is_terminal());
        for target in PlanningStatus::ALL {
            assert!(!PlanningStatus::Archived.can_transition_to(&target));
        }
    }

    #[test]
    fn same_state_transitions_are_rejected() {
        for status in PlanningStatus::ALL {
            assert!(status.transition_to(status).is_err());
        }
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Published".parse::<PlanningStatus>().unwrap(), PlanningStatus::Published);
        assert_eq!(" archived ".parse::<PlanningStatus>().unwrap(), PlanningStatus::Archived);
    }

    #[test]
    fn rejects_unknown_status_string() {
        let err = "deleted".parse::<PlanningStatus>().unwrap_err();
        assert_eq!(err.field(), "status");
    }

    #[test]
    fn serializes_to_snake_case_json() {
        assert_eq!(
            serde_json::to_string(&PlanningStatus::Published).unwrap(),
            "\"published\""
        );
    }

    fn any_status() -> impl Strategy<Value = PlanningStatus> {
        prop::sample::select(PlanningStatus::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn can_transition_agrees_with_valid_transitions(from in any_status(), to in any_status()) {
            prop_assert_eq!(
                from.can_transition_to(&to),
                from.valid_transitions().contains(&to)
            );
        }
    }
}
