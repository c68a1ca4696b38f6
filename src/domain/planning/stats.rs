//! Fill statistics, recomputed from stored records on every read.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Percentage;

use super::{Assignment, Slot};

/// Occupancy of a single slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotStats {
    pub assigned_count: u32,
    pub required_people: u32,
    pub is_full: bool,
    pub remaining: u32,
}

impl SlotStats {
    pub fn new(required_people: u32, assigned_count: u32) -> Self {
        Self {
            assigned_count,
            required_people,
            is_full: assigned_count >= required_people,
            remaining: required_people.saturating_sub(assigned_count),
        }
    }
}

/// Occupancy of a whole planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlanningStats {
    pub total_slots: u32,
    pub total_required: u64,
    pub total_assigned: u64,
    pub fill_rate: Percentage,
}

impl PlanningStats {
    /// Folds per-slot figures into planning totals.
    pub fn from_slot_stats<'a>(stats: impl IntoIterator<Item = &'a SlotStats>) -> Self {
        let (total_slots, total_required, total_assigned) =
            stats
                .into_iter()
                .fold((0u32, 0u64, 0u64), |(slots, required, assigned), s| {
                    (
                        slots + 1,
                        required + u64::from(s.required_people),
                        assigned + u64::from(s.assigned_count),
                    )
                });

        Self {
            total_slots,
            total_required,
            total_assigned,
            fill_rate: Percentage::from_ratio(total_assigned, total_required),
        }
    }
}

/// Counts the assignments that belong to `slot`.
pub fn compute_slot_stats(slot: &Slot, assignments: &[Assignment]) -> SlotStats {
    let assigned = assignments
        .iter()
        .filter(|a| a.slot_id() == slot.id())
        .count();
    SlotStats::new(
        slot.required_people(),
        u32::try_from(assigned).unwrap_or(u32::MAX),
    )
}

/// Computes planning totals from its slots and assignments.
pub fn compute_planning_stats(slots: &[Slot], assignments: &[Assignment]) -> PlanningStats {
    let per_slot: Vec<SlotStats> = slots
        .iter()
        .map(|slot| compute_slot_stats(slot, assignments))
        .collect();
    PlanningStats::from_slot_stats(&per_slot)
}
