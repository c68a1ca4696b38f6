//! Derived read models: plannings with their slots, assignments and stats.

use serde::Serialize;

use super::{
    compute_planning_stats, compute_slot_stats, Assignment, Planning, PlanningStats, Slot,
    SlotStats,
};

/// A slot with its assignments and occupancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotView {
    pub slot: Slot,
    pub assignments: Vec<Assignment>,
    pub stats: SlotStats,
}

/// A planning with every slot in position order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanningView {
    pub planning: Planning,
    pub slots: Vec<SlotView>,
    pub stats: PlanningStats,
}

impl PlanningView {
    /// Groups assignments under their slots and computes statistics.
    ///
    /// Slots are sorted by position; assignments by creation time.
    pub fn assemble(planning: Planning, mut slots: Vec<Slot>, assignments: Vec<Assignment>) -> Self {
        slots.sort_by_key(|s| s.position());
        let stats = compute_planning_stats(&slots, &assignments);

        let slots = slots
            .into_iter()
            .map(|slot| {
                let slot_stats = compute_slot_stats(&slot, &assignments);
                let mut own: Vec<Assignment> = assignments
                    .iter()
                    .filter(|a| a.slot_id() == slot.id())
                    .cloned()
                    .collect();
                own.sort_by_key(|a| *a.created_at());
                SlotView {
                    slot,
                    assignments: own,
                    stats: slot_stats,
                }
            })
            .collect();

        Self {
            planning,
            slots,
            stats,
        }
    }

    /// Drops the slot detail, keeping planning and totals.
    pub fn into_summary(self) -> PlanningSummary {
        PlanningSummary {
            planning: self.planning,
            stats: self.stats,
        }
    }
}

/// A planning with its totals, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanningSummary {
    pub planning: Planning,
    pub stats: PlanningStats,
}
