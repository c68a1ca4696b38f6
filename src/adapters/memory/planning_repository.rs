//! In-memory planning repository.
//!
//! All records live behind one `RwLock`. Every conditional write checks and
//! mutates inside a single write guard with no await in between, which
//! makes it atomic with respect to every other operation on the store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{
    AssignmentId, DomainError, PlanningId, PlanningStatus, SlotId, Timestamp,
};
use crate::domain::planning::{Assignment, NotificationStatus, Planning, Slot, SlotDraft};
use crate::ports::{
    AssignmentInsert, AssignmentRemoval, CascadeSummary, PlanningRepository, SlotInsert,
    SlotRemoval, SlotUpdate, StatusUpdate,
};

#[derive(Debug, Default)]
struct Store {
    plannings: HashMap<PlanningId, Planning>,
    slots: HashMap<SlotId, Slot>,
    assignments: HashMap<AssignmentId, Assignment>,
}

impl Store {
    fn assigned_count(&self, slot_id: &SlotId) -> usize {
        self.assignments
            .values()
            .filter(|a| a.slot_id() == slot_id)
            .count()
    }

    fn is_planning_mutable(&self, planning_id: &PlanningId) -> bool {
        self.plannings
            .get(planning_id)
            .is_some_and(|p| p.status().is_mutable())
    }

    fn planning_of_slot(&self, slot_id: &SlotId) -> Option<PlanningId> {
        self.slots.get(slot_id).map(|s| *s.planning_id())
    }

    fn remove_slot_cascade(&mut self, slot_id: &SlotId) -> u32 {
        self.slots.remove(slot_id);
        let before = self.assignments.len();
        self.assignments.retain(|_, a| a.slot_id() != slot_id);
        count(before - self.assignments.len())
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// In-memory `PlanningRepository` for tests and local runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPlanningRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryPlanningRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn planning_count(&self) -> usize {
        self.store.read().await.plannings.len()
    }

    pub async fn slot_count(&self) -> usize {
        self.store.read().await.slots.len()
    }

    pub async fn assignment_count(&self) -> usize {
        self.store.read().await.assignments.len()
    }
}

#[async_trait]
impl PlanningRepository for InMemoryPlanningRepository {
    async fn save_planning(&self, planning: &Planning) -> Result<(), DomainError> {
        self.store
            .write()
            .await
            .plannings
            .insert(*planning.id(), planning.clone());
        Ok(())
    }

    async fn find_planning(&self, id: &PlanningId) -> Result<Option<Planning>, DomainError> {
        Ok(self.store.read().await.plannings.get(id).cloned())
    }

    async fn list_plannings(
        &self,
        status: Option<PlanningStatus>,
    ) -> Result<Vec<Planning>, DomainError> {
        let store = self.store.read().await;
        let mut plannings: Vec<Planning> = store
            .plannings
            .values()
            .filter(|p| status.map_or(true, |s| p.status() == s))
            .cloned()
            .collect();
        plannings.sort_by(|a, b| {
            a.reference_date()
                .cmp(&b.reference_date())
                .then_with(|| a.name().cmp(b.name()))
        });
        Ok(plannings)
    }

    async fn update_status(
        &self,
        id: &PlanningId,
        expected: PlanningStatus,
        status: PlanningStatus,
        updated_at: Timestamp,
    ) -> Result<StatusUpdate, DomainError> {
        let mut store = self.store.write().await;
        let Some(planning) = store.plannings.get_mut(id) else {
            return Ok(StatusUpdate::Missing);
        };
        if planning.status() != expected {
            return Ok(StatusUpdate::Conflict(planning.status()));
        }
        *planning = planning.with_stored_status(status, updated_at);
        Ok(StatusUpdate::Updated(planning.clone()))
    }

    async fn delete_planning(
        &self,
        id: &PlanningId,
    ) -> Result<Option<CascadeSummary>, DomainError> {
        let mut store = self.store.write().await;
        if store.plannings.remove(id).is_none() {
            return Ok(None);
        }

        let slot_ids: Vec<SlotId> = store
            .slots
            .values()
            .filter(|s| s.planning_id() == id)
            .map(|s| *s.id())
            .collect();

        let mut summary = CascadeSummary::default();
        for slot_id in &slot_ids {
            summary.assignments_removed += store.remove_slot_cascade(slot_id);
            summary.slots_removed += 1;
        }
        Ok(Some(summary))
    }

    async fn insert_slot(&self, draft: SlotDraft) -> Result<SlotInsert, DomainError> {
        let mut store = self.store.write().await;
        let planning_id = *draft.planning_id();
        match store.plannings.get(&planning_id) {
            None => return Ok(SlotInsert::PlanningMissing),
            Some(p) if !p.status().is_mutable() => return Ok(SlotInsert::PlanningArchived),
            Some(_) => {}
        }

        let position = store
            .slots
            .values()
            .filter(|s| s.planning_id() == &planning_id)
            .map(|s| s.position() + 1)
            .max()
            .unwrap_or(0);

        let slot = draft.into_slot(position);
        store.slots.insert(*slot.id(), slot.clone());
        Ok(SlotInsert::Inserted(slot))
    }

    async fn update_slot(&self, slot: &Slot) -> Result<SlotUpdate, DomainError> {
        let mut store = self.store.write().await;
        let Some(planning_id) = store.planning_of_slot(slot.id()) else {
            return Ok(SlotUpdate::Missing);
        };
        if !store.is_planning_mutable(&planning_id) {
            return Ok(SlotUpdate::PlanningArchived);
        }
        let assigned = count(store.assigned_count(slot.id()));
        if slot.required_people() < assigned {
            return Ok(SlotUpdate::BelowAssigned { assigned });
        }
        store.slots.insert(*slot.id(), slot.clone());
        Ok(SlotUpdate::Updated(slot.clone()))
    }

    async fn find_slot(&self, id: &SlotId) -> Result<Option<Slot>, DomainError> {
        Ok(self.store.read().await.slots.get(id).cloned())
    }

    async fn list_slots(&self, planning_id: &PlanningId) -> Result<Vec<Slot>, DomainError> {
        let store = self.store.read().await;
        let mut slots: Vec<Slot> = store
            .slots
            .values()
            .filter(|s| s.planning_id() == planning_id)
            .cloned()
            .collect();
        slots.sort_by_key(|s| s.position());
        Ok(slots)
    }

    async fn delete_slot(&self, id: &SlotId) -> Result<SlotRemoval, DomainError> {
        let mut store = self.store.write().await;
        let Some(planning_id) = store.planning_of_slot(id) else {
            return Ok(SlotRemoval::Missing);
        };
        if !store.is_planning_mutable(&planning_id) {
            return Ok(SlotRemoval::PlanningArchived);
        }
        let assignments_removed = store.remove_slot_cascade(id);
        Ok(SlotRemoval::Removed {
            assignments_removed,
        })
    }

    async fn insert_assignment(
        &self,
        assignment: &Assignment,
    ) -> Result<AssignmentInsert, DomainError> {
        let mut store = self.store.write().await;
        let Some(slot) = store.slots.get(assignment.slot_id()) else {
            return Ok(AssignmentInsert::SlotMissing);
        };
        let required_people = slot.required_people();
        if !store.is_planning_mutable(slot.planning_id()) {
            return Ok(AssignmentInsert::PlanningArchived);
        }
        if store.assigned_count(assignment.slot_id()) >= required_people as usize {
            return Ok(AssignmentInsert::CapacityExceeded { required_people });
        }
        let duplicate = store.assignments.values().any(|a| {
            a.slot_id() == assignment.slot_id() && a.member_id() == assignment.member_id()
        });
        if duplicate {
            return Ok(AssignmentInsert::Duplicate);
        }

        store
            .assignments
            .insert(*assignment.id(), assignment.clone());
        Ok(AssignmentInsert::Inserted)
    }

    async fn find_assignment(
        &self,
        id: &AssignmentId,
    ) -> Result<Option<Assignment>, DomainError> {
        Ok(self.store.read().await.assignments.get(id).cloned())
    }

    async fn list_assignments(
        &self,
        planning_id: &PlanningId,
    ) -> Result<Vec<Assignment>, DomainError> {
        let store = self.store.read().await;
        let mut assignments: Vec<Assignment> = store
            .assignments
            .values()
            .filter(|a| {
                store
                    .slots
                    .get(a.slot_id())
                    .is_some_and(|s| s.planning_id() == planning_id)
            })
            .cloned()
            .collect();
        assignments.sort_by_key(|a| *a.created_at());
        Ok(assignments)
    }

    async fn delete_assignment(
        &self,
        id: &AssignmentId,
    ) -> Result<AssignmentRemoval, DomainError> {
        let mut store = self.store.write().await;
        let Some(assignment) = store.assignments.get(id) else {
            return Ok(AssignmentRemoval::Missing);
        };
        let mutable = store
            .planning_of_slot(assignment.slot_id())
            .is_some_and(|pid| store.is_planning_mutable(&pid));
        if !mutable {
            return Ok(AssignmentRemoval::PlanningArchived);
        }
        match store.assignments.remove(id) {
            Some(removed) => Ok(AssignmentRemoval::Removed(removed)),
            None => Ok(AssignmentRemoval::Missing),
        }
    }

    async fn record_notification(
        &self,
        id: &AssignmentId,
        status: &NotificationStatus,
    ) -> Result<bool, DomainError> {
        let mut store = self.store.write().await;
        match store.assignments.get_mut(id) {
            Some(assignment) => {
                assignment.record_notification(*status);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
