//! ListSlotsHandler - Query handler for a planning's slots.

use std::sync::Arc;

use crate::domain::foundation::PlanningId;
use crate::domain::planning::{PlanningError, Slot};
use crate::ports::PlanningRepository;

#[derive(Debug, Clone)]
pub struct ListSlotsQuery {
    pub planning_id: PlanningId,
}

/// Returns slots in position order, in any planning status.
pub struct ListSlotsHandler {
    repository: Arc<dyn PlanningRepository>,
}

impl ListSlotsHandler {
    pub fn new(repository: Arc<dyn PlanningRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: ListSlotsQuery) -> Result<Vec<Slot>, PlanningError> {
        if self.repository.find_planning(&query.planning_id).await?.is_none() {
            return Err(PlanningError::PlanningNotFound(query.planning_id));
        }
        let mut slots = self.repository.list_slots(&query.planning_id).await?;
        slots.sort_by_key(|s| s.position());
        Ok(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Fixture;
    use crate::domain::planning::PlanningErrorKind;

    #[tokio::test]
    async fn lists_in_position_order() {
        let fx = Fixture::new();
        let planning = fx.planning().await;
        for required in [3, 1, 2] {
            fx.slot(&planning, required).await;
        }
        fx.archive(&planning).await;
        let handler = ListSlotsHandler::new(fx.repo.clone());

        let slots = handler
            .handle(ListSlotsQuery {
                planning_id: *planning.id(),
            })
            .await
            .unwrap();

        let positions: Vec<u32> = slots.iter().map(|s| s.position()).collect();
        let required: Vec<u32> = slots.iter().map(|s| s.required_people()).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert_eq!(required, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn empty_planning_has_no_slots() {
        let fx = Fixture::new();
        let planning = fx.planning().await;
        let handler = ListSlotsHandler::new(fx.repo.clone());

        let slots = handler
            .handle(ListSlotsQuery {
                planning_id: *planning.id(),
            })
            .await
            .unwrap();

        assert!(slots.is_empty());
    }

    #[tokio::test]
    async fn unknown_planning_is_not_found() {
        let fx = Fixture::new();
        let handler = ListSlotsHandler::new(fx.repo.clone());

        let err = handler
            .handle(ListSlotsQuery {
                planning_id: PlanningId::new(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), PlanningErrorKind::NotFound);
    }
}
