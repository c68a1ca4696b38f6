//! GetPlanningWithStatsHandler - Query handler for the planning view.

use std::sync::Arc;

use crate::domain::foundation::PlanningId;
use crate::domain::planning::{PlanningError, PlanningView};
use crate::ports::PlanningRepository;

/// Query for a planning with its slots, assignments and statistics.
#[derive(Debug, Clone)]
pub struct GetPlanningWithStatsQuery {
    pub planning_id: PlanningId,
}

/// Handler for retrieving the full planning view. Reads are allowed in
/// every status.
pub struct GetPlanningWithStatsHandler {
    repository: Arc<dyn PlanningRepository>,
}

impl GetPlanningWithStatsHandler {
    pub fn new(repository: Arc<dyn PlanningRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        query: GetPlanningWithStatsQuery,
    ) -> Result<PlanningView, PlanningError> {
        load_view(self.repository.as_ref(), &query.planning_id).await
    }
}

/// Reads a planning and everything under it and assembles the view.
pub(crate) async fn load_view(
    repository: &dyn PlanningRepository,
    planning_id: &PlanningId,
) -> Result<PlanningView, PlanningError> {
    let planning = repository
        .find_planning(planning_id)
        .await?
        .ok_or(PlanningError::PlanningNotFound(*planning_id))?;
    let slots = repository.list_slots(planning_id).await?;
    let assignments = repository.list_assignments(planning_id).await?;

    Ok(PlanningView::assemble(planning, slots, assignments))
}
