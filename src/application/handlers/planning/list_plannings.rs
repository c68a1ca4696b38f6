//! ListPlanningsHandler - Query handler for planning listings.

use std::sync::Arc;

use crate::domain::foundation::PlanningStatus;
use crate::domain::planning::{compute_planning_stats, PlanningError, PlanningSummary};
use crate::ports::PlanningRepository;

/// Query for plannings, optionally restricted to one status.
#[derive(Debug, Clone, Default)]
pub struct ListPlanningsQuery {
    pub status: Option<PlanningStatus>,
}

/// Lists plannings by reference date then name, each with its totals.
pub struct ListPlanningsHandler {
    repository: Arc<dyn PlanningRepository>,
}

impl ListPlanningsHandler {
    pub fn new(repository: Arc<dyn PlanningRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        query: ListPlanningsQuery,
    ) -> Result<Vec<PlanningSummary>, PlanningError> {
        let plannings = self.repository.list_plannings(query.status).await?;

        let mut summaries = Vec::with_capacity(plannings.len());
        for planning in plannings {
            let slots = self.repository.list_slots(planning.id()).await?;
            let assignments = self.repository.list_assignments(planning.id()).await?;
            let stats = compute_planning_stats(&slots, &assignments);
            summaries.push(PlanningSummary { planning, stats });
        }

        Ok(summaries)
    }
}
