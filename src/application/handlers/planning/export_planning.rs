//! ExportPlanningHandler - Renders a planning for download.

use std::sync::Arc;

use crate::domain::foundation::PlanningId;
use crate::domain::planning::PlanningError;
use crate::ports::{ExportError, ExportFormat, ExportedDocument, PlanningExporter, PlanningRepository};

use super::get_planning_with_stats::load_view;

/// Query to export a planning in the given format.
#[derive(Debug, Clone)]
pub struct ExportPlanningQuery {
    pub planning_id: PlanningId,
    pub format: ExportFormat,
}

pub struct ExportPlanningHandler {
    repository: Arc<dyn PlanningRepository>,
    exporter: Arc<dyn PlanningExporter>,
}

impl ExportPlanningHandler {
    pub fn new(
        repository: Arc<dyn PlanningRepository>,
        exporter: Arc<dyn PlanningExporter>,
    ) -> Self {
        Self {
            repository,
            exporter,
        }
    }

    pub async fn handle(
        &self,
        query: ExportPlanningQuery,
    ) -> Result<ExportedDocument, PlanningError> {
        let view = load_view(self.repository.as_ref(), &query.planning_id).await?;

        self.exporter
            .export(&view, query.format)
            .map_err(|e| match e {
                ExportError::UnsupportedFormat(format) => {
                    PlanningError::invalid_input("format", format!("unsupported format '{}'", format))
                }
                ExportError::Rendering(message) => {
                    tracing::error!(
                        planning_id = %query.planning_id,
                        format = %query.format,
                        error = %message,
                        "Planning export failed"
                    );
                    PlanningError::infrastructure(message)
                }
            })
    }
}
