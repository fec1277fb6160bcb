//! Appointment submission record.

use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;
use crate::ids::StageId;
use crate::registry::{StepTarget, WorkflowRegistry};

/// Ephemeral record of one submission. Only drives the auto-advance; never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub stage_id: StageId,
    pub submitted_at_ms: i64,
    /// Post-submission destination.
    pub target: StepTarget,
}

impl AppointmentRecord {
    /// Resolve the post-submission step for `stage_id`.
    pub fn plan(
        registry: &WorkflowRegistry,
        stage_id: &StageId,
        submitted_at_ms: i64,
    ) -> Result<Self, WorkflowError> {
        let stage = registry.stage(stage_id)?;
        let target = stage
            .appointment
            .clone()
            .ok_or_else(|| WorkflowError::NoAppointmentFlow(stage_id.clone()))?;
        Ok(Self {
            stage_id: stage_id.clone(),
            submitted_at_ms,
            target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTRY: &str = r#"
        initial_stage = "bisque"

        [[stages]]
        id = "bisque"
        steps = ["book", "wait"]
        appointment = { stage = "glaze", step = 0 }

        [[stages]]
        id = "glaze"
        steps = ["pick"]
    "#;

    #[test]
    fn plan_resolves_post_submission_target() {
        let registry = WorkflowRegistry::from_toml_str(REGISTRY).unwrap();
        let record = AppointmentRecord::plan(&registry, &"bisque".into(), 42).unwrap();
        assert_eq!(record.target.stage, StageId::from("glaze"));
        assert_eq!(record.submitted_at_ms, 42);
    }

    #[test]
    fn plan_fails_for_stage_without_appointment() {
        let registry = WorkflowRegistry::from_toml_str(REGISTRY).unwrap();
        let err = AppointmentRecord::plan(&registry, &"glaze".into(), 0).unwrap_err();
        assert_eq!(err, WorkflowError::NoAppointmentFlow("glaze".into()));
    }
}
