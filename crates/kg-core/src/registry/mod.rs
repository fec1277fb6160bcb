//! Static workflow registry: stages, step counts, treatment colors, timings.

mod model;

use std::collections::HashSet;
use std::time::Duration;

pub use model::{
    CursorPolicy, ResourceKind, StageDefinition, StepTarget, Timings, TreatmentDefinition,
    WorkflowRegistry, DEFAULT_APPOINTMENT_ADVANCE_MS, DEFAULT_CONFIRMATION_NOTICE_MS,
    DEFAULT_SCAN_SETTLE_MS, DEFAULT_SCAN_WINDOW_MS, DEFAULT_VERIFICATION_WINDOW_MS,
};

use crate::error::WorkflowError;
use crate::ids::{StageId, TreatmentId};

impl WorkflowRegistry {
    /// Parse and validate a registry from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, WorkflowError> {
        let registry: Self = toml::from_str(content)
            .map_err(|e| WorkflowError::InvalidRegistry(format!("parse failed: {e}")))?;
        registry.validate()?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            stages = registry.stages.len(),
            treatments = registry.treatments.len(),
            "workflow registry loaded"
        );
        Ok(registry)
    }

    pub fn stage(&self, id: &StageId) -> Result<&StageDefinition, WorkflowError> {
        self.stages
            .iter()
            .find(|s| &s.id == id)
            .ok_or_else(|| WorkflowError::UnknownStage(id.clone()))
    }

    pub fn contains_stage(&self, id: &StageId) -> bool {
        self.stages.iter().any(|s| &s.id == id)
    }

    pub fn treatment(&self, id: &TreatmentId) -> Result<&TreatmentDefinition, WorkflowError> {
        self.treatments
            .iter()
            .find(|t| &t.id == id)
            .ok_or_else(|| WorkflowError::UnknownTreatment(id.clone()))
    }

    pub fn verification_window(&self) -> Duration {
        Duration::from_millis(self.timings.verification_window_ms)
    }

    pub fn confirmation_notice(&self) -> Duration {
        Duration::from_millis(self.timings.confirmation_notice_ms)
    }

    pub fn appointment_advance(&self) -> Duration {
        Duration::from_millis(self.timings.appointment_advance_ms)
    }

    pub fn scan_settle(&self) -> Duration {
        Duration::from_millis(self.timings.scan_settle_ms)
    }

    pub fn scan_window(&self) -> Duration {
        Duration::from_millis(self.timings.scan_window_ms)
    }

    /// Check structural consistency. Any failure here is a configuration bug.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        let invalid =
            |msg: String| -> Result<(), WorkflowError> { Err(WorkflowError::InvalidRegistry(msg)) };

        if self.stages.is_empty() {
            return invalid("registry defines no stages".to_string());
        }

        let mut seen = HashSet::new();
        for stage in &self.stages {
            if !seen.insert(stage.id.as_str()) {
                return invalid(format!("duplicate stage id: {}", stage.id));
            }
            if stage.steps.is_empty() {
                return invalid(format!("stage {} has no steps", stage.id));
            }
            if let Some(resource) = stage.resource_step {
                if resource >= stage.step_count() {
                    return invalid(format!(
                        "stage {} resource_step {} out of range (count {})",
                        stage.id,
                        resource,
                        stage.step_count()
                    ));
                }
            }
            if stage.gate_on_verification && !stage.runs_verification() {
                return invalid(format!(
                    "stage {} is gated on verification but has no verification step",
                    stage.id
                ));
            }
        }

        if !self.contains_stage(&self.initial_stage) {
            return invalid(format!("initial stage {} is not defined", self.initial_stage));
        }

        for stage in &self.stages {
            for (edge, target) in [("next", &stage.next), ("appointment", &stage.appointment)] {
                let Some(target) = target else { continue };
                let Ok(dest) = self.stage(&target.stage) else {
                    return invalid(format!(
                        "stage {} {edge} edge points at unknown stage {}",
                        stage.id, target.stage
                    ));
                };
                if target.step >= dest.step_count() {
                    return invalid(format!(
                        "stage {} {edge} edge step {} out of range for {}",
                        stage.id, target.step, dest.id
                    ));
                }
            }
        }

        let mut seen = HashSet::new();
        for treatment in &self.treatments {
            if !seen.insert(treatment.id.as_str()) {
                return invalid(format!("duplicate treatment id: {}", treatment.id));
            }
            let colors = std::iter::once(treatment.unprocessed).chain(treatment.processed);
            for color in colors {
                if !color.is_normalized() {
                    return invalid(format!(
                        "treatment {} has a color channel outside [0, 1]",
                        treatment.id
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        initial_stage = "shape"

        [[stages]]
        id = "shape"
        steps = ["split", "ball", "check"]
        resource_step = 2
        gate_on_verification = true
        next = { stage = "bisque" }

        [[stages]]
        id = "bisque"
        steps = ["book", "wait"]
        cursor_policy = "reset_on_entry"
        appointment = { stage = "bisque", step = 1 }

        [[treatments]]
        id = "tenmoku"
        unprocessed = [0.5, 0.4, 0.3]
    "#;

    #[test]
    fn from_toml_str_parses_minimal_registry_with_default_timings() {
        let registry = WorkflowRegistry::from_toml_str(MINIMAL).unwrap();

        assert_eq!(registry.timings, Timings::default());
        assert_eq!(registry.stages.len(), 2);
        let bisque = registry.stage(&StageId::from("bisque")).unwrap();
        assert_eq!(bisque.cursor_policy, CursorPolicy::ResetOnEntry);
        assert_eq!(bisque.step_count(), 2);
        let shape = registry.stage(&StageId::from("shape")).unwrap();
        assert_eq!(shape.next.as_ref().unwrap().step, 0);
        assert!(registry
            .treatment(&TreatmentId::from("tenmoku"))
            .unwrap()
            .processed
            .is_none());
    }

    #[test]
    fn stage_lookup_fails_with_unknown_stage() {
        let registry = WorkflowRegistry::from_toml_str(MINIMAL).unwrap();
        let err = registry.stage(&StageId::from("glaze")).unwrap_err();
        assert_eq!(err, WorkflowError::UnknownStage(StageId::from("glaze")));
    }

    #[test]
    fn validate_rejects_dangling_next_edge() {
        let content = MINIMAL.replace("next = { stage = \"bisque\" }", "next = { stage = \"kiln\" }");
        let err = WorkflowRegistry::from_toml_str(&content).unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidRegistry(msg) if msg.contains("kiln")));
    }

    #[test]
    fn validate_rejects_out_of_range_resource_step() {
        let content = MINIMAL.replace("resource_step = 2", "resource_step = 3");
        assert!(WorkflowRegistry::from_toml_str(&content).is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_color() {
        let content = MINIMAL.replace("[0.5, 0.4, 0.3]", "[1.5, 0.4, 0.3]");
        assert!(WorkflowRegistry::from_toml_str(&content).is_err());
    }

    #[test]
    fn validate_rejects_duplicate_stage_ids() {
        let content = MINIMAL.replace("id = \"bisque\"", "id = \"shape\"");
        assert!(WorkflowRegistry::from_toml_str(&content).is_err());
    }

    #[test]
    fn durations_follow_timings() {
        let registry = WorkflowRegistry::from_toml_str(MINIMAL).unwrap();
        assert_eq!(registry.verification_window(), Duration::from_millis(2_500));
        assert_eq!(registry.confirmation_notice(), Duration::from_millis(1_200));
        assert_eq!(registry.appointment_advance(), Duration::from_millis(1_600));
        assert_eq!(registry.scan_settle(), Duration::from_millis(800));
        assert_eq!(registry.scan_window(), Duration::from_millis(2_000));
    }

    #[test]
    fn resource_kind_defaults_to_verification() {
        let registry = WorkflowRegistry::from_toml_str(MINIMAL).unwrap();
        let shape = registry.stage(&StageId::from("shape")).unwrap();
        assert_eq!(shape.resource_kind, ResourceKind::Verification);
        assert!(shape.runs_verification());
        assert!(!shape.runs_scan());
    }

    #[test]
    fn validate_rejects_gate_on_a_scan_step() {
        let content = MINIMAL.replace(
            "resource_step = 2\n",
            "resource_step = 2\n        resource_kind = \"scan\"\n",
        );
        let err = WorkflowRegistry::from_toml_str(&content).unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidRegistry(msg) if msg.contains("gated")));
    }
}
