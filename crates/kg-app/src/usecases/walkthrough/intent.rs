use serde::{Deserialize, Serialize};

use kg_core::{StageId, TreatmentId};

/// User intents raised by the render surface. This is the only way the
/// surface calls back into the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UserIntent {
    Advance,
    Retreat,
    Jump { index: usize },
    StageJump { stage_id: StageId },
    TriggerVerification,
    SelectTreatment { treatment_id: TreatmentId },
    ToggleProcessed,
    ResetPreview,
    /// The preview model finished loading.
    SurfaceReady,
    SubmitAppointment { stage_id: StageId },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn intents_are_tagged_by_type() {
        let value = serde_json::to_value(UserIntent::StageJump {
            stage_id: "glaze".into(),
        })
        .unwrap();
        assert_eq!(value, json!({ "type": "stage_jump", "stage_id": "glaze" }));

        let jump: UserIntent = serde_json::from_str(r#"{"type":"jump","index":3}"#).unwrap();
        assert_eq!(jump, UserIntent::Jump { index: 3 });

        let ready: UserIntent = serde_json::from_str(r#"{"type":"surface_ready"}"#).unwrap();
        assert_eq!(ready, UserIntent::SurfaceReady);
    }

    #[test]
    fn unknown_intent_type_is_rejected() {
        assert!(serde_json::from_str::<UserIntent>(r#"{"type":"fire_kiln"}"#).is_err());
    }
}
