//! Data handed to the render surface.

use serde::{Deserialize, Serialize};

use crate::ids::StageId;

/// Which step is visible and which navigation controls are enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepVisual {
    pub stage_id: StageId,
    pub index: usize,
    pub count: usize,
    pub can_retreat: bool,
    pub can_advance: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    VerificationSucceeded,
    AppointmentConfirmed,
}

impl NoticeKind {
    pub fn default_message(self) -> &'static str {
        match self {
            NoticeKind::VerificationSucceeded => "Looks good! Your piece passed the check.",
            NoticeKind::AppointmentConfirmed => "Appointment made!",
        }
    }
}
