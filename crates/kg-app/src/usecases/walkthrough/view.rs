use serde::Serialize;

use kg_core::{CameraState, PreviewSelection, ScanRun, StageId, StepCursor, VerificationRun};

/// Read-only projection of the walkthrough for hosts and tests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalkthroughView {
    pub active_stage: StageId,
    pub cursor: StepCursor,
    pub camera_owner: Option<StageId>,
    pub camera: CameraState,
    /// Verification run of the active stage, if it has a resource-bearing step.
    pub verification: Option<VerificationRun>,
    /// Scan of the active stage, if its resource-bearing step is a scan.
    pub scan: Option<ScanRun>,
    pub forward_locked: bool,
    pub preview: PreviewSelection,
    pub preview_ready: bool,
}
