use std::collections::HashMap;

use tokio::task::AbortHandle;

use kg_core::camera::CameraSession;
use kg_core::preview::PreviewState;
use kg_core::registry::{StageDefinition, WorkflowRegistry};
use kg_core::{
    ArmingId, CameraTicket, ScanRun, StageId, StepCursor, VerificationRun, WorkflowSnapshot,
};

/// Mutable walkthrough state, guarded by the orchestrator's single lock.
///
/// ## Ownership
/// - `active` is the only "active stage" pointer.
/// - `runs`, `scans` and `windows` are stage-scoped and reset on stage exit.
/// - `camera` is the single system-wide session slot, so at most one
///   session can ever be live.
pub(crate) struct WalkthroughContext {
    pub active: StageId,
    pub cursors: HashMap<StageId, StepCursor>,
    pub runs: HashMap<StageId, VerificationRun>,
    pub scans: HashMap<StageId, ScanRun>,
    /// In-flight verification window or scan timer per stage.
    pub windows: HashMap<StageId, AbortHandle>,
    pub camera: Option<CameraSession>,
    pub preview: PreviewState,
    last_arming: ArmingId,
    last_ticket: u64,
}

impl WalkthroughContext {
    pub fn new(registry: &WorkflowRegistry) -> Self {
        let mut context = Self {
            active: registry.initial_stage.clone(),
            cursors: HashMap::new(),
            runs: HashMap::new(),
            scans: HashMap::new(),
            windows: HashMap::new(),
            camera: None,
            preview: PreviewState::default(),
            last_arming: ArmingId(0),
            last_ticket: 0,
        };
        for stage in &registry.stages {
            context.cursors.insert(
                stage.id.clone(),
                StepCursor::new(stage.id.clone(), 0, stage.step_count()),
            );
            if stage.runs_verification() {
                let arming = context.next_arming();
                context
                    .runs
                    .insert(stage.id.clone(), VerificationRun::armed(arming));
            } else if stage.runs_scan() {
                let arming = context.next_arming();
                context.scans.insert(stage.id.clone(), ScanRun::armed(arming));
            }
        }
        context
    }

    pub fn next_arming(&mut self) -> ArmingId {
        self.last_arming = self.last_arming.next();
        self.last_arming
    }

    pub fn next_ticket(&mut self) -> CameraTicket {
        self.last_ticket += 1;
        CameraTicket(self.last_ticket)
    }

    pub fn cursor(&self, stage: &StageDefinition) -> StepCursor {
        self.cursors
            .get(&stage.id)
            .cloned()
            .unwrap_or_else(|| StepCursor::new(stage.id.clone(), 0, stage.step_count()))
    }

    /// The stage's cross-stage edge is gated and verification has not succeeded.
    pub fn forward_locked(&self, stage: &StageDefinition) -> bool {
        stage.gate_on_verification
            && !self
                .runs
                .get(&stage.id)
                .is_some_and(VerificationRun::has_succeeded)
    }

    pub fn camera_live_for(&self, stage_id: &StageId) -> bool {
        self.camera
            .as_ref()
            .is_some_and(|s| &s.owner == stage_id && s.state.is_active())
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot {
            active_stage: Some(self.active.clone()),
            cursors: self
                .cursors
                .iter()
                .map(|(id, cursor)| (id.clone(), cursor.index()))
                .collect(),
        }
    }
}
