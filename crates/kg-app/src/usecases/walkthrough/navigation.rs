use tracing::{debug, info};

use kg_core::registry::{CursorPolicy, StageDefinition};
use kg_core::scan::{ScanEvent, ScanStateMachine};
use kg_core::verification::{VerificationEvent, VerificationStateMachine};
use kg_core::{StageId, StatusKind, StepCursor};

use super::context::WalkthroughContext;
use super::{report, WalkthroughError, WalkthroughOrchestrator};

impl WalkthroughOrchestrator {
    /// Make `target` the single active stage.
    ///
    /// The previous stage is torn down before the new one's entry logic runs.
    /// Returns `false` when `target` was already active (no teardown).
    pub(super) async fn activate_locked(
        &self,
        ctx: &mut WalkthroughContext,
        target: &StageId,
    ) -> Result<bool, WalkthroughError> {
        let stage = self.registry().stage(target)?;
        if &ctx.active == target {
            debug!(stage = %target, "stage already active");
            return Ok(false);
        }

        let previous = ctx.active.clone();
        self.teardown_stage(ctx, &previous).await;

        ctx.active = stage.id.clone();
        if stage.cursor_policy == CursorPolicy::ResetOnEntry {
            ctx.cursors.insert(
                stage.id.clone(),
                StepCursor::new(stage.id.clone(), 0, stage.step_count()),
            );
        }
        self.enter_stage(ctx, stage).await;

        info!(from = %previous, to = %stage.id, "stage activated");
        Ok(true)
    }

    /// Push the entry state of `stage` to the render surface.
    pub(super) async fn enter_stage(&self, ctx: &WalkthroughContext, stage: &StageDefinition) {
        let surface = &self.inner.surface;
        report(surface.activate_stage(&stage.id).await, "activate_stage");
        self.render_step(ctx, stage).await;

        if let Some(resource) = stage.resource_step {
            let status = if ctx.cursor(stage).index() == resource {
                StatusKind::ReachedCheckStep
            } else {
                StatusKind::Idle
            };
            report(
                surface.set_step_status(&stage.id, status).await,
                "set_step_status",
            );
        }
        if stage.gate_on_verification {
            report(
                surface
                    .unlock_forward(&stage.id, !ctx.forward_locked(stage))
                    .await,
                "unlock_forward",
            );
        }
        if stage.hosts_preview && ctx.preview.surface_ready {
            report(
                surface
                    .set_preview_color(ctx.preview.selection.render_color)
                    .await,
                "set_preview_color",
            );
        }
    }

    /// Release everything scoped to `stage_id`: its camera session, its
    /// pending timer, and its verification or scan progress (re-armed from
    /// `Idle`).
    pub(super) async fn teardown_stage(&self, ctx: &mut WalkthroughContext, stage_id: &StageId) {
        self.stop_camera_locked(ctx, stage_id).await;

        if let Some(window) = ctx.windows.remove(stage_id) {
            window.abort();
            debug!(stage = %stage_id, "pending verification window discarded");
        }

        let run = ctx.runs.get(stage_id).cloned();
        let scan = ctx.scans.get(stage_id).cloned();
        if run.is_none() && scan.is_none() {
            return;
        }
        let arming = ctx.next_arming();
        if let Some(run) = run {
            let transition =
                VerificationStateMachine::transition(run, VerificationEvent::Reset { arming });
            ctx.runs.insert(stage_id.clone(), transition.next);
        }
        if let Some(scan) = scan {
            let transition = ScanStateMachine::transition(scan, ScanEvent::Reset { arming });
            ctx.scans.insert(stage_id.clone(), transition.next);
        }

        let surface = &self.inner.surface;
        let gated = self
            .registry()
            .stage(stage_id)
            .is_ok_and(|stage| stage.gate_on_verification);
        if gated {
            report(
                surface.unlock_forward(stage_id, false).await,
                "unlock_forward",
            );
        }
        report(
            surface.set_step_status(stage_id, StatusKind::Idle).await,
            "set_step_status",
        );
        debug!(stage = %stage_id, %arming, "stage resources re-armed");
    }
}
