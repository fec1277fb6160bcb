use tracing::{debug, info};

use kg_core::registry::StageDefinition;
use kg_core::stepper::{StepCommand, StepContext, StepOutcome, StepperStateMachine};
use kg_core::{StageId, StatusKind, StepCursor};

use super::context::WalkthroughContext;
use super::{report, WalkthroughError, WalkthroughOrchestrator};

impl WalkthroughOrchestrator {
    /// Apply a step command to the active stage.
    ///
    /// Returns whether any cursor or the active stage changed.
    pub(super) async fn step_locked(
        &self,
        ctx: &mut WalkthroughContext,
        command: StepCommand,
    ) -> Result<bool, WalkthroughError> {
        let stage = self.registry().stage(&ctx.active)?;
        let step_ctx = StepContext {
            next: stage.next.as_ref(),
            forward_locked: ctx.forward_locked(stage),
        };
        let (cursor, outcome) = StepperStateMachine::transition(ctx.cursor(stage), command, step_ctx);

        match outcome {
            StepOutcome::Moved { from, to } => {
                debug!(stage = %stage.id, from, to, "step moved");
                self.apply_cursor(ctx, stage, cursor, from).await;
                Ok(true)
            }
            StepOutcome::Unchanged => Ok(false),
            StepOutcome::ForwardLocked => {
                info!(stage = %stage.id, "forward transition locked until verification succeeds");
                Ok(false)
            }
            StepOutcome::LeaveStage { target } => {
                self.activate_locked(ctx, &target.stage).await?;
                self.jump_within(ctx, &target.stage, target.step).await?;
                Ok(true)
            }
        }
    }

    /// Move the cursor of `stage_id` to `index` (clamped).
    pub(super) async fn jump_within(
        &self,
        ctx: &mut WalkthroughContext,
        stage_id: &StageId,
        index: usize,
    ) -> Result<(), WalkthroughError> {
        let stage = self.registry().stage(stage_id)?;
        let current = ctx.cursor(stage);
        let from = current.index();
        self.apply_cursor(ctx, stage, current.with_index(index), from)
            .await;
        Ok(())
    }

    /// Store `cursor` and run the resource-step hooks.
    ///
    /// Leaving the resource-bearing step tears its camera and run down;
    /// reaching it announces the check.
    async fn apply_cursor(
        &self,
        ctx: &mut WalkthroughContext,
        stage: &StageDefinition,
        cursor: StepCursor,
        from: usize,
    ) {
        let to = cursor.index();
        ctx.cursors.insert(stage.id.clone(), cursor);

        if let Some(resource) = stage.resource_step {
            if from == resource && to != resource {
                self.teardown_stage(ctx, &stage.id).await;
            }
            if to == resource && from != resource {
                report(
                    self.inner
                        .surface
                        .set_step_status(&stage.id, StatusKind::ReachedCheckStep)
                        .await,
                    "set_step_status",
                );
            }
        }
        self.render_step(ctx, stage).await;
    }
}
