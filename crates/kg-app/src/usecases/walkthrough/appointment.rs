use tokio::time::sleep;
use tracing::{debug, info, warn};

use kg_core::appointment::AppointmentRecord;
use kg_core::{Discarded, NoticeKind, StageId};

use super::context::WalkthroughContext;
use super::{report, Completion, WalkthroughError, WalkthroughOrchestrator};

impl WalkthroughOrchestrator {
    /// Confirm the submission now and schedule the advance to the
    /// post-submission step. Fire-and-forget: nothing is retried.
    pub(super) async fn submit_appointment_locked(
        &self,
        stage_id: &StageId,
    ) -> Result<(), WalkthroughError> {
        let record =
            AppointmentRecord::plan(self.registry(), stage_id, self.inner.clock.now_ms())?;

        let kind = NoticeKind::AppointmentConfirmed;
        report(
            self.inner
                .surface
                .show_transient_notice(
                    kind,
                    kind.default_message(),
                    self.registry().confirmation_notice(),
                )
                .await,
            "show_transient_notice",
        );
        info!(
            stage = %stage_id,
            to_stage = %record.target.stage,
            step = record.target.step,
            "appointment submitted"
        );

        let this = self.clone();
        let delay = self.registry().appointment_advance();
        tokio::spawn(async move {
            sleep(delay).await;
            this.complete(Completion::AppointmentDue(record)).await;
        });
        Ok(())
    }

    /// Discarded when the user has left both the submitting stage and the
    /// target stage in the meantime. Repeated completions converge on the
    /// same step.
    pub(super) async fn complete_appointment(
        &self,
        ctx: &mut WalkthroughContext,
        record: AppointmentRecord,
    ) {
        if ctx.active != record.stage_id && ctx.active != record.target.stage {
            debug!(
                stage = %record.stage_id,
                active = %ctx.active,
                reason = ?Discarded::StaleCompletion,
                "appointment advance discarded"
            );
            return;
        }

        let target = record.target;
        let advanced = match self.activate_locked(ctx, &target.stage).await {
            Ok(_) => self.jump_within(ctx, &target.stage, target.step).await,
            Err(err) => Err(err),
        };
        if let Err(err) = advanced {
            warn!(error = %err, "appointment advance failed");
            return;
        }
        info!(stage = %target.stage, step = target.step, "appointment advanced");
        self.persist(ctx).await;
    }
}
