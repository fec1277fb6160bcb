use tokio::time::sleep;
use tracing::{debug, info};

use kg_core::scan::ScanEvent;
use kg_core::verification::{VerificationAction, VerificationEvent, VerificationStateMachine};
use kg_core::{ArmingId, Discarded, NoticeKind, StageId};

use super::context::WalkthroughContext;
use super::{report, Completion, WalkthroughError, WalkthroughOrchestrator};

impl WalkthroughOrchestrator {
    /// User pressed the check (or scan) control on the active stage.
    ///
    /// Ignored unless the cursor sits on the stage's resource-bearing step.
    pub(super) async fn trigger_verification_locked(
        &self,
        ctx: &mut WalkthroughContext,
    ) -> Result<(), WalkthroughError> {
        let stage = self.registry().stage(&ctx.active)?;
        let Some(resource) = stage.resource_step else {
            debug!(stage = %stage.id, "stage has no verification step");
            return Ok(());
        };
        if ctx.cursor(stage).index() != resource {
            debug!(stage = %stage.id, "verification triggered away from the check step");
            return Ok(());
        }

        let camera_live = ctx.camera_live_for(&stage.id);
        if stage.runs_scan() {
            self.feed_scan(ctx, &stage.id, ScanEvent::Trigger { camera_live })
                .await;
        } else {
            self.feed_verification(ctx, &stage.id, VerificationEvent::Trigger { camera_live })
                .await;
        }
        Ok(())
    }

    pub(super) async fn on_window_elapsed(
        &self,
        ctx: &mut WalkthroughContext,
        stage: StageId,
        arming: ArmingId,
        attempt: u32,
    ) {
        let discarded = self
            .feed_verification(ctx, &stage, VerificationEvent::WindowElapsed { arming, attempt })
            .await;
        if discarded.is_none() {
            ctx.windows.remove(&stage);
        }
    }

    /// Run one event through the stage's verification run and perform the
    /// resulting actions.
    pub(super) async fn feed_verification(
        &self,
        ctx: &mut WalkthroughContext,
        stage_id: &StageId,
        event: VerificationEvent,
    ) -> Option<Discarded> {
        let Some(run) = ctx.runs.get(stage_id).cloned() else {
            debug!(stage = %stage_id, ?event, "stage has no verification run");
            return Some(Discarded::StaleCompletion);
        };
        let from = run.phase;
        let transition = VerificationStateMachine::transition(run, event);
        if let Some(reason) = transition.discarded {
            debug!(stage = %stage_id, ?event, ?reason, "verification event discarded");
            return Some(reason);
        }
        let to = transition.next.phase;
        ctx.runs.insert(stage_id.clone(), transition.next);
        if from != to {
            info!(stage = %stage_id, ?from, ?to, ?event, "verification phase changed");
        }

        let surface = &self.inner.surface;
        for action in transition.actions {
            match action {
                VerificationAction::RequestCamera => {
                    self.request_camera_locked(ctx, stage_id).await
                }
                VerificationAction::StartWindow { arming, attempt } => {
                    self.start_window(ctx, stage_id, arming, attempt)
                }
                VerificationAction::StopCamera => self.stop_camera_locked(ctx, stage_id).await,
                VerificationAction::Status(kind) => report(
                    surface.set_step_status(stage_id, kind).await,
                    "set_step_status",
                ),
                VerificationAction::NotifySuccess => {
                    let kind = NoticeKind::VerificationSucceeded;
                    report(
                        surface
                            .show_transient_notice(
                                kind,
                                kind.default_message(),
                                self.registry().confirmation_notice(),
                            )
                            .await,
                        "show_transient_notice",
                    );
                    info!(stage = %stage_id, "verification succeeded");
                }
                VerificationAction::UnlockForward => {
                    report(
                        surface.unlock_forward(stage_id, true).await,
                        "unlock_forward",
                    );
                    if let Ok(stage) = self.registry().stage(stage_id) {
                        self.render_step(ctx, stage).await;
                    }
                }
            }
        }
        None
    }

    /// Start the fixed analysis window. Only stage exit cancels it.
    fn start_window(
        &self,
        ctx: &mut WalkthroughContext,
        stage_id: &StageId,
        arming: ArmingId,
        attempt: u32,
    ) {
        let this = self.clone();
        let stage = stage_id.clone();
        let window = self.registry().verification_window();
        let task = tokio::spawn(async move {
            sleep(window).await;
            this.complete(Completion::WindowElapsed {
                stage,
                arming,
                attempt,
            })
            .await;
        });
        if let Some(previous) = ctx.windows.insert(stage_id.clone(), task.abort_handle()) {
            previous.abort();
        }
        debug!(stage = %stage_id, %arming, attempt, ?window, "verification window started");
    }
}
