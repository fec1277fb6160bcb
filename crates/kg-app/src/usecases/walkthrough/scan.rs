use tokio::time::sleep;
use tracing::{debug, info, warn};

use kg_core::preview::PreviewEvent;
use kg_core::scan::{ScanAction, ScanEvent, ScanStateMachine, ScanTimer};
use kg_core::{ArmingId, Discarded, StageId};

use super::context::WalkthroughContext;
use super::{report, Completion, WalkthroughOrchestrator};

impl WalkthroughOrchestrator {
    pub(super) async fn on_scan_timer_elapsed(
        &self,
        ctx: &mut WalkthroughContext,
        stage: StageId,
        arming: ArmingId,
        timer: ScanTimer,
    ) {
        // The handle in `windows` belongs to this timer only while the arming matches.
        if ctx.scans.get(&stage).is_some_and(|scan| scan.arming == arming) {
            ctx.windows.remove(&stage);
        }
        self.feed_scan(ctx, &stage, ScanEvent::TimerElapsed { arming, timer })
            .await;
    }

    /// Run one event through the stage's scan and perform the resulting
    /// actions.
    pub(super) async fn feed_scan(
        &self,
        ctx: &mut WalkthroughContext,
        stage_id: &StageId,
        event: ScanEvent,
    ) -> Option<Discarded> {
        let Some(scan) = ctx.scans.get(stage_id).cloned() else {
            debug!(stage = %stage_id, ?event, "stage has no scan");
            return Some(Discarded::StaleCompletion);
        };
        let from = scan.phase;
        let transition = ScanStateMachine::transition(scan, event);
        if let Some(reason) = transition.discarded {
            debug!(stage = %stage_id, ?event, ?reason, "scan event discarded");
            return Some(reason);
        }
        let to = transition.next.phase;
        ctx.scans.insert(stage_id.clone(), transition.next);
        if from != to {
            info!(stage = %stage_id, ?from, ?to, ?event, "scan phase changed");
        }

        for action in transition.actions {
            match action {
                ScanAction::RequestCamera => self.request_camera_locked(ctx, stage_id).await,
                ScanAction::StartTimer { arming, timer } => {
                    self.start_scan_timer(ctx, stage_id, arming, timer)
                }
                ScanAction::StopCamera => self.stop_camera_locked(ctx, stage_id).await,
                ScanAction::Status(kind) => report(
                    self.inner.surface.set_step_status(stage_id, kind).await,
                    "set_step_status",
                ),
                ScanAction::RevealPreview => self.reveal_preview(ctx, stage_id).await,
            }
        }
        None
    }

    /// Show the preview and treat it as loaded, flushing queued selections.
    async fn reveal_preview(&self, ctx: &mut WalkthroughContext, stage_id: &StageId) {
        report(
            self.inner.surface.reveal_preview(stage_id).await,
            "reveal_preview",
        );
        if let Err(err) = self.feed_preview(ctx, PreviewEvent::SurfaceReady).await {
            warn!(stage = %stage_id, error = %err, "preview flush after scan failed");
        }
        info!(stage = %stage_id, "preview revealed");
    }

    fn start_scan_timer(
        &self,
        ctx: &mut WalkthroughContext,
        stage_id: &StageId,
        arming: ArmingId,
        timer: ScanTimer,
    ) {
        let delay = match timer {
            ScanTimer::Settle => self.registry().scan_settle(),
            ScanTimer::Window => self.registry().scan_window(),
        };
        let this = self.clone();
        let stage = stage_id.clone();
        let task = tokio::spawn(async move {
            sleep(delay).await;
            this.complete(Completion::ScanTimerElapsed {
                stage,
                arming,
                timer,
            })
            .await;
        });
        if let Some(previous) = ctx.windows.insert(stage_id.clone(), task.abort_handle()) {
            previous.abort();
        }
        debug!(stage = %stage_id, %arming, ?timer, ?delay, "scan timer started");
    }
}
