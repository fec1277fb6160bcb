//! Walkthrough orchestrator.
//!
//! This module coordinates the pure state machines from `kg-core` with the
//! render surface, the camera device and the timers. Every user intent goes
//! through [`WalkthroughOrchestrator::dispatch`], which holds the single
//! context lock for the whole transition; timer and camera completions take
//! the same lock and check that they still own the state they touch.

mod appointment;
mod camera;
mod context;
mod error;
mod intent;
mod navigation;
mod preview;
mod scan;
mod stepper;
mod verification;
mod view;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::field::Empty;
use tracing::{debug, info, info_span, warn, Instrument};

use kg_core::appointment::AppointmentRecord;
use kg_core::ports::{CameraDevicePort, ClockPort, RenderSurfacePort, SnapshotPort};
use kg_core::preview::PreviewCommand;
use kg_core::registry::StageDefinition;
use kg_core::scan::ScanTimer;
use kg_core::stepper::StepCommand;
use kg_core::{
    ArmingId, CameraError, CameraHandle, CameraState, CameraTicket, StageId, StepCursor,
    StepVisual, TreatmentId, WorkflowRegistry, WorkflowSnapshot,
};

use crate::deps::WalkthroughDeps;
use context::WalkthroughContext;

pub use error::WalkthroughError;
pub use intent::UserIntent;
pub use view::WalkthroughView;

type CompletionFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Results of suspended work that re-enter the orchestrator.
///
/// Each carries the token it was started with so the handler can tell
/// whether it still owns the state it is about to touch.
#[derive(Debug)]
pub(crate) enum Completion {
    CameraSettled {
        owner: StageId,
        ticket: CameraTicket,
        result: Result<CameraHandle, CameraError>,
    },
    WindowElapsed {
        stage: StageId,
        arming: ArmingId,
        attempt: u32,
    },
    ScanTimerElapsed {
        stage: StageId,
        arming: ArmingId,
        timer: ScanTimer,
    },
    AppointmentDue(AppointmentRecord),
}

impl Completion {
    fn kind(&self) -> &'static str {
        match self {
            Completion::CameraSettled { .. } => "camera_settled",
            Completion::WindowElapsed { .. } => "window_elapsed",
            Completion::ScanTimerElapsed { .. } => "scan_timer_elapsed",
            Completion::AppointmentDue(_) => "appointment_due",
        }
    }

    fn stage(&self) -> &StageId {
        match self {
            Completion::CameraSettled { owner, .. } => owner,
            Completion::WindowElapsed { stage, .. }
            | Completion::ScanTimerElapsed { stage, .. } => stage,
            Completion::AppointmentDue(record) => &record.stage_id,
        }
    }

    /// Staleness token the completion is checked against, if any.
    fn token(&self) -> Option<String> {
        match self {
            Completion::CameraSettled { ticket, .. } => Some(ticket.to_string()),
            Completion::WindowElapsed { arming, .. }
            | Completion::ScanTimerElapsed { arming, .. } => Some(arming.to_string()),
            Completion::AppointmentDue(_) => None,
        }
    }
}

struct Inner {
    registry: Arc<WorkflowRegistry>,
    surface: Arc<dyn RenderSurfacePort>,
    camera: Arc<dyn CameraDevicePort>,
    clock: Arc<dyn ClockPort>,
    snapshot: Arc<dyn SnapshotPort>,
    context: Mutex<WalkthroughContext>,
}

/// Orchestrator that drives the walkthrough state and its side effects.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct WalkthroughOrchestrator {
    inner: Arc<Inner>,
}

impl WalkthroughOrchestrator {
    pub fn new(deps: WalkthroughDeps) -> Self {
        let WalkthroughDeps {
            registry,
            surface,
            camera,
            clock,
            snapshot,
        } = deps;
        let context = WalkthroughContext::new(&registry);

        Self {
            inner: Arc::new(Inner {
                registry,
                surface,
                camera,
                clock,
                snapshot,
                context: Mutex::new(context),
            }),
        }
    }

    pub fn registry(&self) -> &WorkflowRegistry {
        &self.inner.registry
    }

    /// Restore saved progress (if any) and render the active stage.
    ///
    /// A snapshot that cannot be loaded is logged and ignored; the walkthrough
    /// then starts at the registry's initial stage.
    pub async fn resume(&self) -> Result<WalkthroughView, WalkthroughError> {
        let snapshot = match self.inner.snapshot.load().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(error = %err, "failed to load walkthrough snapshot, starting fresh");
                None
            }
        };

        let mut ctx = self.inner.context.lock().await;
        if let Some(snapshot) = snapshot {
            self.apply_snapshot(&mut ctx, snapshot);
        }
        let stage = self.registry().stage(&ctx.active)?;
        info!(stage = %stage.id, index = ctx.cursor(stage).index(), "walkthrough resumed");
        self.enter_stage(&ctx, stage).await;
        Ok(self.project(&ctx))
    }

    /// Single entry point for user intents.
    pub async fn dispatch(&self, intent: UserIntent) -> Result<WalkthroughView, WalkthroughError> {
        let span = info_span!("usecase.walkthrough.dispatch", intent = ?intent);
        async {
            let mut ctx = self.inner.context.lock().await;
            let navigated = match intent {
                UserIntent::Advance => self.step_locked(&mut ctx, StepCommand::Advance).await?,
                UserIntent::Retreat => self.step_locked(&mut ctx, StepCommand::Retreat).await?,
                UserIntent::Jump { index } => {
                    self.step_locked(&mut ctx, StepCommand::JumpTo(index)).await?
                }
                UserIntent::StageJump { stage_id } => {
                    self.activate_locked(&mut ctx, &stage_id).await?
                }
                UserIntent::TriggerVerification => {
                    self.trigger_verification_locked(&mut ctx).await?;
                    false
                }
                UserIntent::SelectTreatment { treatment_id } => {
                    self.preview_command_locked(&mut ctx, PreviewCommand::Select(treatment_id))
                        .await?;
                    false
                }
                UserIntent::ToggleProcessed => {
                    self.preview_command_locked(&mut ctx, PreviewCommand::ToggleProcessed)
                        .await?;
                    false
                }
                UserIntent::ResetPreview => {
                    self.preview_command_locked(&mut ctx, PreviewCommand::Reset)
                        .await?;
                    false
                }
                UserIntent::SurfaceReady => {
                    self.surface_ready_locked(&mut ctx).await?;
                    false
                }
                UserIntent::SubmitAppointment { stage_id } => {
                    self.submit_appointment_locked(&stage_id).await?;
                    false
                }
            };
            if navigated {
                self.persist(&ctx).await;
            }
            Ok(self.project(&ctx))
        }
        .instrument(span)
        .await
    }

    pub async fn activate(
        &self,
        stage_id: &StageId,
    ) -> Result<WalkthroughView, WalkthroughError> {
        self.dispatch(UserIntent::StageJump {
            stage_id: stage_id.clone(),
        })
        .await
    }

    pub async fn advance(&self) -> Result<WalkthroughView, WalkthroughError> {
        self.dispatch(UserIntent::Advance).await
    }

    pub async fn retreat(&self) -> Result<WalkthroughView, WalkthroughError> {
        self.dispatch(UserIntent::Retreat).await
    }

    pub async fn jump_to(&self, index: usize) -> Result<WalkthroughView, WalkthroughError> {
        self.dispatch(UserIntent::Jump { index }).await
    }

    pub async fn trigger_verification(&self) -> Result<WalkthroughView, WalkthroughError> {
        self.dispatch(UserIntent::TriggerVerification).await
    }

    pub async fn select_treatment(
        &self,
        treatment_id: &TreatmentId,
    ) -> Result<WalkthroughView, WalkthroughError> {
        self.dispatch(UserIntent::SelectTreatment {
            treatment_id: treatment_id.clone(),
        })
        .await
    }

    pub async fn toggle_processed(&self) -> Result<WalkthroughView, WalkthroughError> {
        self.dispatch(UserIntent::ToggleProcessed).await
    }

    pub async fn reset_preview(&self) -> Result<WalkthroughView, WalkthroughError> {
        self.dispatch(UserIntent::ResetPreview).await
    }

    pub async fn surface_ready(&self) -> Result<WalkthroughView, WalkthroughError> {
        self.dispatch(UserIntent::SurfaceReady).await
    }

    pub async fn submit_appointment(
        &self,
        stage_id: &StageId,
    ) -> Result<WalkthroughView, WalkthroughError> {
        self.dispatch(UserIntent::SubmitAppointment {
            stage_id: stage_id.clone(),
        })
        .await
    }

    pub async fn view(&self) -> WalkthroughView {
        let ctx = self.inner.context.lock().await;
        self.project(&ctx)
    }

    pub async fn snapshot(&self) -> WorkflowSnapshot {
        self.inner.context.lock().await.snapshot()
    }

    /// Re-enter with the result of suspended work.
    ///
    /// Returns a boxed future so spawned tasks can name it; the handlers below
    /// may themselves spawn further completions.
    fn complete(&self, completion: Completion) -> CompletionFuture<'_> {
        Box::pin(async move {
            let span = info_span!(
                "usecase.walkthrough.complete",
                kind = completion.kind(),
                stage = %completion.stage(),
                token = Empty,
            );
            if let Some(token) = completion.token() {
                span.record("token", token.as_str());
            }
            async {
                let mut ctx = self.inner.context.lock().await;
                match completion {
                    Completion::CameraSettled {
                        owner,
                        ticket,
                        result,
                    } => self.on_camera_settled(&mut ctx, owner, ticket, result).await,
                    Completion::WindowElapsed {
                        stage,
                        arming,
                        attempt,
                    } => self.on_window_elapsed(&mut ctx, stage, arming, attempt).await,
                    Completion::ScanTimerElapsed {
                        stage,
                        arming,
                        timer,
                    } => self.on_scan_timer_elapsed(&mut ctx, stage, arming, timer).await,
                    Completion::AppointmentDue(record) => {
                        self.complete_appointment(&mut ctx, record).await
                    }
                }
            }
            .instrument(span)
            .await
        })
    }

    fn project(&self, ctx: &WalkthroughContext) -> WalkthroughView {
        let stage = self.registry().stage(&ctx.active).ok();
        let cursor = match stage {
            Some(stage) => ctx.cursor(stage),
            None => StepCursor::new(ctx.active.clone(), 0, 1),
        };
        WalkthroughView {
            active_stage: ctx.active.clone(),
            cursor,
            camera_owner: ctx.camera.as_ref().map(|s| s.owner.clone()),
            camera: ctx
                .camera
                .as_ref()
                .map(|s| s.state.clone())
                .unwrap_or(CameraState::Idle),
            verification: ctx.runs.get(&ctx.active).cloned(),
            scan: ctx.scans.get(&ctx.active).cloned(),
            forward_locked: stage.is_some_and(|s| ctx.forward_locked(s)),
            preview: ctx.preview.selection.clone(),
            preview_ready: ctx.preview.surface_ready,
        }
    }

    async fn render_step(&self, ctx: &WalkthroughContext, stage: &StageDefinition) {
        let cursor = ctx.cursor(stage);
        let can_advance =
            !cursor.is_last() || (stage.next.is_some() && !ctx.forward_locked(stage));
        let visual = StepVisual {
            stage_id: stage.id.clone(),
            index: cursor.index(),
            count: cursor.count(),
            can_retreat: !cursor.is_first(),
            can_advance,
        };
        report(
            self.inner.surface.set_step_visual(&visual).await,
            "set_step_visual",
        );
    }

    async fn persist(&self, ctx: &WalkthroughContext) {
        let snapshot = ctx.snapshot();
        match self.inner.snapshot.save(&snapshot).await {
            Ok(()) => debug!(active = %ctx.active, "walkthrough snapshot saved"),
            Err(err) => warn!(error = %err, "failed to save walkthrough snapshot"),
        }
    }

    fn apply_snapshot(&self, ctx: &mut WalkthroughContext, snapshot: WorkflowSnapshot) {
        for (stage_id, index) in snapshot.cursors {
            match self.registry().stage(&stage_id) {
                Ok(stage) => {
                    let cursor = StepCursor::new(stage_id.clone(), index, stage.step_count());
                    ctx.cursors.insert(stage_id, cursor);
                }
                Err(_) => warn!(stage = %stage_id, "snapshot references unknown stage, ignored"),
            }
        }
        if let Some(active) = snapshot.active_stage {
            if self.registry().contains_stage(&active) {
                ctx.active = active;
            } else {
                warn!(stage = %active, "snapshot active stage unknown, keeping initial stage");
            }
        }
    }
}

/// Surface failures degrade to a log line; the walkthrough stays navigable.
fn report(result: anyhow::Result<()>, op: &'static str) {
    if let Err(err) = result {
        warn!(op, error = %err, "render surface call failed");
    }
}
