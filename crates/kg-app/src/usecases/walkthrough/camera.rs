use tracing::{debug, info, warn};

use kg_core::camera::{CameraAction, CameraEvent, CameraStateMachine};
use kg_core::scan::ScanEvent;
use kg_core::verification::VerificationEvent;
use kg_core::{CameraError, CameraHandle, CameraSession, CameraTicket, Discarded, StageId};

use super::context::WalkthroughContext;
use super::{report, Completion, WalkthroughOrchestrator};

impl WalkthroughOrchestrator {
    /// Start acquiring the camera for `owner`.
    ///
    /// A session held by any other stage is stopped first, so at most one
    /// session is ever live.
    pub(super) async fn request_camera_locked(&self, ctx: &mut WalkthroughContext, owner: &StageId) {
        let other = ctx
            .camera
            .as_ref()
            .filter(|session| &session.owner != owner)
            .map(|session| session.owner.clone());
        if let Some(other) = other {
            info!(from = %other, to = %owner, "camera handed over between stages");
            self.stop_camera_locked(ctx, &other).await;
        }

        let ticket = ctx.next_ticket();
        let session = ctx
            .camera
            .take()
            .unwrap_or_else(|| CameraSession::new(owner.clone()));
        let transition =
            CameraStateMachine::transition(session.state, CameraEvent::Request { ticket });
        ctx.camera = Some(CameraSession {
            owner: owner.clone(),
            state: transition.next,
        });
        if let Some(reason) = transition.discarded {
            debug!(stage = %owner, ?reason, "camera request ignored");
        }
        self.execute_camera_actions(owner, transition.actions).await;
    }

    /// Stop the session if `owner` holds it. Safe to call repeatedly.
    pub(super) async fn stop_camera_locked(&self, ctx: &mut WalkthroughContext, owner: &StageId) {
        let session = match ctx.camera.take() {
            Some(session) if &session.owner == owner => session,
            other => {
                ctx.camera = other;
                return;
            }
        };
        let transition = CameraStateMachine::transition(session.state, CameraEvent::Stop);
        debug!(stage = %owner, state = ?transition.next, "camera session stopped");
        self.execute_camera_actions(owner, transition.actions).await;
    }

    pub(super) async fn on_camera_settled(
        &self,
        ctx: &mut WalkthroughContext,
        owner: StageId,
        ticket: CameraTicket,
        result: Result<CameraHandle, CameraError>,
    ) {
        let session = match ctx.camera.take() {
            Some(session) if session.owner == owner => session,
            other => {
                ctx.camera = other;
                debug!(
                    stage = %owner,
                    %ticket,
                    reason = ?Discarded::StaleCompletion,
                    "camera settled for a torn-down session"
                );
                if let Ok(handle) = result {
                    self.inner.camera.release(&handle);
                }
                return;
            }
        };

        let denied = result.as_ref().err().cloned();
        let transition =
            CameraStateMachine::transition(session.state, CameraEvent::Settled { ticket, result });
        let available = transition.next.is_active();
        ctx.camera = Some(CameraSession {
            owner: owner.clone(),
            state: transition.next,
        });
        self.execute_camera_actions(&owner, transition.actions).await;

        if let Some(reason) = transition.discarded {
            debug!(stage = %owner, %ticket, ?reason, "camera completion discarded");
            return;
        }
        match denied {
            Some(error) => warn!(stage = %owner, %error, "camera unavailable, continuing without live feed"),
            None => info!(stage = %owner, %ticket, "camera granted"),
        }

        if let Some(arming) = ctx.runs.get(&owner).map(|run| run.arming) {
            self.feed_verification(
                ctx,
                &owner,
                VerificationEvent::CameraSettled { arming, available },
            )
            .await;
        } else if let Some(arming) = ctx.scans.get(&owner).map(|scan| scan.arming) {
            self.feed_scan(ctx, &owner, ScanEvent::CameraSettled { arming, available })
                .await;
        }
    }

    async fn execute_camera_actions(&self, owner: &StageId, actions: Vec<CameraAction>) {
        for action in actions {
            match action {
                CameraAction::Acquire { ticket } => self.spawn_acquire(owner.clone(), ticket),
                CameraAction::Attach { handle } => report(
                    self.inner.surface.attach_camera(&handle).await,
                    "attach_camera",
                ),
                CameraAction::Detach => {
                    report(self.inner.surface.detach_camera().await, "detach_camera")
                }
                CameraAction::Release { handle } => {
                    self.inner.camera.release(&handle);
                    debug!(stage = %owner, handle = %handle.id, "camera handle released");
                }
            }
        }
    }

    fn spawn_acquire(&self, owner: StageId, ticket: CameraTicket) {
        let this = self.clone();
        tokio::spawn(async move {
            let result = this.inner.camera.acquire().await;
            this.complete(Completion::CameraSettled {
                owner,
                ticket,
                result,
            })
            .await;
        });
    }
}
