use tracing::debug;

use kg_core::preview::{PreviewAction, PreviewCommand, PreviewEvent, PreviewStateMachine};

use super::context::WalkthroughContext;
use super::{report, WalkthroughError, WalkthroughOrchestrator};

impl WalkthroughOrchestrator {
    pub(super) async fn preview_command_locked(
        &self,
        ctx: &mut WalkthroughContext,
        command: PreviewCommand,
    ) -> Result<(), WalkthroughError> {
        self.feed_preview(ctx, PreviewEvent::Command(command)).await
    }

    /// The preview surface finished loading. Only the first call flushes.
    pub(super) async fn surface_ready_locked(
        &self,
        ctx: &mut WalkthroughContext,
    ) -> Result<(), WalkthroughError> {
        self.feed_preview(ctx, PreviewEvent::SurfaceReady).await
    }

    pub(super) async fn feed_preview(
        &self,
        ctx: &mut WalkthroughContext,
        event: PreviewEvent,
    ) -> Result<(), WalkthroughError> {
        let transition = PreviewStateMachine::transition(
            ctx.preview.clone(),
            event,
            &self.registry().treatments,
        )?;
        if let Some(reason) = transition.discarded {
            debug!(?reason, pending = transition.next.pending.len(), "preview command not applied");
        }
        ctx.preview = transition.next;

        let surface = &self.inner.surface;
        for action in transition.actions {
            match action {
                PreviewAction::SetColor(color) => report(
                    surface.set_preview_color(color).await,
                    "set_preview_color",
                ),
                PreviewAction::ShowDetails { name, note } => report(
                    surface.set_treatment_details(&name, &note).await,
                    "set_treatment_details",
                ),
            }
        }
        Ok(())
    }
}
