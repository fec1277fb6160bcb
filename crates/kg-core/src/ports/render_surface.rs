use std::time::Duration;

use async_trait::async_trait;

use crate::camera::CameraHandle;
use crate::ids::StageId;
use crate::preview::Rgb;
use crate::verification::StatusKind;
use crate::view::{NoticeKind, StepVisual};

/// Presentation collaborator. The core pushes state into it; it calls back
/// only through user intents.
///
/// Failures are reported but never halt the walkthrough.
#[async_trait]
pub trait RenderSurfacePort: Send + Sync {
    async fn activate_stage(&self, stage_id: &StageId) -> anyhow::Result<()>;

    async fn set_step_visual(&self, visual: &StepVisual) -> anyhow::Result<()>;

    async fn set_step_status(&self, stage_id: &StageId, status: StatusKind) -> anyhow::Result<()>;

    /// Show or hide the stage's "next step" control.
    async fn unlock_forward(&self, stage_id: &StageId, unlocked: bool) -> anyhow::Result<()>;

    /// `None` removes any rendered color.
    async fn set_preview_color(&self, color: Option<Rgb>) -> anyhow::Result<()>;

    async fn set_treatment_details(&self, name: &str, note: &str) -> anyhow::Result<()>;

    /// Show the treatment preview hosted by `stage_id` (model plus swatches).
    async fn reveal_preview(&self, stage_id: &StageId) -> anyhow::Result<()>;

    /// The surface hides the notice on its own after `duration`.
    async fn show_transient_notice(
        &self,
        kind: NoticeKind,
        message: &str,
        duration: Duration,
    ) -> anyhow::Result<()>;

    async fn attach_camera(&self, handle: &CameraHandle) -> anyhow::Result<()>;

    async fn detach_camera(&self) -> anyhow::Result<()>;
}
