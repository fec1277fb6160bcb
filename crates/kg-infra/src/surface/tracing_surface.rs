use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use kg_core::ports::RenderSurfacePort;
use kg_core::{CameraHandle, NoticeKind, Rgb, StageId, StatusKind, StepVisual};

/// Render surface that only writes structured log lines.
///
/// Lets the walkthrough run headless (CLI demos, smoke tests).
#[derive(Debug, Default)]
pub struct TracingRenderSurface;

#[async_trait]
impl RenderSurfacePort for TracingRenderSurface {
    async fn activate_stage(&self, stage_id: &StageId) -> anyhow::Result<()> {
        info!(target: "kilnguide::surface", stage = %stage_id, "activate stage");
        Ok(())
    }

    async fn set_step_visual(&self, visual: &StepVisual) -> anyhow::Result<()> {
        info!(
            target: "kilnguide::surface",
            stage = %visual.stage_id,
            step = visual.index + 1,
            of = visual.count,
            can_retreat = visual.can_retreat,
            can_advance = visual.can_advance,
            "step"
        );
        Ok(())
    }

    async fn set_step_status(&self, stage_id: &StageId, status: StatusKind) -> anyhow::Result<()> {
        info!(
            target: "kilnguide::surface",
            stage = %stage_id,
            ?status,
            text = status.default_message(),
            "status"
        );
        Ok(())
    }

    async fn unlock_forward(&self, stage_id: &StageId, unlocked: bool) -> anyhow::Result<()> {
        info!(target: "kilnguide::surface", stage = %stage_id, unlocked, "forward control");
        Ok(())
    }

    async fn set_preview_color(&self, color: Option<Rgb>) -> anyhow::Result<()> {
        match color {
            Some(color) => info!(
                target: "kilnguide::surface",
                r = color.r,
                g = color.g,
                b = color.b,
                "preview color"
            ),
            None => info!(target: "kilnguide::surface", "preview color cleared"),
        }
        Ok(())
    }

    async fn set_treatment_details(&self, name: &str, note: &str) -> anyhow::Result<()> {
        info!(target: "kilnguide::surface", name, note, "treatment");
        Ok(())
    }

    async fn reveal_preview(&self, stage_id: &StageId) -> anyhow::Result<()> {
        info!(target: "kilnguide::surface", stage = %stage_id, "preview revealed");
        Ok(())
    }

    async fn show_transient_notice(
        &self,
        kind: NoticeKind,
        message: &str,
        duration: Duration,
    ) -> anyhow::Result<()> {
        info!(target: "kilnguide::surface", ?kind, text = message, ?duration, "notice");
        Ok(())
    }

    async fn attach_camera(&self, handle: &CameraHandle) -> anyhow::Result<()> {
        info!(target: "kilnguide::surface", handle = %handle.id, "camera attached");
        Ok(())
    }

    async fn detach_camera(&self) -> anyhow::Result<()> {
        info!(target: "kilnguide::surface", "camera detached");
        Ok(())
    }
}
