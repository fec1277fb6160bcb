//! # Dependency Wiring / 依赖注入
//!
//! The only place that knows about concrete adapters. Everything it returns
//! is expressed in terms of `kg-app` / `kg-core` types.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use kg_app::{WalkthroughDeps, WalkthroughOrchestrator};
use kg_core::ports::{CameraDevicePort, RenderSurfacePort};
use kg_core::WorkflowRegistry;
use kg_infra::paths::default_snapshot_path;
use kg_infra::{
    default_registry, load_registry, FileSnapshotRepository, SystemClock,
    TracingRenderSurface, UnavailableCameraDevice,
};

use crate::config::AppConfig;

/// Built-in registry unless the config names a file.
pub fn build_registry(config: &AppConfig) -> anyhow::Result<WorkflowRegistry> {
    if config.registry_path.as_os_str().is_empty() {
        default_registry()
    } else {
        load_registry(&config.registry_path)
    }
}

/// Wire an orchestrator around a caller-provided surface and camera.
///
/// The returned orchestrator has not been resumed yet.
pub fn wire_walkthrough(
    config: &AppConfig,
    surface: Arc<dyn RenderSurfacePort>,
    camera: Arc<dyn CameraDevicePort>,
) -> anyhow::Result<WalkthroughOrchestrator> {
    let registry = build_registry(config).context("Failed to build workflow registry")?;

    let snapshot_path = if config.snapshot_path.as_os_str().is_empty() {
        default_snapshot_path()
    } else {
        config.snapshot_path.clone()
    };
    info!(
        snapshot = %snapshot_path.display(),
        stages = registry.stages.len(),
        "wiring walkthrough"
    );

    Ok(WalkthroughOrchestrator::new(WalkthroughDeps {
        registry: Arc::new(registry),
        surface,
        camera,
        clock: Arc::new(SystemClock),
        snapshot: Arc::new(FileSnapshotRepository::new(snapshot_path)),
    }))
}

/// Log-only surface and no camera; used for smoke runs without a UI.
pub fn wire_headless(config: &AppConfig) -> anyhow::Result<WalkthroughOrchestrator> {
    wire_walkthrough(
        config,
        Arc::new(TracingRenderSurface),
        Arc::new(UnavailableCameraDevice),
    )
}
