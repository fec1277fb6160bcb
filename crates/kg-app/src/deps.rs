//! # Walkthrough Dependencies / 依赖分组
//!
//! **Note / 注意**: This is NOT a Builder pattern.
//! - No build steps / 无构建步骤
//! - No default values / 无默认值
//! - Just parameter grouping / 仅用于参数打包

use std::sync::Arc;

use kg_core::ports::{CameraDevicePort, ClockPort, RenderSurfacePort, SnapshotPort};
use kg_core::WorkflowRegistry;

/// Dependency grouping for [`crate::WalkthroughOrchestrator`].
///
/// All dependencies are required - no defaults, no optional fields.
pub struct WalkthroughDeps {
    /// Static registry, validated before it gets here.
    pub registry: Arc<WorkflowRegistry>,

    // Collaborators / 外部协作者
    pub surface: Arc<dyn RenderSurfacePort>,
    pub camera: Arc<dyn CameraDevicePort>,
    pub clock: Arc<dyn ClockPort>,
    pub snapshot: Arc<dyn SnapshotPort>,
}
