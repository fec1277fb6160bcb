use async_trait::async_trait;

use crate::camera::CameraHandle;
use crate::error::CameraError;

/// Platform media provider.
#[async_trait]
pub trait CameraDevicePort: Send + Sync {
    /// Acquire a capture handle. May suspend on a permission prompt for an
    /// arbitrary amount of time.
    async fn acquire(&self) -> Result<CameraHandle, CameraError>;

    /// Release a handle. Synchronous so stage teardown completes before the
    /// next stage's entry logic runs.
    fn release(&self, handle: &CameraHandle);
}
