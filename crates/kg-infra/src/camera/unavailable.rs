use async_trait::async_trait;
use tracing::debug;

use kg_core::ports::CameraDevicePort;
use kg_core::{CameraError, CameraHandle};

/// Camera provider for hosts without capture support.
///
/// Every acquisition fails with [`CameraError::Unavailable`], which the
/// walkthrough treats as the no-camera path.
#[derive(Debug, Default)]
pub struct UnavailableCameraDevice;

#[async_trait]
impl CameraDevicePort for UnavailableCameraDevice {
    async fn acquire(&self) -> Result<CameraHandle, CameraError> {
        debug!("camera requested on a host without capture support");
        Err(CameraError::Unavailable)
    }

    fn release(&self, handle: &CameraHandle) {
        debug!(handle = %handle.id, "release ignored, no device");
    }
}
