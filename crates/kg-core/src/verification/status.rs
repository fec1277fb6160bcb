use serde::{Deserialize, Serialize};

/// Step-local status shown next to a resource-bearing step.
///
/// The render surface owns the final copy; [`StatusKind::default_message`]
/// is the built-in English text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Idle,
    ReachedCheckStep,
    OpeningCamera,
    CameraReady,
    CameraUnavailable,
    Scanning,
    IssuesFound,
    Succeeded,
    /// Scan flow: camera is live, scanning starts shortly.
    ScanHold,
    ScanComplete,
    /// Scan flow without a camera: the sample piece is shown instead.
    SampleShown,
}

impl StatusKind {
    pub fn default_message(self) -> &'static str {
        match self {
            StatusKind::Idle => "Follow the steps. The checker appears at the check step.",
            StatusKind::ReachedCheckStep => {
                "You've reached the check step. Tap the button to set up the checker."
            }
            StatusKind::OpeningCamera => {
                "We're opening your camera. Allow access, then you can start scanning."
            }
            StatusKind::CameraReady => "Align your piece inside the shape, then tap \"Scan and check\".",
            StatusKind::CameraUnavailable => {
                "Camera not available. You can still tap \"Scan and check\" to continue."
            }
            StatusKind::Scanning => "Scanning your piece... hold still.",
            StatusKind::IssuesFound => {
                "The rim looks uneven in a few places. Smooth it and scan again."
            }
            StatusKind::Succeeded => "Your piece looks ready. You can continue to the next stage.",
            StatusKind::ScanHold => "Hold your piece in front of the camera. Scanning will start...",
            StatusKind::ScanComplete => {
                "Scan complete. Rotate your piece and try different glazes below."
            }
            StatusKind::SampleShown => {
                "Camera not available. Here's a sample piece you can still try colors on."
            }
        }
    }
}
