//! Error taxonomy for the walkthrough core.
//!
//! 核心错误分类：致命的编程错误、可恢复的相机错误、以及静默丢弃的情况。

use crate::ids::{StageId, TreatmentId};

/// Fatal errors: invalid static configuration or a caller bug.
///
/// These are never user-recoverable and never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("unknown stage: {0}")]
    UnknownStage(StageId),
    #[error("unknown treatment: {0}")]
    UnknownTreatment(TreatmentId),
    #[error("stage {0} has no appointment flow")]
    NoAppointmentFlow(StageId),
    #[error("invalid registry: {0}")]
    InvalidRegistry(String),
}

/// Camera acquisition failures. Always recoverable: the verification step
/// degrades to its no-camera path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, serde::Serialize, serde::Deserialize)]
pub enum CameraError {
    #[error("camera permission denied")]
    Denied,
    #[error("no camera available on this device")]
    Unavailable,
    #[error("camera device error: {0}")]
    Device(String),
}

/// Expected, non-error outcomes that leave state untouched.
///
/// Logged at debug level, never surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Discarded {
    /// A timer or camera completion arrived for a run/session that no longer owns it.
    StaleCompletion,
    /// Toggling the processed flag with nothing selected.
    InvalidToggle,
    /// Triggering verification while a phase is already in flight.
    ReentrantTrigger,
    /// A preview command arrived before the surface finished loading; it was queued.
    SurfaceNotReady,
}
