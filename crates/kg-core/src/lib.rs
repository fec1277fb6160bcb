//! # kg-core
//!
//! Core domain models and state machines for the KilnGuide walkthrough.
//!
//! This crate contains pure business logic without any infrastructure dependencies.
//! Every state machine here is a pure `(state, event) -> (state, actions)`
//! function; performing the actions is the application layer's job.

pub mod appointment;
pub mod camera;
pub mod error;
pub mod ids;
pub mod ports;
pub mod preview;
pub mod registry;
pub mod scan;
pub mod snapshot;
pub mod stepper;
pub mod transition;
pub mod verification;
pub mod view;

// Re-export commonly used types at the crate root
pub use camera::{CameraHandle, CameraSession, CameraState};
pub use error::{CameraError, Discarded, WorkflowError};
pub use ids::{ArmingId, CameraTicket, StageId, TreatmentId};
pub use preview::{PreviewSelection, Rgb};
pub use registry::WorkflowRegistry;
pub use scan::{ScanPhase, ScanRun};
pub use snapshot::WorkflowSnapshot;
pub use stepper::StepCursor;
pub use verification::{StatusKind, VerificationPhase, VerificationRun};
pub use view::{NoticeKind, StepVisual};
