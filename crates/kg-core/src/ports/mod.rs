//! Port interfaces for the application layer
//!
//! Ports define the contract between the walkthrough orchestration and its
//! external collaborators: the render surface, the platform camera, the
//! clock and the progress store. The core never talks to a browser, a
//! device or a file directly.

mod camera_device;
mod clock;
mod render_surface;
mod snapshot;

pub use camera_device::CameraDevicePort;
pub use clock::ClockPort;
pub use render_surface::RenderSurfacePort;
pub use snapshot::SnapshotPort;
