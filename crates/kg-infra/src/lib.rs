//! KilnGuide infrastructure adapters: clock, progress snapshot file,
//! registry loading, and headless camera/render-surface stand-ins.

pub mod camera;
pub mod paths;
pub mod registry;
pub mod snapshot_state;
pub mod surface;
pub mod time;

pub use camera::UnavailableCameraDevice;
pub use registry::{default_registry, load_registry};
pub use snapshot_state::FileSnapshotRepository;
pub use surface::TracingRenderSurface;
pub use time::SystemClock;
