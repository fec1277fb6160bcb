mod tracing_surface;

pub use tracing_surface::TracingRenderSurface;
