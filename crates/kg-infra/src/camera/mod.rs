mod unavailable;

pub use unavailable::UnavailableCameraDevice;
