//! Video generation providers.

mod simulated;

pub use simulated::{SimulatedVideoProvider, PLACEHOLDER_VIDEO_URL};
