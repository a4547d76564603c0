// Analysis module - orientation processing for rep detection
//
// Pipeline per tick:
// - angle: raw headset Euler angles → normalized orientation (180° shift)
// - detector: normalized orientation + calibrated poses → pose/rep events

pub mod angle;
pub mod detector;

pub use angle::{angular_delta, normalize, NormalizedOrientation, Orientation};
pub use detector::{DetectorUpdate, RepDetector};

#[cfg(test)]
mod tests;
