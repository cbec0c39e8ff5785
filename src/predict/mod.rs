mod error;
mod ground_station;
mod magnitude;
mod pass_finder;
mod report;
mod sampler;
#[cfg(test)]
mod testing;
mod tle_loader;
mod types;

pub use error::PredictError;
pub use ground_station::{GroundStation, Observer, WGS84_A_KM, WGS84_E2};
pub use magnitude::AU_KM;
pub use pass_finder::predict_passes;
pub use report::{PassReport, PointReport, VisibleReport};
pub use tle_loader::{warn_if_stale, TleLoader, TleSet};

/// Height of the observer above sea level for CLI and web predictions
pub const OBSERVER_ELEVATION_M: f64 = 50.0;
