mod frames;
mod sgp4_engine;
mod sun;

use chrono::{DateTime, Utc};

use crate::predict::{Observer, PredictError};

pub use sgp4_engine::Sgp4Ephemeris;

/// One geometric rise/transit/set of a satellite over an observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassEvent {
    pub rise: DateTime<Utc>,
    pub rise_azimuth_rad: f64,
    pub transit: DateTime<Utc>,
    pub transit_altitude_rad: f64,
    pub set: DateTime<Utc>,
    pub set_azimuth_rad: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SatellitePosition {
    pub sub_lat_rad: f64,
    pub sub_lon_rad: f64,
    pub azimuth_rad: f64,
    pub altitude_rad: f64,
    pub range_m: f64,
    pub eclipsed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPosition {
    pub azimuth_rad: f64,
    pub altitude_rad: f64,
    pub distance_au: f64,
}

/// Orbital and solar queries the pass predictor is built on.
///
/// Angles are radians. All queries are pure functions of the observer
/// snapshot they receive.
pub trait Ephemeris {
    /// Next rise strictly after `observer.date`, with its transit and set.
    ///
    /// Returns `None` when no rise starts before `until`.
    fn next_pass(
        &self,
        observer: &Observer,
        until: DateTime<Utc>,
    ) -> Result<Option<PassEvent>, PredictError>;

    fn satellite_position(&self, observer: &Observer) -> Result<SatellitePosition, PredictError>;

    fn sun_position(&self, observer: &Observer) -> Result<SunPosition, PredictError>;
}
