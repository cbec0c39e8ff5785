use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("TLE file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("TLE must be a JSON array of three strings: {0}")]
    InvalidTleFormat(String),
    #[error("Invalid TLE in {source_name}: {message}")]
    InvalidTle {
        source_name: String,
        message: String,
    },
    #[error("Satellite {0} not found in TLE file")]
    SatelliteNotFound(u64),
    #[error("No satellites in TLE file")]
    NoSatellites,
    #[error("Invalid prediction horizon: {0} days")]
    InvalidHorizon(i64),
    #[error("Propagation error: {0}")]
    Propagation(String),
    #[error("Satellite rose at {rise} and did not set within the search window")]
    NeverSets { rise: DateTime<Utc> },
    #[error("Magnitude undefined (range {range_m} m, phase term {phase_term})")]
    Magnitude { range_m: f64, phase_term: f64 },
}

impl From<sgp4::Error> for PredictError {
    fn from(err: sgp4::Error) -> Self {
        PredictError::Propagation(err.to_string())
    }
}
