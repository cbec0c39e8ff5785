use std::f64::consts::PI;

use crate::predict::error::PredictError;
use crate::predict::ground_station::WGS84_A_KM;

pub const AU_KM: f64 = 149_597_871.0;
/// Magnitude of the reference body at 1000 km and 90° phase angle
pub const STANDARD_MAG: f64 = -1.3;

/// Apparent visual magnitude of a sunlit satellite.
///
/// Solves the Sun / observer / satellite triangle from the slant range, the
/// Sun's distance and the angle between both on the observer's sky, then
/// applies a diffuse-sphere phase law. Angles are radians.
pub fn apparent_magnitude(
    range_m: f64,
    sat_azimuth: f64,
    sat_altitude: f64,
    sun_distance_au: f64,
    sun_azimuth: f64,
    sun_altitude: f64,
) -> Result<f64, PredictError> {
    let a = sun_distance_au * AU_KM - WGS84_A_KM;
    let b = range_m / 1000.0;
    let angle_c = angular_separation(sat_azimuth, sat_altitude, sun_azimuth, sun_altitude);
    let c = (a * a + b * b - 2.0 * a * b * angle_c.cos()).sqrt();
    let phase_angle = ((b * b + c * c - a * a) / (2.0 * b * c)).acos();

    let phase_term = phase_angle.sin() + (PI - phase_angle) * phase_angle.cos();
    let magnitude = STANDARD_MAG - 15.0 + 5.0 * b.log10() - 2.5 * phase_term.log10();

    if magnitude.is_finite() {
        Ok(magnitude)
    } else {
        Err(PredictError::Magnitude {
            range_m,
            phase_term,
        })
    }
}

/// Great-circle angle between two az/alt directions.
pub fn angular_separation(az1: f64, alt1: f64, az2: f64, alt2: f64) -> f64 {
    (alt1.sin() * alt2.sin() + alt1.cos() * alt2.cos() * (az1 - az2).cos()).acos()
}
