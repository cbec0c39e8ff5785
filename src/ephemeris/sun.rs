//! Low-precision solar coordinates (Astronomical Almanac, good to ~0.01°
//! between 1950 and 2050). Plenty for darkness and shadow tests.

use chrono::{DateTime, Utc};

const J2000_UNIX_SECONDS: f64 = 946_728_000.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Direction to the Sun in the true-of-date equatorial frame, and its distance.
#[derive(Debug, Clone, Copy)]
pub struct SunVector {
    pub unit: [f64; 3],
    pub distance_au: f64,
}

pub fn days_since_j2000(date: DateTime<Utc>) -> f64 {
    let seconds = date.timestamp() as f64 + f64::from(date.timestamp_subsec_nanos()) * 1e-9;
    (seconds - J2000_UNIX_SECONDS) / SECONDS_PER_DAY
}

pub fn sun_vector(date: DateTime<Utc>) -> SunVector {
    let n = days_since_j2000(date);

    let mean_longitude = (280.460 + 0.985_647_4 * n).rem_euclid(360.0);
    let mean_anomaly = (357.528 + 0.985_600_3 * n).rem_euclid(360.0).to_radians();
    let ecliptic_longitude = (mean_longitude
        + 1.915 * mean_anomaly.sin()
        + 0.020 * (2.0 * mean_anomaly).sin())
    .to_radians();
    let obliquity = (23.439 - 0.000_000_4 * n).to_radians();

    let distance_au =
        1.000_14 - 0.016_71 * mean_anomaly.cos() - 0.000_14 * (2.0 * mean_anomaly).cos();

    let (sin_l, cos_l) = ecliptic_longitude.sin_cos();
    SunVector {
        unit: [cos_l, obliquity.cos() * sin_l, obliquity.sin() * sin_l],
        distance_au,
    }
}
