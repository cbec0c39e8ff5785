use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::ephemeris::Sgp4Ephemeris;
use crate::predict::PredictError;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Where the satellite is right now
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrackPosition {
    /// Sub-satellite latitude, degrees
    pub lat: f64,
    /// Sub-satellite longitude, degrees
    pub lon: f64,
    /// Height above the ellipsoid, km
    pub height: f64,
    pub velocity_kmph: f64,
}

pub fn current_position(
    ephemeris: &Sgp4Ephemeris,
    at: DateTime<Utc>,
) -> Result<TrackPosition, PredictError> {
    let state = ephemeris.geodetic_state(at)?;
    Ok(TrackPosition {
        lat: round_to(state.lat_rad.to_degrees(), 2),
        lon: round_to(state.lon_rad.to_degrees(), 2),
        height: round_to(state.height_km, 1),
        velocity_kmph: (state.speed_km_s * SECONDS_PER_HOUR).round(),
    })
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::TleSet;
    use chrono::TimeZone;

    #[test]
    fn rounding_matches_display_precision() {
        assert_eq!(round_to(12.3456, 2), 12.35);
        assert_eq!(round_to(-0.049, 1), -0.0);
        assert_eq!(round_to(408.26, 1), 408.3);
    }

    #[test]
    fn iss_position_is_plausible() {
        let ephemeris = TleSet::new(
            "ISS (ZARYA)",
            "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927",
            "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537",
        )
        .ephemeris()
        .unwrap();
        let at = Utc.with_ymd_and_hms(2008, 9, 20, 13, 0, 0).unwrap();

        let position = current_position(&ephemeris, at).unwrap();
        assert!(position.lat.abs() <= 52.0);
        assert!(position.lon >= -180.0 && position.lon <= 180.0);
        assert!(position.height > 300.0 && position.height < 450.0);
        assert!(position.velocity_kmph > 26_000.0 && position.velocity_kmph < 29_000.0);
        assert_eq!(position.velocity_kmph.fract(), 0.0);
    }
}
