use chrono::{DateTime, Duration, TimeZone, Utc};
use sgp4::{Constants, Elements, Prediction};

use super::frames::{dot, ecef_to_geodetic, look_angles, norm, teme_to_ecef_position};
use super::sun::sun_vector;
use super::{Ephemeris, PassEvent, SatellitePosition, SunPosition};
use crate::predict::{GroundStation, Observer, PredictError, AU_KM, WGS84_A_KM};

const COARSE_STEP_SECONDS: i64 = 60; // 1 minute for initial scan
const FINE_STEP_SECONDS: i64 = 1; // 1 second for refinement
const HORIZON_ALTITUDE_RAD: f64 = 0.0;
const MAX_PASS_DURATION: Duration = Duration::days(1);

/// Sub-satellite point, height and inertial speed at one instant.
#[derive(Debug, Clone, Copy)]
pub struct GeodeticState {
    pub lat_rad: f64,
    pub lon_rad: f64,
    pub height_km: f64,
    pub speed_km_s: f64,
}

pub struct Sgp4Ephemeris {
    elements: Elements,
    constants: Constants,
}

impl Sgp4Ephemeris {
    pub fn new(elements: Elements) -> Result<Self, PredictError> {
        let constants =
            Constants::from_elements(&elements).map_err(|e| PredictError::InvalidTle {
                source_name: elements
                    .object_name
                    .clone()
                    .unwrap_or_else(|| format!("NORAD {}", elements.norad_id)),
                message: e.to_string(),
            })?;
        Ok(Self {
            elements,
            constants,
        })
    }

    pub fn elements(&self) -> &Elements {
        &self.elements
    }

    pub fn epoch(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.elements.datetime)
    }

    pub fn geodetic_state(&self, date: DateTime<Utc>) -> Result<GeodeticState, PredictError> {
        let prediction = self.propagate(date)?;
        let ecef = teme_to_ecef_position(prediction.position, sidereal_time(date));
        let (lat_rad, lon_rad, height_km) = ecef_to_geodetic(ecef);
        Ok(GeodeticState {
            lat_rad,
            lon_rad,
            height_km,
            speed_km_s: norm(prediction.velocity),
        })
    }

    fn propagate(&self, date: DateTime<Utc>) -> Result<Prediction, PredictError> {
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&date.naive_utc())
            .map_err(|e| PredictError::Propagation(e.to_string()))?;
        Ok(self.constants.propagate(minutes)?)
    }

    fn satellite_ecef(&self, date: DateTime<Utc>) -> Result<[f64; 3], PredictError> {
        let prediction = self.propagate(date)?;
        Ok(teme_to_ecef_position(prediction.position, sidereal_time(date)))
    }

    fn altitude_at(&self, station: &GroundStation, date: DateTime<Utc>) -> Result<f64, PredictError> {
        Ok(look_angles(station, self.satellite_ecef(date)?).altitude_rad)
    }

    fn azimuth_at(&self, station: &GroundStation, date: DateTime<Utc>) -> Result<f64, PredictError> {
        Ok(look_angles(station, self.satellite_ecef(date)?).azimuth_rad)
    }

    fn is_up(&self, station: &GroundStation, date: DateTime<Utc>) -> Result<bool, PredictError> {
        Ok(self.altitude_at(station, date)? > HORIZON_ALTITUDE_RAD)
    }

    /// Binary search to find exact horizon crossing time
    fn refine_crossing(
        &self,
        station: &GroundStation,
        before: DateTime<Utc>,
        after: DateTime<Utc>,
        rising: bool,
    ) -> Result<DateTime<Utc>, PredictError> {
        let mut low = before;
        let mut high = after;

        while (high - low).num_seconds() > FINE_STEP_SECONDS {
            let mid = low + (high - low) / 2;
            if self.is_up(station, mid)? == rising {
                high = mid;
            } else {
                low = mid;
            }
        }

        Ok(high)
    }

    /// Ternary search for the culmination inside `[low, high]`.
    fn refine_maximum(
        &self,
        station: &GroundStation,
        mut low: DateTime<Utc>,
        mut high: DateTime<Utc>,
    ) -> Result<(DateTime<Utc>, f64), PredictError> {
        while (high - low).num_seconds() > 2 * FINE_STEP_SECONDS {
            let third = (high - low) / 3;
            let m1 = low + third;
            let m2 = high - third;
            if self.altitude_at(station, m1)? < self.altitude_at(station, m2)? {
                low = m1;
            } else {
                high = m2;
            }
        }

        let mut best = (low, self.altitude_at(station, low)?);
        let mut cursor = low + Duration::seconds(FINE_STEP_SECONDS);
        while cursor <= high {
            let altitude = self.altitude_at(station, cursor)?;
            if altitude > best.1 {
                best = (cursor, altitude);
            }
            cursor += Duration::seconds(FINE_STEP_SECONDS);
        }
        Ok(best)
    }
}

impl Ephemeris for Sgp4Ephemeris {
    fn next_pass(
        &self,
        observer: &Observer,
        until: DateTime<Utc>,
    ) -> Result<Option<PassEvent>, PredictError> {
        let station = &observer.station;
        let coarse_step = Duration::seconds(COARSE_STEP_SECONDS);

        // AOS: first below -> above transition after the observer instant
        let mut before = observer.date;
        let mut was_up = self.is_up(station, before)?;
        let rise = loop {
            if before >= until {
                return Ok(None);
            }
            let after = before + coarse_step;
            let up = self.is_up(station, after)?;
            if up && !was_up {
                break self.refine_crossing(station, before, after, true)?;
            }
            was_up = up;
            before = after;
        };

        // LOS, tracking the highest coarse sample on the way
        let limit = rise + MAX_PASS_DURATION;
        let mut max_time = rise;
        let mut max_alt = self.altitude_at(station, rise)?;
        let mut before = rise;
        let set = loop {
            if before >= limit {
                return Err(PredictError::NeverSets { rise });
            }
            let after = before + coarse_step;
            let altitude = self.altitude_at(station, after)?;
            if altitude <= HORIZON_ALTITUDE_RAD {
                break self.refine_crossing(station, before, after, false)?;
            }
            if altitude > max_alt {
                max_alt = altitude;
                max_time = after;
            }
            before = after;
        };

        let (transit, transit_altitude_rad) = self.refine_maximum(
            station,
            (max_time - coarse_step).max(rise),
            (max_time + coarse_step).min(set),
        )?;

        Ok(Some(PassEvent {
            rise,
            rise_azimuth_rad: self.azimuth_at(station, rise)?,
            transit,
            transit_altitude_rad,
            set,
            set_azimuth_rad: self.azimuth_at(station, set)?,
        }))
    }

    fn satellite_position(&self, observer: &Observer) -> Result<SatellitePosition, PredictError> {
        let prediction = self.propagate(observer.date)?;
        let ecef = teme_to_ecef_position(prediction.position, sidereal_time(observer.date));
        let (sub_lat_rad, sub_lon_rad, _) = ecef_to_geodetic(ecef);
        let look = look_angles(&observer.station, ecef);
        let sun = sun_vector(observer.date);

        Ok(SatellitePosition {
            sub_lat_rad,
            sub_lon_rad,
            azimuth_rad: look.azimuth_rad,
            altitude_rad: look.altitude_rad,
            range_m: look.range_km * 1000.0,
            eclipsed: in_earth_shadow(prediction.position, sun.unit),
        })
    }

    fn sun_position(&self, observer: &Observer) -> Result<SunPosition, PredictError> {
        let sun = sun_vector(observer.date);
        let distance_km = sun.distance_au * AU_KM;
        let sun_eci = [
            sun.unit[0] * distance_km,
            sun.unit[1] * distance_km,
            sun.unit[2] * distance_km,
        ];
        let sun_ecef = teme_to_ecef_position(sun_eci, sidereal_time(observer.date));
        let look = look_angles(&observer.station, sun_ecef);

        Ok(SunPosition {
            azimuth_rad: look.azimuth_rad,
            altitude_rad: look.altitude_rad,
            distance_au: sun.distance_au,
        })
    }
}

fn sidereal_time(date: DateTime<Utc>) -> f64 {
    sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&date.naive_utc()))
}

/// Cylindrical shadow: behind the Earth and within one Earth radius of the
/// Earth-Sun axis.
fn in_earth_shadow(sat_eci_km: [f64; 3], sun_unit: [f64; 3]) -> bool {
    let along = dot(sat_eci_km, sun_unit);
    if along >= 0.0 {
        return false;
    }
    let perpendicular = [
        sat_eci_km[0] - along * sun_unit[0],
        sat_eci_km[1] - along * sun_unit[1],
        sat_eci_km[2] - along * sun_unit[2],
    ];
    norm(perpendicular) < WGS84_A_KM
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::TleSet;

    const ISS_NAME: &str = "ISS (ZARYA)";
    const ISS_LINE1: &str = "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
    const ISS_LINE2: &str = "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

    fn iss() -> Sgp4Ephemeris {
        TleSet::new(ISS_NAME, ISS_LINE1, ISS_LINE2)
            .ephemeris()
            .expect("reference TLE parses")
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2008, 9, 20, 12, 0, 0).unwrap()
    }

    fn station() -> GroundStation {
        GroundStation::new(46.05, 14.51, 50.0)
    }

    #[test]
    fn shadow_test_geometry() {
        let sun = [1.0, 0.0, 0.0];
        assert!(!in_earth_shadow([7000.0, 0.0, 0.0], sun));
        assert!(in_earth_shadow([-7000.0, 0.0, 0.0], sun));
        assert!(!in_earth_shadow([-7000.0, 0.0, 7000.0], sun));
        assert!(!in_earth_shadow([0.0, 7000.0, 0.0], sun));
    }

    #[test]
    fn epoch_matches_tle() {
        let epoch = iss().epoch();
        assert_eq!(epoch.date_naive(), start().date_naive());
    }

    #[test]
    fn next_pass_orders_rise_transit_set() {
        let sat = iss();
        let observer = station().at(start());
        let event = sat
            .next_pass(&observer, start() + Duration::days(2))
            .unwrap()
            .expect("ISS passes within two days");

        assert!(event.rise > observer.date);
        assert!(event.rise <= event.transit);
        assert!(event.transit <= event.set);
        assert!(event.set - event.rise < Duration::minutes(20));
        assert!(event.transit_altitude_rad > 0.0);

        let at_rise = sat.satellite_position(&observer.at(event.rise)).unwrap();
        let at_set = sat.satellite_position(&observer.at(event.set)).unwrap();
        assert!(at_rise.altitude_rad.to_degrees().abs() < 0.5);
        assert!(at_set.altitude_rad.to_degrees().abs() < 0.5);
        assert!((at_rise.azimuth_rad - event.rise_azimuth_rad).abs() < 1e-9);

        let at_transit = sat.satellite_position(&observer.at(event.transit)).unwrap();
        assert!((at_transit.altitude_rad - event.transit_altitude_rad).abs() < 1e-9);
    }

    #[test]
    fn consecutive_passes_do_not_overlap() {
        let sat = iss();
        let observer = station().at(start());
        let until = start() + Duration::days(1);
        let first = sat.next_pass(&observer, until).unwrap().unwrap();
        let second = sat
            .next_pass(&observer.at(first.set), until)
            .unwrap()
            .unwrap();
        assert!(second.rise > first.set);
    }

    #[test]
    fn no_pass_before_an_elapsed_horizon() {
        let sat = iss();
        let observer = station().at(start());
        assert_eq!(sat.next_pass(&observer, start()).unwrap(), None);
    }

    #[test]
    fn orbit_height_and_speed_are_leo() {
        let state = iss().geodetic_state(start()).unwrap();
        assert!(state.height_km > 300.0 && state.height_km < 450.0);
        assert!(state.speed_km_s > 7.0 && state.speed_km_s < 8.0);
        assert!(state.lat_rad.to_degrees().abs() <= 52.0);
    }

    #[test]
    fn sun_is_one_au_away() {
        let sun = iss().sun_position(&station().at(start())).unwrap();
        assert!((sun.distance_au - 1.0).abs() < 0.02);
        // Local early afternoon in Ljubljana in September
        assert!(sun.altitude_rad.to_degrees() > 30.0);
    }
}
