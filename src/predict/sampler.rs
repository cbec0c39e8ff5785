use chrono::{DateTime, Duration, SubsecRound, Utc};

use crate::ephemeris::{Ephemeris, PassEvent};
use crate::predict::error::PredictError;
use crate::predict::ground_station::GroundStation;
use crate::predict::magnitude::apparent_magnitude;
use crate::predict::types::{Pass, Sample, VisibilitySummary};

/// A sample must be at least this high (degrees, after rounding) to count as visible
pub const MIN_PASS_ELEVATION: f64 = 10.0;
/// Spacing between samples of a pass
pub const POINT_TIME_INTERVAL_SECONDS: i64 = 10;

/// Rise, culmination and set of one pass, truncated to whole seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassWindow {
    pub start: DateTime<Utc>,
    pub max: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub max_elevation_deg: f64,
}

impl From<&PassEvent> for PassWindow {
    fn from(event: &PassEvent) -> Self {
        Self {
            start: event.rise.trunc_subsecs(0),
            max: event.transit.trunc_subsecs(0),
            end: event.set.trunc_subsecs(0),
            max_elevation_deg: event.transit_altitude_rad.to_degrees(),
        }
    }
}

/// Steps through `[window.start, window.end)` and builds the pass samples
/// along with the summary of its visible part.
pub fn sample_pass<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    station: &GroundStation,
    window: &PassWindow,
) -> Result<Pass, PredictError> {
    let interval = Duration::seconds(POINT_TIME_INTERVAL_SECONDS);
    let mut points = Vec::new();
    let mut visible = VisibilitySummary::default();

    let mut cur_time = window.start;
    while cur_time < window.end {
        let observer = station.at(cur_time);
        let satellite = ephemeris.satellite_position(&observer)?;
        let sun = ephemeris.sun_position(&observer)?;

        let elevation_deg = satellite.altitude_rad.to_degrees().round() as i32;
        let is_visible = !satellite.eclipsed && f64::from(elevation_deg) >= MIN_PASS_ELEVATION;

        let magnitude = if is_visible {
            Some(apparent_magnitude(
                satellite.range_m,
                satellite.azimuth_rad,
                satellite.altitude_rad,
                sun.distance_au,
                sun.azimuth_rad,
                sun.altitude_rad,
            )?)
        } else {
            None
        };

        let sample = Sample {
            date: cur_time,
            lat_deg: satellite.sub_lat_rad.to_degrees(),
            lon_deg: satellite.sub_lon_rad.to_degrees(),
            azimuth_deg: satellite.azimuth_rad.to_degrees(),
            elevation_deg,
            visible: is_visible,
            magnitude,
        };

        if let Some(magnitude) = magnitude {
            visible.record(&sample, magnitude);
        }
        points.push(sample);
        cur_time += interval;
    }

    Ok(Pass {
        start: window.start,
        max: window.max,
        end: window.end,
        max_elevation_deg: window.max_elevation_deg,
        points,
        visible,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::testing::{ScriptedEphemeris, Tick};

    fn t(seconds: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_600_000_000 + seconds, 0).unwrap()
    }

    fn window(end: i64) -> PassWindow {
        PassWindow {
            start: t(0),
            max: t(end / 2),
            end: t(end),
            max_elevation_deg: 42.5,
        }
    }

    #[test]
    fn samples_cover_half_open_window_at_fixed_cadence() {
        let engine = ScriptedEphemeris::default();
        let pass = sample_pass(&engine, &GroundStation::default(), &window(60)).unwrap();

        let dates: Vec<_> = pass.points.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![t(0), t(10), t(20), t(30), t(40), t(50)]);
        assert_eq!(pass.max_elevation_deg, 42.5);
    }

    #[test]
    fn window_end_not_on_cadence_still_excludes_end() {
        let engine = ScriptedEphemeris::default();
        let pass = sample_pass(&engine, &GroundStation::default(), &window(25)).unwrap();
        assert_eq!(pass.points.len(), 3);
        assert_eq!(pass.points.last().unwrap().date, t(20));
    }

    #[test]
    fn visibility_uses_rounded_elevation_and_eclipse() {
        let engine = ScriptedEphemeris::default()
            .with_tick(t(0), Tick::at(9.4))
            .with_tick(t(10), Tick::at(9.6))
            .with_tick(t(20), Tick::at(45.0).eclipsed())
            .with_tick(t(30), Tick::at(10.2));
        let pass = sample_pass(&engine, &GroundStation::default(), &window(40)).unwrap();

        let flags: Vec<_> = pass.points.iter().map(|p| p.visible).collect();
        assert_eq!(flags, vec![false, true, false, true]);
        let elevations: Vec<_> = pass.points.iter().map(|p| p.elevation_deg).collect();
        assert_eq!(elevations, vec![9, 10, 45, 10]);

        for point in &pass.points {
            assert_eq!(point.magnitude.is_some(), point.visible);
        }
    }

    #[test]
    fn summary_tracks_first_maximum_and_duration() {
        let engine = ScriptedEphemeris::default()
            .with_tick(t(0), Tick::at(5.0))
            .with_tick(t(10), Tick::at(12.0))
            .with_tick(t(20), Tick::at(30.2))
            .with_tick(t(30), Tick::at(29.8))
            .with_tick(
                t(40),
                Tick {
                    azimuth_deg: 170.0,
                    ..Tick::at(20.0)
                },
            )
            .with_tick(t(50), Tick::at(15.0).eclipsed());
        let pass = sample_pass(&engine, &GroundStation::default(), &window(60)).unwrap();

        let visible = &pass.visible;
        assert_eq!(visible.start.unwrap().date, t(10));
        assert_eq!(visible.start.unwrap().elevation_deg, 12);
        // 30.2 and 29.8 both round to 30; the first one wins
        assert_eq!(visible.max.unwrap().date, t(20));
        assert_eq!(visible.max.unwrap().elevation_deg, 30);
        assert_eq!(visible.end.unwrap().date, t(40));
        assert_eq!(visible.duration_seconds, 30.0);
    }

    #[test]
    fn nothing_visible_leaves_summary_empty() {
        let engine = ScriptedEphemeris::default().with_default_tick(Tick::at(50.0).eclipsed());
        let pass = sample_pass(&engine, &GroundStation::default(), &window(60)).unwrap();
        assert_eq!(pass.visible, VisibilitySummary::default());
        assert_eq!(pass.points.len(), 6);
    }

    #[test]
    fn window_truncates_event_to_whole_seconds() {
        let event = PassEvent {
            rise: DateTime::from_timestamp(100, 700_000_000).unwrap(),
            rise_azimuth_rad: 0.0,
            transit: DateTime::from_timestamp(400, 200_000_000).unwrap(),
            transit_altitude_rad: std::f64::consts::FRAC_PI_4,
            set: DateTime::from_timestamp(700, 999_999_999).unwrap(),
            set_azimuth_rad: 0.0,
        };
        let window = PassWindow::from(&event);
        assert_eq!(window.start, DateTime::from_timestamp(100, 0).unwrap());
        assert_eq!(window.max, DateTime::from_timestamp(400, 0).unwrap());
        assert_eq!(window.end, DateTime::from_timestamp(700, 0).unwrap());
        assert!((window.max_elevation_deg - 45.0).abs() < 1e-12);
    }
}
