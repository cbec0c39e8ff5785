//! Scripted ephemeris for exercising the scanner and sampler without SGP4.

use std::cell::Cell;
use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::ephemeris::{Ephemeris, PassEvent, SatellitePosition, SunPosition};
use crate::predict::{Observer, PredictError};

#[derive(Debug, Clone, Copy)]
pub struct Tick {
    pub altitude_deg: f64,
    pub azimuth_deg: f64,
    pub range_m: f64,
    pub eclipsed: bool,
}

impl Tick {
    pub fn at(altitude_deg: f64) -> Self {
        Self {
            altitude_deg,
            azimuth_deg: 180.0,
            range_m: 800_000.0,
            eclipsed: false,
        }
    }

    pub fn eclipsed(mut self) -> Self {
        self.eclipsed = true;
        self
    }
}

pub struct ScriptedEphemeris {
    passes: Vec<PassEvent>,
    ticks: HashMap<DateTime<Utc>, Tick>,
    default_tick: Tick,
    sun_altitudes: HashMap<DateTime<Utc>, f64>,
    default_sun_altitude_deg: f64,
    stuck: bool,
    pub next_pass_calls: Cell<usize>,
}

impl Default for ScriptedEphemeris {
    fn default() -> Self {
        Self {
            passes: Vec::new(),
            ticks: HashMap::new(),
            default_tick: Tick::at(45.0),
            sun_altitudes: HashMap::new(),
            default_sun_altitude_deg: -20.0,
            stuck: false,
            next_pass_calls: Cell::new(0),
        }
    }
}

impl ScriptedEphemeris {
    pub fn with_pass(mut self, rise: DateTime<Utc>, minutes: i64, max_elevation_deg: f64) -> Self {
        let set = rise + Duration::minutes(minutes);
        self.passes.push(PassEvent {
            rise,
            rise_azimuth_rad: 0.0,
            transit: rise + (set - rise) / 2,
            transit_altitude_rad: max_elevation_deg.to_radians(),
            set,
            set_azimuth_rad: std::f64::consts::PI,
        });
        self
    }

    pub fn with_tick(mut self, date: DateTime<Utc>, tick: Tick) -> Self {
        self.ticks.insert(date, tick);
        self
    }

    pub fn with_default_tick(mut self, tick: Tick) -> Self {
        self.default_tick = tick;
        self
    }

    pub fn with_sun_altitude(mut self, date: DateTime<Utc>, altitude_deg: f64) -> Self {
        self.sun_altitudes.insert(date, altitude_deg);
        self
    }

    /// Keep answering with the first scripted pass whatever the observer time.
    pub fn stuck(mut self) -> Self {
        self.stuck = true;
        self
    }
}

impl Ephemeris for ScriptedEphemeris {
    fn next_pass(
        &self,
        observer: &Observer,
        _until: DateTime<Utc>,
    ) -> Result<Option<PassEvent>, PredictError> {
        self.next_pass_calls.set(self.next_pass_calls.get() + 1);
        if self.stuck {
            return Ok(self.passes.first().copied());
        }
        Ok(self
            .passes
            .iter()
            .find(|p| p.rise > observer.date)
            .copied())
    }

    fn satellite_position(&self, observer: &Observer) -> Result<SatellitePosition, PredictError> {
        let tick = self
            .ticks
            .get(&observer.date)
            .copied()
            .unwrap_or(self.default_tick);
        Ok(SatellitePosition {
            sub_lat_rad: observer.station.lat_rad(),
            sub_lon_rad: observer.station.lon_rad(),
            azimuth_rad: tick.azimuth_deg.to_radians(),
            altitude_rad: tick.altitude_deg.to_radians(),
            range_m: tick.range_m,
            eclipsed: tick.eclipsed,
        })
    }

    fn sun_position(&self, observer: &Observer) -> Result<SunPosition, PredictError> {
        let altitude_deg = self
            .sun_altitudes
            .get(&observer.date)
            .copied()
            .unwrap_or(self.default_sun_altitude_deg);
        Ok(SunPosition {
            azimuth_rad: 0.0,
            altitude_rad: altitude_deg.to_radians(),
            distance_au: 1.0,
        })
    }
}
