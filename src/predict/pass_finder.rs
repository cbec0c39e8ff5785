use chrono::{DateTime, Duration, Utc};

use crate::ephemeris::Ephemeris;
use crate::predict::error::PredictError;
use crate::predict::ground_station::GroundStation;
use crate::predict::report::PassReport;
use crate::predict::sampler::{
    sample_pass, PassWindow, MIN_PASS_ELEVATION, POINT_TIME_INTERVAL_SECONDS,
};
use crate::predict::types::Pass;

/// Added after a pass's end before searching again, so the same event is not found twice
pub const PASS_TIME_DELAY: Duration = Duration::minutes(10);
/// The sky counts as dark once the Sun is below this altitude (civil twilight)
pub const SUN_DEPRESSION_DEG: f64 = -6.0;
const MIN_ADVANCE: Duration = Duration::seconds(1);

#[derive(Debug, Clone, PartialEq)]
enum ScanState {
    Seeking,
    Evaluating(PassWindow),
    Sampling(PassWindow),
    Accepting(Pass),
    Done,
}

/// Walks the ephemeris pass by pass from `start` up to `end`, yielding the
/// passes that are high enough, happen in a dark sky and stay visible for
/// more than one sampling tick.
pub struct PassScanner<'a, E: ?Sized> {
    ephemeris: &'a E,
    station: GroundStation,
    end: DateTime<Utc>,
    cursor: DateTime<Utc>,
    state: ScanState,
}

impl<'a, E: Ephemeris + ?Sized> PassScanner<'a, E> {
    pub fn new(
        ephemeris: &'a E,
        station: GroundStation,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            ephemeris,
            station,
            end,
            cursor: start,
            state: ScanState::Seeking,
        }
    }

    /// Instant the next pass search starts from.
    pub fn cursor(&self) -> DateTime<Utc> {
        self.cursor
    }

    fn is_done(&self) -> bool {
        matches!(self.state, ScanState::Done)
    }

    /// Moves the search cursor past `window`, always strictly forward.
    fn advance_past(&mut self, window: &PassWindow) {
        self.cursor = (window.end + PASS_TIME_DELAY).max(self.cursor + MIN_ADVANCE);
    }

    fn step(&mut self) -> Result<Option<Pass>, PredictError> {
        let state = std::mem::replace(&mut self.state, ScanState::Done);

        match state {
            ScanState::Seeking => {
                if self.cursor > self.end {
                    return Ok(None);
                }
                let observer = self.station.at(self.cursor);
                if let Some(event) = self.ephemeris.next_pass(&observer, self.end)? {
                    let window = PassWindow::from(&event);
                    if window.start <= self.end {
                        self.state = ScanState::Evaluating(window);
                    }
                }
            }
            ScanState::Evaluating(window) => {
                if window.max_elevation_deg < MIN_PASS_ELEVATION {
                    log::debug!(
                        "Skipping pass at {}: max elevation {:.1}°",
                        window.start,
                        window.max_elevation_deg
                    );
                    self.advance_past(&window);
                    self.state = ScanState::Seeking;
                    return Ok(None);
                }

                let sun = self.ephemeris.sun_position(&self.station.at(window.start))?;
                let sun_altitude_deg = sun.altitude_rad.to_degrees();
                if sun_altitude_deg > SUN_DEPRESSION_DEG {
                    log::debug!(
                        "Skipping pass at {}: sky too bright (sun at {:.1}°)",
                        window.start,
                        sun_altitude_deg
                    );
                    self.advance_past(&window);
                    self.state = ScanState::Seeking;
                    return Ok(None);
                }

                self.state = ScanState::Sampling(window);
            }
            ScanState::Sampling(window) => {
                let pass = sample_pass(self.ephemeris, &self.station, &window)?;
                self.advance_past(&window);
                self.state = ScanState::Accepting(pass);
            }
            ScanState::Accepting(pass) => {
                self.state = ScanState::Seeking;
                if pass.visible.duration_seconds > POINT_TIME_INTERVAL_SECONDS as f64 {
                    log::debug!(
                        "Accepted pass at {}: visible for {}s",
                        pass.start,
                        pass.visible.duration_seconds
                    );
                    return Ok(Some(pass));
                }
                log::debug!(
                    "Dropping pass at {}: visible for {}s",
                    pass.start,
                    pass.visible.duration_seconds
                );
            }
            ScanState::Done => {}
        }

        Ok(None)
    }
}

impl<E: Ephemeris + ?Sized> Iterator for PassScanner<'_, E> {
    type Item = Result<Pass, PredictError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.is_done() {
            match self.step() {
                Ok(Some(pass)) => return Some(Ok(pass)),
                Ok(None) => {}
                Err(e) => {
                    self.state = ScanState::Done;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

/// Predicts the visible passes over `station` from `start` for `num_days` days.
pub fn predict_passes<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    station: GroundStation,
    start: DateTime<Utc>,
    num_days: i64,
) -> Result<Vec<PassReport>, PredictError> {
    let end = Duration::try_days(num_days)
        .and_then(|horizon| start.checked_add_signed(horizon))
        .ok_or(PredictError::InvalidHorizon(num_days))?;

    let passes = PassScanner::new(ephemeris, station, start, end)
        .map(|pass| pass.map(|p| PassReport::from(&p)))
        .collect::<Result<Vec<_>, _>>()?;

    log::info!(
        "Found {} visible passes between {} and {}",
        passes.len(),
        start,
        end
    );
    Ok(passes)
}
