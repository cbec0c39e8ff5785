use chrono::{DateTime, Utc};

/// One tick of a sampled pass
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub date: DateTime<Utc>,
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub azimuth_deg: f64,
    /// Rounded to the nearest whole degree.
    pub elevation_deg: i32,
    pub visible: bool,
    /// Only computed for visible samples.
    pub magnitude: Option<f64>,
}

/// State of the visible sub-window at one of its checkpoints
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Checkpoint {
    pub date: DateTime<Utc>,
    pub elevation_deg: i32,
    pub azimuth_deg: f64,
    pub magnitude: f64,
}

impl Checkpoint {
    fn of(sample: &Sample, magnitude: f64) -> Self {
        Self {
            date: sample.date,
            elevation_deg: sample.elevation_deg,
            azimuth_deg: sample.azimuth_deg,
            magnitude,
        }
    }
}

/// Running summary of the visible samples of one pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibilitySummary {
    pub start: Option<Checkpoint>,
    pub max: Option<Checkpoint>,
    pub end: Option<Checkpoint>,
    pub duration_seconds: f64,
}

impl VisibilitySummary {
    /// Folds one visible sample into the summary.
    ///
    /// The maximum only moves on a strictly higher elevation, so ties keep
    /// the first sample that reached it.
    pub fn record(&mut self, sample: &Sample, magnitude: f64) {
        let checkpoint = Checkpoint::of(sample, magnitude);

        let start = *self.start.get_or_insert(checkpoint);
        match self.max {
            Some(max) if checkpoint.elevation_deg <= max.elevation_deg => {}
            _ => self.max = Some(checkpoint),
        }
        self.end = Some(checkpoint);

        self.duration_seconds =
            (timestamp_ms(checkpoint.date) - timestamp_ms(start.date)) as f64 / 1000.0;
    }
}

/// A geometric pass with its samples
#[derive(Debug, Clone, PartialEq)]
pub struct Pass {
    pub start: DateTime<Utc>,
    pub max: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Culmination elevation, not rounded.
    pub max_elevation_deg: f64,
    pub points: Vec<Sample>,
    pub visible: VisibilitySummary,
}

/// Epoch milliseconds of `date`, truncated to whole seconds first.
pub fn timestamp_ms(date: DateTime<Utc>) -> i64 {
    date.timestamp() * 1000
}
