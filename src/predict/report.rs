use serde::Serialize;
use utoipa::ToSchema;

use crate::predict::types::{timestamp_ms, Checkpoint, Pass, Sample, VisibilitySummary};

/// A visible pass as reported to callers. Dates are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PassReport {
    pub start_date: i64,
    pub max_date: i64,
    pub end_date: i64,
    /// Degrees at culmination, not rounded
    pub max_elevation: f64,
    pub points: Vec<PointReport>,
    pub visible: VisibleReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PointReport {
    pub date: i64,
    pub lat: f64,
    pub lon: f64,
    pub azimuth: f64,
    pub elevation: i32,
    pub visible: bool,
    /// 0 when the point is not visible
    pub magnitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisibleReport {
    pub start_date: Option<i64>,
    pub max_date: Option<i64>,
    pub end_date: Option<i64>,
    pub start_elevation: i32,
    pub max_elevation: i32,
    pub end_elevation: i32,
    pub start_azimuth: f64,
    pub max_azimuth: f64,
    pub end_azimuth: f64,
    pub start_magnitude: f64,
    pub max_magnitude: f64,
    pub end_magnitude: f64,
    pub duration_seconds: f64,
}

impl From<&Pass> for PassReport {
    fn from(pass: &Pass) -> Self {
        Self {
            start_date: timestamp_ms(pass.start),
            max_date: timestamp_ms(pass.max),
            end_date: timestamp_ms(pass.end),
            max_elevation: pass.max_elevation_deg,
            points: pass.points.iter().map(PointReport::from).collect(),
            visible: VisibleReport::from(&pass.visible),
        }
    }
}

impl From<&Sample> for PointReport {
    fn from(sample: &Sample) -> Self {
        Self {
            date: timestamp_ms(sample.date),
            lat: sample.lat_deg,
            lon: sample.lon_deg,
            azimuth: sample.azimuth_deg,
            elevation: sample.elevation_deg,
            visible: sample.visible,
            magnitude: sample.magnitude.unwrap_or(0.0),
        }
    }
}

impl From<&VisibilitySummary> for VisibleReport {
    fn from(summary: &VisibilitySummary) -> Self {
        let date = |cp: Option<Checkpoint>| cp.map(|c| timestamp_ms(c.date));
        let elevation = |cp: Option<Checkpoint>| cp.map_or(0, |c| c.elevation_deg);
        let azimuth = |cp: Option<Checkpoint>| cp.map_or(0.0, |c| c.azimuth_deg);
        let magnitude = |cp: Option<Checkpoint>| cp.map_or(0.0, |c| c.magnitude);

        Self {
            start_date: date(summary.start),
            max_date: date(summary.max),
            end_date: date(summary.end),
            start_elevation: elevation(summary.start),
            max_elevation: elevation(summary.max),
            end_elevation: elevation(summary.end),
            start_azimuth: azimuth(summary.start),
            max_azimuth: azimuth(summary.max),
            end_azimuth: azimuth(summary.end),
            start_magnitude: magnitude(summary.start),
            max_magnitude: magnitude(summary.max),
            end_magnitude: magnitude(summary.end),
            duration_seconds: summary.duration_seconds,
        }
    }
}
