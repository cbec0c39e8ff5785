use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use sgp4::Elements;

use crate::ephemeris::Sgp4Ephemeris;
use crate::predict::error::PredictError;

/// TLE older than this (relative to the prediction start) gets a warning.
pub const STALE_TLE_DAYS: i64 = 1;

/// One satellite's element set, as three text lines.
#[derive(Debug, Clone, PartialEq)]
pub struct TleSet {
    pub name: Option<String>,
    pub line1: String,
    pub line2: String,
}

impl TleSet {
    pub fn new(name: &str, line1: &str, line2: &str) -> Self {
        let name = name.trim();
        Self {
            name: (!name.is_empty()).then(|| name.to_string()),
            line1: line1.trim().to_string(),
            line2: line2.trim().to_string(),
        }
    }

    /// Parses `["name", "line 1", "line 2"]`.
    pub fn from_json(json: &str) -> Result<Self, PredictError> {
        let lines: Vec<String> = serde_json::from_str(json)
            .map_err(|e| PredictError::InvalidTleFormat(e.to_string()))?;
        match lines.as_slice() {
            [name, line1, line2] => Ok(Self::new(name, line1, line2)),
            other => Err(PredictError::InvalidTleFormat(format!(
                "expected 3 lines, got {}",
                other.len()
            ))),
        }
    }

    pub fn elements(&self) -> Result<Elements, PredictError> {
        Elements::from_tle(
            self.name.clone(),
            self.line1.as_bytes(),
            self.line2.as_bytes(),
        )
        .map_err(|e| PredictError::InvalidTle {
            source_name: self.display_name(),
            message: e.to_string(),
        })
    }

    pub fn ephemeris(&self) -> Result<Sgp4Ephemeris, PredictError> {
        Sgp4Ephemeris::new(self.elements()?)
    }

    fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| "TLE".to_string())
    }
}

/// Logs a warning when the element set is older than [`STALE_TLE_DAYS`].
pub fn warn_if_stale(ephemeris: &Sgp4Ephemeris, at: DateTime<Utc>) {
    let age = at - ephemeris.epoch();
    if age.num_days() >= STALE_TLE_DAYS {
        log::warn!(
            "TLE for {} is {} days old, predictions may be inaccurate",
            ephemeris
                .elements()
                .object_name
                .as_deref()
                .unwrap_or("satellite"),
            age.num_days()
        );
    }
}

/// Reads a single satellite out of a (possibly multi-satellite) TLE file.
pub struct TleLoader {
    path: PathBuf,
    norad_id: Option<u64>,
}

impl TleLoader {
    pub fn new(path: PathBuf, norad_id: Option<u64>) -> Self {
        Self { path, norad_id }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<TleSet, PredictError> {
        let content = fs::read_to_string(&self.path)?;
        let filename = self
            .path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let entries = parse_multi_tle(&content);

        let Some(wanted) = self.norad_id else {
            return entries.into_iter().next().ok_or(PredictError::NoSatellites);
        };

        for entry in entries {
            let elements = entry.elements().map_err(|e| match e {
                PredictError::InvalidTle { message, .. } => PredictError::InvalidTle {
                    source_name: filename.clone(),
                    message,
                },
                other => other,
            })?;
            if elements.norad_id == wanted {
                return Ok(entry);
            }
        }

        Err(PredictError::SatelliteNotFound(wanted))
    }
}

/// Parse multi-satellite TLE content
fn parse_multi_tle(content: &str) -> Vec<TleSet> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            // 2-line TLE (no name)
            result.push(TleSet::new("", lines[i], lines[i + 1]));
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            // 3-line TLE (with name)
            result.push(TleSet::new(lines[i], lines[i + 1], lines[i + 2]));
            i += 3;
        } else {
            i += 1; // Skip unknown line
        }
    }

    result
}
