use chrono::{DateTime, Utc};

// WGS-84
pub const WGS84_A_KM: f64 = 6378.137;
pub const WGS84_E2: f64 = 0.00669437999014;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundStation {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
}

impl Default for GroundStation {
    fn default() -> Self {
        Self {
            latitude_deg: 0.0,
            longitude_deg: 0.0,
            altitude_m: 0.0,
        }
    }
}

impl GroundStation {
    pub fn new(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            altitude_m,
        }
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    pub fn position_ecef_km(&self) -> [f64; 3] {
        let lat = self.lat_rad();
        let lon = self.lon_rad();
        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let sin_lon = lon.sin();
        let cos_lon = lon.cos();
        let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        let alt_km = self.altitude_m / 1000.0;
        let x = (n + alt_km) * cos_lat * cos_lon;
        let y = (n + alt_km) * cos_lat * sin_lon;
        let z = (n * (1.0 - WGS84_E2) + alt_km) * sin_lat;
        [x, y, z]
    }

    /// Snapshot of this station at a given instant.
    pub fn at(&self, date: DateTime<Utc>) -> Observer {
        Observer {
            station: *self,
            date,
        }
    }
}

/// A ground station frozen at one evaluation instant.
///
/// Every ephemeris query takes one of these; moving the evaluation time
/// forward produces a new snapshot instead of mutating a shared observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    pub station: GroundStation,
    pub date: DateTime<Utc>,
}

impl Observer {
    pub fn at(&self, date: DateTime<Utc>) -> Observer {
        self.station.at(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equator_station_sits_on_semi_major_axis() {
        let station = GroundStation::new(0.0, 0.0, 0.0);
        let pos = station.position_ecef_km();
        assert!((pos[0] - WGS84_A_KM).abs() < 1e-9);
        assert!(pos[1].abs() < 1e-9);
        assert!(pos[2].abs() < 1e-9);
    }

    #[test]
    fn snapshot_keeps_station_and_moves_time() {
        let station = GroundStation::new(46.05, 14.5, 50.0);
        let t0 = DateTime::from_timestamp(1_000_000, 0).unwrap();
        let t1 = DateTime::from_timestamp(1_000_600, 0).unwrap();
        let first = station.at(t0);
        let second = first.at(t1);
        assert_eq!(second.station, station);
        assert_eq!(second.date, t1);
        assert_eq!(first.date, t0);
    }
}
