use std::f64::consts::PI;

use crate::predict::{GroundStation, WGS84_A_KM, WGS84_E2};

/// Azimuth/altitude of a target seen from a station, plus its distance.
#[derive(Debug, Clone, Copy)]
pub struct LookAngles {
    pub azimuth_rad: f64,
    pub altitude_rad: f64,
    pub range_km: f64,
}

pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

pub fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}

/// Topocentric look angles of an ECEF point (km) from `station`.
pub fn look_angles(station: &GroundStation, target_ecef: [f64; 3]) -> LookAngles {
    let sta_ecef = station.position_ecef_km();
    let dr = [
        target_ecef[0] - sta_ecef[0],
        target_ecef[1] - sta_ecef[1],
        target_ecef[2] - sta_ecef[2],
    ];
    let range_km = norm(dr);

    let (east, north, up) = ecef_to_enu(dr, station.lat_rad(), station.lon_rad());
    let azimuth_rad = east.atan2(north).rem_euclid(2.0 * PI);
    let altitude_rad = if range_km > 0.0 {
        (up / range_km).asin()
    } else {
        0.0
    };

    LookAngles {
        azimuth_rad,
        altitude_rad,
        range_km,
    }
}

/// ECEF (km) to WGS-84 geodetic latitude, longitude (radians) and height (km).
pub fn ecef_to_geodetic(pos: [f64; 3]) -> (f64, f64, f64) {
    let [x, y, z] = pos;
    let lon = y.atan2(x);
    let p = (x * x + y * y).sqrt();

    let mut lat = z.atan2(p * (1.0 - WGS84_E2));
    let mut n = WGS84_A_KM;
    for _ in 0..10 {
        let sin_lat = lat.sin();
        n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        let next = (z + WGS84_E2 * n * sin_lat).atan2(p);
        if (next - lat).abs() < 1e-12 {
            lat = next;
            break;
        }
        lat = next;
    }

    let height = if lat.cos().abs() > 1e-10 {
        p / lat.cos() - n
    } else {
        z.abs() - n * (1.0 - WGS84_E2)
    };

    (lat, lon, height)
}

pub fn norm(v: [f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

pub fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geodetic_round_trips_station_position() {
        let station = GroundStation::new(46.05, 14.51, 300.0);
        let (lat, lon, height) = ecef_to_geodetic(station.position_ecef_km());
        assert!((lat.to_degrees() - 46.05).abs() < 1e-8);
        assert!((lon.to_degrees() - 14.51).abs() < 1e-8);
        assert!((height - 0.3).abs() < 1e-6);
    }

    #[test]
    fn point_straight_above_station_is_at_zenith() {
        let station = GroundStation::new(0.0, 0.0, 0.0);
        let target = [WGS84_A_KM + 400.0, 0.0, 0.0];
        let look = look_angles(&station, target);
        assert!((look.altitude_rad - PI / 2.0).abs() < 1e-9);
        assert!((look.range_km - 400.0).abs() < 1e-9);
    }

    #[test]
    fn azimuth_is_measured_from_north_through_east() {
        let station = GroundStation::new(0.0, 0.0, 0.0);
        // Due east along the horizon.
        let east = look_angles(&station, [WGS84_A_KM, 1000.0, 0.0]);
        assert!((east.azimuth_rad - PI / 2.0).abs() < 1e-9);
        // Due north.
        let north = look_angles(&station, [WGS84_A_KM, 0.0, 1000.0]);
        assert!(north.azimuth_rad.abs() < 1e-9);
    }

    #[test]
    fn teme_rotation_preserves_length() {
        let p = [4000.0, -3000.0, 5000.0];
        let r = teme_to_ecef_position(p, 1.234);
        assert!((norm(p) - norm(r)).abs() < 1e-9);
        assert_eq!(r[2], p[2]);
    }
}
