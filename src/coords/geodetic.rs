use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{gmst, EciPosition, EARTH_E2, EARTH_RADIUS_KM, EARTH_ROTATION_RAD_S};

/// A point on or above the WGS-84 ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeodeticPosition {
    /// Radians, positive north.
    pub latitude: f64,
    /// Radians, positive east.
    pub longitude: f64,
    /// Kilometers above the ellipsoid.
    pub altitude_km: f64,
}

impl GeodeticPosition {
    pub fn new(latitude: f64, longitude: f64, altitude_km: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude_km,
        }
    }

    pub fn from_degrees(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> Self {
        Self::new(
            latitude_deg.to_radians(),
            longitude_deg.to_radians(),
            altitude_m / 1000.0,
        )
    }

    pub fn position_ecef_km(&self) -> [f64; 3] {
        let (sin_lat, cos_lat) = self.latitude.sin_cos();
        let (sin_lon, cos_lon) = self.longitude.sin_cos();
        let n = EARTH_RADIUS_KM / (1.0 - EARTH_E2 * sin_lat * sin_lat).sqrt();
        let alt = self.altitude_km;
        [
            (n + alt) * cos_lat * cos_lon,
            (n + alt) * cos_lat * sin_lon,
            (n * (1.0 - EARTH_E2) + alt) * sin_lat,
        ]
    }

    /// This location in the inertial frame at `time`, co-rotating with the Earth.
    pub fn to_eci(&self, time: DateTime<Utc>) -> EciPosition {
        let ecef = self.position_ecef_km();
        let (sin_g, cos_g) = gmst(time).sin_cos();
        let position = [
            ecef[0] * cos_g - ecef[1] * sin_g,
            ecef[0] * sin_g + ecef[1] * cos_g,
            ecef[2],
        ];
        let velocity = [
            -EARTH_ROTATION_RAD_S * position[1],
            EARTH_ROTATION_RAD_S * position[0],
            0.0,
        ];
        EciPosition::new(time, position, velocity)
    }

    /// Great-circle angle between the two sub-points, ignoring altitude.
    pub fn angle_to(&self, other: &GeodeticPosition) -> f64 {
        let dlat = other.latitude - self.latitude;
        let dlon = other.longitude - self.longitude;
        let hav = (dlat / 2.0).sin().powi(2)
            + self.latitude.cos() * other.latitude.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * hav.sqrt().min(1.0).asin()
    }

    /// Largest angle from the sub-point at which an object at this altitude is
    /// still above a surface observer's horizon.
    pub fn footprint_angle(&self) -> f64 {
        let ratio = EARTH_RADIUS_KM / (EARTH_RADIUS_KM + self.altitude_km);
        ratio.clamp(-1.0, 1.0).acos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[test]
    fn equator_ecef() {
        let p = GeodeticPosition::from_degrees(0.0, 0.0, 0.0);
        let ecef = p.position_ecef_km();
        assert!((ecef[0] - EARTH_RADIUS_KM).abs() < 1e-9);
        assert!(ecef[1].abs() < 1e-9);
        assert!(ecef[2].abs() < 1e-9);
    }

    #[rstest]
    #[case(52.0, 4.37, 10.0)]
    #[case(-33.9, 18.4, 1500.0)]
    #[case(78.2, 15.6, 450.0)]
    #[case(0.0, -179.5, 0.0)]
    fn eci_round_trip(#[case] lat: f64, #[case] lon: f64, #[case] alt_m: f64) {
        let t = Utc.with_ymd_and_hms(2024, 6, 21, 12, 30, 0).unwrap();
        let p = GeodeticPosition::from_degrees(lat, lon, alt_m);
        let back = p.to_eci(t).to_geodetic();
        assert!((back.latitude.to_degrees() - lat).abs() < 1e-6);
        assert!((back.longitude.to_degrees() - lon).abs() < 1e-6);
        assert!((back.altitude_km * 1000.0 - alt_m).abs() < 1e-3);
    }

    #[test]
    fn ground_velocity_is_rotation() {
        let t = Utc.with_ymd_and_hms(2024, 6, 21, 0, 0, 0).unwrap();
        let eci = GeodeticPosition::from_degrees(0.0, 0.0, 0.0).to_eci(t);
        let speed = super::super::norm(eci.velocity);
        assert!((speed - EARTH_ROTATION_RAD_S * EARTH_RADIUS_KM).abs() < 1e-9);
    }

    #[test]
    fn angle_between_points() {
        let a = GeodeticPosition::from_degrees(0.0, 0.0, 0.0);
        let b = GeodeticPosition::from_degrees(0.0, 90.0, 0.0);
        let c = GeodeticPosition::from_degrees(0.0, 180.0, 0.0);
        assert!((a.angle_to(&b) - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!((a.angle_to(&c) - std::f64::consts::PI).abs() < 1e-12);
        assert_eq!(a.angle_to(&a), 0.0);
    }

    #[test]
    fn footprint_grows_with_altitude() {
        let leo = GeodeticPosition::from_degrees(0.0, 0.0, 500_000.0).footprint_angle();
        let geo = GeodeticPosition::from_degrees(0.0, 0.0, 35_786_000.0).footprint_angle();
        assert!(leo > 0.0 && leo < geo);
        // ~22 degrees for 500 km
        assert!((leo.to_degrees() - 22.0).abs() < 0.5);
        // ~81.3 degrees for GEO
        assert!((geo.to_degrees() - 81.3).abs() < 0.1);
    }

    #[test]
    fn footprint_below_surface_is_zero() {
        let p = GeodeticPosition::from_degrees(0.0, 0.0, -10_000.0);
        assert_eq!(p.footprint_angle(), 0.0);
    }
}
