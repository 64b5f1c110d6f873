use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{
    dot, gmst, norm, sub, GeodeticPosition, TopocentricObservation, EARTH_E2, EARTH_RADIUS_KM,
};

const LATITUDE_TOLERANCE: f64 = 1e-12;
const MAX_ITERATIONS: usize = 20;

/// Position and velocity in the Earth-centred inertial (TEME) frame at an instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EciPosition {
    pub time: DateTime<Utc>,
    /// Kilometers.
    pub position: [f64; 3],
    /// Kilometers per second.
    pub velocity: [f64; 3],
}

impl EciPosition {
    pub fn new(time: DateTime<Utc>, position: [f64; 3], velocity: [f64; 3]) -> Self {
        Self {
            time,
            position,
            velocity,
        }
    }

    pub fn to_geodetic(&self) -> GeodeticPosition {
        let [x, y, z] = self.position;
        let longitude = (y.atan2(x) - gmst(self.time) + std::f64::consts::PI)
            .rem_euclid(std::f64::consts::TAU)
            - std::f64::consts::PI;

        let r = x.hypot(y);
        let mut latitude = z.atan2(r);
        for _ in 0..MAX_ITERATIONS {
            let sin_lat = latitude.sin();
            let c = 1.0 / (1.0 - EARTH_E2 * sin_lat * sin_lat).sqrt();
            let next = (z + EARTH_RADIUS_KM * c * EARTH_E2 * sin_lat).atan2(r);
            let delta = (next - latitude).abs();
            latitude = next;
            if delta < LATITUDE_TOLERANCE {
                break;
            }
        }

        let (sin_lat, cos_lat) = latitude.sin_cos();
        let c = 1.0 / (1.0 - EARTH_E2 * sin_lat * sin_lat).sqrt();
        let altitude_km = if cos_lat.abs() > 1e-3 {
            r / cos_lat - EARTH_RADIUS_KM * c
        } else {
            z / sin_lat - EARTH_RADIUS_KM * c * (1.0 - EARTH_E2)
        };

        GeodeticPosition::new(latitude, longitude, altitude_km)
    }

    /// Look angles of `target` from this position, both taken at the same instant.
    ///
    /// Total for any geometry: targets below the horizon get a negative elevation,
    /// a target coinciding with the observer is reported at zero range.
    pub fn observe(&self, target: &EciPosition) -> TopocentricObservation {
        let dr = sub(target.position, self.position);
        let dv = sub(target.velocity, self.velocity);
        let range = norm(dr);
        if range == 0.0 {
            return TopocentricObservation::new(0.0, 0.0, 0.0, 0.0);
        }
        let range_rate = dot(dr, dv) / range;

        let latitude = self.to_geodetic().latitude;
        let theta = self.position[1].atan2(self.position[0]);
        let (sin_lat, cos_lat) = latitude.sin_cos();
        let (sin_theta, cos_theta) = theta.sin_cos();

        let south = sin_lat * cos_theta * dr[0] + sin_lat * sin_theta * dr[1] - cos_lat * dr[2];
        let east = -sin_theta * dr[0] + cos_theta * dr[1];
        let zenith = cos_lat * cos_theta * dr[0] + cos_lat * sin_theta * dr[1] + sin_lat * dr[2];

        let azimuth = east.atan2(-south).rem_euclid(std::f64::consts::TAU);
        let elevation = (zenith / range).clamp(-1.0, 1.0).asin();

        TopocentricObservation::new(azimuth, elevation, range, range_rate)
    }
}
