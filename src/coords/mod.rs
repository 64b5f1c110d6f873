mod eci;
mod geodetic;
mod topocentric;

use chrono::{DateTime, Utc};

pub use eci::EciPosition;
pub use geodetic::GeodeticPosition;
pub use topocentric::TopocentricObservation;

pub const EARTH_ROTATION_RAD_S: f64 = 7.292_115e-5;
pub const SPEED_OF_LIGHT_KM_S: f64 = 299_792.458;

// WGS-84
pub const EARTH_RADIUS_KM: f64 = 6378.137;
pub const EARTH_E2: f64 = 0.00669437999014;

/// Greenwich mean sidereal time in radians.
pub fn gmst(time: DateTime<Utc>) -> f64 {
    sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&time.naive_utc()))
        .rem_euclid(std::f64::consts::TAU)
}

pub(crate) fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub(crate) fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub(crate) fn norm(a: [f64; 3]) -> f64 {
    dot(a, a).sqrt()
}
