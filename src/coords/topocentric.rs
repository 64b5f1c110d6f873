use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use super::SPEED_OF_LIGHT_KM_S;

/// Azimuth, elevation, range and range-rate of a target as seen by an observer.
///
/// Equality and hashing compare the bit patterns of the four fields, with no tolerance.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TopocentricObservation {
    /// Radians in `[0, 2π)`, clockwise from north.
    pub azimuth: f64,
    /// Radians in `[-π/2, π/2]` above the local horizontal plane.
    pub elevation: f64,
    /// Kilometers.
    pub range: f64,
    /// Kilometers per second, positive when the target recedes.
    pub range_rate: f64,
}

impl TopocentricObservation {
    pub fn new(azimuth: f64, elevation: f64, range: f64, range_rate: f64) -> Self {
        Self {
            azimuth,
            elevation,
            range,
            range_rate,
        }
    }

    pub fn azimuth_deg(&self) -> f64 {
        self.azimuth.to_degrees()
    }

    pub fn elevation_deg(&self) -> f64 {
        self.elevation.to_degrees()
    }

    /// Frequency received on the ground for a signal transmitted at `freq_hz`.
    pub fn doppler_shift(&self, freq_hz: f64) -> f64 {
        freq_hz * (1.0 - self.range_rate / SPEED_OF_LIGHT_KM_S)
    }

    fn bits(&self) -> [u64; 4] {
        [
            self.azimuth.to_bits(),
            self.elevation.to_bits(),
            self.range.to_bits(),
            self.range_rate.to_bits(),
        ]
    }
}

impl PartialEq for TopocentricObservation {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for TopocentricObservation {}

impl Hash for TopocentricObservation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
    }
}

impl fmt::Display for TopocentricObservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "az {:.2}° el {:.2}° range {:.1} km range-rate {:.3} km/s",
            self.azimuth_deg(),
            self.elevation_deg(),
            self.range,
            self.range_rate
        )
    }
}
