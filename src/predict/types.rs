use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Information about a single satellite from TLE
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SatelliteInfo {
    pub name: String,
    pub norad_id: u32,
    pub tle_source: String,
}

/// One continuous AOS-to-LOS interval. Angles are in radians.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibilityPeriod {
    pub satellite: SatelliteInfo,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Highest elevation among the samples taken during the pass.
    pub max_elevation: f64,
    pub start_azimuth: f64,
    pub end_azimuth: f64,
}

impl VisibilityPeriod {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn max_elevation_deg(&self) -> f64 {
        self.max_elevation.to_degrees()
    }

    pub fn start_azimuth_deg(&self) -> f64 {
        self.start_azimuth.to_degrees()
    }

    pub fn end_azimuth_deg(&self) -> f64 {
        self.end_azimuth.to_degrees()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackSample {
    pub timestamp: DateTime<Utc>,
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    pub range_km: f64,
    pub range_rate_km_s: f64,
    pub doppler_downlink_hz: Option<f64>,
}
