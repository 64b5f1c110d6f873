use chrono::{DateTime, Duration, Utc};

use crate::coords::{EciPosition, GeodeticPosition, TopocentricObservation};
use crate::predict::error::PredictError;
use crate::predict::pass_finder::PassScanner;
use crate::predict::satellite::Satellite;
use crate::predict::types::TrackSample;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundStation {
    pub location: GeodeticPosition,
}

impl GroundStation {
    pub fn new(location: GeodeticPosition) -> Self {
        Self { location }
    }

    /// Parses `"lat, lon"` in degrees.
    pub fn from_coordinates(coordinates: &str, altitude_m: Option<f64>) -> Option<Self> {
        let parts: Vec<_> = coordinates.split(',').map(|s| s.trim()).collect();
        if parts.len() != 2 {
            return None;
        }
        let lat: f64 = parts[0].parse().ok()?;
        let lon: f64 = parts[1].parse().ok()?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return None;
        }
        Some(Self::new(GeodeticPosition::from_degrees(
            lat,
            lon,
            altitude_m.unwrap_or(0.0),
        )))
    }

    /// Whether `position` is at least `min_elevation` radians above this station's horizon.
    ///
    /// Anything outside the target's footprint is rejected without computing look
    /// angles. For a zero threshold the footprint test alone decides.
    pub fn is_visible(&self, position: &EciPosition, min_elevation: f64) -> bool {
        let sub_point = position.to_geodetic();
        if self.location.angle_to(&sub_point) > sub_point.footprint_angle() {
            return false;
        }

        if min_elevation.abs() < f64::EPSILON {
            return true;
        }

        let observer = self.location.to_eci(position.time);
        observer.observe(position).elevation >= min_elevation
    }

    pub fn observe_at<S: Satellite + ?Sized>(
        &self,
        satellite: &S,
        time: DateTime<Utc>,
    ) -> Result<TopocentricObservation, PredictError> {
        let observer = self.location.to_eci(time);
        let position = satellite.predict(time)?;
        Ok(observer.observe(&position))
    }

    /// A pass scanner over this station sampling every `step`.
    pub fn scanner(&self, step: Duration) -> Result<PassScanner<'_>, PredictError> {
        PassScanner::new(self, step)
    }

    /// Look angles every `step` from `start` through `end`, visible or not.
    pub fn track<S: Satellite + ?Sized>(
        &self,
        satellite: &S,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        step: Duration,
        downlink_hz: Option<f64>,
    ) -> Result<Vec<TrackSample>, PredictError> {
        if step <= Duration::zero() {
            return Err(PredictError::InvalidArgument(format!(
                "step must be positive, got {step}"
            )));
        }

        let mut cursor = start;
        let mut points = Vec::new();

        while cursor <= end {
            let obs = self.observe_at(satellite, cursor)?;
            points.push(TrackSample {
                timestamp: cursor,
                azimuth_deg: round2(obs.azimuth_deg()),
                elevation_deg: round2(obs.elevation_deg()),
                range_km: round2(obs.range),
                range_rate_km_s: round2(obs.range_rate),
                doppler_downlink_hz: downlink_hz.map(|f| obs.doppler_shift(f)),
            });
            cursor += step;
        }

        Ok(points)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::satellite::tests::iss;
    use chrono::TimeZone;
    use rstest::rstest;

    fn station() -> GroundStation {
        GroundStation::new(GeodeticPosition::from_degrees(45.0, -75.0, 100.0))
    }

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    /// Sub-point `separation_deg` away from `s` along `bearing_deg`.
    fn offset(
        s: GeodeticPosition,
        separation_deg: f64,
        bearing_deg: f64,
        altitude_km: f64,
    ) -> GeodeticPosition {
        let d = separation_deg.to_radians();
        let b = bearing_deg.to_radians();
        let lat = (s.latitude.sin() * d.cos() + s.latitude.cos() * d.sin() * b.cos()).asin();
        let lon = s.longitude
            + (b.sin() * d.sin() * s.latitude.cos()).atan2(d.cos() - s.latitude.sin() * lat.sin());
        GeodeticPosition::new(lat, lon, altitude_km)
    }

    #[test]
    fn parses_coordinates() {
        let gs = GroundStation::from_coordinates("52.0, 4.37", Some(12.0)).unwrap();
        assert!((gs.location.latitude.to_degrees() - 52.0).abs() < 1e-12);
        assert!((gs.location.longitude.to_degrees() - 4.37).abs() < 1e-12);
        assert!((gs.location.altitude_km - 0.012).abs() < 1e-12);

        assert!(GroundStation::from_coordinates("52.0", None).is_none());
        assert!(GroundStation::from_coordinates("abc, 4", None).is_none());
        assert!(GroundStation::from_coordinates("91, 4", None).is_none());
    }

    fn target(separation_deg: f64, bearing_deg: f64, altitude_km: f64) -> GeodeticPosition {
        offset(station().location, separation_deg, bearing_deg, altitude_km)
    }

    #[rstest]
    #[case(45.0, 100.0)]
    #[case(70.0, 0.0)]
    fn zero_threshold_agrees_with_elevation(#[case] lat: f64, #[case] alt_m: f64) {
        let t = epoch();
        let station = GroundStation::new(GeodeticPosition::from_degrees(lat, -75.0, alt_m));
        let observer = station.location.to_eci(t);
        let mut checked = 0;
        for altitude in [400.0, 800.0, 1500.0, 20_000.0] {
            for bearing in (0..360).step_by(10) {
                for tenth in 0..900 {
                    let separation = tenth as f64 / 10.0;
                    let pos = offset(station.location, separation, bearing as f64, altitude)
                        .to_eci(t);
                    let elevation = observer.observe(&pos).elevation;
                    // The footprint is spherical, the horizon plane is not.
                    if elevation.to_degrees().abs() < 0.1 {
                        continue;
                    }
                    assert_eq!(
                        station.is_visible(&pos, 0.0),
                        elevation >= 0.0,
                        "lat {lat} alt {altitude} bearing {bearing} sep {separation}"
                    );
                    checked += 1;
                }
            }
        }
        assert!(checked > 100_000);
    }

    #[rstest]
    #[case(400.0, -0.5, true)]
    #[case(400.0, 0.5, false)]
    #[case(800.0, -0.5, true)]
    #[case(800.0, 0.5, false)]
    #[case(1500.0, -0.5, true)]
    #[case(1500.0, 0.5, false)]
    fn footprint_edge(#[case] altitude: f64, #[case] past_edge_deg: f64, #[case] expected: bool) {
        let t = epoch();
        let station = GroundStation::new(GeodeticPosition::from_degrees(70.0, 20.0, 0.0));
        let footprint = GeodeticPosition::new(0.0, 0.0, altitude)
            .footprint_angle()
            .to_degrees();
        for bearing in [0.0, 90.0, 180.0, 270.0] {
            let pos = offset(station.location, footprint + past_edge_deg, bearing, altitude).to_eci(t);
            let elevation = station.location.to_eci(t).observe(&pos).elevation;
            assert_eq!(station.is_visible(&pos, 0.0), expected, "bearing {bearing}");
            assert_eq!(elevation >= 0.0, expected, "bearing {bearing}");
        }
    }

    #[rstest]
    #[case(0.0, 80.0, true)]
    #[case(0.0, 95.0, false)]
    #[case(15.0, 5.0, true)]
    #[case(15.0, 45.0, false)]
    #[case(60.0, 5.0, false)]
    fn elevation_threshold(#[case] separation: f64, #[case] min_el_deg: f64, #[case] expected: bool) {
        let pos = target(separation, 30.0, 800.0).to_eci(epoch());
        assert_eq!(station().is_visible(&pos, min_el_deg.to_radians()), expected);
    }

    #[test]
    fn iss_passes_over_a_day() {
        let sat = iss();
        let start = Utc.with_ymd_and_hms(2008, 9, 20, 12, 0, 0).unwrap();
        let end = start + Duration::days(1);
        let station = station();
        let periods = station
            .scanner(Duration::seconds(30))
            .unwrap()
            .scan(&sat, start, end)
            .unwrap();

        assert!(!periods.is_empty());
        for p in &periods {
            assert!(p.start >= start);
            assert!(p.start <= p.end);
            assert!(p.duration() < Duration::minutes(20));
            assert!(p.max_elevation >= 0.0 && p.max_elevation_deg() <= 90.0);
            assert_eq!(p.satellite.norad_id, 25544);
        }
        for pair in periods.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
    }

    #[test]
    fn iss_observation_is_plausible() {
        let sat = iss();
        let t = Utc.with_ymd_and_hms(2008, 9, 20, 12, 0, 0).unwrap();
        let obs = station().observe_at(&sat, t).unwrap();
        assert!(obs.range > 300.0 && obs.range < 13_500.0);
        assert!(obs.range_rate.abs() < 8.5);
        assert!((0.0..std::f64::consts::TAU).contains(&obs.azimuth));
    }

    #[test]
    fn track_covers_window() {
        let sat = iss();
        let start = Utc.with_ymd_and_hms(2008, 9, 20, 12, 0, 0).unwrap();
        let end = start + Duration::minutes(10);
        let samples = station()
            .track(&sat, start, end, Duration::seconds(60), Some(145_800_000.0))
            .unwrap();
        assert_eq!(samples.len(), 11);
        assert_eq!(samples[0].timestamp, start);
        assert_eq!(samples[10].timestamp, end);
        assert!(samples.iter().all(|s| s.doppler_downlink_hz.is_some()));

        let res = station().track(&sat, start, end, Duration::zero(), None);
        assert!(matches!(res, Err(PredictError::InvalidArgument(_))));
    }
}
