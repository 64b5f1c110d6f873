use chrono::{DateTime, Duration, DurationRound, Utc};
use log::{debug, info};

use crate::predict::error::PredictError;
use crate::predict::ground_station::GroundStation;
use crate::predict::satellite::Satellite;
use crate::predict::types::VisibilityPeriod;

/// Rounds `time` to the nearest multiple of `step` counted from the Unix epoch.
/// Ties round up.
pub fn align_to_grid(time: DateTime<Utc>, step: Duration) -> Result<DateTime<Utc>, PredictError> {
    time.duration_round(step)
        .map_err(|e| PredictError::InvalidArgument(format!("cannot align {time} to {step}: {e}")))
}

#[derive(Debug, Clone, Copy)]
enum ScanState {
    /// No sample has yet found the satellite below the horizon. A pass seen
    /// here began before the window and is never reported.
    Init,
    NotObserving,
    Observing {
        start: DateTime<Utc>,
        start_azimuth: f64,
        max_elevation: f64,
    },
}

/// Fixed-step search for visibility periods of one satellite over one station.
///
/// A pass that is still in progress at the end of the window is followed until
/// the satellite sets, so the scan has no upper bound on its duration unless
/// a sample limit is set.
#[derive(Debug, Clone)]
pub struct PassScanner<'a> {
    station: &'a GroundStation,
    step: Duration,
    sample_limit: Option<u64>,
    min_elevation: f64,
}

impl<'a> PassScanner<'a> {
    pub fn new(station: &'a GroundStation, step: Duration) -> Result<Self, PredictError> {
        if step <= Duration::zero() {
            return Err(PredictError::InvalidArgument(format!(
                "step must be positive, got {step}"
            )));
        }
        Ok(Self {
            station,
            step,
            sample_limit: None,
            min_elevation: 0.0,
        })
    }

    /// Abort with [`PredictError::SampleLimitExceeded`] after `limit` samples.
    pub fn with_sample_limit(mut self, limit: u64) -> Self {
        self.sample_limit = Some(limit);
        self
    }

    /// Drop periods whose maximum elevation (radians) stays below `min_elevation`.
    pub fn with_min_elevation(mut self, min_elevation: f64) -> Self {
        self.min_elevation = min_elevation;
        self
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Visibility periods whose AOS lies at or after the grid-aligned `start`.
    pub fn scan<S: Satellite + ?Sized>(
        &self,
        satellite: &S,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<VisibilityPeriod>, PredictError> {
        if self.sample_limit == Some(0) {
            return Err(PredictError::InvalidArgument(
                "sample limit must be at least 1".into(),
            ));
        }

        let start = align_to_grid(start, self.step)?;
        let mut cursor = start
            .checked_sub_signed(self.step)
            .ok_or_else(|| PredictError::InvalidArgument(format!("{start} is out of range")))?;

        let mut periods = Vec::new();
        let mut state = ScanState::Init;
        let mut samples: u64 = 0;

        loop {
            if let Some(limit) = self.sample_limit {
                if samples >= limit {
                    return Err(PredictError::SampleLimitExceeded { limit });
                }
            }
            samples += 1;

            let observer = self.station.location.to_eci(cursor);
            let position = satellite.predict(cursor)?;
            let visible = self.station.is_visible(&position, 0.0);

            state = match state {
                ScanState::Init if visible => ScanState::Init,
                ScanState::Init => ScanState::NotObserving,
                ScanState::NotObserving if visible => {
                    let obs = observer.observe(&position);
                    debug!(
                        "AOS {} at {} az {:.1}",
                        satellite.info().name,
                        cursor,
                        obs.azimuth_deg()
                    );
                    ScanState::Observing {
                        start: cursor,
                        start_azimuth: obs.azimuth,
                        max_elevation: obs.elevation.max(0.0),
                    }
                }
                ScanState::NotObserving => ScanState::NotObserving,
                ScanState::Observing {
                    start,
                    start_azimuth,
                    max_elevation,
                } if visible => {
                    let obs = observer.observe(&position);
                    ScanState::Observing {
                        start,
                        start_azimuth,
                        max_elevation: max_elevation.max(obs.elevation),
                    }
                }
                ScanState::Observing {
                    start,
                    start_azimuth,
                    max_elevation,
                } => {
                    let obs = observer.observe(&position);
                    debug!(
                        "LOS {} at {} az {:.1}, max el {:.1}",
                        satellite.info().name,
                        cursor,
                        obs.azimuth_deg(),
                        max_elevation.to_degrees()
                    );
                    if max_elevation >= self.min_elevation {
                        periods.push(VisibilityPeriod {
                            satellite: satellite.info().clone(),
                            start,
                            end: cursor,
                            max_elevation,
                            start_azimuth,
                            end_azimuth: obs.azimuth,
                        });
                    }
                    ScanState::NotObserving
                }
            };

            cursor = cursor.checked_add_signed(self.step).ok_or_else(|| {
                PredictError::InvalidArgument(format!("scan ran past {cursor}"))
            })?;

            let observing = matches!(state, ScanState::Observing { .. });
            if cursor > end && !observing {
                break;
            }
        }

        info!(
            "{}: {} visibility periods between {} and {} ({} samples)",
            satellite.info().name,
            periods.len(),
            start,
            end,
            samples
        );

        Ok(periods)
    }
}
