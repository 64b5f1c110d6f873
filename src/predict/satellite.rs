use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

use crate::coords::EciPosition;
use crate::predict::error::PredictError;
use crate::predict::types::SatelliteInfo;

/// Something whose inertial position can be predicted for any instant.
pub trait Satellite {
    fn info(&self) -> &SatelliteInfo;

    fn predict(&self, time: DateTime<Utc>) -> Result<EciPosition, PredictError>;
}

/// SGP4-propagated satellite built from a two-line element set.
pub struct TleSatellite {
    pub info: SatelliteInfo,
    pub elements: Elements,
    pub constants: Constants,
}

impl TleSatellite {
    pub fn from_elements(elements: Elements, tle_source: &str) -> Result<Self, PredictError> {
        let constants =
            Constants::from_elements(&elements).map_err(|e| PredictError::InvalidTle {
                file: tle_source.to_string(),
                message: e.to_string(),
            })?;
        let name = elements
            .object_name
            .clone()
            .unwrap_or_else(|| format!("NORAD {}", elements.norad_id));

        Ok(Self {
            info: SatelliteInfo {
                name,
                norad_id: elements.norad_id as u32,
                tle_source: tle_source.to_string(),
            },
            elements,
            constants,
        })
    }

    pub fn from_tle(
        name: Option<String>,
        line1: &str,
        line2: &str,
        tle_source: &str,
    ) -> Result<Self, PredictError> {
        let elements = Elements::from_tle(name, line1.as_bytes(), line2.as_bytes()).map_err(
            |e| PredictError::InvalidTle {
                file: tle_source.to_string(),
                message: e.to_string(),
            },
        )?;
        Self::from_elements(elements, tle_source)
    }
}

impl Satellite for TleSatellite {
    fn info(&self) -> &SatelliteInfo {
        &self.info
    }

    fn predict(&self, time: DateTime<Utc>) -> Result<EciPosition, PredictError> {
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&time.naive_utc())
            .map_err(|e| PredictError::Propagation(e.to_string()))?;
        let prediction = self.constants.propagate(minutes)?;
        Ok(EciPosition::new(
            time,
            prediction.position,
            prediction.velocity,
        ))
    }
}
