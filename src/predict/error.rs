use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Propagation error: {0}")]
    Propagation(String),
    #[error("Scan exceeded the limit of {limit} samples")]
    SampleLimitExceeded { limit: u64 },
    #[error("TLE directory not found: {0}")]
    DirectoryNotFound(String),
    #[error("TLE file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Invalid TLE format in {file}: {message}")]
    InvalidTle { file: String, message: String },
    #[error("No satellites loaded")]
    NoSatellites,
    #[error("Satellite {0} not loaded")]
    SatelliteNotFound(u32),
}

impl From<sgp4::Error> for PredictError {
    fn from(err: sgp4::Error) -> Self {
        PredictError::Propagation(err.to_string())
    }
}
