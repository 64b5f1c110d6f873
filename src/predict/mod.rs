mod error;
mod ground_station;
mod pass_finder;
mod satellite;
mod tle_loader;
mod types;

pub use ground_station::GroundStation;
pub use pass_finder::PassScanner;
pub use satellite::Satellite;
pub use tle_loader::TleLoader;
