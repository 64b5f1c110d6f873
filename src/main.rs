mod config;
mod coords;
mod predict;

use chrono::{DateTime, Duration, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::Config;
use crate::predict::{Satellite, TleLoader};

#[derive(Parser)]
#[command(name = "pass-o-mat")]
#[command(about = "Satellite visibility prediction for a ground station")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Source {
    /// Station configuration (YAML)
    #[arg(long)]
    config: String,
    /// TLE file or directory of .tle/.txt files
    #[arg(long)]
    tle: PathBuf,
    /// NORAD id, required when several satellites are loaded
    #[arg(long)]
    norad: Option<u32>,
}

#[derive(Args)]
struct Window {
    /// Window start (RFC3339)
    #[arg(long, value_parser = parse_datetime)]
    start: DateTime<Utc>,
    /// Window end (RFC3339)
    #[arg(long, value_parser = parse_datetime, conflicts_with = "duration")]
    end: Option<DateTime<Utc>>,
    /// Window length, e.g. "1day" or "90min"
    #[arg(long, value_parser = parse_duration)]
    duration: Option<Duration>,
    /// Sample step, overrides the configured one
    #[arg(long, value_parser = parse_duration)]
    step: Option<Duration>,
}

impl Window {
    fn end(&self) -> Result<DateTime<Utc>, String> {
        match (self.end, self.duration) {
            (Some(end), _) => Ok(end),
            (None, Some(d)) => self
                .start
                .checked_add_signed(d)
                .ok_or_else(|| format!("{} + {} is out of range", self.start, d)),
            (None, None) => Err("either --end or --duration is required".into()),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List visibility periods in a window
    Passes {
        #[command(flatten)]
        source: Source,
        #[command(flatten)]
        window: Window,
        #[arg(long)]
        json: bool,
    },
    /// Look angles at a single instant
    Observe {
        #[command(flatten)]
        source: Source,
        /// Defaults to now
        #[arg(long, value_parser = parse_datetime)]
        time: Option<DateTime<Utc>>,
        #[arg(long)]
        json: bool,
    },
    /// Look angles every step over a window
    Track {
        #[command(flatten)]
        source: Source,
        #[command(flatten)]
        window: Window,
        /// Downlink frequency for Doppler correction
        #[arg(long)]
        downlink_hz: Option<f64>,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Passes {
            source,
            window,
            json,
        } => passes(&source, &window, json),
        Commands::Observe { source, time, json } => observe(&source, time, json),
        Commands::Track {
            source,
            window,
            downlink_hz,
            json,
        } => track(&source, &window, downlink_hz, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn load(source: &Source) -> Result<(Config, TleLoader), Box<dyn std::error::Error>> {
    let config = Config::from_file(&source.config)?;
    let mut loader = TleLoader::new(source.tle.clone());
    loader.load_all()?;
    Ok((config, loader))
}

fn passes(source: &Source, window: &Window, json: bool) -> CliResult {
    let (config, loader) = load(source)?;
    let station = config.ground_station()?;
    let satellite = loader.select(source.norad)?;
    let end = window.end()?;

    let mut scanner = station
        .scanner(window.step.unwrap_or(config.scan.step))?
        .with_min_elevation(config.scan.min_elevation_deg.to_radians());
    if let Some(limit) = config.scan.sample_limit {
        scanner = scanner.with_sample_limit(limit);
    }
    let periods = scanner.scan(satellite, window.start, end)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&periods)?);
        return Ok(());
    }

    println!(
        "{} passes of {} over {} (step {}s)",
        periods.len(),
        satellite.info().name,
        config.station_name(),
        scanner.step().num_seconds()
    );
    for p in &periods {
        println!(
            "  AOS {}  LOS {}  {:>4}s  max el {:5.1}°  az {:5.1}° -> {:5.1}°",
            p.start.format("%Y-%m-%d %H:%M:%S"),
            p.end.format("%H:%M:%S"),
            p.duration().num_seconds(),
            p.max_elevation_deg(),
            p.start_azimuth_deg(),
            p.end_azimuth_deg()
        );
    }
    Ok(())
}

fn observe(source: &Source, time: Option<DateTime<Utc>>, json: bool) -> CliResult {
    let (config, loader) = load(source)?;
    let station = config.ground_station()?;
    let satellite = loader.select(source.norad)?;
    let time = time.unwrap_or_else(Utc::now);

    let obs = station.observe_at(satellite, time)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&obs)?);
    } else {
        println!("{} at {}: {}", satellite.info().name, time, obs);
    }
    Ok(())
}

fn track(source: &Source, window: &Window, downlink_hz: Option<f64>, json: bool) -> CliResult {
    let (config, loader) = load(source)?;
    let station = config.ground_station()?;
    let satellite = loader.select(source.norad)?;
    let step = window.step.unwrap_or(config.scan.step);

    let samples = station.track(satellite, window.start, window.end()?, step, downlink_hz)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&samples)?);
        return Ok(());
    }

    for s in &samples {
        let doppler = s
            .doppler_downlink_hz
            .map(|f| format!("  {:.0} Hz", f))
            .unwrap_or_default();
        println!(
            "{}  az {:6.2}  el {:6.2}  range {:8.1} km  rate {:6.2} km/s{}",
            s.timestamp.format("%Y-%m-%d %H:%M:%S"),
            s.azimuth_deg,
            s.elevation_deg,
            s.range_km,
            s.range_rate_km_s,
            doppler
        );
    }
    Ok(())
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| e.to_string())
}

fn parse_duration(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s.trim())
        .map_err(|e| e.to_string())
        .and_then(|d| Duration::from_std(d).map_err(|e| e.to_string()))
}
