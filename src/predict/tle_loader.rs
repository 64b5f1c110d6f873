use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::predict::error::PredictError;
use crate::predict::satellite::TleSatellite;

/// Satellites read from a TLE file, or from every `.tle`/`.txt` file in a directory.
pub struct TleLoader {
    source: PathBuf,
    satellites: BTreeMap<u32, TleSatellite>,
}

impl TleLoader {
    pub fn new(source: PathBuf) -> Self {
        Self {
            source,
            satellites: BTreeMap::new(),
        }
    }

    pub fn load_all(&mut self) -> Result<(), PredictError> {
        if !self.source.exists() {
            return Err(PredictError::DirectoryNotFound(
                self.source.display().to_string(),
            ));
        }

        self.satellites.clear();

        if self.source.is_file() {
            for sat in parse_tle_file(&self.source)? {
                self.satellites.insert(sat.info.norad_id, sat);
            }
            return Ok(());
        }

        for entry in fs::read_dir(&self.source)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let is_tle = path
                .extension()
                .is_some_and(|ext| ext == "tle" || ext == "txt");
            if !is_tle {
                continue;
            }
            match parse_tle_file(&path) {
                Ok(sats) => {
                    for sat in sats {
                        self.satellites.insert(sat.info.norad_id, sat);
                    }
                }
                Err(e) => {
                    log::warn!("Failed to parse TLE file {}: {}", path.display(), e);
                }
            }
        }

        log::info!(
            "Loaded {} satellites from {}",
            self.satellites.len(),
            self.source.display()
        );
        Ok(())
    }

    /// The satellite with `norad_id`, or the only one loaded when `norad_id` is `None`.
    pub fn select(&self, norad_id: Option<u32>) -> Result<&TleSatellite, PredictError> {
        match norad_id {
            Some(id) => self
                .satellites
                .get(&id)
                .ok_or(PredictError::SatelliteNotFound(id)),
            None => {
                let mut iter = self.satellites.values();
                match (iter.next(), iter.next()) {
                    (Some(sat), None) => Ok(sat),
                    (None, _) => Err(PredictError::NoSatellites),
                    (Some(_), Some(_)) => Err(PredictError::InvalidArgument(format!(
                        "{} satellites loaded, pick one by NORAD id",
                        self.satellites.len()
                    ))),
                }
            }
        }
    }
}

fn parse_tle_file(path: &Path) -> Result<Vec<TleSatellite>, PredictError> {
    let content = fs::read_to_string(path)?;
    let filename = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    parse_multi_tle(&content)
        .into_iter()
        .map(|(name, line1, line2)| TleSatellite::from_tle(name, &line1, &line2, &filename))
        .collect()
}

/// Splits text holding any mix of 2-line and 3-line (named) element sets.
fn parse_multi_tle(content: &str) -> Vec<(Option<String>, String, String)> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            result.push((None, lines[i].to_string(), lines[i + 1].to_string()));
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            let name = lines[i].trim_start_matches("0 ").to_string();
            result.push((Some(name), lines[i + 1].to_string(), lines[i + 2].to_string()));
            i += 3;
        } else {
            i += 1;
        }
    }

    result
}
