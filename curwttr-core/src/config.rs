use directories::BaseDirs;
use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use crate::{
    error::{Error, Result},
    output::write_private,
};

/// Credentials file, relative to the home directory.
pub const ENV_FILE: &str = ".curwttr_env";
/// Summary file read by the status bar.
pub const OUT_FILE: &str = ".curwttr";
/// Append-only failure log.
pub const LOG_FILE: &str = ".curwttr_error";

/// API key and location, read from a flat `key=value` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub appid: String,
    pub lat: String,
    pub lon: String,
}

impl Config {
    pub const KEYS: [&'static str; 3] = ["appid", "lat", "lon"];

    /// Load the config file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;

        let cfg = Self::from_reader(BufReader::new(file)).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!("Loaded config from {}", path.display());
        Ok(cfg)
    }

    /// Parse `key=value` lines.
    ///
    /// Only `appid`, `lat` and `lon` are recognized. The value is the field
    /// after the first `=` and stops at the next one. Lines without a
    /// recognized key or without a `=` are skipped, and a repeated key keeps
    /// its last value. Keys that never appear stay empty. Bytes that are not
    /// valid UTF-8 are decoded lossily rather than failing the read.
    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut cfg = Self::default();

        for line in reader.split(b'\n') {
            let mut line = line?;
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            let line = String::from_utf8_lossy(&line);
            let mut fields = line.split('=');
            let (Some(key), Some(value)) = (fields.next(), fields.next()) else {
                continue;
            };

            match key {
                "appid" => cfg.appid = value.to_owned(),
                "lat" => cfg.lat = value.to_owned(),
                "lon" => cfg.lon = value.to_owned(),
                _ => {}
            }
        }

        Ok(cfg)
    }

    /// Keys that were absent (or empty) in the parsed file.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        Self::KEYS
            .into_iter()
            .zip([&self.appid, &self.lat, &self.lon])
            .filter(|(_, value)| value.is_empty())
            .map(|(key, _)| key)
            .collect()
    }

    /// Render back into the on-disk `key=value` form.
    pub fn to_env_string(&self) -> String {
        format!("appid={}\nlat={}\nlon={}\n", self.appid, self.lat, self.lon)
    }

    /// Save to `path`, readable by the owner only.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_private(path, self.to_env_string().as_bytes()).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// The three files a run touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub env_file: PathBuf,
    pub output_file: PathBuf,
    pub log_file: PathBuf,
}

impl Paths {
    /// Default file names placed in `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            env_file: dir.join(ENV_FILE),
            output_file: dir.join(OUT_FILE),
            log_file: dir.join(LOG_FILE),
        }
    }

    /// Default file names placed in the current user's home directory.
    pub fn from_home() -> Result<Self> {
        let dirs = BaseDirs::new().ok_or(Error::HomeDir)?;
        Ok(Self::in_dir(dirs.home_dir()))
    }
}
