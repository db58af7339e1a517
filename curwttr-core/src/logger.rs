use chrono::Local;
use std::{
    fmt::Display,
    fs::File,
    io::{self, Write},
    path::Path,
};

use crate::{
    error::{Error, ErrorChain, Result},
    output::private_options,
};

pub const LOG_PREFIX: &str = "curwttr";
const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Append-only record of failed runs, one timestamped line per failure.
///
/// Constructed once by the caller and handed to whatever reports errors, so
/// tests can point it at an in-memory buffer.
#[derive(Debug)]
pub struct ErrorLog<W: Write = File> {
    sink: W,
}

impl ErrorLog<File> {
    /// Open (or create) the log file in append mode, owner-only.
    pub fn open(path: &Path) -> Result<Self> {
        let file = private_options()
            .append(true)
            .create(true)
            .open(path)
            .map_err(|source| Error::LogFile {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self::from_writer(file))
    }
}

impl<W: Write> ErrorLog<W> {
    pub fn from_writer(sink: W) -> Self {
        Self { sink }
    }

    /// Append `message` as a single line.
    pub fn record(&mut self, message: impl Display) -> io::Result<()> {
        let line = format!(
            "{} {LOG_PREFIX}: {message}\n",
            Local::now().format(TIMESTAMP_FORMAT)
        );
        self.sink.write_all(line.as_bytes())?;
        self.sink.flush()
    }

    /// Append `err` together with its chain of causes.
    pub fn record_error(&mut self, err: &(dyn std::error::Error + 'static)) -> io::Result<()> {
        self.record(ErrorChain(err))
    }

    /// Emit `err` as a diagnostic and append it to the log. A failed append
    /// can only go to stderr.
    pub fn report(&mut self, err: &(dyn std::error::Error + 'static)) {
        log::warn!("{}", ErrorChain(err));
        if let Err(log_err) = self.record_error(err) {
            log::error!("Failed to write error log: {log_err}");
        }
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}
