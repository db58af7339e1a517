use std::{fmt, io, path::PathBuf};

use reqwest::StatusCode;
use thiserror::Error;

/// Every way a run can fail. The binary decides which of these are fatal and
/// where they are reported.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Could not determine the home directory")]
    HomeDir,

    #[error("Failed to read config file {}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to send request to OpenWeather")]
    Transport(#[source] reqwest::Error),

    #[error("OpenWeather request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to parse OpenWeather current JSON")]
    Decode(#[from] serde_json::Error),

    #[error("OpenWeather response contained no weather conditions")]
    EmptyResponse,

    #[error("Failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to open log file {}", .path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key in its query string.
        Error::Transport(err.without_url())
    }
}

/// Displays an error followed by each of its sources, separated by `": "`.
pub struct ErrorChain<'a>(pub &'a (dyn std::error::Error + 'static));

impl fmt::Display for ErrorChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)?;
        let mut source = self.0.source();
        while let Some(err) = source {
            write!(f, ": {err}")?;
            source = err.source();
        }
        Ok(())
    }
}
