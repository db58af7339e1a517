//! Core library for `curwttr`.
//!
//! This crate defines:
//! - The `key=value` config file and the well-known file locations
//! - The OpenWeather client behind the `WeatherProvider` trait
//! - Formatting and writing the one-line weather summary
//! - The append-only error log and the run pipeline that ties it together
//!
//! It is used by `curwttr-cli`, but every step returns a `Result` so it can be
//! driven from tests or other binaries.

pub mod config;
pub mod error;
pub mod logger;
pub mod model;
pub mod output;
pub mod provider;
pub mod runner;

pub use config::{Config, Paths};
pub use error::{Error, ErrorChain, Result};
pub use logger::ErrorLog;
pub use model::WeatherSnapshot;
pub use output::write_summary;
pub use provider::{
    RetryPolicy, WeatherProvider,
    openweather::{ClientOptions, OpenWeatherClient},
};
pub use runner::Runner;
