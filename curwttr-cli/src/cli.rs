use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use curwttr_core::{
    ClientOptions, Config, ErrorChain, ErrorLog, OpenWeatherClient, Paths, RetryPolicy, Runner,
};
use inquire::{CustomUserError, Text, validator::Validation};
use log::LevelFilter;
use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    time::Duration,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "curwttr",
    version,
    about = "Write the current weather to a file for a status bar"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Config file with appid, lat and lon [default: ~/.curwttr_env]
    #[arg(long, value_name = "PATH", global = true)]
    pub env_file: Option<PathBuf>,

    /// Summary output file [default: ~/.curwttr]
    #[arg(long, value_name = "PATH", global = true)]
    pub output: Option<PathBuf>,

    /// Error log file [default: ~/.curwttr_error]
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Request timeout in seconds.
    #[arg(long, value_name = "SECS", default_value_t = 10, global = true)]
    pub timeout: u64,

    /// Extra attempts after a network failure or a 5xx response.
    #[arg(long, value_name = "N", default_value_t = 0, global = true)]
    pub retries: usize,

    /// Delay between attempts in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 1000, global = true)]
    pub retry_delay: u64,

    /// Print diagnostics to stderr (repeat for more).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum Command {
    /// Fetch the current weather and write the summary (the default).
    Fetch,

    /// Prompt for the API key and location and save the config file.
    Configure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    Success = 0,
    RunFailed = 1,
    Environment = 2,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit as u8)
    }
}

impl Cli {
    pub async fn run(self) -> ExitCode {
        configure_logger(self.verbose);

        let paths = match self.paths() {
            Ok(paths) => paths,
            Err(err) => {
                log::error!("{}", ErrorChain(&err));
                return Exit::Environment.into();
            }
        };

        match self.command.unwrap_or(Command::Fetch) {
            Command::Fetch => fetch(paths, self.client_options()).await.into(),
            Command::Configure => match configure(&paths.env_file) {
                Ok(()) => Exit::Success.into(),
                Err(err) => {
                    log::error!("{err:#}");
                    Exit::RunFailed.into()
                }
            },
        }
    }

    /// Home-relative defaults with any overrides applied. The home directory
    /// is only looked up when some path was not given.
    fn paths(&self) -> curwttr_core::Result<Paths> {
        if let (Some(env_file), Some(output_file), Some(log_file)) =
            (&self.env_file, &self.output, &self.log_file)
        {
            return Ok(Paths {
                env_file: env_file.clone(),
                output_file: output_file.clone(),
                log_file: log_file.clone(),
            });
        }

        let defaults = Paths::from_home()?;
        Ok(Paths {
            env_file: self.env_file.clone().unwrap_or(defaults.env_file),
            output_file: self.output.clone().unwrap_or(defaults.output_file),
            log_file: self.log_file.clone().unwrap_or(defaults.log_file),
        })
    }

    fn client_options(&self) -> ClientOptions {
        ClientOptions {
            timeout: Duration::from_secs(self.timeout),
            retry: RetryPolicy::fixed(self.retries, Duration::from_millis(self.retry_delay)),
            ..ClientOptions::default()
        }
    }
}

fn configure_logger(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new().filter_level(level).init();
}

/// One refresh. Failures after the log file is open are recorded there;
/// before that they can only go to stderr.
async fn fetch(paths: Paths, options: ClientOptions) -> Exit {
    let mut error_log = match ErrorLog::open(&paths.log_file) {
        Ok(error_log) => error_log,
        Err(err) => {
            log::error!("{}", ErrorChain(&err));
            return Exit::Environment;
        }
    };

    let client = match OpenWeatherClient::new(options) {
        Ok(client) => client,
        Err(err) => {
            error_log.report(&err);
            return Exit::RunFailed;
        }
    };

    match Runner::new(paths, client).run_logged(&mut error_log).await {
        Ok(_) => Exit::Success,
        Err(_) => Exit::RunFailed,
    }
}

fn configure(env_file: &Path) -> Result<()> {
    let current = if env_file.exists() {
        Config::load(env_file)?
    } else {
        Config::default()
    };

    let appid = Text::new("OpenWeather API key (appid):")
        .with_default(&current.appid)
        .with_validator(non_empty_validator)
        .prompt()
        .context("Failed to read API key")?;

    let lat = Text::new("Latitude:")
        .with_default(&current.lat)
        .with_validator(coordinate_validator)
        .prompt()
        .context("Failed to read latitude")?;

    let lon = Text::new("Longitude:")
        .with_default(&current.lon)
        .with_validator(coordinate_validator)
        .prompt()
        .context("Failed to read longitude")?;

    Config {
        appid: appid.trim().to_string(),
        lat: lat.trim().to_string(),
        lon: lon.trim().to_string(),
    }
    .save(env_file)?;

    println!("Saved configuration to {}", env_file.display());
    Ok(())
}

fn non_empty_validator(input: &str) -> std::result::Result<Validation, CustomUserError> {
    if input.trim().is_empty() {
        Ok(Validation::Invalid("Value must not be empty".into()))
    } else {
        Ok(Validation::Valid)
    }
}

fn coordinate_validator(input: &str) -> std::result::Result<Validation, CustomUserError> {
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Validation::Valid),
        _ => Ok(Validation::Invalid(
            "Expected a decimal number, e.g. 52.52".into(),
        )),
    }
}
