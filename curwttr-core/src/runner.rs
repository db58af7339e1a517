use std::io::Write;

use crate::{
    Config, Paths, WeatherProvider,
    error::Result,
    logger::ErrorLog,
    output::write_summary,
};

/// One end-to-end refresh: read the config, fetch, write the summary.
#[derive(Debug)]
pub struct Runner<P> {
    paths: Paths,
    provider: P,
}

impl<P: WeatherProvider> Runner<P> {
    pub fn new(paths: Paths, provider: P) -> Self {
        Self { paths, provider }
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    /// Run every step, stopping at the first failure. Returns the summary
    /// that was written.
    pub async fn run(&self) -> Result<String> {
        let config = Config::load(&self.paths.env_file)?;

        let missing = config.missing_keys();
        if !missing.is_empty() {
            log::warn!(
                "{} has no value for: {}",
                self.paths.env_file.display(),
                missing.join(", ")
            );
        }

        let snapshot = self.provider.current(&config).await?;
        let summary = snapshot.summary();
        write_summary(&self.paths.output_file, &summary)?;

        Ok(summary)
    }

    /// Like [`Runner::run`], but a failure is also appended to `error_log`.
    pub async fn run_logged<W: Write>(&self, error_log: &mut ErrorLog<W>) -> Result<String> {
        let result = self.run().await;

        if let Err(err) = &result {
            error_log.report(err);
        }

        result
    }
}
