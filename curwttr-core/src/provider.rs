use async_trait::async_trait;
use std::{fmt::Debug, iter::Take, time::Duration};
use tokio_retry::strategy::FixedInterval;

use crate::{Config, WeatherSnapshot, error::Result};

pub mod openweather;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions at the location named by `config`.
    async fn current(&self, config: &Config) -> Result<WeatherSnapshot>;
}

#[async_trait]
impl<P: WeatherProvider + ?Sized> WeatherProvider for Box<P> {
    async fn current(&self, config: &Config) -> Result<WeatherSnapshot> {
        (**self).current(config).await
    }
}

/// How many extra attempts a failed request gets, and how long to wait
/// between them. The default makes a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: usize,
    pub delay: Duration,
}

impl RetryPolicy {
    pub const fn none() -> Self {
        Self {
            attempts: 0,
            delay: Duration::ZERO,
        }
    }

    pub const fn fixed(attempts: usize, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    /// Delays to sleep before each retry.
    pub fn delays(&self) -> Take<FixedInterval> {
        FixedInterval::new(self.delay).take(self.attempts)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}
