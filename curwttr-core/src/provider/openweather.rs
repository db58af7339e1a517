use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tokio_retry::RetryIf;

use crate::{
    Config, WeatherSnapshot,
    error::{Error, Result},
    provider::RetryPolicy,
};

use super::WeatherProvider;

pub const API_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: API_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::none(),
        }
    }
}

/// Client for the OpenWeather "current weather" endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    base_url: String,
    retry: RetryPolicy,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(options: ClientOptions) -> Result<Self> {
        let http = Client::builder().timeout(options.timeout).build()?;

        Ok(Self {
            base_url: options.base_url,
            retry: options.retry,
            http,
        })
    }

    async fn fetch_current(&self, config: &Config) -> Result<WeatherSnapshot> {
        log::debug!("Requesting current weather for lat={} lon={}", config.lat, config.lon);

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("appid", config.appid.as_str()),
                ("lat", config.lat.as_str()),
                ("lon", config.lon.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if status != StatusCode::OK {
            return Err(Error::Status {
                status,
                body: truncate_body(&body),
            });
        }

        decode_current(&body)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current(&self, config: &Config) -> Result<WeatherSnapshot> {
        RetryIf::spawn(
            self.retry.delays(),
            || self.fetch_current(config),
            |err: &Error| {
                let retry = is_retryable(err);
                if retry {
                    log::warn!("Retrying OpenWeather request after error: {err}");
                }
                retry
            },
        )
        .await
    }
}

/// Transport failures and server-side errors may go away on their own;
/// anything else will fail the same way again.
fn is_retryable(err: &Error) -> bool {
    match err {
        Error::Transport(_) => true,
        Error::Status { status, .. } => status.is_server_error(),
        _ => false,
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    weather: Vec<OwWeather>,
    main: OwMain,
}

/// Decode a current-weather JSON body. The first weather condition supplies
/// the description.
pub fn decode_current(body: &str) -> Result<WeatherSnapshot> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)?;

    let condition = parsed
        .weather
        .into_iter()
        .next()
        .ok_or(Error::EmptyResponse)?;

    Ok(WeatherSnapshot {
        description: condition.main,
        temperature_c: parsed.main.temp,
        feels_like_c: parsed.main.feels_like,
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((end, _)) => format!("{}...", &body[..end]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_first_condition_and_temperatures() {
        let body = r#"{"weather":[{"main":"Clouds"}],"main":{"temp":17.6,"feels_like":16.4}}"#;

        let snapshot = decode_current(body).unwrap();

        assert_eq!(snapshot.description, "Clouds");
        assert_eq!(snapshot.temperature_c, 17.6);
        assert_eq!(snapshot.feels_like_c, 16.4);
        assert_eq!(snapshot.summary(), "Clouds: 18°C 16°C");
    }

    #[test]
    fn ignores_extra_fields_and_later_conditions() {
        let body = r#"{
            "coord": {"lon": 13.4, "lat": 52.52},
            "weather": [
                {"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"},
                {"id": 701, "main": "Mist", "description": "mist", "icon": "50d"}
            ],
            "main": {"temp": 9.49, "feels_like": 7.5, "humidity": 87},
            "name": "Berlin",
            "cod": 200
        }"#;

        let snapshot = decode_current(body).unwrap();

        assert_eq!(snapshot.summary(), "Rain: 9°C 8°C");
    }

    #[test]
    fn empty_weather_list_is_an_error() {
        let body = r#"{"weather":[],"main":{"temp":1.0,"feels_like":0.0}}"#;

        assert!(matches!(decode_current(body), Err(Error::EmptyResponse)));
    }

    #[test]
    fn absent_weather_list_is_an_error() {
        let body = r#"{"main":{"temp":1.0,"feels_like":0.0}}"#;

        assert!(matches!(decode_current(body), Err(Error::EmptyResponse)));
    }

    #[test]
    fn malformed_json_is_decode_error() {
        assert!(matches!(decode_current("{\"weather\":"), Err(Error::Decode(_))));
        assert!(matches!(
            decode_current(r#"{"weather":[{"main":"Clear"}]}"#),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn only_server_errors_and_transport_are_retryable() {
        let server = Error::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: String::new(),
        };
        let unauthorized = Error::Status {
            status: reqwest::StatusCode::UNAUTHORIZED,
            body: String::new(),
        };

        assert!(is_retryable(&server));
        assert!(!is_retryable(&unauthorized));
        assert!(!is_retryable(&Error::EmptyResponse));
    }

    #[test]
    fn truncate_long_body() {
        let body = "x".repeat(250);
        let truncated = truncate_body(&body);

        assert_eq!(truncated.len(), 203);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "°".repeat(201);
        assert_eq!(truncate_body(&body), format!("{}...", "°".repeat(200)));
    }
}
