use chrono::{NaiveDate, Utc};
use reqwest::Client as HttpClient;
use std::time::Duration;
use tracing::{debug, warn};

use super::models::{ApiError, RatesResponse};
use crate::config::Config;
use crate::models::RateSnapshot;
use crate::utils::normalize_code;

/// Client for an exchangerate.host-compatible rates service
#[derive(Clone)]
pub struct RatesClient {
    http_client: HttpClient,
    base_url: String,
}

impl RatesClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.exchangerate.host";
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    /// Create a client against `base_url`; every request times out after 10 seconds
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .map_err(ApiError::Connection)?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(&config.rates_api_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a GET and decode the JSON body.
    ///
    /// Transport errors and non-2xx statuses become `ApiError::Connection`,
    /// an undecodable body becomes `ApiError::Data`.
    async fn fetch(&self, path: &str, base: &str) -> Result<RatesResponse, ApiError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("GET {} (base={})", url, base);

        let response = self
            .http_client
            .get(&url)
            .query(&[("base", base)])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                warn!("Rates API request to {} failed: {}", url, e);
                ApiError::Connection(e)
            })?;

        let body = response.text().await.map_err(ApiError::Connection)?;

        serde_json::from_str::<RatesResponse>(&body).map_err(|e| {
            warn!("Failed to parse rates response from {}: {}", url, e);
            ApiError::Data(format!("malformed response body: {}", e))
        })
    }

    /// GET /latest?base={base}
    ///
    /// Returns the full snapshot for `base`. A snapshot returned from here always
    /// holds at least one rate.
    pub async fn get_latest_rates(&self, base: &str) -> Result<RateSnapshot, ApiError> {
        let base = normalize_code(base);
        let response = self.fetch("latest", &base).await?;

        let rates = match response.numeric_rates() {
            Some(rates) if !rates.is_empty() => rates,
            _ => {
                let message = match &response.error {
                    Some(err) => format!("no rate data ({})", err.describe()),
                    None => "no rate data".to_string(),
                };
                warn!("Latest rates for {}: {}", base, message);
                return Err(ApiError::Data(message));
            }
        };

        Ok(RateSnapshot {
            base,
            date: response.quote_date(),
            rates,
            fetched_at: Utc::now(),
        })
    }

    /// GET /{YYYY-MM-DD}?base={base}
    ///
    /// Every failure is reported as `ApiError::Historical` with the underlying
    /// cause as its source.
    pub async fn get_historical_rate(
        &self,
        date: NaiveDate,
        base: &str,
        target: &str,
    ) -> Result<f64, ApiError> {
        let base = normalize_code(base);
        let target = normalize_code(target);

        self.lookup_historical(date, &base, &target)
            .await
            .map_err(|source| ApiError::Historical {
                date,
                source: Box::new(source),
            })
    }

    async fn lookup_historical(
        &self,
        date: NaiveDate,
        base: &str,
        target: &str,
    ) -> Result<f64, ApiError> {
        let path = date.format("%Y-%m-%d").to_string();
        let response = self.fetch(&path, base).await?;

        let rates = response
            .numeric_rates()
            .ok_or_else(|| ApiError::Data("no rate data".to_string()))?;

        rates
            .get(target)
            .copied()
            .ok_or_else(|| ApiError::Data(format!("no {} rate for base {}", target, base)))
    }
}
