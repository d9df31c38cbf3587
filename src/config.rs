//! Runtime configuration read from the environment (and `.env`, if present)

use crate::api::exchangerate::RatesClient;
use crate::services::chart_service::DEFAULT_DAYS;
use crate::utils::normalize_code;

const DEFAULT_CHART_DIR: &str = ".";
const MAX_CHART_DAYS: u32 = 366;
const DEFAULT_BASE_CURRENCIES: [&str; 6] = ["USD", "EUR", "GBP", "RUB", "CNY", "JPY"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("Invalid value for {name}: '{value}' ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub rates_api_url: String,
    pub chart_dir: String,
    pub chart_days: u32,
    /// Currencies offered as buttons by `$start`
    pub base_currencies: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let discord_token = get("DISCORD_TOKEN").ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let rates_api_url = get("RATES_API_URL")
            .unwrap_or_else(|| RatesClient::DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let chart_dir = get("CHART_DIR").unwrap_or_else(|| DEFAULT_CHART_DIR.to_string());

        let chart_days = match get("CHART_DAYS") {
            None => DEFAULT_DAYS,
            Some(raw) => {
                let days: u32 = raw.parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                    name: "CHART_DAYS",
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
                if days == 0 || days > MAX_CHART_DAYS {
                    return Err(ConfigError::Invalid {
                        name: "CHART_DAYS",
                        value: raw,
                        reason: format!("must be between 1 and {}", MAX_CHART_DAYS),
                    });
                }
                days
            }
        };

        let base_currencies = match get("BASE_CURRENCIES") {
            Some(raw) => raw
                .split(',')
                .map(normalize_code)
                .filter(|c| !c.is_empty())
                .collect(),
            None => DEFAULT_BASE_CURRENCIES.iter().map(|c| c.to_string()).collect(),
        };

        Ok(Self {
            discord_token,
            rates_api_url,
            chart_dir,
            chart_days,
            base_currencies,
        })
    }
}
