use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Body returned by both `/latest` and `/<date>`.
///
/// `date` and the rate values are kept loose: an odd sibling entry must not
/// fail a lookup for a currency that is present.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesResponse {
    #[serde(default)]
    pub date: Option<Value>,
    #[serde(default)]
    pub rates: Option<BTreeMap<String, Value>>,
    /// Present when the service rejects the request (e.g. `success: false`)
    #[serde(default)]
    pub error: Option<ErrorBody>,
}

impl RatesResponse {
    /// Rates that are finite numbers; null, string and other entries are dropped
    pub fn numeric_rates(&self) -> Option<BTreeMap<String, f64>> {
        self.rates.as_ref().map(|raw| {
            raw.iter()
                .filter_map(|(code, value)| {
                    value
                        .as_f64()
                        .filter(|rate| rate.is_finite())
                        .map(|rate| (code.clone(), rate))
                })
                .collect()
        })
    }

    /// Calendar date of the quote. Accepts `YYYY-MM-DD` with or without a
    /// trailing time part; anything else yields `None`.
    pub fn quote_date(&self) -> Option<NaiveDate> {
        let raw = self.date.as_ref()?.as_str()?.trim();
        raw.get(..10)
            .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
    }
}

/// Error object embedded in a 200 response
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default, alias = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub info: Option<String>,
}

impl ErrorBody {
    pub fn describe(&self) -> String {
        match (&self.info, &self.kind, self.code) {
            (Some(info), _, _) => info.clone(),
            (None, Some(kind), _) => kind.clone(),
            (None, None, Some(code)) => format!("error code {}", code),
            (None, None, None) => "unknown error".to_string(),
        }
    }
}

/// Comprehensive error type for rates API operations
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport failure: timeout, DNS, refused connection or non-2xx status
    #[error("Connection to rates API failed: {0}")]
    Connection(#[source] reqwest::Error),
    /// Well-formed exchange that carried no usable data
    #[error("Data error: {0}")]
    Data(String),
    /// Any failure while looking up a single past rate
    #[error("Failed to fetch historical rate for {date}: {source}")]
    Historical {
        date: NaiveDate,
        #[source]
        source: Box<ApiError>,
    },
}

impl ApiError {
    pub fn is_connection(&self) -> bool {
        match self {
            ApiError::Connection(_) => true,
            ApiError::Historical { source, .. } => source.is_connection(),
            ApiError::Data(_) => false,
        }
    }
}
