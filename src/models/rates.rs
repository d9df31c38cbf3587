//! Exchange rate models

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;

/// All rates for one base currency, as returned by the service "now"
#[derive(Debug, Clone)]
pub struct RateSnapshot {
    pub base: String,
    /// Date the service says the rates are valid for, when it reports one
    pub date: Option<NaiveDate>,
    /// Keyed by currency code; iteration is alphabetical
    pub rates: BTreeMap<String, f64>,
    pub fetched_at: DateTime<Utc>,
}

impl RateSnapshot {
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }
}

/// Result struct for the `$rate` command and the currency buttons
#[derive(Debug)]
pub struct RatesResult {
    pub base: String,
    /// (code, rate) pairs in display order
    pub rates: Vec<(String, f64)>,
    pub date: Option<NaiveDate>,
}
