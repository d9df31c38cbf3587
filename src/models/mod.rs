//! Data models for fxbot commands and services
//!
//! This module organizes the result and data transfer structs used across commands.

pub mod chart;
pub mod convert;
pub mod rates;

pub use chart::{ChartFile, ChartSeries, HistoricalPoint};
pub use convert::{ConversionRequest, ConversionResult};
pub use rates::{RateSnapshot, RatesResult};
