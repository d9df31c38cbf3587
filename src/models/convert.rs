//! Currency conversion models

/// Parsed `$convert <amount> <FROM> to <TO>` arguments
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub amount: f64,
    pub from: String,
    pub to: String,
}

/// Result struct for a conversion
#[derive(Debug)]
pub struct ConversionResult {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub rate: f64,
    pub converted: f64,
}
