pub mod errors;

pub use errors::{error_reply, ServiceError};

/// Normalize a user-supplied currency code (`" usd"` -> `"USD"`)
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Render an amount the way a float literal reads: `100.0`, `12.5`, `0.001`
pub fn format_amount(amount: f64) -> String {
    if amount.is_finite() && amount.fract() == 0.0 && amount.abs() < 1e16 {
        format!("{:.1}", amount)
    } else {
        format!("{}", amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code(" usd "), "USD");
        assert_eq!(normalize_code("Eur"), "EUR");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(100.0), "100.0");
        assert_eq!(format_amount(12.5), "12.5");
        assert_eq!(format_amount(-3.0), "-3.0");
        assert_eq!(format_amount(0.001), "0.001");
    }
}
