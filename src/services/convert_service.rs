use tracing::{debug, instrument};

use crate::api::exchangerate::RatesClient;
use crate::models::{ConversionRequest, ConversionResult};
use crate::utils::{format_amount, normalize_code, ServiceError};

pub const USAGE: &str = "Usage: `$convert <amount> <from> to <to>`, e.g. `$convert 100 USD to RUB`";

/// Check the shape of `<amount> <FROM> to <TO>`; `None` means show usage
pub fn check_shape<'a>(args: &[&'a str]) -> Option<(&'a str, &'a str, &'a str)> {
    if args.len() != 4 || !args[2].eq_ignore_ascii_case("to") {
        return None;
    }
    Some((args[0], args[1], args[3]))
}

pub fn parse_amount(raw: &str) -> Result<f64, ServiceError> {
    raw.parse::<f64>()
        .ok()
        .filter(|a| a.is_finite())
        .ok_or_else(|| ServiceError::InvalidAmount(raw.to_string()))
}

/// Parse well-shaped convert arguments. The amount is validated before anything
/// touches the network.
pub fn parse_request(amount: &str, from: &str, to: &str) -> Result<ConversionRequest, ServiceError> {
    Ok(ConversionRequest {
        amount: parse_amount(amount)?,
        from: normalize_code(from),
        to: normalize_code(to),
    })
}

#[instrument(skip(client), fields(from = %request.from, to = %request.to))]
pub async fn convert(
    client: &RatesClient,
    request: &ConversionRequest,
) -> Result<ConversionResult, ServiceError> {
    let snapshot = client.get_latest_rates(&request.from).await?;

    let rate = snapshot
        .rate(&request.to)
        .ok_or_else(|| ServiceError::CurrencyNotFound(request.to.clone()))?;

    let converted = request.amount * rate;
    debug!("{} {} -> {} {} at {}", request.amount, request.from, converted, request.to, rate);

    Ok(ConversionResult {
        amount: request.amount,
        from: request.from.clone(),
        to: request.to.clone(),
        rate,
        converted,
    })
}

pub fn format_conversion(result: &ConversionResult) -> String {
    format!(
        "✅ {} {} = {:.2} {}",
        format_amount(result.amount),
        result.from,
        result.converted,
        result.to
    )
}
