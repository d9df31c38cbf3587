use tracing::{debug, instrument};

use crate::api::exchangerate::RatesClient;
use crate::models::{RateSnapshot, RatesResult};
use crate::utils::ServiceError;

/// Number of currencies listed by `$rate`
pub const MAX_LISTED_RATES: usize = 10;

/// Currencies shown when a base currency button is pressed, in display order
pub const FEATURED_CURRENCIES: [&str; 7] = ["USD", "EUR", "RUB", "GBP", "JPY", "CHF", "CNY"];

/// First `MAX_LISTED_RATES` currencies of the snapshot, alphabetically
pub fn top_rates(snapshot: &RateSnapshot) -> RatesResult {
    RatesResult {
        base: snapshot.base.clone(),
        rates: snapshot
            .rates
            .iter()
            .take(MAX_LISTED_RATES)
            .map(|(code, rate)| (code.clone(), *rate))
            .collect(),
        date: snapshot.date,
    }
}

/// The featured currencies that are present in the snapshot
pub fn featured_rates(snapshot: &RateSnapshot) -> RatesResult {
    RatesResult {
        base: snapshot.base.clone(),
        rates: FEATURED_CURRENCIES
            .iter()
            .filter_map(|code| snapshot.rate(code).map(|rate| (code.to_string(), rate)))
            .collect(),
        date: snapshot.date,
    }
}

#[instrument(skip(client))]
pub async fn get_rates(client: &RatesClient, base: &str) -> Result<RatesResult, ServiceError> {
    let snapshot = client.get_latest_rates(base).await?;
    debug!(
        "{} rates for {} fetched at {}",
        snapshot.rates.len(),
        snapshot.base,
        snapshot.fetched_at.format("%H:%M:%S")
    );
    Ok(top_rates(&snapshot))
}

#[instrument(skip(client))]
pub async fn get_featured_rates(
    client: &RatesClient,
    base: &str,
) -> Result<RatesResult, ServiceError> {
    let snapshot = client.get_latest_rates(base).await?;
    Ok(featured_rates(&snapshot))
}

/// One `CODE: 0.0000` line per rate, in listing order
pub fn format_rate_lines(result: &RatesResult) -> String {
    result
        .rates
        .iter()
        .map(|(code, rate)| format!("{}: {:.4}", code, rate))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Plain-text reply used when editing a button message
pub fn format_rates_text(result: &RatesResult) -> String {
    let mut text = format!("Rates from {}:\n", result.base);
    if !result.rates.is_empty() {
        text.push_str(&format_rate_lines(result));
        text.push('\n');
    }
    text
}

/// Embed sent in reply to `$rate`
pub fn create_rates_embed(result: &RatesResult) -> serenity::builder::CreateEmbed {
    let body = format_rate_lines(result);

    let mut embed = serenity::builder::CreateEmbed::default()
        .title(format!("💱 Rates from {}", result.base))
        .description(format!("```\n{}\n```", body))
        .color(0x00b0f4);

    if let Some(date) = result.date {
        embed = embed.footer(serenity::builder::CreateEmbedFooter::new(format!(
            "Rates as of {}",
            date.format("%Y-%m-%d")
        )));
    }

    embed
}
