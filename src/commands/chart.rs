use serenity::builder::{CreateAttachment, CreateMessage};
use serenity::model::channel::Message;
use serenity::prelude::Context;
use std::path::Path;

use crate::models::ChartFile;
use crate::services::chart_service;
use crate::utils::normalize_code;

/// Generate and send a rate chart for a currency pair
pub async fn execute(ctx: &Context, msg: &Message, args: &[&str]) -> Result<(), String> {
    tracing::info!("🎨 Chart command received from user {} with args: {:?}", msg.author.id, args);

    if args.len() != 2 {
        return super::send_usage(
            ctx,
            msg,
            "📈 Chart Command",
            "`$chart <from> <to>`",
            "`$chart USD RUB`",
        )
        .await;
    }

    let base = normalize_code(args[0]);
    let target = normalize_code(args[1]);

    let client = super::rates_client(ctx).await?;
    let config = super::bot_config(ctx).await?;

    // Show typing indicator while the history is fetched
    if let Err(e) = msg.channel_id.broadcast_typing(ctx.http.as_ref()).await {
        tracing::warn!("Failed to broadcast typing: {}", e);
    }

    let chart = chart_service::generate_chart(
        &client,
        &base,
        &target,
        config.chart_days,
        Path::new(&config.chart_dir),
    )
    .await
    .map_err(|e| format!("Failed to build chart: {}", e.user_message()))?;

    let caption = chart_caption(&base, &target, config.chart_days, &chart);
    let sent = send_chart(ctx, msg, &chart, caption).await;

    // The file is ours to clean up, whether or not the upload worked
    let path = chart.path().display().to_string();
    match chart.remove() {
        Ok(_) => tracing::debug!("✓ Temporary chart file deleted: {}", path),
        Err(e) => tracing::warn!("Failed to delete temporary chart file {}: {}", path, e),
    }

    sent
}

async fn send_chart(
    ctx: &Context,
    msg: &Message,
    chart: &ChartFile,
    caption: String,
) -> Result<(), String> {
    let attachment = CreateAttachment::path(chart.path())
        .await
        .map_err(|e| format!("Failed to create attachment: {}", e))?;

    msg.channel_id
        .send_message(ctx, CreateMessage::default().content(caption).add_file(attachment))
        .await
        .map_err(|e| format!("Failed to send chart: {}", e))?;

    tracing::info!("✓ Chart sent ({} points)", chart.points);
    Ok(())
}

fn chart_caption(base: &str, target: &str, days: u32, chart: &ChartFile) -> String {
    let mut caption = format!("📈 {}/{} over the last {} days", base, target, days);
    if chart.failed_days > 0 {
        caption.push_str(&format!(" ({} without data)", chart.failed_days));
    }
    caption
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_chart_caption_mentions_gaps() {
        let chart = ChartFile {
            path: PathBuf::from("chart.png"),
            points: 4,
            failed_days: 3,
        };
        assert_eq!(
            chart_caption("USD", "RUB", 7, &chart),
            "📈 USD/RUB over the last 7 days (3 without data)"
        );

        let full = ChartFile {
            path: PathBuf::from("chart.png"),
            points: 7,
            failed_days: 0,
        };
        assert_eq!(chart_caption("USD", "RUB", 7, &full), "📈 USD/RUB over the last 7 days");
    }
}
