use serenity::model::channel::Message;
use serenity::prelude::Context;

use crate::services::convert_service;
use crate::utils::ServiceError;

pub async fn execute(ctx: &Context, msg: &Message, args: &[&str]) -> Result<(), String> {
    tracing::info!("🔁 Convert command called with args: {:?}", args);

    let Some((amount, from, to)) = convert_service::check_shape(args) else {
        return super::send_usage(
            ctx,
            msg,
            "🔁 Convert Command",
            convert_service::USAGE,
            "`$convert 100 USD to RUB`",
        )
        .await;
    };

    // Amount is validated before any request is made
    let request = convert_service::parse_request(amount, from, to).map_err(|e| e.user_message())?;

    let client = super::rates_client(ctx).await?;

    let result = convert_service::convert(&client, &request)
        .await
        .map_err(|e| match e {
            ServiceError::CurrencyNotFound(_) => e.user_message(),
            other => format!("Conversion failed: {}", other.user_message()),
        })?;

    tracing::info!("✓ Converted {} {} to {} at {}", result.amount, result.from, result.to, result.rate);

    msg.reply(ctx, convert_service::format_conversion(&result))
        .await
        .map_err(|e| e.to_string())?;

    Ok(())
}
