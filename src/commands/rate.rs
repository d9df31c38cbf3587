use serenity::builder::CreateMessage;
use serenity::model::channel::Message;
use serenity::prelude::Context;

use crate::services::rate_service;
use crate::utils::normalize_code;

pub async fn execute(ctx: &Context, msg: &Message, args: &[&str]) -> Result<(), String> {
    tracing::info!("💱 Rate command called with args: {:?}", args);

    let Some(raw_base) = args.first() else {
        return super::send_usage(
            ctx,
            msg,
            "💱 Rate Command",
            "`$rate <currency>`",
            "`$rate USD`",
        )
        .await;
    };
    let base = normalize_code(raw_base);

    let client = super::rates_client(ctx).await?;

    let result = rate_service::get_rates(&client, &base)
        .await
        .map_err(|e| format!("Failed to get rates: {}", e.user_message()))?;

    let embed = rate_service::create_rates_embed(&result);
    msg.channel_id
        .send_message(ctx, CreateMessage::default().embed(embed))
        .await
        .map_err(|e| e.to_string())?;

    Ok(())
}
