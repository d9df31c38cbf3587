pub mod buttons;
pub mod chart;
pub mod convert;
pub mod rate;
pub mod start;

use std::sync::Arc;

use serenity::builder::{CreateEmbed, CreateMessage};
use serenity::all::ComponentInteraction;
use serenity::model::channel::Message;
use serenity::prelude::Context;
use tracing::{error, info};

use crate::api::exchangerate::RatesClient;
use crate::config::Config;
use crate::utils::error_reply;

pub const PREFIX: &str = "$";

pub async fn handle_message(ctx: &Context, msg: &Message) {
    if msg.author.bot {
        return;
    }

    // Parse command and arguments
    let parts: Vec<&str> = msg.content.split_whitespace().collect();
    let Some((command, args)) = parts.split_first() else {
        return;
    };
    let Some(name) = command.strip_prefix(PREFIX) else {
        return;
    };

    let result = match name.to_lowercase().as_str() {
        "start" | "help" => start::execute(ctx, msg).await,
        "rate" | "rates" => rate::execute(ctx, msg, args).await,
        "convert" => convert::execute(ctx, msg, args).await,
        "chart" => chart::execute(ctx, msg, args).await,
        _ => return,
    };

    if let Err(e) = result {
        error!("❌ Error executing command {}: {}", command, e);

        let embed = CreateEmbed::default()
            .title("Command Error")
            .description(error_reply(&e))
            .color(0xff0000);

        let _ = msg
            .channel_id
            .send_message(ctx, CreateMessage::default().embed(embed))
            .await;
    }
}

pub async fn handle_component(ctx: &Context, component: &ComponentInteraction) {
    info!(
        "🔘 Button {} pressed by user {}",
        component.data.custom_id, component.user.id
    );

    if let Err(e) = buttons::execute(ctx, component).await {
        error!("❌ Error handling button {}: {}", component.data.custom_id, e);
    }
}

/// Shared rates client stored in the client data
pub async fn rates_client(ctx: &Context) -> Result<RatesClient, String> {
    let data = ctx.data.read().await;
    data.get::<crate::RatesApi>()
        .cloned()
        .ok_or("Rates client not initialized".to_string())
}

pub async fn bot_config(ctx: &Context) -> Result<Arc<Config>, String> {
    let data = ctx.data.read().await;
    data.get::<crate::BotConfig>()
        .cloned()
        .ok_or("Configuration not initialized".to_string())
}

/// Reply with a usage embed when a command is called with the wrong arguments
pub async fn send_usage(
    ctx: &Context,
    msg: &Message,
    title: &str,
    usage: &str,
    example: &str,
) -> Result<(), String> {
    let help_embed = CreateEmbed::default()
        .title(title)
        .field("Usage", usage, false)
        .field("Example", example, false)
        .color(0xffa500);

    msg.channel_id
        .send_message(ctx, CreateMessage::default().embed(help_embed))
        .await
        .map_err(|e| e.to_string())?;

    Ok(())
}
