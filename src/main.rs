use serenity::async_trait;
use serenity::all::Interaction;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod commands;
mod config;
mod models;
mod services;
mod utils;

use api::exchangerate::RatesClient;
use config::Config;

struct Handler;

struct RatesApi;

impl TypeMapKey for RatesApi {
    type Value = RatesClient;
}

struct BotConfig;

impl TypeMapKey for BotConfig {
    type Value = Arc<Config>;
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        commands::handle_message(&ctx, &msg).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Component(component) = interaction {
            commands::handle_component(&ctx, &component).await;
        }
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);

        if let Err(e) = ctx.http.get_current_user().await {
            warn!("Failed to check bot status: {}", e);
        }
    }
}

fn init_tracing() {
    let mut filter = EnvFilter::from_default_env();
    for directive in ["fxbot=debug", "serenity=warn"] {
        match directive.parse() {
            Ok(d) => filter = filter.add_directive(d),
            Err(e) => eprintln!("Invalid log directive {}: {}", directive, e),
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    init_tracing();

    info!("🤖 Starting fxbot...");

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    if let Err(e) = std::fs::create_dir_all(&config.chart_dir) {
        error!("Cannot use chart directory {}: {}", config.chart_dir, e);
        return;
    }

    let rates_client = match RatesClient::from_config(&config) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create rates client: {}", e);
            return;
        }
    };
    info!("Using rates service at {}", rates_client.base_url());

    let intents = GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MESSAGES;

    let mut client = match Client::builder(&config.discord_token, intents)
        .event_handler(Handler)
        .await
    {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create client: {}", e);
            return;
        }
    };

    // Store the rates client and configuration in client data
    {
        let mut data = client.data.write().await;
        data.insert::<RatesApi>(rates_client);
        data.insert::<BotConfig>(Arc::new(config));
    }

    info!("✓ Bot started, connecting to Discord...");

    if let Err(e) = client.start().await {
        error!("Client error: {}", e);
    }
}
