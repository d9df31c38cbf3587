use serenity::builder::{CreateInteractionResponse, EditInteractionResponse};
use serenity::all::ComponentInteraction;
use serenity::prelude::Context;
use tracing::warn;

use crate::services::rate_service;
use crate::utils::{error_reply, normalize_code};

pub const RATE_BUTTON_PREFIX: &str = "rate_";

/// Base currency carried by a `rate_<CODE>` button id
pub fn parse_rate_button(custom_id: &str) -> Option<String> {
    custom_id
        .strip_prefix(RATE_BUTTON_PREFIX)
        .map(normalize_code)
        .filter(|code| !code.is_empty())
}

/// Replace the greeting with the featured rates of the chosen currency
pub async fn execute(ctx: &Context, component: &ComponentInteraction) -> Result<(), String> {
    let Some(base) = parse_rate_button(&component.data.custom_id) else {
        warn!("Ignoring unknown button id {}", component.data.custom_id);
        return Ok(());
    };

    // Acknowledge first; the lookup can take longer than the interaction deadline
    component
        .create_response(ctx, CreateInteractionResponse::Acknowledge)
        .await
        .map_err(|e| format!("Failed to acknowledge interaction: {}", e))?;

    let content = match super::rates_client(ctx).await {
        Ok(client) => match rate_service::get_featured_rates(&client, &base).await {
            Ok(result) => rate_service::format_rates_text(&result),
            Err(e) => error_reply(&format!("Failed to get rates: {}", e.user_message())),
        },
        Err(e) => error_reply(&e),
    };

    component
        .edit_response(
            ctx,
            EditInteractionResponse::new()
                .content(content)
                .components(vec![]),
        )
        .await
        .map_err(|e| format!("Failed to update message: {}", e))?;

    Ok(())
}
