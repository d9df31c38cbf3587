use serenity::builder::{CreateActionRow, CreateButton, CreateMessage};
use serenity::model::channel::Message;
use serenity::prelude::Context;

use super::buttons::RATE_BUTTON_PREFIX;

const BUTTONS_PER_ROW: usize = 3;
const MAX_ROWS: usize = 5;

pub const GREETING: &str = "👋 Hi! I'm an exchange rate bot.\n\
    Pick a currency below or use a command:\n\
    `$rate <currency>` - latest rates\n\
    `$convert <amount> <from> to <to>` - convert an amount\n\
    `$chart <from> <to>` - rate chart for the last days";

/// One button per currency, three to a row
pub fn currency_rows(currencies: &[String]) -> Vec<CreateActionRow> {
    currencies
        .chunks(BUTTONS_PER_ROW)
        .take(MAX_ROWS)
        .map(|chunk| {
            CreateActionRow::Buttons(
                chunk
                    .iter()
                    .map(|code| {
                        CreateButton::new(format!("{}{}", RATE_BUTTON_PREFIX, code)).label(code)
                    })
                    .collect(),
            )
        })
        .collect()
}

pub async fn execute(ctx: &Context, msg: &Message) -> Result<(), String> {
    let config = super::bot_config(ctx).await?;

    let message = CreateMessage::default()
        .content(GREETING)
        .components(currency_rows(&config.base_currencies));

    msg.channel_id
        .send_message(ctx, message)
        .await
        .map_err(|e| format!("Failed to send greeting: {}", e))?;

    Ok(())
}
