use teloxide::prelude::*;
use std::error::Error;

use crate::bot_state::BotState;
use crate::dialogue;
use crate::handlers::utils::send_replies;

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    state: BotState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    // Стикеры, фото и прочее без текста не обрабатываем
    let Some(text) = msg.text() else {
        log::debug!("Ignoring non-text message from {}", msg.chat.id);
        return Ok(());
    };

    let replies = dialogue::handle_text(&state, msg.chat.id, text).await;
    send_replies(&bot, msg.chat.id, replies).await
}
