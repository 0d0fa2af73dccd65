use teloxide::prelude::*;
use std::error::Error;

use crate::bot_state::BotState;
use crate::dialogue;
use crate::handlers::utils::send_replies;

use crate::Command;

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: BotState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let chat_id = msg.chat.id;
    let replies = match cmd {
        Command::Start => dialogue::start(&state, chat_id).await,
        Command::Help => dialogue::help(),
        Command::MySchedule => dialogue::show_schedule(&state, chat_id).await,
        Command::Delete => dialogue::begin_delete(&state, chat_id).await,
    };

    send_replies(&bot, chat_id, replies).await
}
