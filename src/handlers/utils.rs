use teloxide::prelude::*;
use teloxide::types::{KeyboardButton, KeyboardMarkup, KeyboardRemove, ReplyMarkup};

use crate::dialogue::{Keyboard, Reply};

/// Одноразовая клавиатура из строк кнопок
pub fn make_reply_keyboard(rows: &[Vec<String>]) -> ReplyMarkup {
    let buttons = rows
        .iter()
        .map(|row| row.iter().map(|label| KeyboardButton::new(label.clone())).collect::<Vec<_>>())
        .collect::<Vec<_>>();

    ReplyMarkup::Keyboard(
        KeyboardMarkup::new(buttons)
            .resize_keyboard()
            .one_time_keyboard()
    )
}

pub fn reply_markup(keyboard: &Keyboard) -> Option<ReplyMarkup> {
    match keyboard {
        Keyboard::Keep => None,
        Keyboard::Remove => Some(ReplyMarkup::KeyboardRemove(KeyboardRemove::new())),
        Keyboard::Buttons(rows) => Some(make_reply_keyboard(rows)),
    }
}

/// Отправка ответов движка диалога по порядку
pub async fn send_replies(
    bot: &Bot,
    chat_id: ChatId,
    replies: Vec<Reply>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    for reply in replies {
        let request = bot.send_message(chat_id, reply.text);
        match reply_markup(&reply.keyboard) {
            Some(markup) => request.reply_markup(markup).await?,
            None => request.await?,
        };
    }
    Ok(())
}
