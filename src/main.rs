use teloxide::{prelude::*, utils::command::BotCommands};

mod bot_state;
mod config;
mod database;
mod dialogue;
mod handlers;
mod models;
mod reminders;

use crate::bot_state::{BotState, DialogueStore, ScheduleStore};
use crate::config::Config;
use crate::database::Database;
use crate::handlers::{command_handler, message_handler};

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "الأوامر المتاحة:")]
pub enum Command {
    #[command(description = "بدء إضافة الحصص")]
    Start,
    #[command(description = "عرض المساعدة")]
    Help,
    #[command(rename = "جدولي", description = "عرض جدولك الدراسي")]
    MySchedule,
    #[command(rename = "حذف", description = "حذف حصة")]
    Delete,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Загружаем .env и инициализируем логирование
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Starting schedule bot...");

    let config = Config::from_env()?;

    let schedules = ScheduleStore::open(Database::new(&config.schedule_file)).await?;
    let state = BotState::new(schedules, DialogueStore::default());

    let bot = Bot::new(config.token);

    // Фоновая задача для напоминаний
    let reminder_bot = bot.clone();
    let reminder_schedules = state.schedules.clone();
    tokio::spawn(async move {
        handlers::check_reminders_task(reminder_bot, reminder_schedules).await;
    });

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(command_handler)
        )
        .branch(Update::filter_message().endpoint(message_handler));

    log::info!("🚀 Starting dispatcher...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
