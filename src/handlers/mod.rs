pub mod commands;
pub mod messages;
pub mod utils;

pub use commands::command_handler;
pub use messages::message_handler;

use chrono::Local;
use teloxide::prelude::*;
use tokio::time::{self, MissedTickBehavior};

use crate::bot_state::ScheduleStore;
use crate::reminders;

/// Фоновая задача: раз в минуту рассылает напоминания о занятиях
pub async fn check_reminders_task(bot: Bot, schedules: ScheduleStore) {
    let mut interval = time::interval(reminders::TICK_INTERVAL);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut gate = reminders::MinuteGate::default();

    loop {
        interval.tick().await;

        let now = Local::now().naive_local();
        // Две проверки в одну минуту дали бы повторное напоминание
        if !gate.enter(now) {
            continue;
        }

        let snapshot = schedules.snapshot().await;
        let due = reminders::due_reminders(&snapshot, now);
        log::debug!("⏱️ Reminder tick at {}: {} due", now.format("%a %H:%M"), due.len());

        for reminder in due {
            match bot.send_message(reminder.chat_id, reminder.text).await {
                Ok(_) => log::info!("🔔 Reminder sent to {}", reminder.chat_id),
                Err(e) => log::error!("❌ Failed to send reminder to {}: {}", reminder.chat_id, e),
            }
        }
    }
}
