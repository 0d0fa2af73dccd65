pub mod prompts;

use teloxide::types::ChatId;

use crate::bot_state::BotState;
use crate::models::{
    ClassDay, ClassTime, ConfirmAction, DeleteChoice, DialogueStep, ScheduleEntry, TimeChoice,
    UserState,
};

pub use prompts::{Keyboard, Reply};

/// /start: новый диалог добавления записей
pub async fn start(state: &BotState, chat_id: ChatId) -> Vec<Reply> {
    state.dialogues.set(chat_id, UserState::awaiting_day()).await;

    if let Err(e) = state.schedules.ensure_user(chat_id).await {
        // Пустой список создастся при первой успешной записи
        log::error!("❌ Could not create schedule for {}: {}", chat_id, e);
    }

    log::info!("👋 Dialogue started for {}", chat_id);
    vec![Reply::text(prompts::WELCOME), prompts::day_prompt()]
}

pub fn help() -> Vec<Reply> {
    vec![Reply::text(prompts::HELP)]
}

/// /جدولي: расписание в порядке отображения, состояние диалога не трогаем
pub async fn show_schedule(state: &BotState, chat_id: ChatId) -> Vec<Reply> {
    let entries = state.schedules.entries(chat_id).await;
    vec![prompts::schedule(&entries)]
}

/// /حذف: сразу в режим удаления, если есть что удалять
pub async fn begin_delete(state: &BotState, chat_id: ChatId) -> Vec<Reply> {
    let entries = state.schedules.entries(chat_id).await;
    if entries.is_empty() {
        return vec![Reply::text(prompts::NOTHING_TO_DELETE)];
    }

    state.dialogues.set(chat_id, UserState::at(DialogueStep::Deleting)).await;
    vec![prompts::delete_menu(&entries)]
}

/// Обычное текстовое сообщение
pub async fn handle_text(state: &BotState, chat_id: ChatId, text: &str) -> Vec<Reply> {
    let text = text.trim();

    let Some(mut user_state) = state.dialogues.get(chat_id).await else {
        return vec![Reply::text(prompts::START_HINT)];
    };

    match user_state.step {
        DialogueStep::AwaitingDay => {
            let Some(day) = ClassDay::from_label(text) else {
                return vec![prompts::day_prompt()];
            };
            user_state.pending.day = Some(day);
            user_state.step = DialogueStep::AwaitingSubject;
            state.dialogues.set(chat_id, user_state).await;
            vec![Reply::removing_keyboard(prompts::ASK_SUBJECT)]
        }

        DialogueStep::AwaitingSubject => {
            if text.is_empty() {
                return vec![Reply::text(prompts::EMPTY_SUBJECT)];
            }
            user_state.pending.subject = Some(text.to_string());
            user_state.step = DialogueStep::AwaitingTime;
            state.dialogues.set(chat_id, user_state).await;
            vec![prompts::time_prompt()]
        }

        DialogueStep::AwaitingTime => match TimeChoice::parse(text) {
            Some(TimeChoice::Other) => {
                user_state.step = DialogueStep::AwaitingCustomTime;
                state.dialogues.set(chat_id, user_state).await;
                vec![Reply::removing_keyboard(prompts::ASK_CUSTOM_TIME)]
            }
            Some(TimeChoice::At(time)) => finalize(state, chat_id, user_state, time).await,
            // Без текста ошибки, просто снова клавиатура
            None => vec![prompts::time_prompt()],
        },

        DialogueStep::AwaitingCustomTime => match ClassTime::parse(text) {
            Some(time) => finalize(state, chat_id, user_state, time).await,
            None => vec![Reply::text(prompts::BAD_CUSTOM_TIME)],
        },

        DialogueStep::Confirming => match ConfirmAction::from_label(text) {
            Some(ConfirmAction::AddAnother) => {
                state.dialogues.set(chat_id, UserState::awaiting_day()).await;
                vec![prompts::day_prompt()]
            }
            Some(ConfirmAction::Finish) => {
                let entries = state.schedules.entries(chat_id).await;
                state.dialogues.clear(chat_id).await;
                log::info!("✅ Dialogue finished for {}", chat_id);
                vec![prompts::schedule(&entries)]
            }
            Some(ConfirmAction::Delete) => begin_delete(state, chat_id).await,
            None => vec![prompts::confirm_menu()],
        },

        DialogueStep::Deleting => delete(state, chat_id, text).await,
    }
}

/// Добавляет собранную запись и переводит диалог в Confirming
async fn finalize(
    state: &BotState,
    chat_id: ChatId,
    user_state: UserState,
    time: ClassTime,
) -> Vec<Reply> {
    let Some(entry) = user_state.pending.complete(time) else {
        // Шаги пропущены - начинаем заново
        log::warn!("⚠️ Incomplete pending entry for {}, restarting dialogue", chat_id);
        state.dialogues.set(chat_id, UserState::awaiting_day()).await;
        return vec![prompts::day_prompt()];
    };

    if let Err(e) = state.schedules.append(chat_id, entry.clone()).await {
        log::error!("❌ Error saving schedule for {}: {}", chat_id, e);
        return vec![Reply::text(prompts::SAVE_FAILED)];
    }

    log::info!("➕ Entry added for {}: {}", chat_id, entry.describe());
    state
        .dialogues
        .set(chat_id, UserState::at(DialogueStep::Confirming))
        .await;
    vec![prompts::entry_added(&entry)]
}

async fn delete(state: &BotState, chat_id: ChatId, text: &str) -> Vec<Reply> {
    let position = match DeleteChoice::parse(text) {
        DeleteChoice::Cancel => {
            state.dialogues.set(chat_id, UserState::awaiting_day()).await;
            return vec![
                Reply::removing_keyboard(prompts::DELETE_CANCELLED),
                prompts::day_prompt(),
            ];
        }
        DeleteChoice::NotANumber => {
            return with_delete_menu(state, chat_id, prompts::NOT_A_POSITION).await;
        }
        DeleteChoice::Overflow | DeleteChoice::Position(0) => {
            return with_delete_menu(state, chat_id, prompts::BAD_POSITION).await;
        }
        DeleteChoice::Position(position) => position,
    };

    let removed: ScheduleEntry = match state.schedules.remove(chat_id, position - 1).await {
        Ok(Some(entry)) => entry,
        Ok(None) => return with_delete_menu(state, chat_id, prompts::BAD_POSITION).await,
        Err(e) => {
            log::error!("❌ Error saving schedule for {}: {}", chat_id, e);
            return vec![Reply::text(prompts::SAVE_FAILED)];
        }
    };

    log::info!("🗑️ Entry removed for {}: {}", chat_id, removed.describe());
    state.dialogues.set(chat_id, UserState::awaiting_day()).await;
    vec![prompts::entry_removed(&removed), prompts::day_prompt()]
}

async fn with_delete_menu(state: &BotState, chat_id: ChatId, error: &str) -> Vec<Reply> {
    let entries = state.schedules.entries(chat_id).await;
    vec![Reply::text(error), prompts::delete_menu(&entries)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot_state::{DialogueStore, ScheduleStore};
    use crate::database::Database;
    use tempfile::TempDir;

    const CHAT: ChatId = ChatId(4242);

    async fn setup() -> (TempDir, BotState) {
        let dir = tempfile::tempdir().unwrap();
        let store = ScheduleStore::open(Database::new(dir.path().join("schedules.json")))
            .await
            .unwrap();
        (dir, BotState::new(store, DialogueStore::default()))
    }

    async fn say(state: &BotState, text: &str) -> Vec<Reply> {
        handle_text(state, CHAT, text).await
    }

    async fn step(state: &BotState) -> Option<DialogueStep> {
        state.dialogues.get(CHAT).await.map(|s| s.step)
    }

    async fn add(state: &BotState, day: &str, subject: &str, time: &str) {
        start(state, CHAT).await;
        say(state, day).await;
        say(state, subject).await;
        say(state, time).await;
        assert_eq!(step(state).await, Some(DialogueStep::Confirming));
    }

    #[tokio::test]
    async fn test_end_to_end_add_and_finish() {
        let (dir, state) = setup().await;

        let replies = start(&state, CHAT).await;
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[1], prompts::day_prompt());

        say(&state, "الاثنين").await;
        assert_eq!(step(&state).await, Some(DialogueStep::AwaitingSubject));

        let replies = say(&state, "Math").await;
        assert_eq!(replies, vec![prompts::time_prompt()]);

        let replies = say(&state, "09:00").await;
        assert_eq!(replies[0].text, "✅ تم إضافة: الاثنين - Math ⏰ 09:00");
        assert_eq!(replies[0].keyboard, Keyboard::Buttons(prompts::confirm_buttons()));

        let replies = say(&state, "✅ إنهاء الجدول").await;
        assert_eq!(replies[0].text, "📚 جدولك الدراسي:\n\n1. الاثنين - Math ⏰ 09:00\n");
        assert_eq!(step(&state).await, None);

        let replies = say(&state, "hello").await;
        assert_eq!(replies, vec![Reply::text(prompts::START_HINT)]);

        let raw = std::fs::read_to_string(dir.path().join("schedules.json")).unwrap();
        assert!(raw.contains("\"subject\": \"Math\""));
    }

    #[tokio::test]
    async fn test_no_dialogue_ignores_natural_language_shortcut() {
        let (_dir, state) = setup().await;
        let replies = say(&state, "ضيف رياضيات الاثنين 9:30").await;
        assert_eq!(replies, vec![Reply::text(prompts::START_HINT)]);
        assert!(state.schedules.entries(CHAT).await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_day_reprompts() {
        let (_dir, state) = setup().await;
        start(&state, CHAT).await;

        let replies = say(&state, "الجمعة").await;
        assert_eq!(replies, vec![prompts::day_prompt()]);
        assert_eq!(step(&state).await, Some(DialogueStep::AwaitingDay));
    }

    #[tokio::test]
    async fn test_blank_subject_is_rejected() {
        let (_dir, state) = setup().await;
        start(&state, CHAT).await;
        say(&state, "الأحد").await;

        let replies = say(&state, "   ").await;
        assert_eq!(replies, vec![Reply::text(prompts::EMPTY_SUBJECT)]);
        assert_eq!(step(&state).await, Some(DialogueStep::AwaitingSubject));
    }

    #[tokio::test]
    async fn test_time_keyboard_rejects_silently() {
        let (_dir, state) = setup().await;
        start(&state, CHAT).await;
        say(&state, "الأحد").await;
        say(&state, "رياضيات").await;

        for bad in ["07:59", "17:01", "soon"] {
            let replies = say(&state, bad).await;
            assert_eq!(replies, vec![prompts::time_prompt()]);
            assert_eq!(step(&state).await, Some(DialogueStep::AwaitingTime));
        }

        say(&state, "17:00").await;
        assert_eq!(step(&state).await, Some(DialogueStep::Confirming));
    }

    #[tokio::test]
    async fn test_custom_time_reports_errors() {
        let (_dir, state) = setup().await;
        start(&state, CHAT).await;
        say(&state, "الخميس").await;
        say(&state, "فيزياء").await;

        let replies = say(&state, "أخرى").await;
        assert_eq!(replies, vec![Reply::removing_keyboard(prompts::ASK_CUSTOM_TIME)]);
        assert_eq!(step(&state).await, Some(DialogueStep::AwaitingCustomTime));

        let replies = say(&state, "07:30").await;
        assert_eq!(replies, vec![Reply::text(prompts::BAD_CUSTOM_TIME)]);
        assert_eq!(step(&state).await, Some(DialogueStep::AwaitingCustomTime));

        say(&state, "08:00").await;
        let entries = state.schedules.entries(CHAT).await;
        assert_eq!(
            entries,
            vec![ScheduleEntry::new(ClassDay::Thursday, "فيزياء", ClassTime::parse("08:00").unwrap())]
        );
    }

    #[tokio::test]
    async fn test_custom_time_is_stored_zero_padded() {
        let (dir, state) = setup().await;
        start(&state, CHAT).await;
        say(&state, "الأحد").await;
        say(&state, "Math").await;
        say(&state, "أخرى").await;

        let replies = say(&state, "9:30").await;
        assert_eq!(replies[0].text, "✅ تم إضافة: الأحد - Math ⏰ 09:30");
        assert_eq!(state.schedules.entries(CHAT).await[0].time, "09:30");

        let raw = std::fs::read_to_string(dir.path().join("schedules.json")).unwrap();
        assert!(raw.contains("\"time\": \"09:30\""));
    }

    #[tokio::test]
    async fn test_persisted_entries_are_valid() {
        let (_dir, state) = setup().await;
        add(&state, "الأربعاء", "تاريخ", "08:00").await;
        add(&state, "الثلاثاء", "جغرافيا", "16:00").await;

        for entry in state.schedules.entries(CHAT).await {
            assert!(entry.class_day().is_some());
            assert!(entry.class_time().is_some());
        }
    }

    #[tokio::test]
    async fn test_confirm_menu_actions() {
        let (_dir, state) = setup().await;
        add(&state, "الأحد", "رياضيات", "09:00").await;

        let replies = say(&state, "something else").await;
        assert_eq!(replies, vec![prompts::confirm_menu()]);

        let replies = say(&state, "➕ إضافة حصة أخرى").await;
        assert_eq!(replies, vec![prompts::day_prompt()]);
        assert_eq!(state.dialogues.get(CHAT).await, Some(UserState::awaiting_day()));
    }

    #[tokio::test]
    async fn test_delete_uses_storage_order() {
        let (_dir, state) = setup().await;
        add(&state, "الأحد", "Math", "09:00").await;
        add(&state, "الاثنين", "Art", "08:00").await;

        let shown = show_schedule(&state, CHAT).await;
        assert!(shown[0].text.contains("1. الاثنين - Art ⏰ 08:00"));

        let replies = say(&state, "🗑️ حذف حصة").await;
        assert_eq!(step(&state).await, Some(DialogueStep::Deleting));
        assert_eq!(replies, vec![prompts::delete_menu(&state.schedules.entries(CHAT).await)]);

        let replies = say(&state, "1").await;
        assert_eq!(replies[0].text, "🗑️ حُذفت الحصة: الأحد - Math ⏰ 09:00");
        assert_eq!(replies[0].keyboard, Keyboard::Remove);
        assert_eq!(replies[1], prompts::day_prompt());
        assert_eq!(step(&state).await, Some(DialogueStep::AwaitingDay));

        let remaining = state.schedules.entries(CHAT).await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].subject, "Art");
    }

    #[tokio::test]
    async fn test_delete_rejections() {
        let (_dir, state) = setup().await;
        add(&state, "الأحد", "Math", "09:00").await;
        say(&state, "🗑️ حذف حصة").await;

        let replies = say(&state, "3").await;
        assert_eq!(replies[0], Reply::text(prompts::BAD_POSITION));
        let replies = say(&state, "0").await;
        assert_eq!(replies[0], Reply::text(prompts::BAD_POSITION));
        let replies = say(&state, "first").await;
        assert_eq!(replies[0], Reply::text(prompts::NOT_A_POSITION));
        assert_eq!(step(&state).await, Some(DialogueStep::Deleting));
        assert_eq!(state.schedules.entries(CHAT).await.len(), 1);

        let replies = say(&state, "إلغاء").await;
        assert_eq!(replies[0], Reply::removing_keyboard(prompts::DELETE_CANCELLED));
        assert_eq!(step(&state).await, Some(DialogueStep::AwaitingDay));
    }

    #[tokio::test]
    async fn test_delete_on_empty_schedule() {
        let (_dir, state) = setup().await;

        let replies = begin_delete(&state, CHAT).await;
        assert_eq!(replies, vec![Reply::text(prompts::NOTHING_TO_DELETE)]);
        assert_eq!(step(&state).await, None);

        state.dialogues.set(CHAT, UserState::at(DialogueStep::Confirming)).await;
        let replies = say(&state, "🗑️ حذف حصة").await;
        assert_eq!(replies, vec![Reply::text(prompts::NOTHING_TO_DELETE)]);
        assert_eq!(step(&state).await, Some(DialogueStep::Confirming));
    }

    #[tokio::test]
    async fn test_delete_by_arabic_indic_digit() {
        let (_dir, state) = setup().await;
        add(&state, "الأحد", "Math", "09:00").await;
        begin_delete(&state, CHAT).await;

        say(&state, "١").await;
        assert!(state.schedules.entries(CHAT).await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_by_persian_digit() {
        let (_dir, state) = setup().await;
        add(&state, "الأحد", "Math", "09:00").await;
        begin_delete(&state, CHAT).await;

        let replies = say(&state, "۱").await;
        assert_eq!(replies[0].text, "🗑️ حُذفت الحصة: الأحد - Math ⏰ 09:00");
        assert!(state.schedules.entries(CHAT).await.is_empty());
    }

    #[tokio::test]
    async fn test_show_schedule_keeps_dialogue() {
        let (_dir, state) = setup().await;
        start(&state, CHAT).await;
        say(&state, "الأحد").await;

        let replies = show_schedule(&state, CHAT).await;
        assert_eq!(replies, vec![Reply::text(prompts::EMPTY_SCHEDULE)]);
        assert_eq!(step(&state).await, Some(DialogueStep::AwaitingSubject));
    }

    #[tokio::test]
    async fn test_failed_save_is_not_reported_as_success() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        std::fs::create_dir(&data_dir).unwrap();
        let store = ScheduleStore::open(Database::new(data_dir.join("schedules.json")))
            .await
            .unwrap();
        let state = BotState::new(store, DialogueStore::default());

        start(&state, CHAT).await;
        say(&state, "الأحد").await;
        say(&state, "Math").await;

        std::fs::remove_dir_all(&data_dir).unwrap();

        let replies = say(&state, "09:00").await;
        assert_eq!(replies, vec![Reply::text(prompts::SAVE_FAILED)]);
        assert_eq!(step(&state).await, Some(DialogueStep::AwaitingTime));
        assert!(state.schedules.entries(CHAT).await.is_empty());
    }
}
