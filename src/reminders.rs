use std::time::Duration;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use teloxide::types::ChatId;

use crate::database::Schedules;
use crate::dialogue::prompts;
use crate::models::ScheduleEntry;

/// Период опроса расписаний
pub const TICK_INTERVAL: Duration = Duration::from_secs(60);

/// За сколько минут до начала занятия напоминать
pub const REMINDER_LEAD_MINUTES: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub chat_id: ChatId,
    pub text: String,
}

/// Должно ли напоминание по записи сработать в эту минуту.
/// Записи с нераспознанным днём или временем пропускаются.
pub fn is_due(entry: &ScheduleEntry, now: NaiveDateTime) -> bool {
    let (Some(day), Some(time)) = (entry.class_day(), entry.class_time()) else {
        log::debug!(
            "Skipping malformed entry: day={:?} time={:?}",
            entry.day,
            entry.time
        );
        return false;
    };

    let remind_at = time.minus(REMINDER_LEAD_MINUTES);
    now.weekday() == day.weekday()
        && now.hour() == remind_at.hour()
        && now.minute() == remind_at.minute()
}

/// Пропускает повторные тики внутри одной и той же минуты
#[derive(Debug, Default)]
pub struct MinuteGate {
    last: Option<(NaiveDate, u32, u32)>,
}

impl MinuteGate {
    /// `true`, если эта минута ещё не проверялась
    pub fn enter(&mut self, now: NaiveDateTime) -> bool {
        let minute = (now.date(), now.hour(), now.minute());
        if self.last == Some(minute) {
            return false;
        }
        self.last = Some(minute);
        true
    }
}

/// Все напоминания, которые нужно отправить в текущую минуту
pub fn due_reminders(schedules: &Schedules, now: NaiveDateTime) -> Vec<Reminder> {
    let mut due = Vec::new();
    for (chat_id, entries) in schedules {
        for entry in entries {
            if is_due(entry, now) {
                due.push(Reminder {
                    chat_id: *chat_id,
                    text: prompts::reminder(entry),
                });
            }
        }
    }
    due
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassDay, ClassTime};

    // 2024-01-01 - понедельник
    fn at(day_of_month: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day_of_month)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn schedules_with(entries: Vec<ScheduleEntry>) -> Schedules {
        let mut schedules = Schedules::new();
        schedules.insert(ChatId(77), entries);
        schedules
    }

    #[test]
    fn test_fires_ten_minutes_before_on_matching_day() {
        let entry = ScheduleEntry::new(ClassDay::Monday, "رياضيات", ClassTime::parse("09:00").unwrap());
        let schedules = schedules_with(vec![entry]);

        let due = due_reminders(&schedules, at(1, 8, 50));
        assert_eq!(
            due,
            vec![Reminder {
                chat_id: ChatId(77),
                text: "🔔 تذكير: عندك حصة رياضيات الساعة 09:00".to_string(),
            }]
        );
    }

    #[test]
    fn test_fires_exactly_once_per_week() {
        let entry = ScheduleEntry::new(ClassDay::Monday, "رياضيات", ClassTime::parse("09:00").unwrap());

        let mut fired = 0;
        for day in 1..=7 {
            for hour in 0..24 {
                for minute in 0..60 {
                    if is_due(&entry, at(day, hour, minute)) {
                        fired += 1;
                        assert_eq!((day, hour, minute), (1, 8, 50));
                    }
                }
            }
        }
        assert_eq!(fired, 1);
    }

    #[test]
    fn test_early_class_reminds_previous_hour() {
        let entry = ScheduleEntry::new(ClassDay::Sunday, "فنون", ClassTime::parse("08:00").unwrap());
        // 2024-01-07 - воскресенье
        assert!(is_due(&entry, at(7, 7, 50)));
        assert!(!is_due(&entry, at(7, 8, 0)));
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let broken_time = ScheduleEntry {
            day: ClassDay::Monday.label().to_string(),
            subject: "x".to_string(),
            time: "9am".to_string(),
        };
        let broken_day = ScheduleEntry {
            day: "Monday".to_string(),
            subject: "y".to_string(),
            time: "09:00".to_string(),
        };
        let good = ScheduleEntry::new(ClassDay::Monday, "z", ClassTime::parse("09:00").unwrap());
        let schedules = schedules_with(vec![broken_time, broken_day, good]);

        let due = due_reminders(&schedules, at(1, 8, 50));
        assert_eq!(due.len(), 1);
        assert!(due[0].text.contains('z'));
    }

    #[test]
    fn test_minute_gate_blocks_second_tick_in_same_minute() {
        let mut gate = MinuteGate::default();
        let first = at(1, 8, 50);
        let same_minute = first + chrono::Duration::seconds(45);

        assert!(gate.enter(first));
        assert!(!gate.enter(same_minute));
        assert!(gate.enter(at(1, 8, 51)));
        // Та же минута через неделю - снова проверяем
        assert!(gate.enter(at(8, 8, 51)));
    }
}
