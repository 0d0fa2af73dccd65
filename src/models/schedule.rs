use std::cmp::Ordering;
use std::fmt;

use chrono::{Duration, NaiveTime, Weekday};
use serde::{Serialize, Deserialize};

/// Учебные дни недели (пятница и суббота не поддерживаются)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassDay {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
}

impl ClassDay {
    /// Порядок кнопок на клавиатуре
    pub const ALL: [ClassDay; 5] = [
        ClassDay::Sunday,
        ClassDay::Monday,
        ClassDay::Tuesday,
        ClassDay::Wednesday,
        ClassDay::Thursday,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ClassDay::Sunday => "الأحد",
            ClassDay::Monday => "الاثنين",
            ClassDay::Tuesday => "الثلاثاء",
            ClassDay::Wednesday => "الأربعاء",
            ClassDay::Thursday => "الخميس",
        }
    }

    pub fn from_label(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|day| day.label() == text)
    }

    pub fn weekday(self) -> Weekday {
        match self {
            ClassDay::Sunday => Weekday::Sun,
            ClassDay::Monday => Weekday::Mon,
            ClassDay::Tuesday => Weekday::Tue,
            ClassDay::Wednesday => Weekday::Wed,
            ClassDay::Thursday => Weekday::Thu,
        }
    }

    /// Номер дня в нумерации платформы: понедельник = 0, воскресенье = 6
    pub fn rank(self) -> u32 {
        self.weekday().num_days_from_monday()
    }
}

/// Время занятия в пределах 08:00 - 17:00 включительно
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClassTime(NaiveTime);

impl ClassTime {
    pub const EARLIEST: (u32, u32) = (8, 0);
    pub const LATEST: (u32, u32) = (17, 0);

    pub fn parse(text: &str) -> Option<Self> {
        let time = NaiveTime::parse_from_str(text.trim(), "%H:%M").ok()?;
        let earliest = NaiveTime::from_hms_opt(Self::EARLIEST.0, Self::EARLIEST.1, 0)?;
        let latest = NaiveTime::from_hms_opt(Self::LATEST.0, Self::LATEST.1, 0)?;

        if time >= earliest && time <= latest {
            Some(ClassTime(time))
        } else {
            None
        }
    }

    /// Часовые слоты для клавиатуры выбора времени
    pub fn hourly_slots() -> Vec<ClassTime> {
        (Self::EARLIEST.0..=Self::LATEST.0)
            .filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
            .map(ClassTime)
            .collect()
    }

    pub fn minus(self, minutes: i64) -> NaiveTime {
        self.0 - Duration::minutes(minutes)
    }
}

impl fmt::Display for ClassTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

/// Запись расписания в том виде, в котором она хранится в файле
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub day: String,
    pub subject: String,
    pub time: String,
}

impl ScheduleEntry {
    pub fn new(day: ClassDay, subject: impl Into<String>, time: ClassTime) -> Self {
        Self {
            day: day.label().to_string(),
            subject: subject.into(),
            time: time.to_string(),
        }
    }

    /// `None`, если файл правили вручную и день не распознан
    pub fn class_day(&self) -> Option<ClassDay> {
        ClassDay::from_label(&self.day)
    }

    pub fn class_time(&self) -> Option<ClassTime> {
        ClassTime::parse(&self.time)
    }

    /// Строка вида "الاثنين - رياضيات ⏰ 09:00"
    pub fn describe(&self) -> String {
        format!("{} - {} ⏰ {}", self.day, self.subject, self.time)
    }

    /// Порядок отображения: день недели, затем время (строкой).
    /// Нераспознанные дни уходят в конец.
    pub fn display_cmp(&self, other: &Self) -> Ordering {
        let rank = |entry: &Self| entry.class_day().map(ClassDay::rank).unwrap_or(u32::MAX);
        rank(self)
            .cmp(&rank(other))
            .then_with(|| self.time.cmp(&other.time))
    }
}

/// Копия списка в порядке отображения; сам список не меняется
pub fn sorted_for_display(entries: &[ScheduleEntry]) -> Vec<ScheduleEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(ScheduleEntry::display_cmp);
    sorted
}
