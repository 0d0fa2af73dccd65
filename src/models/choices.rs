use super::ClassTime;

pub const OTHER_TIME_LABEL: &str = "أخرى";
pub const ADD_ANOTHER_LABEL: &str = "➕ إضافة حصة أخرى";
pub const FINISH_LABEL: &str = "✅ إنهاء الجدول";
pub const DELETE_LABEL: &str = "🗑️ حذف حصة";
pub const CANCEL_LABEL: &str = "إلغاء";

/// Ответ на клавиатуру выбора времени
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeChoice {
    Other,
    At(ClassTime),
}

impl TimeChoice {
    pub fn parse(text: &str) -> Option<Self> {
        if text == OTHER_TIME_LABEL {
            return Some(TimeChoice::Other);
        }
        ClassTime::parse(text).map(TimeChoice::At)
    }
}

/// Кнопки меню после добавления записи
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    AddAnother,
    Finish,
    Delete,
}

impl ConfirmAction {
    pub const ALL: [ConfirmAction; 3] = [
        ConfirmAction::AddAnother,
        ConfirmAction::Finish,
        ConfirmAction::Delete,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ConfirmAction::AddAnother => ADD_ANOTHER_LABEL,
            ConfirmAction::Finish => FINISH_LABEL,
            ConfirmAction::Delete => DELETE_LABEL,
        }
    }

    pub fn from_label(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.label() == text)
    }
}

/// Ответ на меню удаления
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteChoice {
    Cancel,
    /// Номер с единицы, как на кнопках
    Position(usize),
    /// Число, которое не помещается в usize
    Overflow,
    NotANumber,
}

impl DeleteChoice {
    pub fn parse(text: &str) -> Self {
        if text == CANCEL_LABEL {
            return DeleteChoice::Cancel;
        }
        if text.is_empty() {
            return DeleteChoice::NotANumber;
        }

        let mut value: usize = 0;
        for ch in text.chars() {
            let Some(digit) = decimal_digit(ch) else {
                return DeleteChoice::NotANumber;
            };
            value = match value.checked_mul(10).and_then(|v| v.checked_add(digit)) {
                Some(v) => v,
                None => return DeleteChoice::Overflow,
            };
        }
        DeleteChoice::Position(value)
    }
}

/// ASCII, арабско-индийские (٠-٩) и персидские (۰-۹) цифры
fn decimal_digit(ch: char) -> Option<usize> {
    match ch {
        '0'..='9' => Some(ch as usize - '0' as usize),
        '\u{0660}'..='\u{0669}' => Some(ch as usize - '\u{0660}' as usize),
        '\u{06F0}'..='\u{06F9}' => Some(ch as usize - '\u{06F0}' as usize),
        _ => None,
    }
}
