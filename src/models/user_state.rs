use super::{ClassDay, ClassTime, ScheduleEntry};

/// Шаг диалога пользователя
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueStep {
    AwaitingDay,
    AwaitingSubject,
    AwaitingTime,
    AwaitingCustomTime,
    Confirming,
    Deleting,
}

/// Частично собранная запись
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingEntry {
    pub day: Option<ClassDay>,
    pub subject: Option<String>,
}

impl PendingEntry {
    pub fn complete(&self, time: ClassTime) -> Option<ScheduleEntry> {
        let day = self.day?;
        let subject = self.subject.as_ref()?;
        Some(ScheduleEntry::new(day, subject.clone(), time))
    }
}

/// Состояние диалога живёт только в памяти и теряется при перезапуске
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserState {
    pub step: DialogueStep,
    pub pending: PendingEntry,
}

impl UserState {
    pub fn at(step: DialogueStep) -> Self {
        Self {
            step,
            pending: PendingEntry::default(),
        }
    }

    pub fn awaiting_day() -> Self {
        Self::at(DialogueStep::AwaitingDay)
    }
}
