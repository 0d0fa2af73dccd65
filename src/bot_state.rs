use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use teloxide::types::ChatId;
use tokio::sync::{Mutex, RwLock};

use crate::database::{Database, Schedules};
use crate::models::{ScheduleEntry, UserState};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid user key in schedule file: {0:?}")]
    InvalidUserKey(String),
}

/// Расписания пользователей. Единственный писатель: каждое изменение
/// выполняется под замком и сбрасывается на диск до его освобождения.
#[derive(Clone)]
pub struct ScheduleStore {
    db: Database,
    schedules: Arc<Mutex<Schedules>>,
}

impl ScheduleStore {
    pub async fn open(db: Database) -> Result<Self, StoreError> {
        let schedules = db.init().await?;
        log::info!(
            "✅ Schedule store loaded from {}: {} users",
            db.path().display(),
            schedules.len()
        );

        let malformed = schedules
            .values()
            .flatten()
            .filter(|entry| entry.class_day().is_none() || entry.class_time().is_none())
            .count();
        if malformed > 0 {
            log::warn!("⚠️ {} malformed entries will be skipped by reminders", malformed);
        }

        Ok(Self {
            db,
            schedules: Arc::new(Mutex::new(schedules)),
        })
    }

    /// Создаёт пустой список для нового пользователя
    pub async fn ensure_user(&self, chat_id: ChatId) -> Result<(), StoreError> {
        let mut schedules = self.schedules.lock().await;
        if schedules.contains_key(&chat_id) {
            return Ok(());
        }

        schedules.insert(chat_id, Vec::new());
        if let Err(e) = self.db.persist(&schedules).await {
            schedules.remove(&chat_id);
            return Err(e);
        }
        Ok(())
    }

    /// Записи пользователя в порядке хранения
    pub async fn entries(&self, chat_id: ChatId) -> Vec<ScheduleEntry> {
        let schedules = self.schedules.lock().await;
        schedules.get(&chat_id).cloned().unwrap_or_default()
    }

    pub async fn append(&self, chat_id: ChatId, entry: ScheduleEntry) -> Result<(), StoreError> {
        let mut schedules = self.schedules.lock().await;
        let existed = schedules.contains_key(&chat_id);
        schedules.entry(chat_id).or_default().push(entry);

        if let Err(e) = self.db.persist(&schedules).await {
            // Откат: в памяти не должно остаться несохранённых изменений
            if existed {
                if let Some(list) = schedules.get_mut(&chat_id) {
                    list.pop();
                }
            } else {
                schedules.remove(&chat_id);
            }
            return Err(e);
        }
        Ok(())
    }

    /// Удаляет запись по индексу (с нуля) в порядке хранения.
    /// `Ok(None)`, если индекс вне списка.
    pub async fn remove(&self, chat_id: ChatId, index: usize) -> Result<Option<ScheduleEntry>, StoreError> {
        let mut schedules = self.schedules.lock().await;
        let removed = match schedules.get_mut(&chat_id) {
            Some(list) if index < list.len() => list.remove(index),
            _ => return Ok(None),
        };

        if let Err(e) = self.db.persist(&schedules).await {
            if let Some(list) = schedules.get_mut(&chat_id) {
                list.insert(index, removed);
            }
            return Err(e);
        }
        Ok(Some(removed))
    }

    /// Неизменяемый снимок для планировщика напоминаний
    pub async fn snapshot(&self) -> Schedules {
        self.schedules.lock().await.clone()
    }
}

/// Незавершённые диалоги, только в памяти
#[derive(Clone, Default)]
pub struct DialogueStore {
    states: Arc<RwLock<HashMap<ChatId, UserState>>>,
}

impl DialogueStore {
    pub async fn get(&self, chat_id: ChatId) -> Option<UserState> {
        self.states.read().await.get(&chat_id).cloned()
    }

    pub async fn set(&self, chat_id: ChatId, state: UserState) {
        self.states.write().await.insert(chat_id, state);
    }

    pub async fn clear(&self, chat_id: ChatId) -> Option<UserState> {
        self.states.write().await.remove(&chat_id)
    }
}

#[derive(Clone)]
pub struct BotState {
    pub schedules: ScheduleStore,
    pub dialogues: DialogueStore,
}

impl BotState {
    pub fn new(schedules: ScheduleStore, dialogues: DialogueStore) -> Self {
        Self { schedules, dialogues }
    }
}
