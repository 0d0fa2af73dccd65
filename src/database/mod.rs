use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use teloxide::types::ChatId;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::bot_state::StoreError;
use crate::models::ScheduleEntry;

/// Расписания всех пользователей в порядке хранения
pub type Schedules = HashMap<ChatId, Vec<ScheduleEntry>>;

/// Формат файла: ключи - id чата строкой
type StoredSchedules = BTreeMap<String, Vec<ScheduleEntry>>;

#[derive(Clone, Debug)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Database { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Читает файл целиком; если его нет - создаёт пустой
    pub async fn init(&self) -> Result<Schedules, StoreError> {
        if !fs::try_exists(&self.path).await.map_err(|e| self.io_error(e))? {
            log::info!("📄 {} not found, creating empty schedule file", self.path.display());
            let empty = Schedules::new();
            self.persist(&empty).await?;
            return Ok(empty);
        }

        let raw = fs::read(&self.path).await.map_err(|e| self.io_error(e))?;
        let stored: StoredSchedules = serde_json::from_slice(&raw)?;

        let mut schedules = Schedules::with_capacity(stored.len());
        for (key, entries) in stored {
            let id = key
                .parse::<i64>()
                .map_err(|_| StoreError::InvalidUserKey(key.clone()))?;
            schedules.insert(ChatId(id), entries);
        }

        Ok(schedules)
    }

    /// Перезаписывает файл полностью: временный файл сбрасывается на диск,
    /// затем rename поверх основного
    pub async fn persist(&self, schedules: &Schedules) -> Result<(), StoreError> {
        let stored: StoredSchedules = schedules
            .iter()
            .map(|(chat_id, entries)| (chat_id.0.to_string(), entries.clone()))
            .collect();

        let body = serde_json::to_string_pretty(&stored)?;
        let tmp_path = self.tmp_path();

        let tmp_error = |e| StoreError::Io { path: tmp_path.clone(), source: e };
        let mut file = fs::File::create(&tmp_path).await.map_err(tmp_error)?;
        file.write_all(body.as_bytes()).await.map_err(tmp_error)?;
        file.sync_all().await.map_err(tmp_error)?;
        drop(file);

        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io { path: self.path.clone(), source }
    }
}
