//! Append-only CSV logs for predictions and mood check-ins.

pub mod csv_log;
pub mod mood_log;
pub mod prediction_log;
pub mod schema;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use csv_log::{LogError, LogTable};
use schema::LogSchema;

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Accepts RFC 3339 and the naive `YYYY-MM-DD HH:MM:SS[.f]` layout (as UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// One log file plus the in-process lock that serializes access to it.
#[derive(Clone)]
pub struct LogHandle {
    path: Arc<PathBuf>,
    schema: Arc<LogSchema>,
    lock: Arc<Mutex<()>>,
}

impl LogHandle {
    pub fn new(path: impl Into<PathBuf>, schema: LogSchema) -> Self {
        Self {
            path: Arc::new(path.into()),
            schema: Arc::new(schema),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema(&self) -> &LogSchema {
        &self.schema
    }

    pub async fn run_blocking<T, F>(&self, op: F) -> Result<T, LogError>
    where
        T: Send + 'static,
        F: FnOnce(&Path, &LogSchema) -> Result<T, LogError> + Send + 'static,
    {
        let handle = self.clone();
        tokio::task::spawn_blocking(move || {
            let _guard = handle.lock.blocking_lock();
            op(handle.path.as_path(), handle.schema.as_ref())
        })
        .await
        .map_err(|e| LogError::Task(e.to_string()))?
    }

    pub async fn append(&self, record: Vec<String>) -> Result<(), LogError> {
        self.run_blocking(move |path, schema| csv_log::append_log(path, &record, schema))
            .await
    }

    pub async fn read(&self) -> Result<Option<LogTable>, LogError> {
        self.run_blocking(csv_log::read_log).await
    }

    pub async fn read_raw(&self) -> Result<Option<Vec<u8>>, LogError> {
        self.run_blocking(|path, _| csv_log::read_raw(path)).await
    }
}

#[derive(Clone)]
pub struct LogStore {
    pub predictions: LogHandle,
    pub moods: LogHandle,
}

impl LogStore {
    pub fn new(prediction_path: impl Into<PathBuf>, mood_path: impl Into<PathBuf>, prediction_schema: LogSchema) -> Self {
        Self {
            predictions: LogHandle::new(prediction_path, prediction_schema),
            moods: LogHandle::new(mood_path, LogSchema::mood()),
        }
    }
}
