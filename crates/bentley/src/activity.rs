//! Persistent activity log for the labnote form server
//!
//! Entries are appended to a JSONL file, one object per line. Reads tolerate
//! malformed lines so a partially written file never blocks the `/logs` view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::Level;

#[cfg(feature = "schemars")]
use schemars::JsonSchema;

/// Request details attached to an entry
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
pub struct ActivityContext {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub request_id: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub method: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub path: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub status_code: Option<u16>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub duration_ms: Option<f64>,
}

/// One line of the activity log
#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
pub struct ActivityEntry {
  pub timestamp: DateTime<Utc>,
  pub level: Level,
  pub message: String,
  pub component: String,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub context: Option<ActivityContext>,
}

struct ActivityLogInner {
  path: PathBuf,
  silent: bool,
}

/// Thread-safe, append-only JSONL log
#[derive(Clone)]
pub struct ActivityLog {
  inner: Arc<Mutex<ActivityLogInner>>,
}

impl ActivityLogInner {
  fn append(&mut self, entry: &ActivityEntry) -> std::io::Result<()> {
    let line = serde_json::to_string(entry)
      .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
    writeln!(file, "{line}")?;
    file.flush()
  }

  fn read(&self, limit: Option<usize>, level: Option<Level>) -> std::io::Result<Vec<ActivityEntry>> {
    if !self.path.exists() {
      return Ok(Vec::new());
    }

    let reader = BufReader::new(File::open(&self.path)?);
    let mut entries = Vec::new();

    for line in reader.lines() {
      let line = line?;
      if line.trim().is_empty() {
        continue;
      }

      // Skip malformed lines
      let Ok(entry) = serde_json::from_str::<ActivityEntry>(&line) else {
        continue;
      };

      if level.is_none_or(|wanted| entry.level == wanted) {
        entries.push(entry);
      }
    }

    // Newest first so the limit keeps the most recent entries
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    if let Some(limit) = limit {
      entries.truncate(limit);
    }

    // Oldest first for terminal-friendly display
    entries.reverse();
    Ok(entries)
  }
}

impl ActivityLog {
  /// Open (or create) the log at `path`, creating parent directories
  pub fn open<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
    Self::open_with_silent(path, false)
  }

  /// Like [`ActivityLog::open`], optionally without console echo
  pub fn open_with_silent<P: AsRef<Path>>(path: P, silent: bool) -> std::io::Result<Self> {
    let path = path.as_ref().to_path_buf();

    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
      File::create(&path)?;
    }

    Ok(Self { inner: Arc::new(Mutex::new(ActivityLogInner { path, silent })) })
  }

  /// Append one entry
  pub async fn record(
    &self,
    level: Level,
    message: &str,
    component: &str,
    context: Option<ActivityContext>,
  ) -> std::io::Result<()> {
    let entry = ActivityEntry {
      timestamp: Utc::now(),
      level,
      message: message.to_string(),
      component: component.to_string(),
      context,
    };

    let mut guard = self.inner.lock().await;
    guard.append(&entry)?;
    if !guard.silent {
      crate::emit(level, message);
    }
    Ok(())
  }

  /// Append one entry, ignoring write failures
  pub async fn log(&self, level: Level, message: &str, component: &str) {
    let _ = self.record(level, message, component, None).await;
  }

  pub async fn info(&self, message: &str, component: &str) {
    self.log(Level::Info, message, component).await;
  }

  pub async fn success(&self, message: &str, component: &str) {
    self.log(Level::Success, message, component).await;
  }

  pub async fn warn(&self, message: &str, component: &str) {
    self.log(Level::Warn, message, component).await;
  }

  pub async fn error(&self, message: &str, component: &str) {
    self.log(Level::Error, message, component).await;
  }

  /// Most recent `limit` entries (all when `None`), oldest first
  pub async fn entries(
    &self,
    limit: Option<usize>,
    level: Option<Level>,
  ) -> std::io::Result<Vec<ActivityEntry>> {
    let guard = self.inner.lock().await;
    guard.read(limit, level)
  }

  pub async fn path(&self) -> PathBuf {
    self.inner.lock().await.path.clone()
  }
}
