//! Snapshot store: one JSON file per saved report
//!
//! Files live flat in the snapshot root and are named
//! `YYYYMMDD_HHMMSS_mmm_<slug>.json`; the file stem is the snapshot id.
//! There is no locking, the last write wins.

use chrono::{DateTime, Utc};
use dirs::home_dir;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::report::{Report, ReportError};

/// Environment override for the snapshot directory
pub const SNAPSHOT_ROOT_ENV: &str = "LABNOTE_SNAPSHOT_ROOT";

const EXTENSION: &str = "json";
const MAX_SLUG_CHARS: usize = 64;
const FALLBACK_NAME: &str = "Untitled";

#[derive(Debug, Error)]
pub enum SnapshotError {
  #[error("I/O error on {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("snapshot {0} not found")]
  NotFound(String),

  #[error("snapshot {id} is unreadable: {reason}")]
  Unreadable { id: String, reason: String },

  #[error("invalid snapshot id '{0}'")]
  InvalidId(String),

  #[error("failed to serialize snapshot: {0}")]
  Serialize(#[from] serde_json::Error),

  #[error("report cannot be saved: {0}")]
  Invalid(#[from] ReportError),

  #[error("could not find home directory")]
  NoHome,
}

/// On-disk layout of a saved report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Snapshot {
  pub save_time: DateTime<Utc>,
  pub save_name: String,
  pub data: Report,
}

/// Listing metadata for one snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SnapshotSummary {
  pub id: String,
  pub save_name: String,
  pub save_time: DateTime<Utc>,
  pub title: String,
  pub author_name: String,
}

impl SnapshotSummary {
  fn new(id: String, snapshot: &Snapshot) -> Self {
    Self {
      id,
      save_name: snapshot.save_name.clone(),
      save_time: snapshot.save_time,
      title: snapshot.data.title.clone(),
      author_name: snapshot.data.author_name.clone(),
    }
  }
}

/// Default snapshot directory (~/.labnote/snapshots), honoring LABNOTE_SNAPSHOT_ROOT
pub fn get_snapshots_root() -> Result<PathBuf, SnapshotError> {
  if let Ok(custom_root) = std::env::var(SNAPSHOT_ROOT_ENV) {
    if !custom_root.trim().is_empty() {
      return Ok(PathBuf::from(custom_root));
    }
  }

  let home = home_dir().ok_or(SnapshotError::NoHome)?;
  Ok(home.join(".labnote").join("snapshots"))
}

/// File-system-safe rendering of a save name
pub fn slugify(name: &str) -> String {
  let slug: String = name
    .trim()
    .chars()
    .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
    .take(MAX_SLUG_CHARS)
    .collect();

  if slug.is_empty() {
    FALLBACK_NAME.to_string()
  } else {
    slug
  }
}

/// Snapshot id for a name saved at `save_time`
pub fn snapshot_id(name: &str, save_time: DateTime<Utc>) -> String {
  format!("{}_{}", save_time.format("%Y%m%d_%H%M%S_%3f"), slugify(name))
}

fn check_id(id: &str) -> Result<(), SnapshotError> {
  let bad = id.trim().is_empty() || id.contains(['/', '\\']) || id.contains("..") || id.starts_with('.');
  if bad {
    return Err(SnapshotError::InvalidId(id.to_string()));
  }
  Ok(())
}

/// Directory-backed snapshot store
#[derive(Debug, Clone)]
pub struct SnapshotStore {
  root: PathBuf,
}

impl SnapshotStore {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  fn path_for(&self, id: &str) -> PathBuf {
    self.root.join(format!("{id}.{EXTENSION}"))
  }

  /// Save `report` under `name`, stamped with the current time
  pub fn persist(&self, name: &str, report: &Report) -> Result<SnapshotSummary, SnapshotError> {
    self.persist_at(name, report, Utc::now())
  }

  /// Save `report` under `name` with an explicit save time
  pub fn persist_at(
    &self,
    name: &str,
    report: &Report,
    save_time: DateTime<Utc>,
  ) -> Result<SnapshotSummary, SnapshotError> {
    report.validate()?;

    let save_name = match (name.trim(), report.title.trim()) {
      ("", "") => FALLBACK_NAME.to_string(),
      ("", title) => title.to_string(),
      (name, _) => name.to_string(),
    };

    let snapshot = Snapshot { save_time, save_name, data: report.clone() };
    let id = snapshot_id(&snapshot.save_name, save_time);
    let json = serde_json::to_string_pretty(&snapshot)?;

    fs::create_dir_all(&self.root).map_err(|source| SnapshotError::Io { path: self.root.clone(), source })?;

    // Write beside the target, then rename into place
    let path = self.path_for(&id);
    let staging = self.root.join(format!(".{id}.{EXTENSION}.tmp"));
    fs::write(&staging, json).map_err(|source| SnapshotError::Io { path: staging.clone(), source })?;
    fs::rename(&staging, &path).map_err(|source| {
      let _ = fs::remove_file(&staging);
      SnapshotError::Io { path: path.clone(), source }
    })?;

    tracing::debug!(snapshot = %id, path = %path.display(), "persisted snapshot");
    Ok(SnapshotSummary::new(id, &snapshot))
  }

  /// All readable snapshots, newest first. Unreadable files are skipped.
  pub fn list(&self) -> Result<Vec<SnapshotSummary>, SnapshotError> {
    if !self.root.exists() {
      return Ok(Vec::new());
    }

    let entries = fs::read_dir(&self.root).map_err(|source| SnapshotError::Io { path: self.root.clone(), source })?;

    let mut summaries = Vec::new();
    for entry in entries.flatten() {
      let path = entry.path();
      if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
        continue;
      }
      let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
        continue;
      };
      if check_id(id).is_err() {
        continue;
      }

      match self.read(id, &path) {
        Ok(snapshot) => summaries.push(SnapshotSummary::new(id.to_string(), &snapshot)),
        Err(e) => tracing::debug!(path = %path.display(), error = %e, "skipping unreadable snapshot"),
      }
    }

    summaries.sort_by(|a, b| b.save_time.cmp(&a.save_time).then_with(|| b.id.cmp(&a.id)));
    Ok(summaries)
  }

  /// Load a full snapshot by id
  pub fn load(&self, id: &str) -> Result<Snapshot, SnapshotError> {
    check_id(id)?;
    let path = self.path_for(id);
    if !path.is_file() {
      return Err(SnapshotError::NotFound(id.to_string()));
    }
    self.read(id, &path)
  }

  /// Load only the report of a snapshot
  pub fn load_report(&self, id: &str) -> Result<Report, SnapshotError> {
    Ok(self.load(id)?.data)
  }

  /// Remove a snapshot file
  pub fn delete(&self, id: &str) -> Result<(), SnapshotError> {
    check_id(id)?;
    let path = self.path_for(id);
    if !path.is_file() {
      return Err(SnapshotError::NotFound(id.to_string()));
    }
    fs::remove_file(&path).map_err(|source| SnapshotError::Io { path, source })
  }

  fn read(&self, id: &str, path: &Path) -> Result<Snapshot, SnapshotError> {
    let unreadable = |reason: String| SnapshotError::Unreadable { id: id.to_string(), reason };

    let content = fs::read_to_string(path).map_err(|e| unreadable(e.to_string()))?;
    let snapshot: Snapshot = serde_json::from_str(&content).map_err(|e| unreadable(e.to_string()))?;
    snapshot.data.validate().map_err(|e| unreadable(e.to_string()))?;
    Ok(snapshot)
  }
}
