//! Runtime configuration for the form server and CLI
//!
//! The only persistent setting is the snapshot directory; the server adds a
//! bind address and the activity log location.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use crate::snapshot::{get_snapshots_root, SnapshotError, SnapshotStore};

pub const DEFAULT_PORT: u16 = 8501;

pub fn default_bind() -> SocketAddr {
  SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  pub bind: SocketAddr,
  pub snapshot_root: PathBuf,
  pub logs_path: PathBuf,
}

/// Activity log path for a snapshot root: `<root>/../logs/server.jsonl`
pub fn logs_path_for(snapshot_root: &Path) -> PathBuf {
  let base = snapshot_root.parent().unwrap_or(snapshot_root);
  base.join("logs").join("server.jsonl")
}

/// Snapshot root from an explicit path, falling back to env and home
pub fn resolve_snapshot_root(explicit: Option<&Path>) -> Result<PathBuf, SnapshotError> {
  match explicit {
    Some(path) => Ok(path.to_path_buf()),
    None => get_snapshots_root(),
  }
}

/// Store for an optional explicit root
pub fn open_store(explicit: Option<&Path>) -> Result<SnapshotStore, SnapshotError> {
  Ok(SnapshotStore::new(resolve_snapshot_root(explicit)?))
}

impl ServerConfig {
  pub fn resolve(bind: Option<SocketAddr>, root: Option<&Path>) -> Result<Self, SnapshotError> {
    let snapshot_root = resolve_snapshot_root(root)?;
    Ok(Self {
      bind: bind.unwrap_or_else(default_bind),
      logs_path: logs_path_for(&snapshot_root),
      snapshot_root,
    })
  }
}
