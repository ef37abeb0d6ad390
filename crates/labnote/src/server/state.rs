//! Shared application state handed to every handler

use bentley::activity::ActivityLog;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::session::Session;
use crate::snapshot::SnapshotStore;

/// One form session, the snapshot store and the activity log.
///
/// The server serves a single user, so a single session is shared by all
/// requests.
#[derive(Clone)]
pub struct AppState {
  pub session: Arc<Mutex<Session>>,
  pub store: Arc<SnapshotStore>,
  pub activity: ActivityLog,
}

impl AppState {
  pub fn new(store: SnapshotStore, activity: ActivityLog) -> Self {
    Self { session: Arc::new(Mutex::new(Session::new())), store: Arc::new(store), activity }
  }
}
