//! Per-user form state
//!
//! A [`Session`] owns the report being edited plus the one-shot notices the
//! form shows after an action. Store operations never fail the session; they
//! report through notices instead.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::attachment::Attachment;
use crate::report::{Report, ReportError, ReportUpdate, Stage};
use crate::snapshot::{SnapshotStore, SnapshotSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
  Success,
  Info,
  Warning,
  Error,
}

/// A message shown once on the next form render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Notice {
  pub level: NoticeLevel,
  pub message: String,
}

#[derive(Debug, Default)]
pub struct Session {
  report: Report,
  notices: Vec<Notice>,
}

impl Session {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn report(&self) -> &Report {
    &self.report
  }

  /// Apply a field edit. Nothing changes when the edit is rejected.
  pub fn apply(&mut self, update: ReportUpdate) -> Result<(), ReportError> {
    self.report.apply(update)
  }

  pub fn select_stage(&mut self, stage: Stage) {
    self.report.stage = Some(stage);
  }

  pub fn clear_stage(&mut self) {
    self.report.stage = None;
  }

  /// Replace the previous upload batch. An empty batch keeps what is there.
  pub fn replace_attachments(&mut self, attachments: Vec<Attachment>) {
    if attachments.is_empty() {
      return;
    }
    self.report.attachments = attachments;
  }

  pub fn push_attachment(&mut self, attachment: Attachment) {
    self.report.attachments.push(attachment);
  }

  /// Replace the whole report after validating it
  pub fn replace_report(&mut self, report: Report) -> Result<(), ReportError> {
    report.validate()?;
    self.report = report;
    Ok(())
  }

  /// Back to an empty report
  pub fn reset(&mut self) {
    self.report = Report::default();
  }

  pub fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
    self.notices.push(Notice { level, message: message.into() });
  }

  /// Drain pending notices
  pub fn take_notices(&mut self) -> Vec<Notice> {
    std::mem::take(&mut self.notices)
  }

  /// Banner describing the stage selection
  pub fn stage_notice(&self) -> Notice {
    match self.report.stage {
      Some(stage) => Notice { level: NoticeLevel::Success, message: format!("Selected research stage: {stage}") },
      None => Notice { level: NoticeLevel::Warning, message: "Please select a research stage".to_string() },
    }
  }

  /// Persist the current report; the outcome is also queued as a notice
  pub fn save(&mut self, store: &SnapshotStore, name: &str) -> Option<SnapshotSummary> {
    match store.persist(name, &self.report) {
      Ok(summary) => {
        self.notify(NoticeLevel::Success, format!("Saved snapshot '{}'", summary.save_name));
        Some(summary)
      }
      Err(e) => {
        self.notify(NoticeLevel::Error, format!("Failed to save snapshot: {e}"));
        None
      }
    }
  }

  /// Replace the current report with a stored one. On failure the report is kept.
  pub fn load(&mut self, store: &SnapshotStore, id: &str) -> bool {
    match store.load(id) {
      Ok(snapshot) => {
        self.report = snapshot.data;
        self.notify(NoticeLevel::Success, format!("Loaded snapshot '{}'", snapshot.save_name));
        true
      }
      Err(e) => {
        self.notify(NoticeLevel::Error, format!("Failed to load snapshot: {e}"));
        false
      }
    }
  }

  /// Delete a stored snapshot; the current report is untouched
  pub fn delete(&mut self, store: &SnapshotStore, id: &str) -> bool {
    match store.delete(id) {
      Ok(()) => {
        self.notify(NoticeLevel::Success, format!("Deleted snapshot {id}"));
        true
      }
      Err(e) => {
        self.notify(NoticeLevel::Error, format!("Failed to delete snapshot: {e}"));
        false
      }
    }
  }
}
