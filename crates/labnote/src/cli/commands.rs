use anyhow::{Context, Result};
use chrono::Local;
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};

use crate::attachment::Attachment;
use crate::cli::display::{snapshot_text, summary_line};
use crate::render::{print_file_name, render_report};
use crate::report::{Report, ReportUpdate};
use crate::snapshot::SnapshotStore;

/// Build a report from field values and image files, then save it
pub fn save_note(store: &SnapshotStore, name: &str, update: ReportUpdate, attachments: &[PathBuf]) -> Result<()> {
  let mut report = Report::new();
  report.apply(update)?;

  for path in attachments {
    let attachment = Attachment::from_path(path)?;
    report.attachments.push(attachment);
  }

  let summary = store
    .persist(name, &report)
    .with_context(|| format!("Failed to save snapshot in {}", store.root().display()))?;

  println!("{} Saved snapshot {}", "✓".green(), summary.id.cyan());
  Ok(())
}

pub fn list_notes(store: &SnapshotStore) -> Result<()> {
  let snapshots = store.list()?;

  if snapshots.is_empty() {
    println!("No snapshots found in {}", store.root().display());
    return Ok(());
  }

  for summary in &snapshots {
    println!("{}", summary_line(summary));
  }
  Ok(())
}

pub fn show_note(store: &SnapshotStore, id: &str) -> Result<()> {
  let snapshot = store.load(id)?;
  println!("{}", snapshot_text(id, &snapshot));
  Ok(())
}

pub fn delete_note(store: &SnapshotStore, id: &str) -> Result<()> {
  store.delete(id)?;
  println!("{} Deleted snapshot {}", "✓".green(), id.cyan());
  Ok(())
}

/// Render a snapshot to an HTML file; defaults to a timestamped name in the current directory
pub fn print_note(store: &SnapshotStore, id: &str, output: Option<&Path>) -> Result<()> {
  let report = store.load_report(id)?;
  let html = render_report(&report);

  let path = output.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(print_file_name(&Local::now())));
  fs::write(&path, html).with_context(|| format!("Failed to write {}", path.display()))?;

  println!("{} Wrote printable report to {}", "✓".green(), path.display().to_string().yellow());
  println!("Open it in a browser and print from there.");
  Ok(())
}
