//! Terminal formatting for snapshots

use colored::*;

use crate::report::Report;
use crate::snapshot::{Snapshot, SnapshotSummary};

/// One listing line: id, save name, time, title and author
pub fn summary_line(summary: &SnapshotSummary) -> String {
  let mut line = format!(
    "{}  {}  {}",
    summary.save_time.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
    summary.id.cyan(),
    summary.save_name.bold()
  );
  if !summary.title.is_empty() {
    line.push_str(&format!(" - {}", summary.title));
  }
  if !summary.author_name.is_empty() {
    line.push_str(&format!(" ({})", summary.author_name.yellow()));
  }
  line
}

fn field(label: &str, value: &str) -> String {
  format!("{} {}", format!("{label}:").bold(), value)
}

fn block(label: &str, value: &str) -> String {
  if value.is_empty() {
    return field(label, "");
  }
  format!("{}\n{}", format!("{label}:").bold(), value)
}

/// Every field of a report, one section per line group
pub fn report_text(report: &Report) -> String {
  let stage = report.stage.map(|stage| stage.label()).unwrap_or("not selected");

  let mut lines = vec![
    field("Author", &report.author_name),
    field("Reviewer", &report.reviewer_name),
    field("Date", &report.authored_date_text()),
    field("Stage", stage),
    field("Title", &report.title),
    block("Goal", &report.goal),
    block("Materials and Format", &report.materials),
    block("Test Method", &report.test_method),
    block("Key Issues", &report.key_issues),
    block("Resolution Plan", &report.resolution_plan),
    block("Future Plan", &report.future_plan),
  ];

  if !report.attachments.is_empty() {
    lines.push(format!("{}", "Attachments:".bold()));
    for (index, attachment) in report.attachments.iter().enumerate() {
      lines.push(format!("  {}. {} ({})", index + 1, attachment.name, attachment.media_type));
    }
  }

  lines.join("\n")
}

/// Header plus report body for `labnote show`
pub fn snapshot_text(id: &str, snapshot: &Snapshot) -> String {
  format!(
    "{} {}\n{} {}\n---\n{}",
    "Snapshot:".bold(),
    format!("{} ({id})", snapshot.save_name).cyan(),
    "Saved:".bold(),
    snapshot.save_time.to_rfc3339(),
    report_text(&snapshot.data)
  )
}
