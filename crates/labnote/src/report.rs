//! The research note record and its stage

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::attachment::Attachment;

/// Date format used for `authored_date` everywhere (ISO 8601)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
  #[error("invalid date '{0}', expected YYYY-MM-DD")]
  InvalidDate(String),

  #[error("unknown research stage '{0}'")]
  UnknownStage(String),

  #[error("attachment #{index} is missing its {field}")]
  IncompleteAttachment { index: usize, field: &'static str },
}

/// Research progress phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Stage {
  #[serde(rename = "Planning")]
  Planning,
  #[serde(rename = "E/S")]
  EngineeringSample,
  #[serde(rename = "Pilot")]
  Pilot,
  #[serde(rename = "Approved/Transferred")]
  ApprovedTransferred,
}

impl Stage {
  pub const ALL: [Stage; 4] =
    [Stage::Planning, Stage::EngineeringSample, Stage::Pilot, Stage::ApprovedTransferred];

  /// Name shown on buttons and in the printed report
  pub fn label(self) -> &'static str {
    match self {
      Stage::Planning => "Planning",
      Stage::EngineeringSample => "E/S",
      Stage::Pilot => "Pilot",
      Stage::ApprovedTransferred => "Approved/Transferred",
    }
  }
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

impl FromStr for Stage {
  type Err = ReportError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = s.trim();
    Stage::ALL
      .into_iter()
      .find(|stage| stage.label().eq_ignore_ascii_case(wanted))
      .ok_or_else(|| ReportError::UnknownStage(wanted.to_string()))
  }
}

/// A research note as captured by the form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Report {
  pub author_name: String,
  pub reviewer_name: String,
  pub authored_date: Option<NaiveDate>,
  pub stage: Option<Stage>,
  pub title: String,
  pub goal: String,
  pub materials: String,
  pub test_method: String,
  pub key_issues: String,
  pub resolution_plan: String,
  pub future_plan: String,
  pub attachments: Vec<Attachment>,
}

/// Partial edit of a report; `None` leaves a field untouched.
///
/// `authored_date` is the raw form value: an empty string clears the date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ReportUpdate {
  pub author_name: Option<String>,
  pub reviewer_name: Option<String>,
  pub authored_date: Option<String>,
  pub stage: Option<Stage>,
  pub title: Option<String>,
  pub goal: Option<String>,
  pub materials: Option<String>,
  pub test_method: Option<String>,
  pub key_issues: Option<String>,
  pub resolution_plan: Option<String>,
  pub future_plan: Option<String>,
}

/// Parse a form date; blank input means "no date"
pub fn parse_date(raw: &str) -> Result<Option<NaiveDate>, ReportError> {
  let raw = raw.trim();
  if raw.is_empty() {
    return Ok(None);
  }
  NaiveDate::parse_from_str(raw, DATE_FORMAT)
    .map(Some)
    .map_err(|_| ReportError::InvalidDate(raw.to_string()))
}

impl Report {
  pub fn new() -> Self {
    Self::default()
  }

  /// True when nothing has been entered yet
  pub fn is_empty(&self) -> bool {
    *self == Report::default()
  }

  /// Apply a partial edit. Nothing changes when the date does not parse.
  pub fn apply(&mut self, update: ReportUpdate) -> Result<(), ReportError> {
    let authored_date = update.authored_date.as_deref().map(parse_date).transpose()?;

    if let Some(date) = authored_date {
      self.authored_date = date;
    }
    if let Some(stage) = update.stage {
      self.stage = Some(stage);
    }

    let text_fields = [
      (&mut self.author_name, update.author_name),
      (&mut self.reviewer_name, update.reviewer_name),
      (&mut self.title, update.title),
      (&mut self.goal, update.goal),
      (&mut self.materials, update.materials),
      (&mut self.test_method, update.test_method),
      (&mut self.key_issues, update.key_issues),
      (&mut self.resolution_plan, update.resolution_plan),
      (&mut self.future_plan, update.future_plan),
    ];
    for (field, value) in text_fields {
      if let Some(value) = value {
        *field = value;
      }
    }

    Ok(())
  }

  /// Check the attachment invariant: every entry has name, type and data
  pub fn validate(&self) -> Result<(), ReportError> {
    for (index, attachment) in self.attachments.iter().enumerate() {
      let missing = if attachment.name.trim().is_empty() {
        Some("name")
      } else if attachment.media_type.trim().is_empty() {
        Some("media type")
      } else if attachment.data.is_empty() {
        Some("data")
      } else {
        None
      };

      if let Some(field) = missing {
        return Err(ReportError::IncompleteAttachment { index: index + 1, field });
      }
    }
    Ok(())
  }

  /// Formatted authored date, empty when unset
  pub fn authored_date_text(&self) -> String {
    self.authored_date.map(|date| date.format(DATE_FORMAT).to_string()).unwrap_or_default()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn stage_parses_labels_case_insensitively() {
    assert_eq!("pilot".parse::<Stage>(), Ok(Stage::Pilot));
    assert_eq!("e/s".parse::<Stage>(), Ok(Stage::EngineeringSample));
    assert_eq!(" Approved/Transferred ".parse::<Stage>(), Ok(Stage::ApprovedTransferred));
    assert_eq!(
      "Production".parse::<Stage>(),
      Err(ReportError::UnknownStage("Production".to_string()))
    );
  }

  #[test]
  fn stage_serializes_by_label() {
    let json = serde_json::to_string(&Stage::EngineeringSample).unwrap();
    assert_eq!(json, "\"E/S\"");
    let stage: Stage = serde_json::from_str("\"Approved/Transferred\"").unwrap();
    assert_eq!(stage, Stage::ApprovedTransferred);
  }

  #[test]
  fn missing_keys_deserialize_to_empty_values() {
    let report: Report = serde_json::from_str(r#"{"title": "Drainage catheter"}"#).unwrap();
    assert_eq!(report.title, "Drainage catheter");
    assert_eq!(report.stage, None);
    assert!(report.attachments.is_empty());
  }

  #[test]
  fn apply_overwrites_only_provided_fields() {
    let mut report = Report { author_name: "Kim".to_string(), goal: "Reduce leaks".to_string(), ..Report::new() };

    report
      .apply(ReportUpdate {
        title: Some("Drainage catheter".to_string()),
        authored_date: Some("2026-10-18".to_string()),
        ..ReportUpdate::default()
      })
      .unwrap();

    assert_eq!(report.author_name, "Kim");
    assert_eq!(report.goal, "Reduce leaks");
    assert_eq!(report.title, "Drainage catheter");
    assert_eq!(report.authored_date_text(), "2026-10-18");
  }

  #[test]
  fn apply_with_bad_date_changes_nothing() {
    let mut report = Report::new();
    let result = report.apply(ReportUpdate {
      title: Some("ignored".to_string()),
      authored_date: Some("18/10/2026".to_string()),
      ..ReportUpdate::default()
    });

    assert_eq!(result, Err(ReportError::InvalidDate("18/10/2026".to_string())));
    assert!(report.is_empty());
  }

  #[test]
  fn blank_date_clears_the_date() {
    let mut report = Report::new();
    report.authored_date = parse_date("2026-01-02").unwrap();
    report.apply(ReportUpdate { authored_date: Some(String::new()), ..ReportUpdate::default() }).unwrap();
    assert_eq!(report.authored_date, None);
  }

  #[test]
  fn validate_reports_first_incomplete_attachment() {
    let mut report = Report::new();
    report.attachments.push(Attachment {
      name: "scan.png".to_string(),
      media_type: "image/png".to_string(),
      data: "iVBORw0KGgo=".to_string(),
    });
    report.attachments.push(Attachment {
      name: "blank.png".to_string(),
      media_type: String::new(),
      data: "AAAA".to_string(),
    });

    assert_eq!(
      report.validate(),
      Err(ReportError::IncompleteAttachment { index: 2, field: "media type" })
    );
  }
}
