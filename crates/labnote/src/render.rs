//! Printable HTML rendering of a report
//!
//! The output is a single self-contained document: inline CSS, images as
//! `data:` URIs. Rendering is pure and deterministic; the download file name
//! is the only time-dependent piece and lives in [`print_file_name`].

use chrono::{DateTime, TimeZone};
use std::fmt::Write as _;

use crate::report::Report;

pub const DOCUMENT_TITLE: &str = "Research Note";

const STYLE: &str = r#"body {
  font-family: 'Malgun Gothic', 'Noto Sans', sans-serif;
  margin: 5px;
  line-height: 1.5;
}
.header {
  text-align: center;
  font-weight: bold;
  font-size: 20px;
  margin-bottom: 20px;
  border-bottom: 2px solid black;
  padding-bottom: 8px;
}
.signature-section {
  margin-bottom: 20px;
}
.signature-line {
  display: inline-block;
  border-bottom: 1px solid #333;
  width: 80px;
  margin: 0 20px;
}
.section {
  margin-bottom: 15px;
}
.section-title {
  font-weight: bold;
  margin-bottom: 5px;
  font-size: 14px;
}
.content {
  border: 1px solid #333;
  padding: 8px;
  background-color: #fafafa;
  word-wrap: break-word;
  white-space: pre-wrap;
  line-height: 1.4;
  font-size: 10pt;
}
.figure {
  margin-bottom: 5px;
}
.figure img {
  max-width: 100%;
  height: auto;
  border: 1px solid #333;
  margin-top: 3px;
}
@media print {
  body {
    margin: 0;
  }
  .section {
    page-break-inside: avoid;
  }
}"#;

/// Escape text placed between tags
pub fn escape_text(text: &str) -> String {
  html_escape::encode_text(text).into_owned()
}

/// Escape text placed inside a double-quoted attribute
pub fn escape_attr(text: &str) -> String {
  html_escape::encode_double_quoted_attribute(text).into_owned()
}

/// Download name for a report printed at `timestamp`
pub fn print_file_name<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String
where
  Tz::Offset: std::fmt::Display,
{
  format!("research_note_{}.html", timestamp.format("%Y%m%d_%H%M%S"))
}

fn text_section(out: &mut String, heading: &str, body: &str) {
  let _ = write!(
    out,
    "\n<div class=\"section\">\n<div class=\"section-title\">{heading}</div>\n<div class=\"content\">{}</div>\n</div>\n",
    escape_text(body)
  );
}

fn signature_section(out: &mut String, report: &Report) {
  let _ = write!(
    out,
    "\n<div class=\"signature-section\">\n\
     <span><strong>Author:</strong> {}</span><span class=\"signature-line\"></span>\n\
     <span><strong>Reviewer:</strong> {}</span><span class=\"signature-line\"></span>\n\
     <span><strong>Date:</strong> {}</span>\n\
     </div>\n",
    escape_text(&report.author_name),
    escape_text(&report.reviewer_name),
    report.authored_date_text(),
  );
}

fn content_section(out: &mut String, report: &Report) {
  let _ = write!(
    out,
    "\n<div class=\"section\">\n<div class=\"section-title\">4. Research Content</div>\n<div class=\"content\">\
     <div><strong>1) Materials and Format:</strong> {}</div>\n<br>\n\
     <div><strong>2) Test Method:</strong> {}</div></div>\n</div>\n",
    escape_text(&report.materials),
    escape_text(&report.test_method),
  );
}

fn attachments_section(out: &mut String, report: &Report) {
  if report.attachments.is_empty() {
    return;
  }

  out.push_str("\n<div class=\"section attachments\">\n<div class=\"section-title\">8. Attachments (Research Data)</div>\n");
  for (index, attachment) in report.attachments.iter().enumerate() {
    let _ = write!(
      out,
      "<div class=\"figure\">\n<p><strong>{}. {}</strong></p>\n<img src=\"{}\" alt=\"{}\">\n</div>\n",
      index + 1,
      escape_text(&attachment.name),
      escape_attr(&attachment.data_uri()),
      escape_attr(&attachment.name),
    );
  }
  out.push_str("</div>\n");
}

/// Render the printable document for `report`
pub fn render_report(report: &Report) -> String {
  let stage = report.stage.map(|stage| stage.label()).unwrap_or_default();

  let mut out = String::with_capacity(8 * 1024);
  let _ = write!(
    out,
    "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<title>{DOCUMENT_TITLE}</title>\n<style>\n{STYLE}\n</style>\n</head>\n<body>\n<div class=\"header\">{DOCUMENT_TITLE}</div>\n"
  );

  signature_section(&mut out, report);
  let _ = write!(
    out,
    "\n<div class=\"section\">\n<div class=\"section-title\">1. Research Stage: {}</div>\n</div>\n",
    escape_text(stage)
  );
  text_section(&mut out, "2. Research Title", &report.title);
  text_section(&mut out, "3. Research Goal", &report.goal);
  content_section(&mut out, report);
  text_section(&mut out, "5. Key Issues", &report.key_issues);
  text_section(&mut out, "6. Resolution Plan", &report.resolution_plan);
  text_section(&mut out, "7. Future Plan", &report.future_plan);
  attachments_section(&mut out, report);

  out.push_str("</body>\n</html>\n");
  out
}
