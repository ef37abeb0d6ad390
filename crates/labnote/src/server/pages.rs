//! HTML for the editing form

use std::fmt::Write as _;

use crate::attachment::ALLOWED_EXTENSIONS;
use crate::server::handlers::form::ATTACHMENTS_FIELD;
use crate::render::{escape_attr, escape_text};
use crate::report::{Report, Stage};
use crate::session::{Notice, NoticeLevel};
use crate::snapshot::SnapshotSummary;

const PAGE_STYLE: &str = r#"body { font-family: 'Malgun Gothic', 'Noto Sans', sans-serif; max-width: 960px; margin: 0 auto; padding: 16px; }
h1 { margin-bottom: 4px; }
h2 { font-size: 18px; margin-top: 24px; }
hr { border: none; border-top: 1px solid #ddd; margin: 20px 0; }
label { display: block; margin: 8px 0 4px; font-weight: bold; }
input[type=text], input[type=date], textarea { width: 100%; box-sizing: border-box; padding: 6px; font: inherit; }
textarea { min-height: 100px; }
.columns { display: flex; gap: 16px; }
.columns > div { flex: 1; }
.stages button { margin-right: 8px; }
button { padding: 6px 14px; cursor: pointer; }
button.primary { background: #ff4b4b; color: white; border: 1px solid #ff4b4b; }
button.secondary { background: white; border: 1px solid #ccc; }
.notice { padding: 8px 12px; margin: 8px 0; border-radius: 4px; }
.notice-success { background: #e8f5e9; }
.notice-info { background: #e3f2fd; }
.notice-warning { background: #fff8e1; }
.notice-error { background: #ffebee; }
.preview img { max-width: 100%; border: 1px solid #ccc; }
.actions { display: flex; gap: 12px; align-items: center; }
table { border-collapse: collapse; width: 100%; }
td, th { border-bottom: 1px solid #eee; padding: 6px; text-align: left; }
td form { display: inline; }
button.link { background: none; border: none; color: #555; text-decoration: underline; }
button.default-submit { position: absolute; left: -9999px; width: 1px; height: 1px; }"#;

fn notice_class(level: NoticeLevel) -> &'static str {
  match level {
    NoticeLevel::Success => "notice notice-success",
    NoticeLevel::Info => "notice notice-info",
    NoticeLevel::Warning => "notice notice-warning",
    NoticeLevel::Error => "notice notice-error",
  }
}

fn notice(out: &mut String, notice: &Notice) {
  let _ = writeln!(out, "<div class=\"{}\">{}</div>", notice_class(notice.level), escape_text(&notice.message));
}

fn text_input(out: &mut String, name: &str, label: &str, value: &str, placeholder: &str) {
  let _ = writeln!(
    out,
    "<label for=\"{name}\">{label}</label>\n<input type=\"text\" id=\"{name}\" name=\"{name}\" value=\"{}\" placeholder=\"{placeholder}\">",
    escape_attr(value)
  );
}

fn text_area(out: &mut String, name: &str, label: &str, value: &str, placeholder: &str) {
  // Browsers drop one newline right after <textarea>, so always emit one
  let _ = writeln!(
    out,
    "<label for=\"{name}\">{label}</label>\n<textarea id=\"{name}\" name=\"{name}\" placeholder=\"{placeholder}\">\n{}</textarea>",
    escape_text(value)
  );
}

fn stage_buttons(out: &mut String, report: &Report, banner: &Notice) {
  out.push_str("<h2>1. Research Stage</h2>\n<div class=\"stages\">\n");
  for stage in Stage::ALL {
    let class = if report.stage == Some(stage) { "primary" } else { "secondary" };
    let _ = writeln!(
      out,
      "<button type=\"submit\" class=\"{class}\" name=\"stage\" value=\"{}\" formaction=\"/form/stage\">{}</button>",
      escape_attr(stage.label()),
      escape_text(stage.label())
    );
  }
  if report.stage.is_some() {
    out.push_str("<button type=\"submit\" class=\"link\" name=\"stage\" value=\"\" formaction=\"/form/stage\">Clear stage</button>\n");
  }
  out.push_str("</div>\n");
  notice(out, banner);
}

fn attachments_block(out: &mut String, report: &Report) {
  let accept: Vec<String> = ALLOWED_EXTENSIONS.iter().map(|ext| format!(".{ext}")).collect();

  out.push_str("<h2>8. Attachments (Research Data)</h2>\n");
  let _ = writeln!(
    out,
    "<input type=\"file\" name=\"{ATTACHMENTS_FIELD}\" accept=\"{}\" multiple>\n\
     <button type=\"submit\" class=\"secondary\" formaction=\"/form/attachments\" formenctype=\"multipart/form-data\">Upload images</button>",
    accept.join(",")
  );

  if report.attachments.is_empty() {
    return;
  }
  out.push_str("<p><strong>Uploaded images:</strong></p>\n<div class=\"preview\">\n");
  for (index, attachment) in report.attachments.iter().enumerate() {
    let _ = writeln!(
      out,
      "<p><strong>{}. {}</strong></p>\n<img src=\"{}\" alt=\"{}\">",
      index + 1,
      escape_text(&attachment.name),
      escape_attr(&attachment.data_uri()),
      escape_attr(&attachment.name)
    );
  }
  out.push_str("</div>\n");
}

fn actions_row(out: &mut String) {
  out.push_str(
    "<hr>\n<div class=\"actions\">\n\
     <button type=\"submit\" class=\"primary\">Apply changes</button>\n\
     <input type=\"text\" name=\"save_name\" placeholder=\"Snapshot name\" style=\"width: 240px\">\n\
     <button type=\"submit\" class=\"secondary\" formaction=\"/form/save\">Save snapshot</button>\n\
     <button type=\"submit\" class=\"primary\" formaction=\"/report/print\">Print (download HTML)</button>\n\
     <button type=\"submit\" class=\"secondary\" formaction=\"/report/preview\" formtarget=\"_blank\">Print preview</button>\n\
     </div>\n",
  );
}

/// The one form holding every field. Each action button posts all of it, so
/// nothing typed is lost whichever button is clicked.
fn report_form(out: &mut String, report: &Report, banner: &Notice) {
  out.push_str("<form method=\"post\" action=\"/form/fields\">\n");
  // Enter in a text input submits the first button; keep that "Apply"
  out.push_str("<button type=\"submit\" class=\"default-submit\" tabindex=\"-1\" aria-hidden=\"true\"></button>\n");

  out.push_str("<h2>Author and Reviewer</h2>\n<div class=\"columns\">\n<div>\n");
  text_input(out, "author_name", "Author name", &report.author_name, "Enter the author's name");
  out.push_str("</div>\n<div>\n");
  text_input(out, "reviewer_name", "Reviewer name", &report.reviewer_name, "Enter the reviewer's name");
  out.push_str("</div>\n<div>\n");
  let _ = writeln!(
    out,
    "<label for=\"authored_date\">Date</label>\n<input type=\"date\" id=\"authored_date\" name=\"authored_date\" value=\"{}\">",
    report.authored_date_text()
  );
  out.push_str("</div>\n</div>\n<hr>\n");

  stage_buttons(out, report, banner);
  out.push_str("<hr>\n");

  out.push_str("<h2>2. Research Title</h2>\n");
  text_input(out, "title", "Research title", &report.title, "e.g. Drainage catheter");
  out.push_str("<h2>3. Research Goal</h2>\n");
  text_area(out, "goal", "Research goal", &report.goal, "Goals and expected outcomes of the research");
  out.push_str("<h2>4. Research Content</h2>\n");
  text_area(out, "materials", "1) Materials and Format", &report.materials, "Materials and formats to be used");
  text_area(out, "test_method", "2) Test Method", &report.test_method, "Test methods and procedures");
  out.push_str("<h2>5. Key Issues</h2>\n");
  text_area(out, "key_issues", "Key issues", &report.key_issues, "Key issues that came up during the research");
  out.push_str("<h2>6. Resolution Plan</h2>\n");
  text_area(out, "resolution_plan", "Resolution plan", &report.resolution_plan, "How the key issues will be resolved");
  out.push_str("<h2>7. Future Plan</h2>\n");
  text_area(out, "future_plan", "Future plan", &report.future_plan, "Next steps and schedule");
  out.push_str("<hr>\n");

  attachments_block(out, report);
  actions_row(out);
  out.push_str("</form>\n");

  out.push_str("<form method=\"post\" action=\"/form/reset\"><button type=\"submit\" class=\"secondary\">Reset</button></form>\n");
}

fn snapshots_block(out: &mut String, snapshots: &[SnapshotSummary]) {
  out.push_str("<h2>Saved snapshots</h2>\n");
  if snapshots.is_empty() {
    out.push_str("<p>No snapshots saved yet.</p>\n");
    return;
  }

  out.push_str("<table>\n<tr><th>Name</th><th>Saved</th><th>Title</th><th>Author</th><th></th></tr>\n");
  for snapshot in snapshots {
    let id = escape_attr(&snapshot.id);
    let _ = writeln!(
      out,
      "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>\
       <form method=\"post\" action=\"/form/load\"><input type=\"hidden\" name=\"id\" value=\"{id}\"><button type=\"submit\" class=\"secondary\">Load</button></form> \
       <form method=\"post\" action=\"/form/delete\"><input type=\"hidden\" name=\"id\" value=\"{id}\"><button type=\"submit\" class=\"secondary\">Delete</button></form>\
       </td></tr>",
      escape_text(&snapshot.save_name),
      snapshot.save_time.format("%Y-%m-%d %H:%M:%S UTC"),
      escape_text(&snapshot.title),
      escape_text(&snapshot.author_name),
    );
  }
  out.push_str("</table>\n");
}

/// Full editing page for the current session
pub fn form_page(report: &Report, notices: &[Notice], stage_banner: &Notice, snapshots: &[SnapshotSummary]) -> String {
  let mut out = String::with_capacity(16 * 1024);
  let _ = write!(
    out,
    "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<title>Research Note</title>\n<style>\n{PAGE_STYLE}\n</style>\n</head>\n<body>\n<h1>🔬 Research Note</h1>\n<hr>\n"
  );

  for pending in notices {
    notice(&mut out, pending);
  }

  report_form(&mut out, report, stage_banner);
  snapshots_block(&mut out, snapshots);

  out.push_str("</body>\n</html>\n");
  out
}
