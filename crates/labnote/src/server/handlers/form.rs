//! HTML form handlers
//!
//! Every post mutates the session once and redirects back to `/`, where the
//! queued notices are shown.

use axum::{
  extract::{Extension, Form, Multipart, State},
  response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::attachment::Attachment;
use crate::render::render_report;
use crate::report::{ReportUpdate, Stage};
use crate::server::handlers::report;
use crate::server::middleware::RequestContext;
use crate::server::pages::form_page;
use crate::server::state::AppState;
use crate::session::{NoticeLevel, Session};

/// Name of the multipart file input
pub const ATTACHMENTS_FIELD: &str = "attachments";

/// Everything the main form posts. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FieldsForm {
  pub author_name: Option<String>,
  pub reviewer_name: Option<String>,
  pub authored_date: Option<String>,
  pub title: Option<String>,
  pub goal: Option<String>,
  pub materials: Option<String>,
  pub test_method: Option<String>,
  pub key_issues: Option<String>,
  pub resolution_plan: Option<String>,
  pub future_plan: Option<String>,
  pub stage: Option<String>,
  pub save_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SnapshotIdForm {
  pub id: String,
}

impl FieldsForm {
  fn update(&self) -> ReportUpdate {
    ReportUpdate {
      author_name: self.author_name.clone(),
      reviewer_name: self.reviewer_name.clone(),
      authored_date: self.authored_date.clone(),
      stage: None,
      title: self.title.clone(),
      goal: self.goal.clone(),
      materials: self.materials.clone(),
      test_method: self.test_method.clone(),
      key_issues: self.key_issues.clone(),
      resolution_plan: self.resolution_plan.clone(),
      future_plan: self.future_plan.clone(),
    }
  }
}

/// Apply posted field values, then the stage when one was clicked.
/// Returns false when an edit was rejected; the reason is queued as a notice.
pub(crate) fn apply_form(session: &mut Session, form: &FieldsForm) -> bool {
  if let Err(e) = session.apply(form.update()) {
    session.notify(NoticeLevel::Error, e.to_string());
    return false;
  }

  match form.stage.as_deref().map(str::trim) {
    None => true,
    Some("") => {
      session.clear_stage();
      true
    }
    Some(raw) => match raw.parse::<Stage>() {
      Ok(stage) => {
        session.select_stage(stage);
        true
      }
      Err(e) => {
        session.notify(NoticeLevel::Error, e.to_string());
        false
      }
    },
  }
}

/// GET / - The editing form
pub async fn show_form(State(state): State<AppState>) -> Html<String> {
  let mut session = state.session.lock().await;

  let snapshots = match state.store.list() {
    Ok(snapshots) => snapshots,
    Err(e) => {
      session.notify(NoticeLevel::Error, format!("Failed to list snapshots: {e}"));
      Vec::new()
    }
  };

  let notices = session.take_notices();
  Html(form_page(session.report(), &notices, &session.stage_notice(), &snapshots))
}

/// POST /form/fields - Apply field edits
pub async fn update_fields(State(state): State<AppState>, Form(form): Form<FieldsForm>) -> Redirect {
  let mut session = state.session.lock().await;
  apply_form(&mut session, &form);
  Redirect::to("/")
}

/// POST /form/stage - Apply field edits and select the clicked stage
pub async fn select_stage(State(state): State<AppState>, Form(form): Form<FieldsForm>) -> Redirect {
  let mut session = state.session.lock().await;
  apply_form(&mut session, &form);
  if form.stage.is_none() {
    session.notify(NoticeLevel::Warning, "Please select a research stage");
  }
  Redirect::to("/")
}

/// POST /form/attachments - Apply the field values posted alongside, then
/// replace attachments with the uploaded batch
pub async fn upload_attachments(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  mut multipart: Multipart,
) -> Redirect {
  let mut accepted = Vec::new();
  let mut problems = Vec::new();
  let mut fields = Map::new();

  loop {
    let field = match multipart.next_field().await {
      Ok(Some(field)) => field,
      Ok(None) => break,
      Err(e) => {
        problems.push(format!("Upload failed: {e}"));
        break;
      }
    };

    let Some(field_name) = field.name().map(str::to_string) else {
      continue;
    };
    if field_name != ATTACHMENTS_FIELD {
      match field.text().await {
        Ok(value) => {
          fields.insert(field_name, Value::String(value));
        }
        Err(e) => problems.push(format!("Reading {field_name} failed: {e}")),
      }
      continue;
    }
    let name = field.file_name().unwrap_or_default().to_string();
    let declared = field.content_type().map(str::to_string);

    let bytes = match field.bytes().await {
      Ok(bytes) => bytes,
      Err(e) => {
        problems.push(format!("Upload of {name} failed: {e}"));
        continue;
      }
    };

    // Browsers send an empty part when no file was chosen
    if name.is_empty() && bytes.is_empty() {
      continue;
    }

    match Attachment::from_bytes(&name, declared.as_deref(), &bytes) {
      Ok(attachment) => accepted.push(attachment),
      Err(e) => problems.push(e.to_string()),
    }
  }

  let count = accepted.len();
  let mut session = state.session.lock().await;
  match serde_json::from_value::<FieldsForm>(Value::Object(fields)) {
    Ok(form) => {
      apply_form(&mut session, &form);
    }
    Err(e) => problems.push(format!("Unreadable form fields: {e}")),
  }
  session.replace_attachments(accepted);

  for problem in &problems {
    context.log_warn(problem, "labnote-form").await;
    session.notify(NoticeLevel::Warning, problem.clone());
  }
  if count > 0 {
    context.log_info(&format!("Attached {count} image(s)"), "labnote-form").await;
    session.notify(NoticeLevel::Success, format!("Attached {count} image(s)"));
  }

  Redirect::to("/")
}

/// POST /form/reset - Discard the current report
pub async fn reset(State(state): State<AppState>, Extension(context): Extension<RequestContext>) -> Redirect {
  let mut session = state.session.lock().await;
  session.reset();
  session.notify(NoticeLevel::Info, "Form reset");
  context.log_info("Form reset", "labnote-form").await;
  Redirect::to("/")
}

/// POST /form/save - Apply field edits and save a snapshot
pub async fn save(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  Form(form): Form<FieldsForm>,
) -> Redirect {
  let mut session = state.session.lock().await;
  if !apply_form(&mut session, &form) {
    session.notify(NoticeLevel::Warning, "Snapshot not saved, fix the fields above first");
    context.log_warn("Snapshot not saved: rejected field values", "labnote-form").await;
    return Redirect::to("/");
  }

  match session.save(&state.store, form.save_name.as_deref().unwrap_or_default()) {
    Some(summary) => context.log_success(&format!("Saved snapshot {}", summary.id), "labnote-form").await,
    None => context.log_error("Failed to save snapshot", "labnote-form").await,
  }
  Redirect::to("/")
}

/// POST /report/print - Apply field edits, then download the printable report
pub async fn print(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  Form(form): Form<FieldsForm>,
) -> Response {
  {
    let mut session = state.session.lock().await;
    if !apply_form(&mut session, &form) {
      return Redirect::to("/").into_response();
    }
  }
  report::printable(&state, &context).await
}

/// POST /report/preview - Apply field edits, then show the printable report
pub async fn preview(State(state): State<AppState>, Form(form): Form<FieldsForm>) -> Response {
  let mut session = state.session.lock().await;
  if !apply_form(&mut session, &form) {
    return Redirect::to("/").into_response();
  }
  Html(render_report(session.report())).into_response()
}

/// POST /form/load - Replace the report with a stored snapshot
pub async fn load(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  Form(form): Form<SnapshotIdForm>,
) -> Redirect {
  let mut session = state.session.lock().await;
  if session.load(&state.store, &form.id) {
    context.log_success(&format!("Loaded snapshot {}", form.id), "labnote-form").await;
  } else {
    context.log_warn(&format!("Failed to load snapshot {}", form.id), "labnote-form").await;
  }
  Redirect::to("/")
}

/// POST /form/delete - Remove a stored snapshot
pub async fn delete(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  Form(form): Form<SnapshotIdForm>,
) -> Redirect {
  let mut session = state.session.lock().await;
  if session.delete(&state.store, &form.id) {
    context.log_success(&format!("Deleted snapshot {}", form.id), "labnote-form").await;
  } else {
    context.log_warn(&format!("Failed to delete snapshot {}", form.id), "labnote-form").await;
  }
  Redirect::to("/")
}
