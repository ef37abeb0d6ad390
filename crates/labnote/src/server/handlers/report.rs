//! Report handlers: printable output and the JSON view of the session report

use axum::{
  extract::{Extension, Json, State},
  http::{header, StatusCode},
  response::{Html, IntoResponse, Json as ResponseJson, Response},
};
use chrono::Local;
use uuid::Uuid;

use crate::attachment::Attachment;
use crate::render::{print_file_name, render_report};
use crate::report::{Report, ReportUpdate};
use crate::server::middleware::RequestContext;
use crate::server::state::AppState;
use crate::server::types::{failure, AddAttachmentRequest, ApiResult, BaseResponse, ReportResponse};

/// GET /report/preview - Rendered report shown inline
pub async fn preview(State(state): State<AppState>) -> Html<String> {
  let session = state.session.lock().await;
  Html(render_report(session.report()))
}

/// GET /report/print - Rendered report as a timestamped download
pub async fn print(State(state): State<AppState>, Extension(context): Extension<RequestContext>) -> Response {
  printable(&state, &context).await
}

/// Download response for the current session report
pub(crate) async fn printable(state: &AppState, context: &RequestContext) -> Response {
  let html = {
    let session = state.session.lock().await;
    render_report(session.report())
  };
  let file_name = print_file_name(&Local::now());

  context.log_success(&format!("Generated printable report {file_name}"), "labnote-print").await;

  (
    [
      (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
      (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{file_name}\"")),
    ],
    html,
  )
    .into_response()
}

fn report_response(report: &Report, transaction_id: Uuid) -> ResponseJson<BaseResponse<ReportResponse>> {
  ResponseJson(BaseResponse::success(ReportResponse { report: report.clone() }, transaction_id))
}

/// GET /api/report - Current session report
pub async fn get_report(State(state): State<AppState>) -> ApiResult<ReportResponse> {
  let session = state.session.lock().await;
  Ok(report_response(session.report(), Uuid::new_v4()))
}

/// PUT /api/report - Replace the session report
pub async fn put_report(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  Json(report): Json<Report>,
) -> ApiResult<ReportResponse> {
  let transaction_id = Uuid::new_v4();
  let mut session = state.session.lock().await;

  match session.replace_report(report) {
    Ok(()) => {
      context.log_info("Replaced session report", "labnote-api").await;
      Ok(report_response(session.report(), transaction_id))
    }
    Err(e) => Err(failure(StatusCode::BAD_REQUEST, "report_invalid", &e.to_string(), transaction_id)),
  }
}

/// PATCH /api/report - Apply a partial edit
pub async fn patch_report(
  State(state): State<AppState>,
  Json(update): Json<ReportUpdate>,
) -> ApiResult<ReportResponse> {
  let transaction_id = Uuid::new_v4();
  let mut session = state.session.lock().await;

  match session.apply(update) {
    Ok(()) => Ok(report_response(session.report(), transaction_id)),
    Err(e) => Err(failure(StatusCode::BAD_REQUEST, "report_invalid", &e.to_string(), transaction_id)),
  }
}

/// DELETE /api/report - Reset to an empty report
pub async fn reset_report(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
) -> ApiResult<ReportResponse> {
  let mut session = state.session.lock().await;
  session.reset();
  context.log_info("Reset session report", "labnote-api").await;
  Ok(report_response(session.report(), Uuid::new_v4()))
}

/// POST /api/report/attachments - Append one base64 image
pub async fn add_attachment(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  Json(request): Json<AddAttachmentRequest>,
) -> ApiResult<ReportResponse> {
  let transaction_id = Uuid::new_v4();

  let attachment = match Attachment::from_base64(&request.name, request.media_type.as_deref(), &request.data) {
    Ok(attachment) => attachment,
    Err(e) => {
      context.log_warn(&format!("Rejected attachment: {e}"), "labnote-api").await;
      return Err(failure(StatusCode::BAD_REQUEST, "attachment_invalid", &e.to_string(), transaction_id));
    }
  };

  let mut session = state.session.lock().await;
  session.push_attachment(attachment);
  Ok(report_response(session.report(), transaction_id))
}
