//! Axum router configuration for all endpoints

use axum::{
  extract::DefaultBodyLimit,
  middleware,
  routing::{get, post},
  Router,
};

use crate::server::handlers::{form, logs, report, snapshots, status};
use crate::server::middleware::request_context_middleware;
use crate::server::state::AppState;

/// Upload limit for image batches
pub const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
  Router::new()
    // Form pages
    .route("/", get(form::show_form))
    .route("/form/fields", post(form::update_fields))
    .route("/form/stage", post(form::select_stage))
    .route("/form/attachments", post(form::upload_attachments))
    .route("/form/reset", post(form::reset))
    .route("/form/save", post(form::save))
    .route("/form/load", post(form::load))
    .route("/form/delete", post(form::delete))
    // Printable report
    .route("/report/preview", get(report::preview).post(form::preview))
    .route("/report/print", get(report::print).post(form::print))
    // Status and logs
    .route("/status", get(status::status))
    .route("/version", get(status::version))
    .route("/logs", get(logs::get_logs))
    // JSON API
    .route(
      "/api/report",
      get(report::get_report).put(report::put_report).patch(report::patch_report).delete(report::reset_report),
    )
    .route("/api/report/attachments", post(report::add_attachment))
    .route("/api/snapshots", get(snapshots::list_snapshots).post(snapshots::save_snapshot))
    .route("/api/snapshots/{id}", get(snapshots::get_snapshot).delete(snapshots::delete_snapshot))
    .route("/api/snapshots/{id}/load", post(snapshots::load_snapshot))
    .layer(middleware::from_fn_with_state(state.clone(), request_context_middleware))
    .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
    .with_state(state)
}
