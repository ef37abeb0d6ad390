//! Snapshot endpoint handlers

use axum::{
  extract::{Extension, Json, Path, State},
  http::StatusCode,
  response::Json as ResponseJson,
};
use uuid::Uuid;

use crate::server::middleware::RequestContext;
use crate::server::state::AppState;
use crate::server::types::{
  failure, snapshot_failure, ApiResult, BaseResponse, ListSnapshotsResponse, ReportResponse, SaveSnapshotRequest,
  SnapshotResponse, SnapshotSummaryResponse,
};

/// GET /api/snapshots - All snapshots, newest first
pub async fn list_snapshots(State(state): State<AppState>) -> ApiResult<ListSnapshotsResponse> {
  let transaction_id = Uuid::new_v4();

  match state.store.list() {
    Ok(snapshots) => {
      let count = snapshots.len();
      Ok(ResponseJson(BaseResponse::success(ListSnapshotsResponse { snapshots, count }, transaction_id)))
    }
    Err(e) => Err(snapshot_failure(&e, transaction_id)),
  }
}

/// POST /api/snapshots - Save the session report
pub async fn save_snapshot(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  Json(request): Json<SaveSnapshotRequest>,
) -> ApiResult<SnapshotSummaryResponse> {
  let transaction_id = Uuid::new_v4();

  let saved = {
    let session = state.session.lock().await;
    state.store.persist(&request.save_name, session.report())
  };

  match saved {
    Ok(snapshot) => {
      context.log_success(&format!("Saved snapshot {}", snapshot.id), "labnote-snapshots").await;
      Ok(ResponseJson(BaseResponse::success(SnapshotSummaryResponse { snapshot }, transaction_id)))
    }
    Err(e) => {
      context.log_error(&format!("Failed to save snapshot: {e}"), "labnote-snapshots").await;
      Err(snapshot_failure(&e, transaction_id))
    }
  }
}

/// GET /api/snapshots/{id} - Full snapshot content
pub async fn get_snapshot(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<SnapshotResponse> {
  let transaction_id = Uuid::new_v4();

  match state.store.load(&id) {
    Ok(snapshot) => Ok(ResponseJson(BaseResponse::success(SnapshotResponse { id, snapshot }, transaction_id))),
    Err(e) => Err(snapshot_failure(&e, transaction_id)),
  }
}

/// DELETE /api/snapshots/{id} - Remove a snapshot
pub async fn delete_snapshot(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  Path(id): Path<String>,
) -> ApiResult<()> {
  let transaction_id = Uuid::new_v4();

  match state.store.delete(&id) {
    Ok(()) => {
      context.log_success(&format!("Deleted snapshot {id}"), "labnote-snapshots").await;
      Ok(ResponseJson(BaseResponse::success((), transaction_id)))
    }
    Err(e) => {
      context.log_warn(&format!("Failed to delete snapshot {id}: {e}"), "labnote-snapshots").await;
      Err(snapshot_failure(&e, transaction_id))
    }
  }
}

/// POST /api/snapshots/{id}/load - Replace the session report with a snapshot
pub async fn load_snapshot(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  Path(id): Path<String>,
) -> ApiResult<ReportResponse> {
  let transaction_id = Uuid::new_v4();

  let report = match state.store.load_report(&id) {
    Ok(report) => report,
    Err(e) => {
      context.log_warn(&format!("Failed to load snapshot {id}: {e}"), "labnote-snapshots").await;
      return Err(snapshot_failure(&e, transaction_id));
    }
  };

  let mut session = state.session.lock().await;
  if let Err(e) = session.replace_report(report) {
    context.log_warn(&format!("Snapshot {id} holds an invalid report: {e}"), "labnote-snapshots").await;
    return Err(failure(StatusCode::UNPROCESSABLE_ENTITY, "report_invalid", &e.to_string(), transaction_id));
  }
  context.log_success(&format!("Loaded snapshot {id}"), "labnote-snapshots").await;

  Ok(ResponseJson(BaseResponse::success(ReportResponse { report: session.report().clone() }, transaction_id)))
}
