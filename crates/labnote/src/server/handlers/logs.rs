//! Activity log endpoint

use axum::{
  extract::{Query, State},
  http::StatusCode,
  response::Json,
};
use bentley::Level;
use uuid::Uuid;

use crate::server::state::AppState;
use crate::server::types::{failure, ApiResult, BaseResponse, LogsQuery, LogsResponse};

/// GET /logs - Recent activity log entries
pub async fn get_logs(State(state): State<AppState>, Query(query): Query<LogsQuery>) -> ApiResult<LogsResponse> {
  let transaction_id = Uuid::new_v4();

  let level = match query.level.as_deref() {
    None | Some("all") => None,
    Some(raw) => match raw.parse::<Level>() {
      Ok(level) => Some(level),
      Err(e) => return Err(failure(StatusCode::BAD_REQUEST, "invalid_level", &e, transaction_id)),
    },
  };

  match state.activity.entries(query.limit, level).await {
    Ok(logs) => Ok(Json(BaseResponse::success(LogsResponse { logs }, transaction_id))),
    Err(e) => Err(failure(
      StatusCode::INTERNAL_SERVER_ERROR,
      "logs_unavailable",
      &format!("Failed to read activity log: {e}"),
      transaction_id,
    )),
  }
}
