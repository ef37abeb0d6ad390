//! REST API types with schemars annotations for OpenAPI generation

use axum::{http::StatusCode, response::Json};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::report::Report;
use crate::snapshot::{Snapshot, SnapshotError, SnapshotSummary};

// Base Response Structure
// ======================

/// Base response object for all API endpoints
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct BaseResponse<T> {
  /// API versioning information
  pub versioning: VersionInfo,

  /// Transaction ID for logging correlation
  pub transaction_id: Uuid,

  /// Optional error information
  #[serde(skip_serializing_if = "Vec::is_empty", default)]
  pub errors: Vec<ApiError>,

  /// Response data (generic for different endpoint types)
  #[serde(flatten)]
  pub data: T,
}

/// API versioning information
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct VersionInfo {
  pub latest: String,
  pub requested: String,
  pub resolved: String,
}

/// API error information
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ApiError {
  /// Error key, unique to the error source
  pub key: String,

  /// Human readable error message
  pub message: String,
}

/// Error half of every handler result
pub type ApiFailure = (StatusCode, Json<BaseResponse<()>>);

/// Result type returned by JSON handlers
pub type ApiResult<T> = Result<Json<BaseResponse<T>>, ApiFailure>;

// Status/Version Endpoints
// =======================

/// Response for /status endpoint
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StatusResponse {
  pub status: String,
  /// Directory snapshots are read from and written to
  pub snapshot_root: String,
  pub version: String,
}

/// Response for /version endpoint
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct VersionResponse {
  pub version: String,
}

// Report Endpoints
// ================

/// The report currently held by the session
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ReportResponse {
  pub report: Report,
}

/// Request for POST /api/report/attachments
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AddAttachmentRequest {
  /// File name, must carry an image extension
  pub name: String,

  /// Declared MIME type; derived from the extension when absent
  #[serde(default)]
  pub media_type: Option<String>,

  /// Base64 file content
  pub data: String,
}

// Snapshot Endpoints
// ==================

/// Request for POST /api/snapshots
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct SaveSnapshotRequest {
  /// Name to save under; the report title is used when blank
  #[serde(default)]
  pub save_name: String,
}

/// Response for endpoints producing one snapshot's metadata
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SnapshotSummaryResponse {
  pub snapshot: SnapshotSummary,
}

/// Response for GET /api/snapshots
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListSnapshotsResponse {
  pub snapshots: Vec<SnapshotSummary>,
  pub count: usize,
}

/// Response for GET /api/snapshots/{id}
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SnapshotResponse {
  pub id: String,
  pub snapshot: Snapshot,
}

// Logs Endpoint
// =============

/// Query for /logs
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct LogsQuery {
  /// Maximum number of entries, newest kept
  pub limit: Option<usize>,
  /// Level filter (info, success, warn, error); `all` or absent for everything
  pub level: Option<String>,
}

/// Response for /logs
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct LogsResponse {
  pub logs: Vec<bentley::activity::ActivityEntry>,
}

// Helper Functions
// ================

fn version_info() -> VersionInfo {
  let version = env!("CARGO_PKG_VERSION");
  VersionInfo { latest: version.to_string(), requested: version.to_string(), resolved: version.to_string() }
}

impl<T> BaseResponse<T> {
  /// Create a successful response
  pub fn success(data: T, transaction_id: Uuid) -> Self {
    Self { versioning: version_info(), transaction_id, errors: Vec::new(), data }
  }

  /// Create an error response
  pub fn error(errors: Vec<ApiError>, transaction_id: Uuid) -> BaseResponse<()> {
    BaseResponse { versioning: version_info(), transaction_id, errors, data: () }
  }
}

impl ApiError {
  pub fn new(key: &str, message: &str) -> Self {
    Self { key: key.to_string(), message: message.to_string() }
  }
}

/// Build the error half of a handler result
pub fn failure(status: StatusCode, key: &str, message: &str, transaction_id: Uuid) -> ApiFailure {
  (status, Json(BaseResponse::<()>::error(vec![ApiError::new(key, message)], transaction_id)))
}

/// Status code and error key for a snapshot store failure
pub fn snapshot_error_status(error: &SnapshotError) -> (StatusCode, &'static str) {
  match error {
    SnapshotError::NotFound(_) => (StatusCode::NOT_FOUND, "snapshot_not_found"),
    SnapshotError::InvalidId(_) => (StatusCode::BAD_REQUEST, "snapshot_invalid_id"),
    SnapshotError::Invalid(_) => (StatusCode::BAD_REQUEST, "report_invalid"),
    SnapshotError::Unreadable { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "snapshot_unreadable"),
    SnapshotError::Io { .. } | SnapshotError::Serialize(_) | SnapshotError::NoHome => {
      (StatusCode::INTERNAL_SERVER_ERROR, "snapshot_io_failed")
    }
  }
}

/// Failure response for a snapshot store error
pub fn snapshot_failure(error: &SnapshotError, transaction_id: Uuid) -> ApiFailure {
  let (status, key) = snapshot_error_status(error);
  failure(status, key, &error.to_string(), transaction_id)
}
