//! Request context and middleware for the labnote server
//!
//! Every request gets a [`RequestContext`] carrying a request id and the
//! activity log, inserted as a request extension for the handlers.

use axum::{
  extract::{Request, State},
  http::{Method, Uri},
  middleware::Next,
  response::Response,
};
use bentley::activity::{ActivityContext, ActivityLog};
use bentley::Level;
use std::time::Instant;
use uuid::Uuid;

use crate::server::state::AppState;

/// Request context containing logger and request metadata
#[derive(Clone)]
pub struct RequestContext {
  pub request_id: Uuid,
  pub method: Method,
  pub uri: Uri,
  pub activity: ActivityLog,
}

impl RequestContext {
  pub fn new(method: Method, uri: Uri, activity: ActivityLog) -> Self {
    Self { request_id: Uuid::new_v4(), method, uri, activity }
  }

  fn context(&self, status_code: Option<u16>, duration_ms: Option<f64>) -> ActivityContext {
    ActivityContext {
      request_id: Some(self.request_id.to_string()),
      method: Some(self.method.to_string()),
      path: Some(self.uri.path().to_string()),
      status_code,
      duration_ms,
    }
  }

  async fn record(&self, level: Level, message: &str, component: &str, context: ActivityContext) {
    let message = format!("[{}] {} {} - {}", self.request_id, self.method, self.uri.path(), message);
    if let Err(e) = self.activity.record(level, &message, component, Some(context)).await {
      tracing::warn!(error = %e, "failed to write activity log");
    }
  }

  pub async fn log_info(&self, message: &str, component: &str) {
    self.record(Level::Info, message, component, self.context(None, None)).await;
  }

  pub async fn log_success(&self, message: &str, component: &str) {
    self.record(Level::Success, message, component, self.context(None, None)).await;
  }

  pub async fn log_warn(&self, message: &str, component: &str) {
    self.record(Level::Warn, message, component, self.context(None, None)).await;
  }

  pub async fn log_error(&self, message: &str, component: &str) {
    self.record(Level::Error, message, component, self.context(None, None)).await;
  }

  /// Record the request outcome with status and duration
  pub async fn log_request_complete(&self, status_code: u16, duration_ms: f64) {
    let level = if status_code >= 500 { Level::Error } else { Level::Verbose };
    self
      .record(level, "Request completed", "http-request", self.context(Some(status_code), Some(duration_ms)))
      .await;
  }
}

/// Middleware to inject RequestContext into all requests
pub async fn request_context_middleware(
  State(state): State<AppState>,
  mut request: Request,
  next: Next,
) -> Response {
  let context = RequestContext::new(request.method().clone(), request.uri().clone(), state.activity.clone());

  let start_time = Instant::now();
  request.extensions_mut().insert(context.clone());

  let response = next.run(request).await;

  let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
  context.log_request_complete(response.status().as_u16(), duration_ms).await;

  response
}
