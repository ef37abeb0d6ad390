mod common;

use axum::{
  body::{to_bytes, Body},
  http::{header, Method, Request, StatusCode},
  Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bentley::activity::ActivityLog;
use labnote::report::Stage;
use labnote::server::routing::create_router;
use labnote::server::state::AppState;
use labnote::snapshot::SnapshotStore;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use common::{sample_report, PNG_BYTES};

struct TestServer {
  _temp: TempDir,
  state: AppState,
}

impl TestServer {
  fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let store = SnapshotStore::new(temp.path().join("snapshots"));
    let activity = ActivityLog::open_with_silent(temp.path().join("logs").join("server.jsonl"), true).unwrap();
    Self { state: AppState::new(store, activity), _temp: temp }
  }

  fn router(&self) -> Router {
    create_router(self.state.clone())
  }

  async fn send(&self, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, String) {
    let response = self.router().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
  }

  async fn get(&self, uri: &str) -> (StatusCode, String) {
    let (status, _, body) = self.send(Request::get(uri).body(Body::empty()).unwrap()).await;
    (status, body)
  }

  async fn post_form(&self, uri: &str, body: &str) -> StatusCode {
    let request = Request::post(uri)
      .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
      .body(Body::from(body.to_string()))
      .unwrap();
    self.send(request).await.0
  }

  async fn json(&self, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
      .method(method)
      .uri(uri)
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap();
    let (status, _, body) = self.send(request).await;
    let value = if body.is_empty() { Value::Null } else { serde_json::from_str(&body).unwrap() };
    (status, value)
  }
}

#[tokio::test]
async fn test_status_reports_healthy() {
  let server = TestServer::new();
  let (status, body) = server.get("/status").await;

  assert_eq!(status, StatusCode::OK);
  let value: Value = serde_json::from_str(&body).unwrap();
  assert_eq!(value["status"], "healthy");
  assert!(value["snapshot_root"].as_str().unwrap().ends_with("snapshots"));
  assert!(value["transaction_id"].is_string());
}

#[tokio::test]
async fn test_form_page_starts_empty() {
  let server = TestServer::new();
  let (status, body) = server.get("/").await;

  assert_eq!(status, StatusCode::OK);
  assert!(body.contains("Please select a research stage"));
  assert!(body.contains("No snapshots saved yet."));
}

#[tokio::test]
async fn test_field_post_updates_session_and_redirects() {
  let server = TestServer::new();
  let status = server
    .post_form("/form/fields", "author_name=Kim&reviewer_name=Park&authored_date=2026-10-18&title=Drainage+catheter")
    .await;

  assert_eq!(status, StatusCode::SEE_OTHER);
  let session = server.state.session.lock().await;
  assert_eq!(session.report().author_name, "Kim");
  assert_eq!(session.report().title, "Drainage catheter");
  assert_eq!(session.report().authored_date_text(), "2026-10-18");
}

#[tokio::test]
async fn test_stage_post_selects_stage_and_shows_banner() {
  let server = TestServer::new();
  let status = server.post_form("/form/stage", "title=Drainage+catheter&stage=E%2FS").await;
  assert_eq!(status, StatusCode::SEE_OTHER);

  assert_eq!(server.state.session.lock().await.report().stage, Some(Stage::EngineeringSample));
  let (_, body) = server.get("/").await;
  assert!(body.contains("Selected research stage: E/S"));
}

#[tokio::test]
async fn test_bad_date_is_shown_once_as_error() {
  let server = TestServer::new();
  server.post_form("/form/fields", "authored_date=yesterday&title=Kept+out").await;

  assert!(server.state.session.lock().await.report().title.is_empty());

  let (_, first) = server.get("/").await;
  assert!(first.contains("notice-error"));
  assert!(first.contains("invalid date"));

  let (_, second) = server.get("/").await;
  assert!(!second.contains("invalid date"));
}

#[tokio::test]
async fn test_form_save_load_and_delete() {
  let server = TestServer::new();
  server.state.session.lock().await.replace_report(sample_report()).unwrap();

  let status = server.post_form("/form/save", "save_name=checkpoint").await;
  assert_eq!(status, StatusCode::SEE_OTHER);

  let snapshots = server.state.store.list().unwrap();
  assert_eq!(snapshots.len(), 1);
  let id = snapshots[0].id.clone();

  let (_, page) = server.get("/").await;
  assert!(page.contains("Saved snapshot 'checkpoint'"));
  assert!(page.contains(&id));

  server.post_form("/form/reset", "").await;
  assert!(server.state.session.lock().await.report().is_empty());

  server.post_form("/form/load", &format!("id={id}")).await;
  assert_eq!(server.state.session.lock().await.report(), &sample_report());

  server.post_form("/form/delete", &format!("id={id}")).await;
  assert!(server.state.store.list().unwrap().is_empty());
  assert_eq!(server.state.session.lock().await.report(), &sample_report());
}

#[tokio::test]
async fn test_multipart_upload_attaches_images() {
  let server = TestServer::new();
  let boundary = "labnote-boundary";
  let mut body = Vec::new();
  for name in ["first.png", "second.png"] {
    body.extend_from_slice(
      format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"attachments\"; filename=\"{name}\"\r\nContent-Type: image/png\r\n\r\n"
      )
      .as_bytes(),
    );
    body.extend_from_slice(PNG_BYTES);
    body.extend_from_slice(b"\r\n");
  }
  body.extend_from_slice(
    format!(
      "--{boundary}\r\nContent-Disposition: form-data; name=\"attachments\"; filename=\"notes.txt\"\r\nContent-Type: text/plain\r\n\r\nhello\r\n--{boundary}--\r\n"
    )
    .as_bytes(),
  );

  let request = Request::post("/form/attachments")
    .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
    .body(Body::from(body))
    .unwrap();
  let (status, _, _) = server.send(request).await;
  assert_eq!(status, StatusCode::SEE_OTHER);

  {
    let session = server.state.session.lock().await;
    let names: Vec<_> = session.report().attachments.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["first.png", "second.png"]);
    assert_eq!(session.report().attachments[0].data, STANDARD.encode(PNG_BYTES));
  }

  let (_, page) = server.get("/").await;
  assert!(page.contains("notice-warning"));
  assert!(page.contains("notes.txt"));
}

#[tokio::test]
async fn test_print_is_a_timestamped_download() {
  let server = TestServer::new();
  server.state.session.lock().await.replace_report(sample_report()).unwrap();

  let (status, headers, body) = server.send(Request::get("/report/print").body(Body::empty()).unwrap()).await;

  assert_eq!(status, StatusCode::OK);
  let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
  assert!(disposition.starts_with("attachment; filename=\"research_note_"));
  assert!(disposition.ends_with(".html\""));
  assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
  assert!(body.contains("1. Research Stage: Pilot"));
}

#[tokio::test]
async fn test_preview_renders_inline() {
  let server = TestServer::new();
  let (status, body) = server.get("/report/preview").await;

  assert_eq!(status, StatusCode::OK);
  assert!(body.contains("<div class=\"header\">Research Note</div>"));
}

#[tokio::test]
async fn test_api_report_put_patch_and_reset() {
  let server = TestServer::new();

  let (status, body) = server.json(Method::PUT, "/api/report", serde_json::to_value(sample_report()).unwrap()).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["report"]["stage"], "Pilot");

  let (status, body) = server.json(Method::PATCH, "/api/report", json!({"goal": "Zero occlusions"})).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["report"]["goal"], "Zero occlusions");
  assert_eq!(body["report"]["author_name"], "Kim");

  let (status, body) = server.json(Method::PATCH, "/api/report", json!({"authored_date": "10/18/2026"})).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["errors"][0]["key"], "report_invalid");

  let (status, body) = server.json(Method::DELETE, "/api/report", json!({})).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["report"]["title"], "");
}

#[tokio::test]
async fn test_api_rejects_incomplete_report_and_bad_attachment() {
  let server = TestServer::new();

  let mut report = serde_json::to_value(sample_report()).unwrap();
  report["attachments"] = json!([{"name": "scan.png", "media_type": "image/png", "data": ""}]);
  let (status, body) = server.json(Method::PUT, "/api/report", report).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["errors"][0]["key"], "report_invalid");

  let (status, body) = server
    .json(Method::POST, "/api/report/attachments", json!({"name": "notes.txt", "data": "aGVsbG8="}))
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["errors"][0]["key"], "attachment_invalid");

  let (status, body) = server
    .json(Method::POST, "/api/report/attachments", json!({"name": "scan.png", "data": STANDARD.encode(PNG_BYTES)}))
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["report"]["attachments"][0]["media_type"], "image/png");
}

#[tokio::test]
async fn test_api_snapshot_lifecycle() {
  let server = TestServer::new();
  server.json(Method::PUT, "/api/report", serde_json::to_value(sample_report()).unwrap()).await;

  let (status, body) = server.json(Method::POST, "/api/snapshots", json!({"save_name": ""})).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["snapshot"]["save_name"], "Drainage catheter");
  let id = body["snapshot"]["id"].as_str().unwrap().to_string();

  let (status, body) = server.json(Method::GET, "/api/snapshots", Value::Null).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["count"], 1);
  assert_eq!(body["snapshots"][0]["author_name"], "Kim");

  let (status, body) = server.json(Method::GET, &format!("/api/snapshots/{id}"), Value::Null).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["snapshot"]["data"]["title"], "Drainage catheter");

  server.json(Method::DELETE, "/api/report", Value::Null).await;
  let (status, body) = server.json(Method::POST, &format!("/api/snapshots/{id}/load"), Value::Null).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["report"]["reviewer_name"], "Park");

  let (status, _) = server.json(Method::DELETE, &format!("/api/snapshots/{id}"), Value::Null).await;
  assert_eq!(status, StatusCode::OK);

  let (status, body) = server.json(Method::GET, &format!("/api/snapshots/{id}"), Value::Null).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["errors"][0]["key"], "snapshot_not_found");
}

#[tokio::test]
async fn test_api_snapshot_errors_map_to_status_codes() {
  let server = TestServer::new();
  std::fs::create_dir_all(server.state.store.root()).unwrap();
  std::fs::write(server.state.store.root().join("broken.json"), "{").unwrap();

  let (status, body) = server.json(Method::GET, "/api/snapshots/broken", Value::Null).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(body["errors"][0]["key"], "snapshot_unreadable");

  let (status, _) = server.json(Method::DELETE, "/api/snapshots/missing", Value::Null).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, body) = server.json(Method::GET, "/api/snapshots", Value::Null).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_logs_record_requests_and_validate_level() {
  let server = TestServer::new();
  server.post_form("/form/reset", "").await;

  let (status, body) = server.get("/logs?level=info").await;
  assert_eq!(status, StatusCode::OK);
  let value: Value = serde_json::from_str(&body).unwrap();
  let logs = value["logs"].as_array().unwrap();
  assert!(logs.iter().any(|entry| entry["message"].as_str().unwrap().contains("Form reset")));
  assert!(logs.iter().all(|entry| entry["level"] == "info"));

  let (status, body) = server.get("/logs?level=loud").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  let value: Value = serde_json::from_str(&body).unwrap();
  assert_eq!(value["errors"][0]["key"], "invalid_level");
}

#[tokio::test]
async fn test_print_applies_posted_fields_first() {
  let server = TestServer::new();
  server.state.session.lock().await.replace_report(sample_report()).unwrap();

  let request = Request::post("/report/print")
    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
    .body(Body::from("title=Typed+but+not+applied&goal=%0AIndented+goal"))
    .unwrap();
  let (status, headers, body) = server.send(request).await;

  assert_eq!(status, StatusCode::OK);
  assert!(headers[header::CONTENT_DISPOSITION].to_str().unwrap().starts_with("attachment;"));
  assert!(body.contains("<div class=\"content\">Typed but not applied</div>"));
  assert_eq!(server.state.session.lock().await.report().goal, "\nIndented goal");
}

#[tokio::test]
async fn test_preview_post_applies_posted_fields() {
  let server = TestServer::new();
  let request = Request::post("/report/preview")
    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
    .body(Body::from("author_name=Kim&stage=Pilot"))
    .unwrap();
  let (status, _, body) = server.send(request).await;

  assert_eq!(status, StatusCode::OK);
  assert!(body.contains("<strong>Author:</strong> Kim"));
  assert!(body.contains("1. Research Stage: Pilot"));
}

#[tokio::test]
async fn test_print_with_bad_date_goes_back_to_form() {
  let server = TestServer::new();
  let status = server.post_form("/report/print", "authored_date=someday").await;

  assert_eq!(status, StatusCode::SEE_OTHER);
  let (_, page) = server.get("/").await;
  assert!(page.contains("invalid date"));
}

#[tokio::test]
async fn test_upload_keeps_fields_posted_with_it() {
  let server = TestServer::new();
  let boundary = "labnote-boundary";
  let mut body = Vec::new();
  body.extend_from_slice(
    format!(
      "--{boundary}\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\nDrainage catheter\r\n\
       --{boundary}\r\nContent-Disposition: form-data; name=\"author_name\"\r\n\r\nKim\r\n\
       --{boundary}\r\nContent-Disposition: form-data; name=\"attachments\"; filename=\"flow.png\"\r\nContent-Type: image/png\r\n\r\n"
    )
    .as_bytes(),
  );
  body.extend_from_slice(PNG_BYTES);
  body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

  let request = Request::post("/form/attachments")
    .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
    .body(Body::from(body))
    .unwrap();
  let (status, _, _) = server.send(request).await;
  assert_eq!(status, StatusCode::SEE_OTHER);

  let session = server.state.session.lock().await;
  assert_eq!(session.report().title, "Drainage catheter");
  assert_eq!(session.report().author_name, "Kim");
  assert_eq!(session.report().attachments.len(), 1);
}

#[tokio::test]
async fn test_save_is_skipped_when_fields_are_rejected() {
  let server = TestServer::new();
  server.state.session.lock().await.replace_report(sample_report()).unwrap();

  let status = server.post_form("/form/save", "authored_date=tomorrow&save_name=draft").await;
  assert_eq!(status, StatusCode::SEE_OTHER);

  assert!(server.state.store.list().unwrap().is_empty());
  let (_, page) = server.get("/").await;
  assert!(page.contains("invalid date"));
  assert!(page.contains("Snapshot not saved"));
  assert!(!page.contains("Saved snapshot 'draft'"));
}

#[tokio::test]
async fn test_stage_can_be_cleared_from_the_form() {
  let server = TestServer::new();
  server.post_form("/form/stage", "stage=Planning").await;
  assert_eq!(server.state.session.lock().await.report().stage, Some(Stage::Planning));

  let status = server.post_form("/form/stage", "stage=").await;
  assert_eq!(status, StatusCode::SEE_OTHER);
  assert_eq!(server.state.session.lock().await.report().stage, None);

  let (_, page) = server.get("/").await;
  assert!(page.contains("Please select a research stage"));
}

#[tokio::test]
async fn test_loading_an_invalid_snapshot_is_unprocessable() {
  let server = TestServer::new();
  server.state.session.lock().await.replace_report(sample_report()).unwrap();
  std::fs::create_dir_all(server.state.store.root()).unwrap();
  std::fs::write(
    server.state.store.root().join("20261018_000000_000_bad.json"),
    r#"{"save_time": "2026-10-18T00:00:00Z", "save_name": "bad", "data": {"attachments": [{"name": "scan.png", "media_type": "image/png", "data": ""}]}}"#,
  )
  .unwrap();

  let (status, _) =
    server.json(Method::POST, "/api/snapshots/20261018_000000_000_bad/load", Value::Null).await;

  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(server.state.session.lock().await.report(), &sample_report());
}
