#![allow(dead_code)]

use labnote::attachment::Attachment;
use labnote::report::{Report, Stage};

pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0x0d];
pub const GIF_BYTES: &[u8] = b"GIF89a\x01\x00\x01\x00";

/// The example note used across tests
pub fn sample_report() -> Report {
  Report {
    author_name: "Kim".to_string(),
    reviewer_name: "Park".to_string(),
    authored_date: labnote::report::parse_date("2026-10-18").unwrap(),
    stage: Some(Stage::Pilot),
    title: "Drainage catheter".to_string(),
    goal: "Reduce occlusion rate below 2%".to_string(),
    materials: "Silicone tubing, 12Fr".to_string(),
    test_method: "Flow test at 37°C for 72 hours".to_string(),
    key_issues: "Kinking at the side holes".to_string(),
    resolution_plan: "Reinforce with a coil".to_string(),
    future_plan: "Pilot lot in November".to_string(),
    attachments: Vec::new(),
  }
}

pub fn png(name: &str) -> Attachment {
  Attachment::from_bytes(name, Some("image/png"), PNG_BYTES).unwrap()
}

pub fn gif(name: &str) -> Attachment {
  Attachment::from_bytes(name, None, GIF_BYTES).unwrap()
}
