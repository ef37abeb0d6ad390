//! Image attachments stored inline as base64

use base64::{engine::general_purpose::STANDARD, Engine as _};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Image extensions accepted by the upload control
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "bmp"];

#[derive(Debug, Error)]
pub enum AttachmentError {
  #[error("attachment has no file name")]
  EmptyName,

  #[error("attachment {0} is empty")]
  EmptyContent(String),

  #[error("{0} is not a supported image (png, jpg, jpeg, gif, bmp)")]
  UnsupportedType(String),

  #[error("attachment {name} is not valid base64: {source}")]
  InvalidBase64 {
    name: String,
    #[source]
    source: base64::DecodeError,
  },

  #[error("failed to read attachment {path}: {source}")]
  Read {
    path: String,
    #[source]
    source: std::io::Error,
  },
}

/// One attached image. `data` is the base64 text of the file content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Attachment {
  pub name: String,
  #[serde(alias = "type")]
  pub media_type: String,
  pub data: String,
}

/// MIME type for an accepted image file name
pub fn media_type_for(name: &str) -> Option<&'static str> {
  let extension = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
  match extension.as_str() {
    "png" => Some("image/png"),
    "jpg" | "jpeg" => Some("image/jpeg"),
    "gif" => Some("image/gif"),
    "bmp" => Some("image/bmp"),
    _ => None,
  }
}

/// Last path component of an uploaded name, trimmed
fn base_name(name: &str) -> String {
  let trimmed = name.trim();
  trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed).trim().to_string()
}

/// Declared type when it is an image type, otherwise the extension's type
fn resolve_media_type(name: &str, declared: Option<&str>) -> Result<String, AttachmentError> {
  let by_extension = media_type_for(name).ok_or_else(|| AttachmentError::UnsupportedType(name.to_string()))?;

  let declared = declared.map(str::trim).filter(|declared| declared.starts_with("image/"));
  Ok(declared.unwrap_or(by_extension).to_string())
}

impl Attachment {
  /// Build an attachment from raw upload bytes
  pub fn from_bytes(name: &str, declared_type: Option<&str>, bytes: &[u8]) -> Result<Self, AttachmentError> {
    let name = base_name(name);
    if name.is_empty() {
      return Err(AttachmentError::EmptyName);
    }
    let media_type = resolve_media_type(&name, declared_type)?;
    if bytes.is_empty() {
      return Err(AttachmentError::EmptyContent(name));
    }

    Ok(Self { data: STANDARD.encode(bytes), name, media_type })
  }

  /// Build an attachment from content that is already base64 encoded
  pub fn from_base64(name: &str, declared_type: Option<&str>, data: &str) -> Result<Self, AttachmentError> {
    let data = data.trim();
    let bytes = STANDARD
      .decode(data)
      .map_err(|source| AttachmentError::InvalidBase64 { name: base_name(name), source })?;
    Self::from_bytes(name, declared_type, &bytes)
  }

  /// Read an image file from disk
  pub fn from_path(path: &Path) -> Result<Self, AttachmentError> {
    let bytes = std::fs::read(path)
      .map_err(|source| AttachmentError::Read { path: path.display().to_string(), source })?;
    let name = path.file_name().map(|name| name.to_string_lossy().to_string()).unwrap_or_default();
    Self::from_bytes(&name, None, &bytes)
  }

  /// Original file content
  pub fn decode(&self) -> Result<Vec<u8>, AttachmentError> {
    STANDARD
      .decode(&self.data)
      .map_err(|source| AttachmentError::InvalidBase64 { name: self.name.clone(), source })
  }

  /// `data:` URI for an `<img src>`
  pub fn data_uri(&self) -> String {
    format!("data:{};base64,{}", self.media_type, self.data)
  }
}
