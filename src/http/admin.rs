//! Audit log reads and data-URI image upload.

use axum::extract::State;
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use super::auth::AdminSession;
use super::AppState;
use crate::db::LogEntry;
use crate::{Result, ShopError};

/// Most recent 100 entries, oldest first.
pub async fn logs(State(state): State<AppState>, _admin: AdminSession) -> Json<Vec<LogEntry>> {
    let doc = state.db.read().await;
    Json(doc.recent_logs().to_vec())
}

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    #[serde(rename = "imageData")]
    pub image_data: String,
    #[serde(default)]
    pub filename: Option<String>,
}

/// Accepts an embedded `data:image/<ext>;base64,...` payload and writes it
/// under the public uploads directory as `<timestamp>-<name>.<ext>`.
pub async fn upload_image(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(req): Json<UploadRequest>,
) -> Result<Json<serde_json::Value>> {
    let (ext, bytes) = decode_image_data_uri(&req.image_data)?;
    let name = req
        .filename
        .as_deref()
        .map(sanitize_filename)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let unique = format!("{}-{}.{}", Utc::now().timestamp_millis(), name, ext);

    tokio::fs::create_dir_all(&state.config.upload_dir).await?;
    tokio::fs::write(state.config.upload_dir.join(&unique), &bytes).await?;

    state
        .db
        .log("image_upload", serde_json::json!({ "filename": unique, "size": bytes.len() }))
        .await;

    Ok(Json(serde_json::json!({
        "success": true,
        "imageUrl": format!("/uploads/{unique}"),
        "filename": unique,
    })))
}

/// Split a `data:image/<ext>;base64,<payload>` URI into extension and bytes.
/// Only the declared MIME prefix is checked; the payload itself is not
/// inspected further.
fn decode_image_data_uri(data: &str) -> Result<(String, Vec<u8>)> {
    let rest = data
        .strip_prefix("data:image/")
        .ok_or_else(|| ShopError::Validation("invalid image payload".into()))?;
    let (ext, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| ShopError::Validation("invalid image format".into()))?;
    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ShopError::Validation("invalid image format".into()));
    }
    let bytes = BASE64
        .decode(payload.trim().as_bytes())
        .map_err(|_| ShopError::Validation("invalid base64 image data".into()))?;
    Ok((ext.to_string(), bytes))
}

/// Keep uploaded names to a safe charset; path separators never reach disk.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect()
}
