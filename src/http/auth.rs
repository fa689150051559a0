//! Admin login/logout and the session extractor guarding mutating routes.

use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::Json;
use serde::Deserialize;

use super::AppState;
use crate::db::Session;
use crate::{Result, ShopError};

/// Header carrying the opaque session token on every admin request.
pub const SESSION_HEADER: &str = "x-session-id";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Check the single configured credential pair and mint a 24h session.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>> {
    if req.username != state.config.admin_username || req.password != state.config.admin_password {
        return Err(ShopError::Unauthorized("invalid credentials".into()));
    }
    let (token, session) = Session::mint(&req.username);
    let mut doc = state.db.read().await;
    doc.sessions.insert(token.clone(), session);
    doc.append_log("admin_login", serde_json::json!({ "username": req.username }));
    state.db.write(&doc).await?;
    Ok(Json(serde_json::json!({ "success": true, "sessionId": token })))
}

/// Invalidate the presented session.
pub async fn logout(
    State(state): State<AppState>,
    admin: AdminSession,
) -> Result<Json<serde_json::Value>> {
    let mut doc = state.db.read().await;
    doc.sessions.remove(&admin.token);
    state.db.write(&doc).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Extractor proving a valid, unexpired admin session. Rejection happens
/// before the handler runs, so a failed check never touches the database.
pub struct AdminSession {
    pub token: String,
    pub username: String,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ShopError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let token = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ShopError::Unauthorized("session required".into()))?;
        let doc = state.db.read().await;
        match doc.sessions.get(token) {
            Some(session) if !session.is_expired() => Ok(Self {
                token: token.to_string(),
                username: session.username.clone(),
            }),
            _ => Err(ShopError::Unauthorized("session expired".into())),
        }
    }
}
