//! Catalog mirror surface: bulk read and revision-guarded bulk replace.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use super::AppState;
use crate::domain::Product;
use crate::Result;

pub async fn fetch(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let (products, _) = state.catalog.fetch().await?;
    Ok(Json(products))
}

#[derive(Debug, Deserialize)]
pub struct ReplaceRequest {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default = "default_message")]
    pub message: String,
}

fn default_message() -> String {
    "Update products".to_string()
}

/// Fetch the current revision and replace carrying it as the precondition.
/// A writer racing past us between the fetch and the replace surfaces as a
/// conflict instead of a silent overwrite.
pub async fn replace(
    State(state): State<AppState>,
    Json(req): Json<ReplaceRequest>,
) -> Result<Json<serde_json::Value>> {
    let (_, base) = state.catalog.fetch().await?;
    let revision = state.catalog.replace(req.products, base.as_ref(), &req.message).await?;
    Ok(Json(serde_json::json!({ "success": true, "commit": revision.as_str() })))
}
