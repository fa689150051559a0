//! Admin product CRUD over the database file.

use axum::extract::{Path, State};
use axum::Json;

use super::auth::AdminSession;
use super::AppState;
use crate::domain::{NewProduct, Product, ProductPatch};
use crate::{Result, ShopError};

/// Public catalog listing. Only admin-added records are visible here; items
/// seeded by other paths are deliberately filtered out.
pub async fn list(State(state): State<AppState>) -> Json<Vec<Product>> {
    let doc = state.db.read().await;
    let products: Vec<Product> =
        doc.products.into_iter().filter(|p| p.added_by_admin).collect();
    Json(products)
}

pub async fn create(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(req): Json<NewProduct>,
) -> Result<Json<serde_json::Value>> {
    let product = req.into_product();
    let mut doc = state.db.read().await;
    doc.products.push(product.clone());
    doc.append_log(
        "product_created",
        serde_json::json!({ "id": product.id, "title": product.title }),
    );
    state.db.write(&doc).await?;
    Ok(Json(serde_json::json!({ "success": true, "product": product })))
}

pub async fn update(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<serde_json::Value>> {
    let mut doc = state.db.read().await;
    let product = doc
        .products
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or(ShopError::NotFound("product"))?;
    patch.apply(product);
    let updated = product.clone();
    doc.append_log("product_updated", serde_json::json!({ "id": id }));
    state.db.write(&doc).await?;
    Ok(Json(serde_json::json!({ "success": true, "product": updated })))
}

pub async fn remove(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let mut doc = state.db.read().await;
    let idx = doc
        .products
        .iter()
        .position(|p| p.id == id)
        .ok_or(ShopError::NotFound("product"))?;
    let removed = doc.products.remove(idx);
    doc.append_log(
        "product_deleted",
        serde_json::json!({ "id": id, "title": removed.title }),
    );
    state.db.write(&doc).await?;
    Ok(Json(serde_json::json!({ "success": true, "message": "product deleted" })))
}
