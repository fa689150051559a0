//! Order intake (public) and admin order management.

use axum::extract::{Path, State};
use axum::Json;

use super::auth::AdminSession;
use super::AppState;
use crate::domain::{NewOrder, Order, OrderPatch};
use crate::{Result, ShopError};

pub async fn list(State(state): State<AppState>, _admin: AdminSession) -> Json<Vec<Order>> {
    Json(state.db.read().await.orders)
}

/// Public intake: the storefront posts here on checkout.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<NewOrder>,
) -> Result<Json<serde_json::Value>> {
    req.validate()?;
    let order = req.into_order();
    let mut doc = state.db.read().await;
    doc.orders.push(order.clone());
    doc.append_log(
        "order_created",
        serde_json::json!({ "id": order.id, "total": order.total }),
    );
    state.db.write(&doc).await?;
    Ok(Json(serde_json::json!({ "success": true, "order": order })))
}

pub async fn update(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    Json(patch): Json<OrderPatch>,
) -> Result<Json<serde_json::Value>> {
    let status = patch.status.clone();
    let mut doc = state.db.read().await;
    let order = doc
        .orders
        .iter_mut()
        .find(|o| o.id == id)
        .ok_or(ShopError::NotFound("order"))?;
    patch.apply(order);
    let updated = order.clone();
    doc.append_log("order_updated", serde_json::json!({ "id": id, "status": status }));
    state.db.write(&doc).await?;
    Ok(Json(serde_json::json!({ "success": true, "order": updated })))
}
