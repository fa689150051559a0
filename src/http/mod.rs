//! HTTP surface: admin auth, product/order CRUD, logs, uploads, and the
//! catalog mirror routes.

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod orders;
pub mod products;

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::catalog::CatalogStore;
use crate::db::FileDb;
use crate::Config;

/// Explicit application context passed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: FileDb,
    pub catalog: Arc<dyn CatalogStore>,
    pub config: Arc<Config>,
    pub started: Instant,
}

pub fn router(state: AppState) -> Router {
    let uploads = ServeDir::new(&state.config.upload_dir);
    Router::new()
        .route("/api/health", get(health))
        .route("/api/admin/login", post(auth::login))
        .route("/api/admin/logout", post(auth::logout))
        .route("/api/products", get(products::list).post(products::create))
        .route("/api/products/:id", put(products::update).delete(products::remove))
        .route("/api/orders", get(orders::list).post(orders::create))
        .route("/api/orders/:id", put(orders::update))
        .route("/api/logs", get(admin::logs))
        .route("/api/upload-image", post(admin::upload_image))
        // Catalog mirror surface (revision-guarded bulk replace).
        .route("/products", get(catalog::fetch).post(catalog::replace))
        .nest_service("/uploads", uploads)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now(),
        "uptime": state.started.elapsed().as_secs_f64(),
    }))
}
