//! End-to-end tests against a real server bound to an ephemeral port, backed
//! by a throwaway database file.

use std::sync::Arc;
use std::time::Instant;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use tempfile::TempDir;

use shoplite::catalog::FileCatalog;
use shoplite::client::{AdminApi, ContactForm, Storefront, SubmitOutcome};
use shoplite::config::{Config, GithubConfig};
use shoplite::db::{FileDb, Session};
use shoplite::domain::{NewProduct, OrderPatch, ProductPatch};
use shoplite::http::{self, AppState};

struct TestApp {
    base_url: String,
    db: FileDb,
    // Held so the database and uploads directories outlive the test.
    _dir: TempDir,
}

async fn spawn_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        port: 0,
        database_file: dir.path().join("database.json"),
        upload_dir: dir.path().join("uploads"),
        admin_username: "admin".into(),
        admin_password: "admin123".into(),
        github: None::<GithubConfig>,
    };
    let db = FileDb::open(&config.database_file);
    let state = AppState {
        db: db.clone(),
        catalog: Arc::new(FileCatalog::new(db.clone())),
        config: Arc::new(config),
        started: Instant::now(),
    };
    let app = http::router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    TestApp { base_url: format!("http://{addr}"), db, _dir: dir }
}

async fn admin(app: &TestApp) -> AdminApi {
    let api = AdminApi::new(vec![app.base_url.clone()]).unwrap();
    api.login("admin", "admin123").await.unwrap();
    api
}

fn new_product(title: &str) -> NewProduct {
    NewProduct {
        title: title.into(),
        category: "Controllers".into(),
        price: Decimal::new(5999, 2),
        image: "pad.png".into(),
        description: "test product".into(),
        poster: None,
        stock: Some(3),
    }
}

#[tokio::test]
async fn test_health() {
    let app = spawn_app().await;
    let res = reqwest::get(format!("{}/api/health", app.base_url)).await.unwrap();
    assert!(res.status().is_success());
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_product_crud_lifecycle() {
    let app = spawn_app().await;
    let api = admin(&app).await;

    let created = api.create_product(&new_product("Pro Controller")).await.unwrap();
    assert!(!created.id.is_empty());
    assert!(created.added_by_admin);
    assert!(created.created_at.is_some());

    let patch = ProductPatch { price: Some(Decimal::new(4999, 2)), ..Default::default() };
    let updated = api.update_product(&created.id, &patch).await.unwrap();
    assert_eq!(updated.price, Decimal::new(4999, 2));
    assert_eq!(updated.title, "Pro Controller");
    assert!(updated.updated_at.is_some());

    let listed = api.products().await.unwrap();
    assert_eq!(listed.len(), 1);

    api.delete_product(&created.id).await.unwrap();
    assert!(api.products().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_product_is_404() {
    let app = spawn_app().await;
    let api = admin(&app).await;
    let client = reqwest::Client::new();
    let res = client
        .delete(format!("{}/api/products/no-such-id", app.base_url))
        .header("x-session-id", api.session_id().unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 404);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "product not found");
}

#[tokio::test]
async fn test_listing_hides_non_admin_products() {
    let app = spawn_app().await;
    let api = admin(&app).await;
    api.create_product(&new_product("Visible")).await.unwrap();

    // Seed a record through the mirror surface without the admin tag.
    let client = reqwest::Client::new();
    let listed = api.products().await.unwrap();
    let mut mirrored: Vec<serde_json::Value> =
        listed.iter().map(|p| serde_json::to_value(p).unwrap()).collect();
    mirrored.push(serde_json::json!({ "id": "seed-1", "title": "Hidden", "price": 1.0 }));
    let res = client
        .post(format!("{}/products", app.base_url))
        .json(&serde_json::json!({ "products": mirrored }))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());

    let listed = api.products().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Visible");

    // Both records remain visible through the mirror read.
    let all: Vec<serde_json::Value> = client
        .get(format!("{}/products", app.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_mutations_require_session() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/products", app.base_url))
        .json(&serde_json::json!({ "title": "Sneaky", "price": 1.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 401);

    let res = client
        .post(format!("{}/api/products", app.base_url))
        .header("x-session-id", "bogus-token")
        .json(&serde_json::json!({ "title": "Sneaky", "price": 1.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 401);

    // A rejected request never touches the database.
    let doc = app.db.read().await;
    assert!(doc.products.is_empty());
    assert!(doc.logs.is_empty());
}

#[tokio::test]
async fn test_bad_credentials_rejected() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/api/admin/login", app.base_url))
        .json(&serde_json::json!({ "username": "admin", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 401);
    assert!(app.db.read().await.sessions.is_empty());
}

#[tokio::test]
async fn test_expired_session_rejected() {
    let app = spawn_app().await;

    // Plant a session that expired an hour ago.
    let mut doc = app.db.read().await;
    let session =
        Session { username: "admin".into(), expires: Utc::now() - Duration::hours(1) };
    doc.sessions.insert("stale-token".into(), session);
    app.db.write(&doc).await.unwrap();

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/api/orders", app.base_url))
        .header("x-session-id", "stale-token")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 401);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "session expired");
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let app = spawn_app().await;
    let api = admin(&app).await;
    let token = api.session_id().unwrap();
    api.logout().await.unwrap();

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/api/orders", app.base_url))
        .header("x-session-id", token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 401);
}

#[tokio::test]
async fn test_order_intake_and_admin_update() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    // Missing required fields.
    let res = client
        .post(format!("{}/api/orders", app.base_url))
        .json(&serde_json::json!({ "name": "Ada", "items": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 400);

    // Valid intake is public and lands as pending.
    let res = client
        .post(format!("{}/api/orders", app.base_url))
        .json(&serde_json::json!({
            "name": "Ada",
            "phone": "50930000000",
            "items": [{ "title": "Pad", "qty": 2, "price": 10.0 }],
            "total": 20.0,
        }))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["order"]["status"], "pending");

    // Listing is admin-only; the admin can then move the status along.
    let res = client.get(format!("{}/api/orders", app.base_url)).send().await.unwrap();
    assert_eq!(res.status().as_u16(), 401);

    let api = admin(&app).await;
    let orders = api.orders().await.unwrap();
    assert_eq!(orders.len(), 1);
    let patch = OrderPatch { status: Some("shipped".into()), ..Default::default() };
    let updated = api.update_order(&orders[0].id, &patch).await.unwrap();
    assert_eq!(updated.status, "shipped");
    assert_eq!(updated.name, "Ada");
}

#[tokio::test]
async fn test_audit_log_records_actions() {
    let app = spawn_app().await;
    let api = admin(&app).await;
    api.create_product(&new_product("Pad")).await.unwrap();

    let logs = api.logs().await.unwrap();
    let actions: Vec<&str> = logs.iter().map(|e| e.action.as_str()).collect();
    assert!(actions.contains(&"admin_login"));
    assert!(actions.contains(&"product_created"));
}

#[tokio::test]
async fn test_image_upload() {
    let app = spawn_app().await;
    let api = admin(&app).await;

    // Bad payloads are validation errors, not server errors.
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/api/upload-image", app.base_url))
        .header("x-session-id", api.session_id().unwrap())
        .json(&serde_json::json!({ "imageData": "plain garbage" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 400);

    let uri = format!("data:image/png;base64,{}", BASE64.encode(b"pngbytes"));
    let url = api.upload_image(&uri, Some("logo v2.png")).await.unwrap();
    assert!(url.starts_with("/uploads/"));
    assert!(url.ends_with(".png"));

    // Stored file is publicly served.
    let res = reqwest::get(format!("{}{}", app.base_url, url)).await.unwrap();
    assert!(res.status().is_success());
    assert_eq!(res.bytes().await.unwrap().as_ref(), b"pngbytes".as_slice());
}

#[tokio::test]
async fn test_catalog_mirror_roundtrip() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/products", app.base_url))
        .json(&serde_json::json!({
            "products": [{ "id": "p1", "name": "Legacy Pad", "price": 10.0 }],
            "message": "seed",
        }))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["commit"].is_string());

    let listed: Vec<serde_json::Value> = client
        .get(format!("{}/products", app.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["title"], "Legacy Pad");
}

#[tokio::test]
async fn test_storefront_sync_and_checkout() {
    let app = spawn_app().await;

    // Seed the mirror, then let the storefront adopt it.
    let client = reqwest::Client::new();
    client
        .post(format!("{}/products", app.base_url))
        .json(&serde_json::json!({
            "products": [{ "id": "p1", "name": "Pad", "price": 10.0 }],
        }))
        .send()
        .await
        .unwrap();

    let front = Storefront::new(&app.base_url);
    front.sync_remote_to_local().await;
    let products = front.load_products();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id, "p1");

    front.add_to_cart("p1", 2);
    let form = ContactForm {
        name: "Ada".into(),
        phone: "50930000000".into(),
        email: "ada@example.com".into(),
    };
    let outcome = front.submit_order(&form).await;
    assert!(matches!(outcome, SubmitOutcome::Succeeded));
    assert!(front.load_cart().is_empty());

    // The order is visible to the admin, pending.
    let api = admin(&app).await;
    let orders = api.orders().await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, "pending");
    assert_eq!(orders[0].total, Decimal::new(20, 0));
}

#[tokio::test]
async fn test_storefront_checkout_fallback_on_unreachable_server() {
    // Nothing listens on this address; submission fails fast and the cart
    // survives for the manual fallback.
    let front = Storefront::new("http://127.0.0.1:9");
    let catalog = front.load_products();
    front.add_to_cart(&catalog[0].id.clone(), 1);

    let form = ContactForm { name: "Ada".into(), phone: "50930000000".into(), email: String::new() };
    match front.submit_order(&form).await {
        SubmitOutcome::FallbackNotified { links, .. } => {
            assert!(links.mailto.starts_with("mailto:"));
            assert!(links.whatsapp.contains("text="));
        }
        other => panic!("expected fallback, got {other:?}"),
    }
    assert!(!front.load_cart().is_empty());
}
