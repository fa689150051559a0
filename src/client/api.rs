//! Admin API client: tries each candidate base address in order, retrying
//! every attempt with linear backoff before moving on, and aggregates the
//! last error when all candidates are exhausted.

use std::sync::Mutex;
use std::time::Duration;

use reqwest::Method;
use serde_json::Value;

use crate::db::LogEntry;
use crate::domain::{NewProduct, Order, OrderPatch, Product, ProductPatch};
use crate::http::auth::SESSION_HEADER;
use crate::{Result, ShopError};

const RETRIES_PER_BASE: u64 = 5;
const BACKOFF_STEP: Duration = Duration::from_millis(500);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct AdminApi {
    http: reqwest::Client,
    base_urls: Vec<String>,
    session: Mutex<Option<String>>,
}

impl AdminApi {
    pub fn new(base_urls: Vec<String>) -> Result<Self> {
        if base_urls.is_empty() {
            return Err(ShopError::Config("at least one API base address".into()));
        }
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http, base_urls, session: Mutex::new(None) })
    }

    pub fn session_id(&self) -> Option<String> {
        self.session.lock().ok()?.clone()
    }

    fn set_session(&self, token: Option<String>) {
        if let Ok(mut guard) = self.session.lock() {
            *guard = token;
        }
    }

    async fn request(&self, method: Method, endpoint: &str, body: Option<&Value>) -> Result<Value> {
        let mut last_err = ShopError::Internal("no API base address tried".into());
        for base in &self.base_urls {
            for attempt in 1..=RETRIES_PER_BASE {
                let url = format!("{base}{endpoint}");
                let mut req = self
                    .http
                    .request(method.clone(), &url)
                    .header("Accept", "application/json");
                if let Some(token) = self.session_id() {
                    req = req.header(SESSION_HEADER, token);
                }
                if let Some(b) = body {
                    req = req.json(b);
                }
                match req.send().await {
                    Ok(res) if res.status().is_success() => {
                        return Ok(res.json().await.unwrap_or(Value::Null));
                    }
                    Ok(res) => {
                        last_err = ShopError::Upstream {
                            status: res.status().as_u16(),
                            body: res.text().await.unwrap_or_default(),
                        };
                    }
                    Err(e) => last_err = e.into(),
                }
                if attempt < RETRIES_PER_BASE {
                    tokio::time::sleep(BACKOFF_STEP * attempt as u32).await;
                }
            }
            tracing::debug!(base = %base, error = %last_err, "API base exhausted, trying next");
        }
        Err(ShopError::Internal(format!("all API endpoints failed: {last_err}")))
    }

    async fn get(&self, endpoint: &str) -> Result<Value> {
        self.request(Method::GET, endpoint, None).await
    }

    async fn post(&self, endpoint: &str, body: Value) -> Result<Value> {
        self.request(Method::POST, endpoint, Some(&body)).await
    }

    async fn put(&self, endpoint: &str, body: Value) -> Result<Value> {
        self.request(Method::PUT, endpoint, Some(&body)).await
    }

    // ---- auth -------------------------------------------------------------

    /// Log in and remember the minted session token for later calls.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let body = serde_json::json!({ "username": username, "password": password });
        let res = self.post("/api/admin/login", body).await?;
        let token = res
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| ShopError::Internal("login response missing sessionId".into()))?
            .to_string();
        self.set_session(Some(token.clone()));
        Ok(token)
    }

    pub async fn logout(&self) -> Result<()> {
        self.post("/api/admin/logout", Value::Null).await?;
        self.set_session(None);
        Ok(())
    }

    // ---- products ---------------------------------------------------------

    pub async fn products(&self) -> Result<Vec<Product>> {
        Ok(serde_json::from_value(self.get("/api/products").await?)?)
    }

    pub async fn create_product(&self, product: &NewProduct) -> Result<Product> {
        let res = self.post("/api/products", serde_json::to_value(product)?).await?;
        Ok(serde_json::from_value(res["product"].clone())?)
    }

    pub async fn update_product(&self, id: &str, patch: &ProductPatch) -> Result<Product> {
        let res = self.put(&format!("/api/products/{id}"), serde_json::to_value(patch)?).await?;
        Ok(serde_json::from_value(res["product"].clone())?)
    }

    pub async fn delete_product(&self, id: &str) -> Result<()> {
        self.request(Method::DELETE, &format!("/api/products/{id}"), None).await?;
        Ok(())
    }

    // ---- orders / logs / uploads -------------------------------------------

    pub async fn orders(&self) -> Result<Vec<Order>> {
        Ok(serde_json::from_value(self.get("/api/orders").await?)?)
    }

    pub async fn update_order(&self, id: &str, patch: &OrderPatch) -> Result<Order> {
        let res = self.put(&format!("/api/orders/{id}"), serde_json::to_value(patch)?).await?;
        Ok(serde_json::from_value(res["order"].clone())?)
    }

    pub async fn logs(&self) -> Result<Vec<LogEntry>> {
        Ok(serde_json::from_value(self.get("/api/logs").await?)?)
    }

    /// Upload a `data:image/...` payload; returns the public image path.
    pub async fn upload_image(&self, image_data: &str, filename: Option<&str>) -> Result<String> {
        let body = serde_json::json!({ "imageData": image_data, "filename": filename });
        let res = self.post("/api/upload-image", body).await?;
        res.get("imageUrl")
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| ShopError::Internal("upload response missing imageUrl".into()))
    }
}
