//! Storefront context: local catalog persistence and remote catalog sync.

use std::sync::Arc;

use rust_decimal::Decimal;

use super::kv::{keys, KvStore, MemoryKv};
use crate::domain::Product;
use crate::{Result, ShopError};

/// Explicit storefront engine context. Owns the key-value persistence seam
/// and the HTTP client used for catalog sync and checkout.
pub struct Storefront {
    kv: Arc<dyn KvStore>,
    pub(super) http: reqwest::Client,
    pub(super) base_url: String,
}

impl Storefront {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_kv(base_url, Arc::new(MemoryKv::new()))
    }

    pub fn with_kv(base_url: impl Into<String>, kv: Arc<dyn KvStore>) -> Self {
        Self { kv, http: reqwest::Client::new(), base_url: base_url.into() }
    }

    pub fn kv(&self) -> &Arc<dyn KvStore> {
        &self.kv
    }

    /// Persisted catalog, or the built-in default when nothing usable is
    /// stored. Storage and parse failures fall back silently.
    pub fn load_products(&self) -> Vec<Product> {
        self.kv
            .get(keys::PRODUCTS)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_else(default_catalog)
    }

    /// Persist locally, then mirror to the remote catalog endpoint
    /// fire-and-forget; mirror errors are swallowed.
    pub fn save_products(&self, list: &[Product]) {
        if let Ok(raw) = serde_json::to_string(list) {
            self.kv.set(keys::PRODUCTS, &raw);
        }
        let url = format!("{}/products", self.base_url);
        let body = serde_json::json!({ "products": list, "message": "Update from site" });
        let http = self.http.clone();
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                let _ = http.post(url).json(&body).send().await;
            });
        }
    }

    /// Startup sync: adopt the remote catalog only when the response is OK
    /// and parses as a non-empty product array. Every failure mode keeps the
    /// existing local copy, with no retry and no surfaced error.
    pub async fn sync_remote_to_local(&self) {
        let url = format!("{}/products", self.base_url);
        let Ok(res) = self.http.get(&url).send().await else { return };
        if !res.status().is_success() {
            return;
        }
        let Ok(value) = res.json::<serde_json::Value>().await else { return };
        if let Some(raw) = adoptable_catalog(&value) {
            self.kv.set(keys::PRODUCTS, &raw);
        }
    }

    /// Catalog as a pretty JSON array, for admin export.
    pub fn export_products(&self) -> String {
        serde_json::to_string_pretty(&self.load_products()).unwrap_or_else(|_| "[]".into())
    }

    /// Admin import: replaces the catalog when the payload is a JSON array.
    pub fn import_products(&self, raw: &str) -> Result<usize> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|_| ShopError::Validation("invalid JSON".into()))?;
        if !value.is_array() {
            return Err(ShopError::Validation("expected a product array".into()));
        }
        let products: Vec<Product> = serde_json::from_value(value)
            .map_err(|_| ShopError::Validation("malformed product array".into()))?;
        let products: Vec<Product> = products.into_iter().map(Product::ensure_id).collect();
        self.save_products(&products);
        Ok(products.len())
    }
}

/// Adoption rule for remote sync: a non-empty, well-formed product array.
/// Returns the normalized serialized form to persist.
fn adoptable_catalog(value: &serde_json::Value) -> Option<String> {
    let arr = value.as_array()?;
    if arr.is_empty() {
        return None;
    }
    let products: Vec<Product> = serde_json::from_value(value.clone()).ok()?;
    serde_json::to_string(&products).ok()
}

/// Built-in fallback catalog used before the first sync succeeds.
pub fn default_catalog() -> Vec<Product> {
    let seed = [
        ("pad-1", "Pro Controller", "Controllers", 5999, "Low-latency controller for PC and console."),
        ("pad-2", "Wireless Controller V2", "Controllers", 4490, "30h battery, fast charge."),
        ("mon-1", "144Hz 27\" Monitor", "Monitors", 24900, "27 inch, 144Hz, low input lag."),
        ("mon-2", "240Hz 24\" Monitor", "Monitors", 39900, "IPS panel, borderless design."),
        ("acc-1", "RGB Gaming Headset", "Accessories", 6999, "Surround sound, detachable mic."),
        ("acc-2", "Mechanical Keyboard", "Accessories", 8900, "Tactile switches, RGB backlight."),
        ("cab-1", "USB-C Cable 2m", "Cables & Chargers", 899, "Reinforced, 60W fast charge."),
        ("cab-2", "30W Fast Charger", "Cables & Chargers", 2490, "Compact USB-C PD charger."),
    ];
    seed.iter()
        .map(|(id, title, category, cents, description)| Product {
            id: (*id).to_string(),
            title: (*title).to_string(),
            category: (*category).to_string(),
            price: Decimal::new(*cents, 2),
            image: format!("https://picsum.photos/seed/{id}/400/240"),
            description: (*description).to_string(),
            poster: None,
            stock: None,
            added_by_admin: false,
            created_at: None,
            updated_at: None,
        })
        .collect()
}
