//! Key-value persistence seam for the storefront engine. Everything the old
//! storefront kept in ambient browser storage goes through this interface,
//! so it can be swapped for a test double.

use std::collections::HashMap;
use std::sync::Mutex;

/// Storage keys used by the engine.
pub mod keys {
    pub const PRODUCTS: &str = "products";
    pub const CART: &str = "cart";
    pub const BUSINESS_EMAIL: &str = "business_email";
    pub const BUSINESS_WHATSAPP: &str = "business_whatsapp";
    pub const BUSINESS_WHATSAPP_2: &str = "business_whatsapp_2";
}

pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

#[derive(Default)]
pub struct MemoryKv {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut map) = self.inner.lock() {
            map.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut map) = self.inner.lock() {
            map.remove(key);
        }
    }
}
