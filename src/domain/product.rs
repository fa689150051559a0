//! Catalog product and its create/patch request types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A catalog product. The wire format tolerates the legacy field spellings
/// (`name`/`img`/`desc`) and missing fields; identity is the `id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: String,
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default, alias = "img")]
    pub image: String,
    #[serde(default, alias = "desc")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(default, rename = "addedByAdmin")]
    pub added_by_admin: bool,
    #[serde(default, rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_category() -> String {
    "General".to_string()
}

impl Product {
    /// Ensure the record carries a usable identity; ids are caller-supplied
    /// and records arriving without one get a fresh uuid.
    pub fn ensure_id(mut self) -> Self {
        if self.id.is_empty() {
            self.id = Uuid::new_v4().to_string();
        }
        self
    }
}

/// Admin create request. The server assigns id, creation timestamp, and the
/// admin tag.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewProduct {
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default, alias = "img")]
    pub image: String,
    #[serde(default, alias = "desc")]
    pub description: String,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub stock: Option<u32>,
}

impl NewProduct {
    pub fn into_product(self) -> Product {
        Product {
            id: Uuid::new_v4().to_string(),
            title: self.title,
            category: self.category,
            price: self.price,
            image: self.image,
            description: self.description,
            poster: self.poster,
            stock: self.stock,
            added_by_admin: true,
            created_at: Some(Utc::now()),
            updated_at: None,
        }
    }
}

/// Typed shallow patch: only supplied fields change, id is preserved, and the
/// record is (re)tagged as admin-added.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(default, alias = "name")]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default, alias = "img")]
    pub image: Option<String>,
    #[serde(default, alias = "desc")]
    pub description: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub stock: Option<u32>,
}

impl ProductPatch {
    pub fn apply(self, product: &mut Product) {
        if let Some(title) = self.title {
            product.title = title;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(image) = self.image {
            product.image = image;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(poster) = self.poster {
            product.poster = Some(poster);
        }
        if let Some(stock) = self.stock {
            product.stock = Some(stock);
        }
        product.added_by_admin = true;
        product.updated_at = Some(Utc::now());
    }
}
