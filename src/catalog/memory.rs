//! Process-local catalog: lost on restart, no persistence expected. Doubles
//! as the test backend.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{content_revision, CatalogStore, Revision};
use crate::domain::Product;
use crate::{Result, ShopError};

#[derive(Default)]
pub struct MemoryCatalog {
    inner: Mutex<Vec<Product>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn fetch(&self) -> Result<(Vec<Product>, Option<Revision>)> {
        let products = self
            .inner
            .lock()
            .map_err(|_| ShopError::Storage("catalog lock poisoned".into()))?
            .clone();
        let revision = if products.is_empty() { None } else { Some(content_revision(&products)?) };
        Ok((products, revision))
    }

    async fn replace(
        &self,
        products: Vec<Product>,
        expected: Option<&Revision>,
        _message: &str,
    ) -> Result<Revision> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| ShopError::Storage("catalog lock poisoned".into()))?;
        let current = if guard.is_empty() { None } else { Some(content_revision(&guard)?) };
        if expected != current.as_ref() {
            return Err(ShopError::Conflict);
        }
        let revision = content_revision(&products)?;
        *guard = products;
        Ok(revision)
    }
}
