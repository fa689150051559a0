//! Catalog mirror over the products slice of the database file.

use async_trait::async_trait;

use super::{content_revision, CatalogStore, Revision};
use crate::db::FileDb;
use crate::domain::Product;
use crate::{Result, ShopError};

pub struct FileCatalog {
    db: FileDb,
}

impl FileCatalog {
    pub fn new(db: FileDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogStore for FileCatalog {
    async fn fetch(&self) -> Result<(Vec<Product>, Option<Revision>)> {
        let doc = self.db.read().await;
        let revision =
            if doc.products.is_empty() { None } else { Some(content_revision(&doc.products)?) };
        Ok((doc.products, revision))
    }

    async fn replace(
        &self,
        products: Vec<Product>,
        expected: Option<&Revision>,
        _message: &str,
    ) -> Result<Revision> {
        // Read-check-write without locking: a stale base revision is
        // detected, two writers on the same base are not.
        let mut doc = self.db.read().await;
        let current =
            if doc.products.is_empty() { None } else { Some(content_revision(&doc.products)?) };
        if expected != current.as_ref() {
            return Err(ShopError::Conflict);
        }
        let revision = content_revision(&products)?;
        doc.products = products;
        self.db.write(&doc).await?;
        Ok(revision)
    }
}
