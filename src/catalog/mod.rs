//! Catalog mirror storage behind one interface with optimistic-concurrency
//! revision markers.

pub mod file;
pub mod github;
pub mod memory;

pub use file::FileCatalog;
pub use github::GithubCatalog;
pub use memory::MemoryCatalog;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::Product;
use crate::Result;

/// Content-addressed revision marker. The GitHub backend uses the blob sha;
/// the others hash the serialized list. An empty catalog has no revision,
/// mirroring "file does not exist".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision(pub String);

impl Revision {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Current product list and its revision, `None` when nothing is stored.
    async fn fetch(&self) -> Result<(Vec<Product>, Option<Revision>)>;

    /// Replace the whole list. `expected` is the revision the caller based
    /// its write on; a mismatch (including `None` against a non-empty
    /// catalog) is a conflict. Two writers fetching the same base revision
    /// can still lose one update; the precondition only detects staleness.
    async fn replace(
        &self,
        products: Vec<Product>,
        expected: Option<&Revision>,
        message: &str,
    ) -> Result<Revision>;
}

pub(crate) fn content_revision(products: &[Product]) -> Result<Revision> {
    let bytes = serde_json::to_vec(products)?;
    Ok(Revision(format!("{:016x}", xxhash_rust::xxh3::xxh3_64(&bytes))))
}
