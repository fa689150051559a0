//! DOM-free storefront engine: local catalog, cart, remote sync, checkout,
//! and the retrying admin API client.

pub mod api;
pub mod cart;
pub mod checkout;
pub mod kv;
pub mod store;

pub use api::AdminApi;
pub use checkout::{ContactForm, FallbackLinks, SubmitOutcome};
pub use kv::{KvStore, MemoryKv};
pub use store::Storefront;
