//! Shoplite - Self-hosted Storefront Service
//!
//! A small storefront backend and a DOM-free client engine for it.
//!
//! ## Features
//! - Product catalog CRUD with an admin-only listing filter
//! - Order intake with required-field validation
//! - Session-token admin auth (24h expiry)
//! - Append-only audit log, last 100 entries on read
//! - Data-URI image upload to a public uploads directory
//! - Catalog mirror with optimistic-concurrency revision markers, backed by
//!   the GitHub contents API, an in-memory list, or the database file
//! - Client engine: local catalog, cart, remote sync, checkout with
//!   email/WhatsApp fallback

pub mod catalog;
pub mod client;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod http;

pub use config::Config;
pub use error::{Result, ShopError};
