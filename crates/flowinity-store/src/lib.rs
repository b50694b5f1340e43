//! # flowinity-store
//!
//! Local persistent storage for the Flowinity client, backed by SQLite.
//!
//! The crate plays the role browser local storage plays for a web client:
//! string values under well-known keys ([`StorageKey`]), with JSON helpers
//! and a best-effort loader for cache hydration. There is no schema
//! versioning of the stored values themselves.

pub mod database;
pub mod keys;
pub mod kv;
pub mod migrations;

mod error;

pub use database::LocalStorage;
pub use error::StoreError;
pub use keys::StorageKey;
