//! Key/value operations on [`LocalStorage`].
//!
//! The raw `get_item` / `set_item` / `remove_item` trio mirrors browser local
//! storage. Typed helpers encode values as JSON, and [`LocalStorage::load_or_default`]
//! is the best-effort read used by cache hydration: anything absent or
//! unreadable becomes the type's default and is logged, never returned as an
//! error.

use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::database::LocalStorage;
use crate::error::{Result, StoreError};
use crate::keys::StorageKey;

impl LocalStorage {
    // ------------------------------------------------------------------
    // Raw strings
    // ------------------------------------------------------------------

    pub fn get_item(&self, key: StorageKey) -> Result<Option<String>> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                params![key.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_item(&self, key: StorageKey, value: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO local_storage (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key.as_str(), value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Remove a key. Returns `true` if a value was present.
    pub fn remove_item(&self, key: StorageKey) -> Result<bool> {
        let conn = self.conn()?;
        let affected = conn.execute(
            "DELETE FROM local_storage WHERE key = ?1",
            params![key.as_str()],
        )?;
        Ok(affected > 0)
    }

    pub fn contains(&self, key: StorageKey) -> Result<bool> {
        Ok(self.get_item(key)?.is_some())
    }

    // ------------------------------------------------------------------
    // JSON
    // ------------------------------------------------------------------

    pub fn get_json<T: DeserializeOwned>(&self, key: StorageKey) -> Result<Option<T>> {
        let Some(raw) = self.get_item(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Serialization {
                key: key.to_string(),
                source,
            })
    }

    pub fn set_json<T: Serialize + ?Sized>(&self, key: StorageKey, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value).map_err(|source| StoreError::Serialization {
            key: key.to_string(),
            source,
        })?;
        self.set_item(key, &raw)
    }

    /// Best-effort read: absent, unreadable or corrupt values yield `T::default()`.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: StorageKey) -> T {
        match self.get_json(key) {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!(%key, "no cached value");
                T::default()
            }
            Err(e) => {
                warn!(%key, error = %e, "discarding unreadable cached value");
                T::default()
            }
        }
    }
}
