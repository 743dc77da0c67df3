use crate::error::Result;
use crate::storage::Storage;
use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub struct SnapshotStore<'a> {
    storage: &'a Storage,
}

impl<'a> SnapshotStore<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub async fn save<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let payload = serde_json::to_string(value)?;
        let conn = self.storage.get_connection().await;

        conn.execute(
            "INSERT OR REPLACE INTO snapshots (name, payload, updated_at)
             VALUES (?1, ?2, ?3)",
            params![name, payload, Utc::now().timestamp()],
        )?;

        tracing::debug!("Saved snapshot '{}' ({} bytes)", name, payload.len());
        Ok(())
    }

    pub async fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let conn = self.storage.get_connection().await;

        let payload: Option<String> = conn
            .query_row(
                "SELECT payload FROM snapshots WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    pub async fn exists(&self, name: &str) -> Result<bool> {
        let conn = self.storage.get_connection().await;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM snapshots WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    pub async fn delete(&self, name: &str) -> Result<()> {
        let conn = self.storage.get_connection().await;
        conn.execute("DELETE FROM snapshots WHERE name = ?1", params![name])?;
        Ok(())
    }
}
