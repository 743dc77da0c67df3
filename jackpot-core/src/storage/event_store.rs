use crate::error::Result;
use crate::storage::Storage;
use chrono::{DateTime, Utc};
use rusqlite::{params, types::Type};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEvent {
    pub seq: i64,
    pub game_id: String,
    pub kind: String,
    pub payload: serde_json::Value,
    pub recorded_at: DateTime<Utc>,
}

pub struct EventStore<'a> {
    storage: &'a Storage,
}

impl<'a> EventStore<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub async fn append<T: Serialize>(&self, game_id: &str, kind: &str, event: &T) -> Result<i64> {
        let payload = serde_json::to_string(event)?;
        let conn = self.storage.get_connection().await;

        conn.execute(
            "INSERT INTO events (game_id, kind, payload, recorded_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![game_id, kind, payload, Utc::now().timestamp()],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Most recent events first.
    pub async fn recent(&self, game_id: &str, limit: usize) -> Result<Vec<StoredEvent>> {
        let conn = self.storage.get_connection().await;

        let mut stmt = conn.prepare(
            "SELECT seq, game_id, kind, payload, recorded_at
             FROM events WHERE game_id = ?1 ORDER BY seq DESC LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![game_id, limit as i64], |row| {
            let payload: String = row.get(3)?;
            let payload = serde_json::from_str(&payload).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e))
            })?;
            let timestamp: i64 = row.get(4)?;
            let recorded_at = DateTime::from_timestamp(timestamp, 0).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    4,
                    Type::Integer,
                    format!("timestamp {} out of range", timestamp).into(),
                )
            })?;
            Ok(StoredEvent {
                seq: row.get(0)?,
                game_id: row.get(1)?,
                kind: row.get(2)?,
                payload,
                recorded_at,
            })
        })?;

        let mut events = Vec::new();
        for event in rows {
            events.push(event?);
        }

        Ok(events)
    }

    pub async fn count(&self, game_id: &str) -> Result<u64> {
        let conn = self.storage.get_connection().await;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM events WHERE game_id = ?1",
            params![game_id],
            |row| row.get(0),
        )?;

        Ok(count as u64)
    }

    /// Removes every recorded event, returning how many were dropped.
    pub async fn clear(&self) -> Result<usize> {
        let conn = self.storage.get_connection().await;
        Ok(conn.execute("DELETE FROM events", [])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_recent_returns_newest_first() {
        let storage = Storage::in_memory().await.unwrap();
        let store = EventStore::new(&storage);

        for i in 0..5 {
            store
                .append("game-1", "guess_committed", &json!({ "n": i }))
                .await
                .unwrap();
        }
        store
            .append("game-2", "hint_added", &json!({ "index": 0 }))
            .await
            .unwrap();

        let recent = store.recent("game-1", 2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].payload["n"], 4);
        assert_eq!(recent[1].payload["n"], 3);

        assert_eq!(store.count("game-1").await.unwrap(), 5);
        assert_eq!(store.count("game-2").await.unwrap(), 1);

        assert_eq!(store.clear().await.unwrap(), 6);
        assert_eq!(store.count("game-1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_corrupt_rows_are_reported() {
        let storage = Storage::in_memory().await.unwrap();
        let store = EventStore::new(&storage);
        store
            .append("game-1", "guess_committed", &json!({ "n": 0 }))
            .await
            .unwrap();

        {
            let conn = storage.get_connection().await;
            conn.execute(
                "INSERT INTO events (game_id, kind, payload, recorded_at)
                 VALUES ('game-1', 'hint_added', '{not json', 0)",
                [],
            )
            .unwrap();
        }
        assert!(store.recent("game-1", 10).await.is_err());

        {
            let conn = storage.get_connection().await;
            conn.execute("DELETE FROM events WHERE kind = 'hint_added'", [])
                .unwrap();
            conn.execute(
                "INSERT INTO events (game_id, kind, payload, recorded_at)
                 VALUES ('game-1', 'hint_added', '{}', ?1)",
                params![i64::MAX],
            )
            .unwrap();
        }
        assert!(store.recent("game-1", 10).await.is_err());
    }
}
