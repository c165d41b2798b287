//! SQLite-backed settings store for native hosts.

use crate::settings::{SettingsResult, SettingsStore};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

/// Settings store over an already-migrated connection.
pub struct SqliteSettingsStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSettingsStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Lists every stored key/value pair, sorted by key.
    pub fn entries(&self) -> SettingsResult<Vec<(String, Value)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM settings ORDER BY key ASC;")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (key, raw) = row?;
            entries.push((key, serde_json::from_str(&raw)?));
        }
        Ok(entries)
    }
}

impl SettingsStore for SqliteSettingsStore<'_> {
    fn get_value(&self, key: &str) -> SettingsResult<Option<Value>> {
        let raw = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1;",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn set_value(&self, key: &str, value: &Value) -> SettingsResult<()> {
        let raw = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT INTO settings (key, value, updated_at)
             VALUES (?1, ?2, CAST(strftime('%s', 'now') AS INTEGER) * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, raw],
        )?;
        Ok(())
    }
}
