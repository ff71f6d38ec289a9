//! SQLite-backed persistence for diary entries.
//!
//! One table, four statements: create-table, insert-or-replace,
//! delete-by-id, select-all-ordered-by-date. Every operation either
//! succeeds or surfaces the underlying storage error; there is no retry
//! and no partial-failure handling.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use thiserror::Error;
use tracing::debug;

use crate::entry::DiaryEntry;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS entries (
    id TEXT PRIMARY KEY NOT NULL,
    date TEXT NOT NULL,
    content TEXT NOT NULL,
    category TEXT NOT NULL,
    image_uri TEXT
)";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open database: {0}")]
    Open(#[source] rusqlite::Error),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Owns the on-device table of entries.
pub struct EntryStore {
    conn: Connection,
}

impl EntryStore {
    /// Opens (or creates) the database at `path` and ensures the schema
    /// exists. Must succeed before any other operation is attempted.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path).map_err(StoreError::Open)?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory database, mainly for tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(StoreError::Open)?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute(SCHEMA, [])?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn })
    }

    /// Inserts a new row or fully replaces the row sharing `id`. Creation
    /// and update share this one code path.
    pub fn upsert(&self, entry: &DiaryEntry) -> StoreResult<()> {
        debug!(id = %entry.id, category = %entry.category, "upserting entry");
        self.conn.execute(
            "INSERT OR REPLACE INTO entries (id, date, content, category, image_uri)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.id,
                format_date(entry.date),
                entry.content,
                entry.category,
                entry.image_uri,
            ],
        )?;
        Ok(())
    }

    /// Deletes the row with `id`. Deleting an absent id is a silent no-op,
    /// not an error.
    pub fn remove(&self, id: &str) -> StoreResult<()> {
        let affected = self
            .conn
            .execute("DELETE FROM entries WHERE id = ?1", params![id])?;
        debug!(id, affected, "removed entry");
        Ok(())
    }

    /// Returns every row, newest first. Dates are stored as fixed-width
    /// RFC 3339 UTC text, so the lexicographic ORDER BY is chronological.
    pub fn list_all(&self) -> StoreResult<Vec<DiaryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, content, category, image_uri
             FROM entries ORDER BY date DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            let date: String = row.get(1)?;
            Ok(DiaryEntry {
                id: row.get(0)?,
                date: parse_date(&date).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        1,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?,
                content: row.get(2)?,
                category: row.get(3)?,
                image_uri: row.get(4)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        debug!(count = entries.len(), "listed entries");
        Ok(entries)
    }

    #[cfg(test)]
    pub(crate) fn raw(&self) -> &Connection {
        &self.conn
    }
}

fn format_date(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_date(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(text).map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(id: &str, date: &str, content: &str, category: &str) -> DiaryEntry {
        DiaryEntry {
            id: id.to_string(),
            date: parse_date(date).unwrap(),
            content: content.to_string(),
            category: category.to_string(),
            image_uri: None,
        }
    }

    #[test]
    fn upsert_then_list_round_trips() {
        let store = EntryStore::open_in_memory().unwrap();
        let e = DiaryEntry::new("Went hiking".into(), "Travel".into(), Some("photo.jpg".into()));
        store.upsert(&e).unwrap();

        let listed = store.list_all().unwrap();
        assert_eq!(listed, vec![e]);
    }

    #[test]
    fn upsert_with_same_id_replaces_the_row() {
        let store = EntryStore::open_in_memory().unwrap();
        let mut e = entry("a", "2024-01-01T00:00:00Z", "draft", "Personal");
        store.upsert(&e).unwrap();

        e.content = "final".to_string();
        e.category = "Work".to_string();
        store.upsert(&e).unwrap();

        let listed = store.list_all().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].content, "final");
        assert_eq!(listed[0].category, "Work");
    }

    #[test]
    fn list_orders_by_date_descending() {
        let store = EntryStore::open_in_memory().unwrap();
        store
            .upsert(&entry("1", "2024-01-01T00:00:00Z", "hiking", "Travel"))
            .unwrap();
        store
            .upsert(&entry("2", "2024-01-02T00:00:00Z", "office", "Work"))
            .unwrap();
        store
            .upsert(&entry("3", "2023-12-31T23:59:59Z", "party", "Family"))
            .unwrap();

        let ids: Vec<_> = store
            .list_all()
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["2", "1", "3"]);
    }

    #[test]
    fn remove_of_absent_id_is_a_no_op() {
        let store = EntryStore::open_in_memory().unwrap();
        store
            .upsert(&entry("1", "2024-01-01T00:00:00Z", "hiking", "Travel"))
            .unwrap();

        store.remove("missing").unwrap();
        assert_eq!(store.list_all().unwrap().len(), 1);

        store.remove("1").unwrap();
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn date_format_is_fixed_width_and_sortable() {
        let midnight = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(format_date(midnight), "2024-01-01T00:00:00.000Z");
        assert_eq!(parse_date("2024-01-01T00:00:00.000Z").unwrap(), midnight);
        // JS-style timestamps from other writers still parse.
        assert_eq!(parse_date("2024-01-01T00:00:00Z").unwrap(), midnight);
    }
}
