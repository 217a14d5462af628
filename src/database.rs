use once_cell::unsync::OnceCell;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::models::{Coordinates, DreamEntry, NewDreamEntry};

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Storage unavailable ({location}): {reason}")]
    StorageUnavailable { location: String, reason: String },
    #[error("Failed to write dream entry: {0}")]
    WriteFailed(#[source] rusqlite::Error),
    #[error("Failed to query dream entries: {0}")]
    QueryFailed(#[source] rusqlite::Error),
}

#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    Memory,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::File(path) => write!(f, "{}", path.display()),
            Location::Memory => write!(f, ":memory:"),
        }
    }
}

/// Dream entry store backed by SQLite.
///
/// The connection is opened on first use and kept for the lifetime of the
/// value. A failed open leaves nothing cached, so the next operation tries
/// again.
pub struct Database {
    location: Location,
    conn: OnceCell<Connection>,
}

const SELECT_COLUMNS: &str =
    "id, date, name, description, mood, location, coordinates, notes, tags, created_at";

impl Database {
    /// Create a store for the database file at `path` without opening it
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            location: Location::File(path.as_ref().to_path_buf()),
            conn: OnceCell::new(),
        }
    }

    /// Create a store over a private in-memory database
    pub fn in_memory() -> Self {
        Self {
            location: Location::Memory,
            conn: OnceCell::new(),
        }
    }

    /// Whether the underlying connection has been established
    pub fn is_open(&self) -> bool {
        self.conn.get().is_some()
    }

    fn unavailable(&self, reason: impl ToString) -> DatabaseError {
        let err = DatabaseError::StorageUnavailable {
            location: self.location.to_string(),
            reason: reason.to_string(),
        };
        error!(error = %err, "cannot open dream store");
        err
    }

    fn connection(&self) -> Result<&Connection, DatabaseError> {
        self.conn.get_or_try_init(|| {
            debug!(location = %self.location, "opening dream store");
            match &self.location {
                Location::File(path) => {
                    // Create parent directory if it doesn't exist
                    if let Some(parent) = path.parent() {
                        if !parent.as_os_str().is_empty() && !parent.is_dir() {
                            std::fs::create_dir_all(parent)
                                .map_err(|e| self.unavailable(e))?;
                        }
                    }
                    Connection::open(path).map_err(|e| self.unavailable(e))
                }
                Location::Memory => Connection::open_in_memory().map_err(|e| self.unavailable(e)),
            }
        })
    }

    /// Create the dreams table and its date index if they are missing.
    /// Safe to call on every start; existing rows are untouched.
    pub fn ensure_schema(&self) -> Result<(), DatabaseError> {
        let conn = self.connection()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS dreams (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                date            TEXT NOT NULL,
                name            TEXT NOT NULL,
                description     TEXT NOT NULL,
                mood            TEXT NOT NULL,
                location        TEXT NOT NULL,
                coordinates     TEXT NOT NULL,
                notes           TEXT NOT NULL,
                tags            TEXT NOT NULL,
                created_at      TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_dreams_date ON dreams(date);",
        )
        .map_err(|e| self.unavailable(e))?;
        debug!(location = %self.location, "dream schema ready");
        Ok(())
    }

    /// Insert a dream entry and return its assigned ID.
    /// Not retried on failure: a resubmission could duplicate the row.
    pub fn insert_entry(&self, entry: &NewDreamEntry) -> Result<i64, DatabaseError> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO dreams (date, name, description, mood, location, coordinates, notes, tags, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                entry.date,
                entry.name,
                entry.description,
                entry.mood,
                entry.location,
                Coordinates::to_column(entry.coordinates.as_ref()),
                entry.notes,
                entry.tags,
                entry.created_at
            ],
        )
        .map_err(|e| {
            error!(error = %e, date = %entry.date, "failed to insert dream entry");
            DatabaseError::WriteFailed(e)
        })?;
        let id = conn.last_insert_rowid();
        info!(id, date = %entry.date, "dream entry recorded");
        Ok(id)
    }

    /// Helper function to map a row to a DreamEntry
    fn row_to_entry(row: &rusqlite::Row) -> Result<DreamEntry, rusqlite::Error> {
        let coordinates: String = row.get(6)?;
        Ok(DreamEntry {
            id: row.get(0)?,
            date: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            mood: row.get(4)?,
            location: row.get(5)?,
            coordinates: Coordinates::from_column(&coordinates),
            notes: row.get(7)?,
            tags: row.get(8)?,
            created_at: row.get(9)?,
        })
    }

    /// Get all entries filed under `date` (exact `YYYY-MM-DD` match), oldest first.
    /// The date is not parsed here; a malformed date simply matches nothing.
    pub fn query_by_date(&self, date: &str) -> Result<Vec<DreamEntry>, DatabaseError> {
        let conn = self.connection()?;
        let query = || -> Result<Vec<DreamEntry>, rusqlite::Error> {
            let mut stmt = conn.prepare_cached(&format!(
                "SELECT {SELECT_COLUMNS} FROM dreams WHERE date = ?1 ORDER BY id ASC"
            ))?;
            let entries = stmt.query_map(rusqlite::params![date], Self::row_to_entry)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(entries)
        };
        let entries = query().map_err(|e| {
            error!(error = %e, date, "failed to query dream entries");
            DatabaseError::QueryFailed(e)
        })?;
        debug!(date, count = entries.len(), "fetched dreams for date");
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Database {
        let db = Database::in_memory();
        db.ensure_schema().unwrap();
        db
    }

    fn entry(date: &str, name: &str) -> NewDreamEntry {
        NewDreamEntry::new(date.to_string(), name.to_string())
    }

    #[test]
    fn opens_lazily() {
        let db = Database::in_memory();
        assert!(!db.is_open());
        db.ensure_schema().unwrap();
        assert!(db.is_open());
    }

    #[test]
    fn empty_date_has_no_entries() {
        let db = store();
        assert!(db.query_by_date("2024-05-10").unwrap().is_empty());
    }

    #[test]
    fn insert_then_query_returns_same_fields() {
        let db = store();
        let new = NewDreamEntry {
            description: "Soaring between towers".to_string(),
            mood: "Joyful".to_string(),
            tags: "flying,city".to_string(),
            ..entry("2024-05-10", "Flying over the city")
        };
        let id = db.insert_entry(&new).unwrap();

        let found = db.query_by_date("2024-05-10").unwrap();
        assert_eq!(found, vec![new.into_entry(id)]);
    }

    #[test]
    fn coordinates_round_trip_through_column() {
        let db = store();
        let new = NewDreamEntry {
            coordinates: Some(Coordinates::new(-33.8688, 151.2093)),
            location: "Sydney".to_string(),
            ..entry("2024-05-10", "Harbour")
        };
        db.insert_entry(&new).unwrap();
        let found = db.query_by_date("2024-05-10").unwrap();
        assert_eq!(found[0].coordinates, Some(Coordinates::new(-33.8688, 151.2093)));

        let stored: String = db
            .connection()
            .unwrap()
            .query_row("SELECT coordinates FROM dreams", [], |row| row.get(0))
            .unwrap();
        assert!(stored.contains("latitude"));
    }

    #[test]
    fn missing_coordinates_store_sentinel() {
        let db = store();
        db.insert_entry(&entry("2024-05-10", "No fix")).unwrap();
        let stored: String = db
            .connection()
            .unwrap()
            .query_row("SELECT coordinates FROM dreams", [], |row| row.get(0))
            .unwrap();
        assert_eq!(stored, crate::models::COORDINATES_UNAVAILABLE);
    }

    #[test]
    fn same_day_entries_come_back_in_id_order() {
        let db = store();
        let ids: Vec<i64> = (0..5)
            .map(|i| db.insert_entry(&entry("2024-05-10", &format!("dream {i}"))).unwrap())
            .collect();
        let found = db.query_by_date("2024-05-10").unwrap();
        assert_eq!(found.iter().map(|e| e.id).collect::<Vec<_>>(), ids);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn dates_are_isolated() {
        let db = store();
        db.insert_entry(&entry("2024-03-01", "first")).unwrap();
        assert!(db.query_by_date("2024-03-02").unwrap().is_empty());
        assert_eq!(db.query_by_date("2024-03-01").unwrap().len(), 1);
    }

    #[test]
    fn malformed_dates_match_nothing() {
        let db = store();
        db.insert_entry(&entry("2024-03-01", "first")).unwrap();
        assert!(db.query_by_date("").unwrap().is_empty());
        assert!(db.query_by_date("2024-3-1").unwrap().is_empty());
        assert!(db.query_by_date("2024-03-01T00:00:00Z").unwrap().is_empty());
    }

    #[test]
    fn ensure_schema_twice_keeps_rows() {
        let db = store();
        db.insert_entry(&entry("2024-03-01", "kept")).unwrap();
        db.ensure_schema().unwrap();
        db.ensure_schema().unwrap();
        assert_eq!(db.query_by_date("2024-03-01").unwrap()[0].name, "kept");
    }

    #[test]
    fn insert_without_schema_is_write_failure() {
        let db = Database::in_memory();
        let err = db.insert_entry(&entry("2024-03-01", "orphan")).unwrap_err();
        assert!(matches!(err, DatabaseError::WriteFailed(_)));
    }

    #[test]
    fn ids_are_not_reused() {
        let db = store();
        let first = db.insert_entry(&entry("2024-03-01", "a")).unwrap();
        db.connection()
            .unwrap()
            .execute("DELETE FROM dreams WHERE id = ?1", [first])
            .unwrap();
        let second = db.insert_entry(&entry("2024-03-01", "b")).unwrap();
        assert!(second > first);
    }
}
