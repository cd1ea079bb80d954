//! Persistent log of attempted package operations.
//!
//! Events live in an SQLite database. When another process holds the database
//! lock, beginning a transaction and preparing a statement are retried after a
//! constant delay until they succeed.

pub mod event;

pub use event::{Event, EventKind};

use crate::error::{PkmanError, Result};
use crate::logging::LogDomain;
use chrono::DateTime;
use rusqlite::{CachedStatement, Connection, ErrorCode, Row, params};
use std::path::Path;
use std::thread;
use std::time::Duration;

const RETRY_DELAY: Duration = Duration::from_millis(10);

const CURRENT_SCHEMA_VERSION: i64 = 1;

const SCHEMA: &[&str] = &[
    "CREATE TABLE event (
        id        INTEGER PRIMARY KEY,
        event     INTEGER NOT NULL,
        timestamp INTEGER NOT NULL,
        status    INTEGER NOT NULL
    ) STRICT",
    "CREATE INDEX ev_event_idx ON event (event)",
    "CREATE INDEX ev_timestamp_idx ON event (timestamp)",
    "CREATE INDEX ev_status_idx ON event (status)",
];

const Q_EVENT_ADD: &str = "INSERT INTO event (event, timestamp, status) VALUES (?1, ?2, ?3)";

const Q_EVENT_RECENT: &str = "
SELECT id, event, timestamp, status
FROM event
ORDER BY timestamp DESC, id DESC
LIMIT ?1";

const Q_EVENT_RECENT_BY_KIND: &str = "
SELECT id, event, timestamp, status
FROM event
WHERE event = ?1
ORDER BY timestamp DESC, id DESC
LIMIT ?2";

const Q_EVENT_RECENT_ERR: &str = "
SELECT id, event, timestamp, status
FROM event
WHERE status <> 0
ORDER BY timestamp DESC, id DESC
LIMIT ?1";

pub struct History {
    conn: Connection,
}

/// Lock contention that is worth waiting out.
pub(crate) fn is_busy(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            matches!(e.code, ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
        }
        _ => false,
    }
}

fn retry_busy<T>(what: &str, mut op: impl FnMut() -> rusqlite::Result<T>) -> Result<T> {
    loop {
        match op() {
            Ok(v) => return Ok(v),
            Err(e) if is_busy(&e) => {
                log::debug!(target: LogDomain::Database.target(), "Database busy during {}, retrying", what);
                thread::sleep(RETRY_DELAY);
            }
            Err(e) => {
                log::error!(target: LogDomain::Database.target(), "Cannot {}: {}", what, e);
                return Err(e.into());
            }
        }
    }
}

fn row_to_event(row: &Row<'_>) -> rusqlite::Result<Event> {
    let stamp: i64 = row.get(2)?;
    Ok(Event {
        id: row.get(0)?,
        kind: row.get(1)?,
        timestamp: DateTime::from_timestamp(stamp, 0).unwrap_or(DateTime::UNIX_EPOCH),
        status: row.get(3)?,
    })
}

impl History {
    /// Open the database at `path`, creating it and its schema if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| PkmanError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let conn = Connection::open(path).map_err(|e| {
            log::error!(target: LogDomain::Database.target(), "Error opening database at {}: {}", path.display(), e);
            e
        })?;

        let history = Self::setup(conn)?;
        log::debug!(target: LogDomain::Database.target(), "Opened history at {}", path.display());
        Ok(history)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::setup(Connection::open_in_memory()?)
    }

    fn setup(conn: Connection) -> Result<Self> {
        retry_busy("enable WAL", || {
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
                row.get::<_, String>(0)
            })
        })?;
        conn.execute("PRAGMA foreign_keys = ON", ())?;

        let history = Self { conn };
        history.init_schema()?;
        Ok(history)
    }

    /// Create the schema unless it is current. The version is read under the
    /// write lock, so concurrent first opens create it once.
    fn init_schema(&self) -> Result<()> {
        self.begin()?;
        match self.migrate() {
            Ok(()) => self.commit(),
            Err(e) => {
                self.rollback();
                Err(e.into())
            }
        }
    }

    fn migrate(&self) -> rusqlite::Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER NOT NULL PRIMARY KEY,
                updated TEXT NOT NULL
            )",
            (),
        )?;

        let version: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )?;

        if version >= CURRENT_SCHEMA_VERSION {
            return Ok(());
        }

        log::info!(target: LogDomain::Database.target(), "Initializing fresh history database");
        for sql in SCHEMA {
            self.conn.execute(sql, ())?;
        }
        self.conn.execute(
            "INSERT INTO schema_version (version, updated) VALUES (?1, datetime('now'))",
            [CURRENT_SCHEMA_VERSION],
        )?;
        Ok(())
    }

    fn begin(&self) -> Result<()> {
        retry_busy("begin transaction", || {
            self.conn.execute_batch("BEGIN IMMEDIATE")
        })
    }

    fn commit(&self) -> Result<()> {
        self.conn.execute_batch("COMMIT").map_err(|e| {
            log::error!(target: LogDomain::Database.target(), "Cannot commit transaction: {}", e);
            self.rollback();
            e.into()
        })
    }

    fn rollback(&self) {
        if let Err(e) = self.conn.execute_batch("ROLLBACK") {
            log::error!(target: LogDomain::Database.target(), "Cannot roll back transaction: {}", e);
        }
    }

    fn statement(&self, sql: &str) -> Result<CachedStatement<'_>> {
        retry_busy("prepare query", || self.conn.prepare_cached(sql))
    }

    /// Store `event` and set its `id`.
    pub fn add_event(&self, event: &mut Event) -> Result<()> {
        self.begin()?;

        let inserted = self.statement(Q_EVENT_ADD).and_then(|mut stmt| {
            stmt.execute(params![event.kind, event.timestamp.timestamp(), event.status])
                .map_err(PkmanError::from)
        });

        match inserted {
            Ok(_) => {
                event.id = self.conn.last_insert_rowid();
                self.commit()
            }
            Err(e) => {
                log::error!(target: LogDomain::Database.target(), "Cannot add {} event: {}", event.kind, e);
                self.rollback();
                Err(e)
            }
        }
    }

    /// Record the outcome of an operation.
    pub fn record<T>(&self, kind: EventKind, outcome: &Result<T>) -> Result<Event> {
        let status = match outcome {
            Ok(_) => 0,
            Err(e) => e.status_code(),
        };
        let mut event = Event::new(kind, status);
        self.add_event(&mut event)?;
        Ok(event)
    }

    /// Most recent events, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<Event>> {
        let mut stmt = self.statement(Q_EVENT_RECENT)?;
        let rows = stmt.query_map(params![limit as i64], row_to_event)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn recent_by_kind(&self, kind: EventKind, limit: usize) -> Result<Vec<Event>> {
        let mut stmt = self.statement(Q_EVENT_RECENT_BY_KIND)?;
        let rows = stmt.query_map(params![kind, limit as i64], row_to_event)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Most recent failed events, newest first.
    pub fn recent_errors(&self, limit: usize) -> Result<Vec<Event>> {
        let mut stmt = self.statement(Q_EVENT_RECENT_ERR)?;
        let rows = stmt.query_map(params![limit as i64], row_to_event)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

#[cfg(test)]
mod tests;
