use chrono::{DateTime, Utc};
use rusqlite::ToSql;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The package operations that leave a trace in the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Install,
    Remove,
    Refresh,
    Upgrade,
    Clean,
    Autoremove,
}

impl EventKind {
    pub fn all() -> &'static [EventKind] {
        &[
            EventKind::Install,
            EventKind::Remove,
            EventKind::Refresh,
            EventKind::Upgrade,
            EventKind::Clean,
            EventKind::Autoremove,
        ]
    }

    /// Stable integer stored in the `event` column.
    pub fn id(&self) -> i64 {
        match self {
            EventKind::Install => 0,
            EventKind::Remove => 1,
            EventKind::Refresh => 2,
            EventKind::Upgrade => 3,
            EventKind::Clean => 4,
            EventKind::Autoremove => 5,
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.id() == id)
    }

    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Install => "install",
            EventKind::Remove => "remove",
            EventKind::Refresh => "refresh",
            EventKind::Upgrade => "upgrade",
            EventKind::Clean => "clean",
            EventKind::Autoremove => "autoremove",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|k| k.name() == lower)
            .ok_or_else(|| format!("Unknown event kind: '{}'", s))
    }
}

impl ToSql for EventKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.id()))
    }
}

impl FromSql for EventKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let id = value.as_i64()?;
        EventKind::from_id(id).ok_or(FromSqlError::OutOfRange(id))
    }
}

/// One recorded operation attempt. A `status` of 0 means success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub id: i64,
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
    pub status: i64,
}

impl Event {
    /// A not yet stored event stamped with the current time.
    pub fn new(kind: EventKind, status: i64) -> Self {
        Self {
            id: 0,
            kind,
            timestamp: Utc::now(),
            status,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.status == 0
    }
}
