use super::*;
use chrono::{TimeZone, Utc};
use tempfile::TempDir;

fn event_at(kind: EventKind, secs: i64, status: i64) -> Event {
    Event {
        id: 0,
        kind,
        timestamp: Utc.timestamp_opt(secs, 0).single().unwrap(),
        status,
    }
}

fn seeded() -> History {
    let history = History::open_in_memory().unwrap();
    for (kind, secs, status) in [
        (EventKind::Install, 100, 0),
        (EventKind::Refresh, 200, 0),
        (EventKind::Install, 300, 38),
        (EventKind::Upgrade, 400, 0),
        (EventKind::Remove, 500, 1),
    ] {
        history.add_event(&mut event_at(kind, secs, status)).unwrap();
    }
    history
}

#[test]
fn test_add_event_assigns_ids() {
    let history = History::open_in_memory().unwrap();
    let mut first = Event::new(EventKind::Install, 0);
    let mut second = Event::new(EventKind::Clean, 0);

    history.add_event(&mut first).unwrap();
    history.add_event(&mut second).unwrap();

    assert!(first.id > 0);
    assert!(second.id > first.id);
}

#[test]
fn test_recent_is_newest_first_and_limited() {
    let history = seeded();
    let events = history.recent(3).unwrap();

    let stamps: Vec<i64> = events.iter().map(|e| e.timestamp.timestamp()).collect();
    assert_eq!(stamps, vec![500, 400, 300]);
    assert_eq!(events[0].kind, EventKind::Remove);
}

#[test]
fn test_recent_with_zero_limit_is_empty() {
    assert!(seeded().recent(0).unwrap().is_empty());
}

#[test]
fn test_same_timestamp_orders_by_id() {
    let history = History::open_in_memory().unwrap();
    let mut a = event_at(EventKind::Install, 42, 0);
    let mut b = event_at(EventKind::Remove, 42, 0);
    history.add_event(&mut a).unwrap();
    history.add_event(&mut b).unwrap();

    let events = history.recent(10).unwrap();
    assert_eq!(events[0].id, b.id);
    assert_eq!(events[1].id, a.id);
}

#[test]
fn test_recent_by_kind_filters() {
    let history = seeded();
    let installs = history.recent_by_kind(EventKind::Install, 10).unwrap();

    assert_eq!(installs.len(), 2);
    assert!(installs.iter().all(|e| e.kind == EventKind::Install));
    assert_eq!(installs[0].timestamp.timestamp(), 300);
}

#[test]
fn test_recent_errors_only_returns_failures() {
    let history = seeded();
    let errors = history.recent_errors(10).unwrap();

    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| !e.succeeded()));
    assert_eq!(errors[0].status, 1);
    assert_eq!(errors[1].status, 38);
}

#[test]
fn test_record_uses_error_status_code() {
    let history = History::open_in_memory().unwrap();
    let failed: Result<()> = Err(PkmanError::NotImplemented {
        backend: crate::backends::BackendKind::Apt,
        operation: "install",
    });

    let ok = history.record(EventKind::Refresh, &Ok::<(), PkmanError>(())).unwrap();
    let bad = history.record(EventKind::Install, &failed).unwrap();

    assert!(ok.succeeded());
    assert_eq!(bad.status, failed.unwrap_err().status_code());
}

#[test]
fn test_file_database_persists_across_handles() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("pkman.db");

    {
        let history = History::open(&path).unwrap();
        history
            .add_event(&mut event_at(EventKind::Autoremove, 10, 0))
            .unwrap();
    }

    let reopened = History::open(&path).unwrap();
    let events = reopened.recent(10).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, EventKind::Autoremove);
}

#[test]
fn test_two_handles_share_one_database() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pkman.db");

    let first = History::open(&path).unwrap();
    let second = History::open(&path).unwrap();

    first.add_event(&mut event_at(EventKind::Install, 1, 0)).unwrap();
    second.add_event(&mut event_at(EventKind::Remove, 2, 0)).unwrap();

    assert_eq!(first.recent(10).unwrap().len(), 2);
}

#[test]
fn test_open_waits_for_a_concurrent_schema_creation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pkman.db");
    let (locked_tx, locked_rx) = std::sync::mpsc::channel();

    let creator = {
        let path = path.clone();
        std::thread::spawn(move || {
            let conn = Connection::open(&path).unwrap();
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
                row.get::<_, String>(0)
            })
            .unwrap();
            conn.execute_batch("BEGIN IMMEDIATE").unwrap();
            conn.execute(
                "CREATE TABLE schema_version (version INTEGER NOT NULL PRIMARY KEY, updated TEXT NOT NULL)",
                (),
            )
            .unwrap();
            for sql in SCHEMA {
                conn.execute(sql, ()).unwrap();
            }
            conn.execute(
                "INSERT INTO schema_version (version, updated) VALUES (?1, datetime('now'))",
                [CURRENT_SCHEMA_VERSION],
            )
            .unwrap();
            locked_tx.send(()).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(200));
            conn.execute_batch("COMMIT").unwrap();
        })
    };

    locked_rx.recv().unwrap();
    let history = History::open(&path).unwrap();
    creator.join().unwrap();

    history.add_event(&mut event_at(EventKind::Install, 1, 0)).unwrap();
    assert_eq!(history.recent(10).unwrap().len(), 1);
}

#[test]
fn test_concurrent_first_opens_all_succeed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pkman.db");

    let openers: Vec<_> = (0..8)
        .map(|_| {
            let path = path.clone();
            std::thread::spawn(move || History::open(&path).map(|_| ()))
        })
        .collect();

    for opener in openers {
        opener.join().unwrap().unwrap();
    }

    let history = History::open(&path).unwrap();
    assert!(history.recent(10).unwrap().is_empty());
}

#[test]
fn test_event_kind_names() {
    for kind in EventKind::all() {
        assert_eq!(kind.name().parse::<EventKind>().unwrap(), *kind);
        assert_eq!(EventKind::from_id(kind.id()), Some(*kind));
    }
    assert!("reinstall".parse::<EventKind>().is_err());
    assert_eq!(EventKind::from_id(99), None);
}

#[test]
fn test_busy_detection() {
    let busy = rusqlite::Error::SqliteFailure(
        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
        None,
    );
    assert!(is_busy(&busy));
    assert!(!is_busy(&rusqlite::Error::QueryReturnedNoRows));
}
