use super::{delete_row, get_row, list_rows, open_connection, upsert_row, MIGRATIONS};
use crate::domain::Collection;
use rusqlite::params;
use uuid::Uuid;

fn unique_db_path() -> String {
    std::env::temp_dir()
        .join(format!("gymtrack-db-{}.sqlite", Uuid::now_v7()))
        .display()
        .to_string()
}

fn cleanup_db_files(path: &str) {
    for suffix in ["", "-wal", "-shm"] {
        let candidate = format!("{path}{suffix}");
        let _ = std::fs::remove_file(candidate);
    }
}

fn table_exists(conn: &rusqlite::Connection, table_name: &str) -> bool {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1)",
            params![table_name],
            |row| row.get(0),
        )
        .expect("table existence query should be readable");
    exists == 1
}

#[test]
fn configures_connection_pragmas() {
    let path = unique_db_path();
    let conn = open_connection(&path).expect("connection should open");

    let journal_mode: String = conn
        .query_row("PRAGMA journal_mode;", [], |row| row.get(0))
        .expect("journal_mode pragma should be readable");
    assert_eq!(journal_mode.to_uppercase(), "WAL");

    let synchronous: i64 = conn
        .query_row("PRAGMA synchronous;", [], |row| row.get(0))
        .expect("synchronous pragma should be readable");
    assert_eq!(synchronous, 1);

    let busy_timeout: i64 = conn
        .query_row("PRAGMA busy_timeout;", [], |row| row.get(0))
        .expect("busy_timeout pragma should be readable");
    assert_eq!(busy_timeout, 5000);

    cleanup_db_files(&path);
}

#[test]
fn creates_every_collection_table_and_records_the_migration() {
    let path = unique_db_path();
    let conn = open_connection(&path).expect("connection should open");

    assert!(table_exists(&conn, "schema_migrations"));
    assert!(!table_exists(&conn, "meta"));
    for collection in Collection::ALL {
        assert!(
            table_exists(&conn, collection.as_str()),
            "expected table '{}' to exist",
            collection
        );
    }

    let (version, name): (i64, String) = conn
        .query_row(
            "SELECT version, name FROM schema_migrations ORDER BY version DESC LIMIT 1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .expect("applied migration should be recorded");
    assert_eq!(version, 1);
    assert_eq!(name, "collections_v1");

    cleanup_db_files(&path);
}

#[test]
fn reopening_does_not_reapply_schema_creation() {
    let path = unique_db_path();
    let conn_first = open_connection(&path).expect("first open should initialize schema");
    upsert_row(&conn_first, Collection::Settings, "units", r#"{"id":"units"}"#)
        .expect("row should be written");
    drop(conn_first);

    let conn_second = open_connection(&path).expect("second open should be idempotent");
    let applied_count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| {
            row.get(0)
        })
        .expect("schema_migrations count should be queryable");
    assert_eq!(applied_count, MIGRATIONS.len() as i64);
    assert!(get_row(&conn_second, Collection::Settings, "units")
        .expect("row lookup should work")
        .is_some());

    cleanup_db_files(&path);
}

#[test]
fn upsert_replaces_body_for_existing_id() {
    let path = unique_db_path();
    let conn = open_connection(&path).expect("connection should open");

    upsert_row(&conn, Collection::Programs, "p1", r#"{"v":1}"#).expect("insert should work");
    upsert_row(&conn, Collection::Programs, "p1", r#"{"v":2}"#).expect("update should work");
    upsert_row(&conn, Collection::Programs, "p2", r#"{"v":3}"#).expect("insert should work");

    let rows = list_rows(&conn, Collection::Programs).expect("rows should list");
    assert_eq!(rows, vec![r#"{"v":2}"#.to_string(), r#"{"v":3}"#.to_string()]);
    assert!(list_rows(&conn, Collection::Exercises)
        .expect("rows should list")
        .is_empty());

    cleanup_db_files(&path);
}

#[test]
fn delete_reports_affected_rows_and_tolerates_missing_ids() {
    let path = unique_db_path();
    let conn = open_connection(&path).expect("connection should open");

    upsert_row(&conn, Collection::WorkoutLogs, "w1", "{}").expect("insert should work");
    assert_eq!(
        delete_row(&conn, Collection::WorkoutLogs, "w1").expect("delete should work"),
        1
    );
    assert_eq!(
        delete_row(&conn, Collection::WorkoutLogs, "w1").expect("delete should work"),
        0
    );
    assert!(get_row(&conn, Collection::WorkoutLogs, "w1")
        .expect("lookup should work")
        .is_none());

    cleanup_db_files(&path);
}
