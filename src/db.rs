use std::time::Duration;

use rusqlite::{params, Connection, DatabaseName, OptionalExtension, Result};

use crate::domain::{now_utc_rfc3339, Collection};

struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: [Migration; 1] = [Migration {
    version: 1,
    name: "collections_v1",
    sql: r#"
CREATE TABLE IF NOT EXISTS "exercises" (
    id TEXT PRIMARY KEY,
    body TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS "programs" (
    id TEXT PRIMARY KEY,
    body TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS "workoutLogs" (
    id TEXT PRIMARY KEY,
    body TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS "settings" (
    id TEXT PRIMARY KEY,
    body TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#,
}];

pub fn open_connection(path: &str) -> Result<Connection> {
    let mut conn = Connection::open(path)?;
    configure_for_speed(&conn)?;
    apply_migrations(&mut conn)?;
    Ok(conn)
}

fn configure_for_speed(conn: &Connection) -> Result<()> {
    conn.pragma_update(None::<DatabaseName>, "journal_mode", "WAL")?;
    conn.pragma_update(None::<DatabaseName>, "synchronous", "NORMAL")?;
    conn.pragma_update(None::<DatabaseName>, "foreign_keys", "ON")?;
    conn.pragma_update(None::<DatabaseName>, "temp_store", "MEMORY")?;
    conn.pragma_update(None::<DatabaseName>, "busy_timeout", 5000i64)?;
    conn.busy_timeout(Duration::from_millis(5000))?;
    Ok(())
}

fn apply_migrations(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(
        r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at TEXT NOT NULL
);
"#,
    )?;

    for migration in MIGRATIONS {
        let already_applied: Option<i64> = tx
            .query_row(
                "SELECT version FROM schema_migrations WHERE version = ?1",
                params![migration.version],
                |row| row.get(0),
            )
            .optional()?;

        if already_applied.is_some() {
            continue;
        }

        tx.execute_batch(migration.sql)?;
        tx.execute(
            "INSERT INTO schema_migrations (version, name, applied_at) VALUES (?1, ?2, ?3)",
            params![migration.version, migration.name, now_utc_rfc3339()],
        )?;
    }

    tx.commit()
}

pub fn upsert_row(conn: &Connection, collection: Collection, id: &str, body: &str) -> Result<()> {
    let sql = format!(
        r#"
INSERT INTO "{table}" (id, body, updated_at)
VALUES (?1, ?2, ?3)
ON CONFLICT(id) DO UPDATE SET
    body = excluded.body,
    updated_at = excluded.updated_at
"#,
        table = collection.as_str()
    );
    conn.execute(&sql, params![id, body, now_utc_rfc3339()])?;
    Ok(())
}

pub fn list_rows(conn: &Connection, collection: Collection) -> Result<Vec<String>> {
    let sql = format!(r#"SELECT body FROM "{}" ORDER BY id"#, collection.as_str());
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.collect()
}

pub fn get_row(conn: &Connection, collection: Collection, id: &str) -> Result<Option<String>> {
    let sql = format!(r#"SELECT body FROM "{}" WHERE id = ?1"#, collection.as_str());
    conn.query_row(&sql, params![id], |row| row.get(0))
        .optional()
}

pub fn delete_row(conn: &Connection, collection: Collection, id: &str) -> Result<usize> {
    let sql = format!(r#"DELETE FROM "{}" WHERE id = ?1"#, collection.as_str());
    conn.execute(&sql, params![id])
}

#[cfg(test)]
mod tests;
