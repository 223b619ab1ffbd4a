/// Database migrations and schema management.
use anyhow::Result;
use rusqlite::Connection;

/// Creates the schema if it doesn't exist yet.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS categories (
            id          INTEGER PRIMARY KEY,
            name        TEXT    NOT NULL
        );

        CREATE TABLE IF NOT EXISTS task_logs (
            id              INTEGER PRIMARY KEY,
            name            TEXT    NOT NULL,
            category_id     INTEGER NOT NULL,
            start_time      TEXT    NOT NULL,
            end_time        TEXT,
            state           TEXT    NOT NULL,
            total_active_ms INTEGER NOT NULL DEFAULT 0,
            last_resumed_at TEXT
        );

        CREATE TABLE IF NOT EXISTS meta (
            key         TEXT    PRIMARY KEY,
            value       INTEGER NOT NULL
        );
        ",
    )?;
    Ok(())
}
