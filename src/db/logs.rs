/// Task log database queries.
use anyhow::{Result, anyhow};
use chrono::{DateTime, Duration, Local};
use rusqlite::{Connection, OptionalExtension, Transaction};

use crate::types::{TaskId, TaskRecord, TaskState};

const HIGHEST_ID_KEY: &str = "highest_task_id";

/// A `task_logs` row before its timestamps are parsed.
struct LogRow {
    id: TaskId,
    name: String,
    category_id: u32,
    start_time: String,
    end_time: Option<String>,
    state: String,
    total_active_ms: i64,
    last_resumed_at: Option<String>,
}

pub fn query_logs(conn: &Connection) -> Result<Vec<TaskRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, category_id, start_time, end_time, state, total_active_ms, last_resumed_at
         FROM task_logs ORDER BY rowid",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(LogRow {
            id: row.get(0)?,
            name: row.get(1)?,
            category_id: row.get(2)?,
            start_time: row.get(3)?,
            end_time: row.get(4)?,
            state: row.get(5)?,
            total_active_ms: row.get(6)?,
            last_resumed_at: row.get(7)?,
        })
    })?;
    let mut logs = Vec::new();
    for row in rows {
        logs.push(into_record(row?)?);
    }
    Ok(logs)
}

/// Replaces every stored log with `logs`, keeping their order.
pub fn replace_logs(logs: &[TaskRecord], tx: &Transaction) -> Result<()> {
    tx.execute("DELETE FROM task_logs", [])?;
    let mut stmt = tx.prepare(
        "INSERT INTO task_logs
            (id, name, category_id, start_time, end_time, state, total_active_ms, last_resumed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )?;
    for log in logs {
        stmt.execute(rusqlite::params![
            log.id,
            log.name,
            log.category_id,
            log.start_time.to_rfc3339(),
            log.end_time().map(|dt| dt.to_rfc3339()),
            log.status().as_str(),
            log.total_active.num_milliseconds(),
            log.last_resumed_at().map(|dt| dt.to_rfc3339()),
        ])?;
    }
    Ok(())
}

/// Highest id ever written to `task_logs`, 0 when nothing was.
pub fn query_highest_id(conn: &Connection) -> Result<TaskId> {
    let value = conn
        .query_row(
            "SELECT value FROM meta WHERE key = ?1",
            [HIGHEST_ID_KEY],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value.unwrap_or(0))
}

/// Raises the stored id mark to the highest id in `logs`; never lowers it.
pub fn raise_highest_id(logs: &[TaskRecord], tx: &Transaction) -> Result<()> {
    let Some(highest) = logs.iter().map(|log| log.id).max() else {
        return Ok(());
    };
    tx.execute(
        "INSERT INTO meta (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = MAX(value, excluded.value)",
        (HIGHEST_ID_KEY, highest),
    )?;
    Ok(())
}

fn into_record(row: LogRow) -> Result<TaskRecord> {
    let id = row.id;
    let state = match row.state.as_str() {
        "running" => TaskState::Running {
            resumed_at: parse_required_datetime(row.last_resumed_at, id, "last_resumed_at")?,
        },
        "paused" => TaskState::Paused,
        "completed" => TaskState::Completed {
            end_time: parse_required_datetime(row.end_time, id, "end_time")?,
        },
        other => return Err(anyhow!("Log {id} has unknown state '{other}'")),
    };
    Ok(TaskRecord {
        id,
        name: row.name,
        category_id: row.category_id,
        start_time: parse_required_datetime(Some(row.start_time), id, "start_time")?,
        total_active: Duration::milliseconds(row.total_active_ms),
        state,
    })
}

fn parse_required_datetime(value: Option<String>, id: TaskId, column: &str) -> Result<DateTime<Local>> {
    value
        .and_then(|raw| {
            DateTime::parse_from_rfc3339(&raw)
                .ok()
                .map(|dt| dt.with_timezone(&Local))
        })
        .ok_or_else(|| anyhow!("Log {id} has no parsable {column}"))
}

