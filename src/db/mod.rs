/// SQLite-backed storage for the task log and categories.
mod category;
mod logs;
mod migrations;

use std::path::Path;

use anyhow::Result;
use rusqlite::Connection;
use tracing::debug;

use crate::service::Storage;
use crate::types::{Category, TaskId, TaskRecord};

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the database file and runs migrations.
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        migrations::run_migrations(&conn)?;
        debug!(path = %db_path.display(), "Opened database");
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrations::run_migrations(&conn)?;
        Ok(Self { conn })
    }
}

impl Storage for SqliteStorage {
    fn load_logs(&self) -> Result<Vec<TaskRecord>> {
        logs::query_logs(&self.conn)
    }

    fn save_logs(&mut self, logs: &[TaskRecord]) -> Result<()> {
        let tx = self.conn.transaction()?;
        logs::replace_logs(logs, &tx)?;
        logs::raise_highest_id(logs, &tx)?;
        tx.commit()?;
        debug!(count = logs.len(), "Saved logs");
        Ok(())
    }

    fn load_highest_id(&self) -> Result<TaskId> {
        logs::query_highest_id(&self.conn)
    }

    fn load_categories(&self) -> Result<Vec<Category>> {
        category::query_categories(&self.conn)
    }

    fn save_categories(&mut self, categories: &[Category]) -> Result<()> {
        let tx = self.conn.transaction()?;
        category::replace_categories(categories, &tx)?;
        tx.commit()?;
        debug!(count = categories.len(), "Saved categories");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Local, TimeZone};

    use super::*;
    use crate::types::TaskState;

    fn start() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 5, 9, 15, 30).unwrap()
    }

    fn sample_logs() -> Vec<TaskRecord> {
        let mut first = TaskRecord::started(1, "Write report".into(), 1, start());
        first.pause_at(start() + Duration::milliseconds(90_250));
        first.complete_at(start() + Duration::hours(2));

        let mut second = TaskRecord::started(4, "Read".into(), 3, start() + Duration::days(1));
        second.complete_at(start() + Duration::days(1) + Duration::minutes(40));
        vec![first, second]
    }

    #[test]
    fn empty_database_loads_nothing() {
        let storage = SqliteStorage::in_memory().unwrap();
        assert!(storage.load_logs().unwrap().is_empty());
        assert!(storage.load_categories().unwrap().is_empty());
    }

    #[test]
    fn logs_round_trip() {
        let mut storage = SqliteStorage::in_memory().unwrap();
        let logs = sample_logs();
        storage.save_logs(&logs).unwrap();
        assert_eq!(storage.load_logs().unwrap(), logs);
    }

    #[test]
    fn save_replaces_previous_logs() {
        let mut storage = SqliteStorage::in_memory().unwrap();
        let logs = sample_logs();
        storage.save_logs(&logs).unwrap();
        storage.save_logs(&logs[1..]).unwrap();

        let loaded = storage.load_logs().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, 4);
    }

    #[test]
    fn sub_millisecond_tracking_round_trips() {
        let mut storage = SqliteStorage::in_memory().unwrap();
        let mut task = TaskRecord::started(1, "Quick".into(), 1, start());
        task.complete_at(start() + Duration::nanoseconds(1_234_567_891));
        storage.save_logs(&[task.clone()]).unwrap();

        assert_eq!(storage.load_logs().unwrap(), vec![task]);
    }

    #[test]
    fn highest_id_survives_deleting_its_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taskman.db");
        let logs = sample_logs();
        {
            let mut storage = SqliteStorage::open(&path).unwrap();
            assert_eq!(storage.load_highest_id().unwrap(), 0);
            storage.save_logs(&logs).unwrap();
            storage.save_logs(&logs[..1]).unwrap();
            storage.save_logs(&[]).unwrap();
        }
        let storage = SqliteStorage::open(&path).unwrap();
        assert_eq!(storage.load_highest_id().unwrap(), 4);
    }

    #[test]
    fn in_progress_states_round_trip() {
        let mut storage = SqliteStorage::in_memory().unwrap();
        let running = TaskRecord::started(1, "Running".into(), 1, start());
        let mut paused = TaskRecord::started(2, "Paused".into(), 1, start());
        paused.pause_at(start() + Duration::minutes(3));
        storage.save_logs(&[running.clone(), paused.clone()]).unwrap();

        let loaded = storage.load_logs().unwrap();
        assert_eq!(loaded, vec![running, paused]);
        assert_eq!(loaded[1].state, TaskState::Paused);
    }

    #[test]
    fn categories_round_trip() {
        let mut storage = SqliteStorage::in_memory().unwrap();
        let categories = vec![
            Category {
                id: 1,
                name: "Work".into(),
            },
            Category {
                id: 2,
                name: "Work".into(),
            },
        ];
        storage.save_categories(&categories).unwrap();
        assert_eq!(storage.load_categories().unwrap(), categories);
    }

    #[test]
    fn reopening_file_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taskman.db");
        let logs = sample_logs();
        {
            let mut storage = SqliteStorage::open(&path).unwrap();
            storage.save_logs(&logs).unwrap();
        }
        let storage = SqliteStorage::open(&path).unwrap();
        assert_eq!(storage.load_logs().unwrap(), logs);
    }

    #[test]
    fn unparsable_timestamp_fails_load() {
        let storage = SqliteStorage::in_memory().unwrap();
        storage
            .conn
            .execute(
                "INSERT INTO task_logs (id, name, category_id, start_time, state, total_active_ms)
                 VALUES (5, 'Broken', 1, 'yesterday', 'paused', 0)",
                [],
            )
            .unwrap();
        let err = storage.load_logs().unwrap_err();
        assert!(err.to_string().contains("Log 5"));
    }
}
