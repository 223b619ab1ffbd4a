/// Runtime paths resolved once at startup.
use std::path::{Path, PathBuf};

use anyhow::Result;

const APP_DIR: &str = "taskman";
const DB_FILE: &str = "taskman.db";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
}

impl Config {
    /// Uses `db_override` when given (flag or `TASKMAN_DB`), otherwise the
    /// user's local data directory. Logs live next to the database.
    pub fn resolve(db_override: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_override {
            Some(path) => path,
            None => default_db_path()?,
        };
        let log_dir = db_path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .join("logs");
        Ok(Self { db_path, log_dir })
    }
}

/// Returns the default database path inside the user's data directory.
/// Falls back to `./taskman.db` when no data dir is found.
fn default_db_path() -> Result<PathBuf> {
    match dirs::data_local_dir() {
        Some(data_dir) => {
            let app_dir = data_dir.join(APP_DIR);
            std::fs::create_dir_all(&app_dir)?;
            Ok(app_dir.join(DB_FILE))
        }
        None => Ok(PathBuf::from(DB_FILE)),
    }
}
