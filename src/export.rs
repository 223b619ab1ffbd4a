/// JSON export of the completed log.
use std::{fs::File, io::BufWriter, path::Path};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::types::{Category, TaskRecord};

#[derive(Serialize)]
struct ExportDocument<'a> {
    exported_at: chrono::DateTime<chrono::Local>,
    categories: &'a [Category],
    logs: &'a [TaskRecord],
}

/// Writes categories and logs as one pretty-printed JSON document.
pub fn write_json(
    path: &Path,
    categories: &[Category],
    logs: &[TaskRecord],
    exported_at: chrono::DateTime<chrono::Local>,
) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Cannot create {}", path.display()))?;
    let document = ExportDocument {
        exported_at,
        categories,
        logs,
    };
    serde_json::to_writer_pretty(BufWriter::new(file), &document)?;
    Ok(())
}
