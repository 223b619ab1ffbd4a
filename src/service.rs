/// Task lifecycle: the single current task, the completed log and the category list.
use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{DateTime, Local};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::types::{Category, CategoryId, TaskId, TaskRecord};
use crate::week::WeekWindow;

const DEFAULT_CATEGORIES: [&str; 3] = ["Work", "Personal", "Study"];

/// Durable home of the completed log and the categories. Saves replace
/// whatever was stored before.
pub trait Storage {
    fn load_logs(&self) -> Result<Vec<TaskRecord>>;
    /// Also raises the stored id mark to the highest id in `logs`. The mark
    /// never drops, even when the record holding it is deleted later.
    fn save_logs(&mut self, logs: &[TaskRecord]) -> Result<()>;
    /// Highest task id ever saved, 0 before the first save.
    fn load_highest_id(&self) -> Result<TaskId>;
    fn load_categories(&self) -> Result<Vec<Category>>;
    fn save_categories(&mut self, categories: &[Category]) -> Result<()>;
}

/// Storage that never leaves the process.
#[derive(Clone, Default, Debug)]
pub struct MemoryStorage {
    pub logs: Vec<TaskRecord>,
    pub highest_id: TaskId,
    pub categories: Vec<Category>,
    pub log_saves: usize,
    pub category_saves: usize,
}

impl Storage for MemoryStorage {
    fn load_logs(&self) -> Result<Vec<TaskRecord>> {
        Ok(self.logs.clone())
    }

    fn save_logs(&mut self, logs: &[TaskRecord]) -> Result<()> {
        self.logs = logs.to_vec();
        self.highest_id = logs.iter().map(|log| log.id).fold(self.highest_id, TaskId::max);
        self.log_saves += 1;
        Ok(())
    }

    fn load_highest_id(&self) -> Result<TaskId> {
        Ok(self.highest_id)
    }

    fn load_categories(&self) -> Result<Vec<Category>> {
        Ok(self.categories.clone())
    }

    fn save_categories(&mut self, categories: &[Category]) -> Result<()> {
        self.categories = categories.to_vec();
        self.category_saves += 1;
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StartError {
    #[error("a task is already in progress")]
    AlreadyRunning,
    #[error("unknown category id {0}")]
    UnknownCategory(CategoryId),
}

/// Completed records sharing one week.
#[derive(Debug)]
pub struct WeekGroup<'a> {
    pub window: WeekWindow,
    pub records: Vec<&'a TaskRecord>,
}

pub struct TaskService<S, C> {
    storage: S,
    clock: C,
    logs: Vec<TaskRecord>,
    categories: Vec<Category>,
    current: Option<TaskRecord>,
    highest_logged_id: TaskId,
}

impl<S: Storage, C: Clock> TaskService<S, C> {
    /// Loads the log and categories, seeding the default categories when
    /// none are stored yet.
    pub fn new(mut storage: S, clock: C) -> Result<Self> {
        let logs = storage.load_logs()?;
        let mut categories = storage.load_categories()?;
        debug!(logs = logs.len(), categories = categories.len(), "Loaded stored state");

        if categories.is_empty() {
            categories = DEFAULT_CATEGORIES
                .iter()
                .zip(1..)
                .map(|(name, id)| Category {
                    id,
                    name: name.to_string(),
                })
                .collect();
            storage.save_categories(&categories)?;
            info!("Seeded default categories");
        }

        let highest_logged_id = logs
            .iter()
            .map(|log| log.id)
            .fold(storage.load_highest_id()?, TaskId::max);
        Ok(Self {
            storage,
            clock,
            logs,
            categories,
            current: None,
            highest_logged_id,
        })
    }

    pub fn now(&self) -> DateTime<Local> {
        self.clock.now()
    }

    pub fn current_task(&self) -> Option<&TaskRecord> {
        self.current.as_ref()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn logs(&self) -> &[TaskRecord] {
        &self.logs
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn start(&mut self, name: &str, category_id: CategoryId) -> Result<TaskId, StartError> {
        if self.current.is_some() {
            warn!(name, "Refusing to start while another task is in progress");
            return Err(StartError::AlreadyRunning);
        }
        if self.category(category_id).is_none() {
            warn!(name, category_id, "Refusing to start with unknown category");
            return Err(StartError::UnknownCategory(category_id));
        }

        let id = self.highest_logged_id + 1;
        let task = TaskRecord::started(id, name.to_string(), category_id, self.clock.now());
        info!(id, name, category_id, "Started task");
        self.current = Some(task);
        Ok(id)
    }

    pub fn pause(&mut self) -> bool {
        let now = self.clock.now();
        if let Some(task) = self.current.as_mut() {
            if task.pause_at(now) {
                info!(id = task.id, "Paused task");
                return true;
            }
        }
        debug!("Pause ignored, no running task");
        false
    }

    pub fn resume(&mut self) -> bool {
        let now = self.clock.now();
        if let Some(task) = self.current.as_mut() {
            if task.resume_at(now) {
                info!(id = task.id, "Resumed task");
                return true;
            }
        }
        debug!("Resume ignored, no paused task");
        false
    }

    /// Closes the current task, appends it to the log and saves the log.
    /// Returns the completed record, or `None` when nothing was in progress.
    /// When the save fails the task stays current and the log is unchanged.
    pub fn complete(&mut self) -> Result<Option<TaskRecord>> {
        let Some(mut task) = self.current.clone() else {
            debug!("Complete ignored, no current task");
            return Ok(None);
        };
        task.complete_at(self.clock.now());
        self.logs.push(task.clone());
        if let Err(err) = self.storage.save_logs(&self.logs) {
            self.logs.pop();
            warn!(id = task.id, "Saving the log failed, task stays in progress");
            return Err(err);
        }
        self.current = None;
        self.highest_logged_id = self.highest_logged_id.max(task.id);
        info!(id = task.id, seconds = task.total_active.num_seconds(), "Completed task");
        Ok(Some(task))
    }

    pub fn discard(&mut self) -> Option<TaskRecord> {
        let task = self.current.take();
        if let Some(task) = &task {
            info!(id = task.id, "Discarded task");
        }
        task
    }

    /// Categories are not checked for duplicate names.
    pub fn add_category(&mut self, name: &str) -> Result<Category> {
        let id = self
            .categories
            .iter()
            .map(|category| category.id)
            .max()
            .map_or(1, |max| max + 1);
        let category = Category {
            id,
            name: name.to_string(),
        };
        self.categories.push(category.clone());
        if let Err(err) = self.storage.save_categories(&self.categories) {
            self.categories.pop();
            return Err(err);
        }
        info!(id, name, "Added category");
        Ok(category)
    }

    /// Removes a completed log. Returns false, without saving, for unknown ids.
    /// A failed save puts the record back.
    pub fn delete_log(&mut self, id: TaskId) -> Result<bool> {
        let Some(index) = self.logs.iter().position(|log| log.id == id) else {
            debug!(id, "Delete ignored, no such log");
            return Ok(false);
        };
        let removed = self.logs.remove(index);
        if let Err(err) = self.storage.save_logs(&self.logs) {
            self.logs.insert(index, removed);
            warn!(id, "Saving the log failed, entry kept");
            return Err(err);
        }
        info!(id, "Deleted log");
        Ok(true)
    }

    /// Completed records started on today's calendar day, in log order.
    pub fn today_tasks(&self) -> Vec<&TaskRecord> {
        let today = self.clock.now().date_naive();
        self.logs
            .iter()
            .filter(|log| log.start_time.date_naive() == today)
            .collect()
    }

    /// Completed records bucketed by week, newest week first. Records keep
    /// their log order inside a week.
    pub fn weekly_groups(&self) -> Vec<WeekGroup<'_>> {
        let mut groups: BTreeMap<WeekWindow, Vec<&TaskRecord>> = BTreeMap::new();
        for log in &self.logs {
            groups.entry(WeekWindow::of(log.start_time)).or_default().push(log);
        }
        groups
            .into_iter()
            .rev()
            .map(|(window, records)| WeekGroup { window, records })
            .collect()
    }
}
