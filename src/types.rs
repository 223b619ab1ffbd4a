use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};

pub type TaskId = u32;
pub type CategoryId = u32;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Where a task is in its lifecycle. Each variant only carries the timestamps
/// that are meaningful for it, so a running task always knows when it resumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum TaskState {
    Running { resumed_at: DateTime<Local> },
    Paused,
    Completed { end_time: DateTime<Local> },
}

/// Fieldless view of [`TaskState`], handy for display and storage columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskStatus {
    Running,
    Paused,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Running => "running",
            TaskStatus::Paused => "paused",
            TaskStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TaskStatus::Running => "Running",
            TaskStatus::Paused => "Paused",
            TaskStatus::Completed => "Completed",
        };
        f.write_str(label)
    }
}

///A single tracked piece of work and its time accounting
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub name: String,
    pub category_id: CategoryId,
    pub start_time: DateTime<Local>,
    #[serde(with = "millis")]
    pub total_active: Duration,
    #[serde(flatten)]
    pub state: TaskState,
}

impl TaskRecord {
    /// A freshly started task: running since `now` with nothing accumulated.
    pub fn started(id: TaskId, name: String, category_id: CategoryId, now: DateTime<Local>) -> Self {
        Self {
            id,
            name,
            category_id,
            start_time: now,
            total_active: Duration::zero(),
            state: TaskState::Running { resumed_at: now },
        }
    }

    /// Elapsed active time as of `now`. Never cached: a running task keeps
    /// growing between reads.
    pub fn duration(&self, now: DateTime<Local>) -> Duration {
        match self.state {
            TaskState::Running { resumed_at } => self.total_active + stretch(resumed_at, now),
            TaskState::Paused | TaskState::Completed { .. } => self.total_active,
        }
    }

    pub fn status(&self) -> TaskStatus {
        match self.state {
            TaskState::Running { .. } => TaskStatus::Running,
            TaskState::Paused => TaskStatus::Paused,
            TaskState::Completed { .. } => TaskStatus::Completed,
        }
    }

    pub fn last_resumed_at(&self) -> Option<DateTime<Local>> {
        match self.state {
            TaskState::Running { resumed_at } => Some(resumed_at),
            _ => None,
        }
    }

    pub fn end_time(&self) -> Option<DateTime<Local>> {
        match self.state {
            TaskState::Completed { end_time } => Some(end_time),
            _ => None,
        }
    }

    /// Folds the running stretch into `total_active` and leaves the task paused.
    /// Returns false when the task was not running.
    pub(crate) fn pause_at(&mut self, now: DateTime<Local>) -> bool {
        let TaskState::Running { resumed_at } = self.state else {
            return false;
        };
        self.total_active += stretch(resumed_at, now);
        self.state = TaskState::Paused;
        true
    }

    pub(crate) fn resume_at(&mut self, now: DateTime<Local>) -> bool {
        if self.state != TaskState::Paused {
            return false;
        }
        self.state = TaskState::Running { resumed_at: now };
        true
    }

    /// Closes the task. A running stretch is folded in with the same `now`
    /// that becomes the end time.
    pub(crate) fn complete_at(&mut self, now: DateTime<Local>) {
        if let TaskState::Running { resumed_at } = self.state {
            self.total_active += stretch(resumed_at, now);
        }
        self.state = TaskState::Completed { end_time: now };
    }
}

/// One running stretch, cut to whole milliseconds: the precision `total_active`
/// is stored with.
fn stretch(resumed_at: DateTime<Local>, now: DateTime<Local>) -> Duration {
    Duration::milliseconds((now - resumed_at).num_milliseconds())
}

mod millis {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(duration.num_milliseconds())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ms = i64::deserialize(deserializer)?;
        Ok(Duration::milliseconds(ms))
    }
}
