use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::time::Clock;
use crate::validators::parse_scheduled_time;

/// Actions a scheduled task can perform on its target device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskAction {
    TurnOn,
    TurnOff,
    SetBrightness,
}

impl TaskAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskAction::TurnOn => "turn_on",
            TaskAction::TurnOff => "turn_off",
            TaskAction::SetBrightness => "set_brightness",
        }
    }
}

impl fmt::Display for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "turn_on" => Ok(TaskAction::TurnOn),
            "turn_off" => Ok(TaskAction::TurnOff),
            "set_brightness" => Ok(TaskAction::SetBrightness),
            other => Err(CoreError::UnknownAction(other.to_string())),
        }
    }
}

/// A scheduled device action.
///
/// `device_id` is a soft foreign key: validated against the caller's
/// dashboard at creation time, never dereferenced afterwards. The task keeps
/// its raw `scheduled_time` string; parsing happens at due-evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub task_id: String,
    pub device_id: String,
    pub action: TaskAction,
    pub scheduled_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u8>,
    pub executed: bool,
    pub created_at: String,
}

impl ScheduledTask {
    pub fn new(
        task_id: impl Into<String>,
        device_id: impl Into<String>,
        action: TaskAction,
        scheduled_time: impl Into<String>,
        brightness: Option<u8>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            device_id: device_id.into(),
            action,
            scheduled_time: scheduled_time.into(),
            brightness,
            executed: false,
            created_at: created_at.into(),
        }
    }
}

/// In-memory collection of scheduled tasks.
///
/// States per task: scheduled → executed (terminal), or scheduled → removed
/// by cancellation. Nothing drives due-evaluation automatically; `run_due`
/// is invoked on demand.
#[derive(Default)]
pub struct Scheduler {
    tasks: Mutex<Vec<ScheduledTask>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a task. Always succeeds; there is no duplicate or conflict
    /// check.
    pub fn schedule(&self, task: ScheduledTask) {
        self.tasks
            .lock()
            .expect("scheduler lock poisoned")
            .push(task);
    }

    /// Cancel (remove) a task by id, reporting whether it existed
    pub fn cancel(&self, task_id: &str) -> bool {
        let mut tasks = self.tasks.lock().expect("scheduler lock poisoned");
        let before = tasks.len();
        tasks.retain(|t| t.task_id != task_id);
        tasks.len() < before
    }

    /// All tasks in scheduling order
    pub fn tasks(&self) -> Vec<ScheduledTask> {
        self.tasks.lock().expect("scheduler lock poisoned").clone()
    }

    pub fn get(&self, task_id: &str) -> Option<ScheduledTask> {
        self.tasks
            .lock()
            .expect("scheduler lock poisoned")
            .iter()
            .find(|t| t.task_id == task_id)
            .cloned()
    }

    /// Mark every due, not-yet-executed task as executed and return them.
    ///
    /// A task is due when its scheduled time parses and is at or before the
    /// clock's now. Malformed timestamps are never due, not an error.
    pub fn run_due(&self, clock: &dyn Clock) -> Vec<ScheduledTask> {
        let now = clock.now();
        let mut tasks = self.tasks.lock().expect("scheduler lock poisoned");
        let mut due = Vec::new();

        for task in tasks.iter_mut() {
            if task.executed {
                continue;
            }
            if let Some(task_time) = parse_scheduled_time(&task.scheduled_time) {
                if task_time <= now {
                    task.executed = true;
                    due.push(task.clone());
                }
            }
        }

        due
    }
}
