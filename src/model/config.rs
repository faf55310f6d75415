use serde::{Deserialize, Serialize};

use super::task::{Priority, TaskStatus};

/// Configuration from board.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub board: BoardInfo,
    #[serde(default)]
    pub defaults: TaskDefaults,
    #[serde(default)]
    pub columns: ColumnTitles,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardInfo {
    #[serde(default = "default_board_name")]
    pub name: String,
}

impl Default for BoardInfo {
    fn default() -> Self {
        BoardInfo {
            name: default_board_name(),
        }
    }
}

/// Values filled in when a task is created without them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDefaults {
    #[serde(default = "default_status")]
    pub status: TaskStatus,
    #[serde(default = "default_priority")]
    pub priority: Priority,
    #[serde(default = "default_total_tasks")]
    pub total_tasks: u32,
    /// chrono format string for the default `date` of new tasks
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Appended to the title of duplicated tasks
    #[serde(default = "default_copy_suffix")]
    pub copy_suffix: String,
}

impl Default for TaskDefaults {
    fn default() -> Self {
        TaskDefaults {
            status: default_status(),
            priority: default_priority(),
            total_tasks: default_total_tasks(),
            date_format: default_date_format(),
            copy_suffix: default_copy_suffix(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnTitles {
    #[serde(default)]
    pub todo: Option<String>,
    #[serde(default)]
    pub inprogress: Option<String>,
    #[serde(default)]
    pub done: Option<String>,
}

impl ColumnTitles {
    pub fn title(&self, status: TaskStatus) -> &str {
        let custom = match status {
            TaskStatus::Todo => &self.todo,
            TaskStatus::InProgress => &self.inprogress,
            TaskStatus::Done => &self.done,
        };
        custom.as_deref().unwrap_or(status.default_title())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// tracing filter directive; RUST_LOG takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
        }
    }
}

fn default_board_name() -> String {
    "Task board".to_string()
}

fn default_status() -> TaskStatus {
    TaskStatus::Todo
}

fn default_priority() -> Priority {
    Priority::Medium
}

fn default_total_tasks() -> u32 {
    10
}

fn default_date_format() -> String {
    "%d %b %Y".to_string()
}

fn default_copy_suffix() -> String {
    " (Copy)".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}
