use serde::{Deserialize, Serialize};
use std::fmt;

use super::user::UserId;

/// Opaque task identifier. Unique within a store for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        TaskId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        TaskId(s)
    }
}

/// Lifecycle stage of a task, which is also the column it sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// All statuses in column order
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    /// Wire name (`todo`, `inprogress`, `done`)
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "inprogress",
            TaskStatus::Done => "done",
        }
    }

    /// Column title used when the config doesn't override it
    pub fn default_title(self) -> &'static str {
        match self {
            TaskStatus::Todo => "To do",
            TaskStatus::InProgress => "In progress",
            TaskStatus::Done => "Done",
        }
    }

    /// The character used inside the checkbox `[ ]`
    pub fn checkbox_char(self) -> char {
        match self {
            TaskStatus::Todo => ' ',
            TaskStatus::InProgress => '>',
            TaskStatus::Done => 'x',
        }
    }

    /// Parse a status name. Accepts the wire names plus `in-progress` / `in_progress`.
    pub fn parse(s: &str) -> Option<TaskStatus> {
        match s.to_ascii_lowercase().as_str() {
            "todo" => Some(TaskStatus::Todo),
            "inprogress" | "in-progress" | "in_progress" => Some(TaskStatus::InProgress),
            "done" => Some(TaskStatus::Done),
            _ => None,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Priority> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One card on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub category: String,
    pub status: TaskStatus,
    pub priority: Priority,
    /// Percentage, 0–100. Stored independently of the counters below.
    pub progress: u8,
    pub total_tasks: u32,
    pub completed_tasks: u32,
    /// Display string, e.g. `24 Aug 2022`
    pub date: String,
    #[serde(default)]
    pub comments: u32,
    #[serde(default)]
    pub attachments: u32,
    /// Roster references, in display order
    #[serde(default)]
    pub assignees: Vec<UserId>,
}

/// Input for creating a task. Anything left `None` gets a default.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assignees: Option<Vec<UserId>>,
}

impl TaskDraft {
    pub fn titled(title: impl Into<String>) -> Self {
        TaskDraft {
            title: Some(title.into()),
            ..Default::default()
        }
    }
}

/// Partial update for an existing task. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub category: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub progress: Option<u8>,
    pub total_tasks: Option<u32>,
    pub completed_tasks: Option<u32>,
    pub date: Option<String>,
    pub comments: Option<u32>,
    pub attachments: Option<u32>,
    pub assignees: Option<Vec<UserId>>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        TaskPatch {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }

    /// Merge the set fields into `task`. `progress` is clamped to 100 and is
    /// not recomputed from the counters.
    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(category) = self.category {
            task.category = category;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(progress) = self.progress {
            task.progress = progress.min(100);
        }
        if let Some(total) = self.total_tasks {
            task.total_tasks = total;
        }
        if let Some(completed) = self.completed_tasks {
            task.completed_tasks = completed;
        }
        if let Some(date) = self.date {
            task.date = date;
        }
        if let Some(comments) = self.comments {
            task.comments = comments;
        }
        if let Some(attachments) = self.attachments {
            task.attachments = attachments;
        }
        if let Some(assignees) = self.assignees {
            task.assignees = assignees;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Task {
        Task {
            id: TaskId::from("1"),
            title: "Design new ui presentation".into(),
            category: "Dribbble marketing".into(),
            status: TaskStatus::Todo,
            priority: Priority::Medium,
            progress: 70,
            total_tasks: 10,
            completed_tasks: 7,
            date: "24 Aug 2022".into(),
            comments: 7,
            attachments: 2,
            assignees: vec![UserId::from("1"), UserId::from("2")],
        }
    }

    #[test]
    fn test_status_parse_aliases() {
        assert_eq!(TaskStatus::parse("todo"), Some(TaskStatus::Todo));
        assert_eq!(TaskStatus::parse("inprogress"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::parse("in-progress"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::parse("In_Progress"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::parse("DONE"), Some(TaskStatus::Done));
        assert_eq!(TaskStatus::parse("blocked"), None);
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!(Priority::parse("High"), Some(Priority::High));
        assert_eq!(Priority::parse("urgent"), None);
    }

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"inprogress\"");
        for status in TaskStatus::ALL {
            assert_eq!(TaskStatus::parse(&status.to_string()), Some(status));
        }
    }

    #[test]
    fn test_task_json_uses_camel_case() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["totalTasks"], 10);
        assert_eq!(value["completedTasks"], 7);
        assert_eq!(value["assignees"], serde_json::json!(["1", "2"]));
    }

    #[test]
    fn test_patch_only_touches_set_fields() {
        let mut task = sample();
        let patch = TaskPatch {
            title: Some("Renamed".into()),
            completed_tasks: Some(9),
            ..Default::default()
        };
        patch.apply(&mut task);
        assert_eq!(task.title, "Renamed");
        assert_eq!(task.completed_tasks, 9);
        // progress is left alone even though the counters moved
        assert_eq!(task.progress, 70);
        assert_eq!(task.category, "Dribbble marketing");
    }

    #[test]
    fn test_patch_clamps_progress() {
        let mut task = sample();
        TaskPatch {
            progress: Some(250),
            ..Default::default()
        }
        .apply(&mut task);
        assert_eq!(task.progress, 100);
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(TaskPatch::default().is_empty());
        assert!(!TaskPatch::status(TaskStatus::Done).is_empty());
    }
}
