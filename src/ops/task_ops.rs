use std::collections::HashSet;

use chrono::Local;

use crate::model::store::TaskStore;
use crate::model::task::{Task, TaskDraft, TaskId, TaskPatch, TaskStatus};

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("task not found: {0}")]
    NotFound(TaskId),
    #[error("duplicate task id: {0}")]
    DuplicateId(TaskId),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Add a task built from `draft` to the end of the board.
/// Returns a snapshot of the new task.
pub fn add_task(store: &mut TaskStore, draft: TaskDraft) -> Task {
    let defaults = store.defaults().clone();
    let id = store.next_id();
    let assignees = store.known_assignees(draft.assignees.unwrap_or_default());

    let task = Task {
        id,
        title: draft.title.unwrap_or_default(),
        category: draft.category.unwrap_or_default(),
        status: draft.status.unwrap_or(defaults.status),
        priority: draft.priority.unwrap_or(defaults.priority),
        progress: 0,
        total_tasks: defaults.total_tasks,
        completed_tasks: 0,
        date: draft
            .date
            .unwrap_or_else(|| today_str(&defaults.date_format)),
        comments: 0,
        attachments: 0,
        assignees,
    };

    store.push(task.clone());
    let version = store.bump_version();
    tracing::debug!(id = %task.id, version, "added task");
    task
}

/// Copy a task under a fresh id. The copy starts over in `todo` with no
/// completed subtasks, and its title gets the configured copy suffix.
pub fn duplicate_task(store: &mut TaskStore, task_id: &TaskId) -> Result<Task, TaskError> {
    let source = store
        .get(task_id)
        .ok_or_else(|| not_found(task_id))?
        .clone();

    let mut copy = source;
    copy.id = store.next_id();
    copy.title = format!("{}{}", copy.title, store.defaults().copy_suffix);
    copy.status = TaskStatus::Todo;
    copy.progress = 0;
    copy.completed_tasks = 0;

    store.push(copy.clone());
    let version = store.bump_version();
    tracing::debug!(source = %task_id, id = %copy.id, version, "duplicated task");
    Ok(copy)
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// Merge `patch` into the task with `task_id`.
pub fn update_task(
    store: &mut TaskStore,
    task_id: &TaskId,
    mut patch: TaskPatch,
) -> Result<Task, TaskError> {
    if let Some(assignees) = patch.assignees.take() {
        patch.assignees = Some(store.known_assignees(assignees));
    }
    let task = store.get_mut(task_id).ok_or_else(|| not_found(task_id))?;
    patch.apply(task);
    let snapshot = task.clone();
    let version = store.bump_version();
    tracing::debug!(id = %task_id, version, "updated task");
    Ok(snapshot)
}

/// Change a task's column. Nothing but `status` is touched; moving a task
/// onto the column it is already in is a valid move.
pub fn move_task(
    store: &mut TaskStore,
    task_id: &TaskId,
    status: TaskStatus,
) -> Result<Task, TaskError> {
    update_task(store, task_id, TaskPatch::status(status))
}

/// Record `completed` finished subtasks and recompute `progress` from them.
/// A task with no subtasks reports 0%.
pub fn update_progress(
    store: &mut TaskStore,
    task_id: &TaskId,
    completed: u32,
) -> Result<Task, TaskError> {
    let total = store
        .get(task_id)
        .ok_or_else(|| not_found(task_id))?
        .total_tasks;
    let patch = TaskPatch {
        completed_tasks: Some(completed),
        progress: Some(progress_percent(completed, total)),
        ..Default::default()
    };
    update_task(store, task_id, patch)
}

/// Set `status` on every listed task in one pass. Ids not on the board are
/// skipped and repeated ids count once. Returns how many tasks were updated.
pub fn bulk_update_status(store: &mut TaskStore, task_ids: &[TaskId], status: TaskStatus) -> usize {
    let wanted: HashSet<&TaskId> = task_ids.iter().collect();
    let mut updated = 0;
    for task in store.tasks_mut() {
        if wanted.contains(&task.id) {
            task.status = status;
            updated += 1;
        }
    }
    if updated > 0 {
        let version = store.bump_version();
        tracing::debug!(updated, %status, version, "bulk status update");
    }
    if updated < wanted.len() {
        tracing::warn!(
            requested = wanted.len(),
            updated,
            "bulk status update skipped unknown ids"
        );
    }
    updated
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

/// Remove a task from the board. Returns the removed task, or `None` when
/// there was nothing to remove.
pub fn delete_task(store: &mut TaskStore, task_id: &TaskId) -> Option<Task> {
    let removed = store.remove(task_id);
    match &removed {
        Some(_) => {
            let version = store.bump_version();
            tracing::debug!(id = %task_id, version, "deleted task");
        }
        None => tracing::warn!(id = %task_id, "delete of unknown task ignored"),
    }
    removed
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `round(completed / total * 100)`, half rounding up, clamped to 0..=100.
pub fn progress_percent(completed: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let (c, t) = (u64::from(completed), u64::from(total));
    let pct = (200 * c + t) / (2 * t);
    pct.min(100) as u8
}

fn not_found(task_id: &TaskId) -> TaskError {
    tracing::warn!(id = %task_id, "task not found");
    TaskError::NotFound(task_id.clone())
}

fn today_str(format: &str) -> String {
    Local::now().format(format).to_string()
}
