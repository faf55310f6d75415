use regex::Regex;
use serde::Serialize;

use crate::model::config::ColumnTitles;
use crate::model::task::{Priority, Task, TaskStatus};
use crate::model::user::{Roster, User};
use crate::ops::drag::{DragState, DropHighlight};
use crate::ops::query::{BoardView, Columns, MatchField, SearchHit, TaskCounts, search_hits};
use crate::util::unicode::fit_to_width;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct AssigneeJson {
    pub id: String,
    pub name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskJson {
    pub id: String,
    pub title: String,
    pub category: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub progress: u8,
    pub total_tasks: u32,
    pub completed_tasks: u32,
    pub date: String,
    pub comments: u32,
    pub attachments: u32,
    pub assignees: Vec<AssigneeJson>,
    /// Where the search text matched; only present under a search
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hits: Vec<SearchHitJson>,
}

#[derive(Serialize)]
pub struct SearchHitJson {
    pub field: MatchField,
    /// `[start, end)` byte offsets into the field
    pub spans: Vec<[usize; 2]>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListJson {
    pub results: usize,
    pub active_filters: usize,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct ColumnJson {
    pub status: TaskStatus,
    pub title: String,
    /// Whole-board count for this status
    pub count: usize,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardJson {
    pub name: String,
    pub counts: TaskCounts,
    pub results: usize,
    pub active_filters: usize,
    pub columns: Vec<ColumnJson>,
}

#[derive(Serialize)]
pub struct DragJson {
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<TaskStatus>,
    pub drag_over: Vec<TaskStatus>,
}

#[derive(Serialize)]
pub struct BulkJson {
    pub status: TaskStatus,
    pub updated: usize,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &Task, roster: &Roster) -> TaskJson {
    TaskJson {
        id: task.id.to_string(),
        title: task.title.clone(),
        category: task.category.clone(),
        status: task.status,
        priority: task.priority,
        progress: task.progress,
        total_tasks: task.total_tasks,
        completed_tasks: task.completed_tasks,
        date: task.date.clone(),
        comments: task.comments,
        attachments: task.attachments,
        assignees: task
            .assignees
            .iter()
            .zip(roster.names(&task.assignees))
            .map(|(id, name)| AssigneeJson {
                id: id.to_string(),
                name: name.to_string(),
            })
            .collect(),
        hits: Vec::new(),
    }
}

pub fn hits_to_json(hits: &[SearchHit]) -> Vec<SearchHitJson> {
    hits.iter()
        .map(|h| SearchHitJson {
            field: h.field,
            spans: h.spans.iter().map(|r| [r.start, r.end]).collect(),
        })
        .collect()
}

/// `task_to_json` plus the places `search` matched
pub fn searched_task_to_json(task: &Task, roster: &Roster, search: Option<&Regex>) -> TaskJson {
    let mut json = task_to_json(task, roster);
    if let Some(re) = search {
        json.hits = hits_to_json(&search_hits(task, re));
    }
    json
}

pub fn board_to_json(
    name: &str,
    view: &BoardView,
    active_filters: usize,
    search: Option<&Regex>,
    titles: &ColumnTitles,
    roster: &Roster,
) -> BoardJson {
    let counts = view.counts;
    BoardJson {
        name: name.to_string(),
        counts,
        results: view.results,
        active_filters,
        columns: view
            .columns()
            .iter()
            .map(|(status, tasks)| ColumnJson {
                status,
                title: titles.title(status).to_string(),
                count: counts.get(status),
                tasks: tasks
                    .iter()
                    .map(|t| searched_task_to_json(t, roster, search))
                    .collect(),
            })
            .collect(),
    }
}

pub fn drag_to_json(state: &DragState, highlight: &DropHighlight) -> DragJson {
    let (task_id, target) = match state {
        DragState::Dragging { task_id } => (Some(task_id.to_string()), None),
        DragState::Dropped { task_id, target } => (Some(task_id.to_string()), Some(*target)),
        DragState::Idle | DragState::Cancelled => (None, None),
    };
    DragJson {
        state: drag_state_name(state),
        task_id,
        target,
        drag_over: TaskStatus::ALL
            .into_iter()
            .filter(|s| highlight.is_drag_over(*s))
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn assignee_str(task: &Task, roster: &Roster) -> String {
    if task.assignees.is_empty() {
        String::new()
    } else {
        format!(" @{}", roster.names(&task.assignees).join(","))
    }
}

fn category_str(task: &Task) -> String {
    if task.category.is_empty() {
        String::new()
    } else {
        format!(" ({})", task.category)
    }
}

/// Format a single task as a one-line summary
pub fn format_task_line(task: &Task, roster: &Roster) -> String {
    format!(
        "[{}] {} {}{} {} {}%{}",
        task.status.checkbox_char(),
        task.id,
        task.title,
        category_str(task),
        task.priority,
        task.progress,
        assignee_str(task, roster)
    )
}

/// Format detailed task view
pub fn format_task_detail(task: &Task, roster: &Roster, titles: &ColumnTitles) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!(
        "[{}] {} {}",
        task.status.checkbox_char(),
        task.id,
        task.title
    ));
    if !task.category.is_empty() {
        lines.push(format!("category: {}", task.category));
    }
    lines.push(format!("status: {} ({})", task.status, titles.title(task.status)));
    lines.push(format!("priority: {}", task.priority));
    lines.push(format!(
        "progress: {}% ({}/{})",
        task.progress, task.completed_tasks, task.total_tasks
    ));
    if !task.date.is_empty() {
        lines.push(format!("date: {}", task.date));
    }
    lines.push(format!(
        "comments: {}  attachments: {}",
        task.comments, task.attachments
    ));
    if !task.assignees.is_empty() {
        lines.push(format!(
            "assignees: {}",
            roster.names(&task.assignees).join(", ")
        ));
    }
    lines
}

/// `All 11 · To do 4 · In progress 4 · Done 3`
pub fn format_counts(counts: &TaskCounts, titles: &ColumnTitles) -> String {
    let mut parts = vec![format!("All {}", counts.all)];
    for status in TaskStatus::ALL {
        parts.push(format!("{} {}", titles.title(status), counts.get(status)));
    }
    parts.join(" \u{00b7} ")
}

/// `To do (4)`. The count is over the whole board, not the filtered view.
pub fn format_column_header(
    status: TaskStatus,
    counts: &TaskCounts,
    titles: &ColumnTitles,
) -> String {
    format!("{} ({})", titles.title(status), counts.get(status))
}

/// `3 results`, or `3 results · 2 filters` when set-valued filters are active
pub fn format_results(results: usize, active_filters: usize) -> String {
    match active_filters {
        0 => format!("{} results", results),
        1 => format!("{} results \u{00b7} 1 filter", results),
        n => format!("{} results \u{00b7} {} filters", results, n),
    }
}

/// ` (in title, category)`: the fields a search matched
pub fn format_match_fields(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return String::new();
    }
    let fields: Vec<&str> = hits.iter().map(|h| h.field.as_str()).collect();
    format!(" (in {})", fields.join(", "))
}

/// Columns one after another
pub fn format_board(
    columns: &Columns<'_>,
    counts: &TaskCounts,
    results: usize,
    active_filters: usize,
    titles: &ColumnTitles,
    roster: &Roster,
) -> Vec<String> {
    let mut lines = Vec::new();
    for (status, tasks) in columns.iter() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format!("== {} ==", format_column_header(status, counts, titles)));
        for task in tasks {
            lines.push(format_task_line(task, roster));
        }
    }
    lines.push(String::new());
    lines.push(format_results(results, active_filters));
    lines
}

/// Columns side by side, each exactly `width` cells, separated by ` │ `
pub fn format_board_wide(
    columns: &Columns<'_>,
    counts: &TaskCounts,
    titles: &ColumnTitles,
    width: usize,
) -> Vec<String> {
    let width = width.max(8);
    let cell = |text: &str| fit_to_width(text, width);
    let join = |cells: Vec<String>| cells.join(" \u{2502} ").trim_end().to_string();

    let mut lines = Vec::new();
    lines.push(join(
        TaskStatus::ALL
            .iter()
            .map(|s| cell(&format_column_header(*s, counts, titles)))
            .collect(),
    ));
    lines.push(
        TaskStatus::ALL
            .iter()
            .map(|_| "\u{2500}".repeat(width))
            .collect::<Vec<_>>()
            .join("\u{2500}\u{253c}\u{2500}"),
    );

    let depth = columns.iter().map(|(_, t)| t.len()).max().unwrap_or(0);
    for row in 0..depth {
        lines.push(join(
            columns
                .iter()
                .map(|(_, tasks)| match tasks.get(row) {
                    Some(t) => cell(&format!("{} {} {}%", t.id, t.title, t.progress)),
                    None => cell(""),
                })
                .collect(),
        ));
    }
    lines
}

pub fn format_user_line(user: &User) -> String {
    format!("{} {}", user.id, user.name)
}

fn drag_state_name(state: &DragState) -> &'static str {
    match state {
        DragState::Idle => "idle",
        DragState::Dragging { .. } => "dragging",
        DragState::Dropped { .. } => "dropped",
        DragState::Cancelled => "cancelled",
    }
}

pub fn format_drag_state(state: &DragState, highlight: &DropHighlight) -> String {
    let over: Vec<&str> = TaskStatus::ALL
        .into_iter()
        .filter(|s| highlight.is_drag_over(*s))
        .map(|s| s.as_str())
        .collect();
    let base = match state {
        DragState::Dragging { task_id } => format!("dragging {}", task_id),
        DragState::Dropped { task_id, target } => format!("dropped {} on {}", task_id, target),
        other => drag_state_name(other).to_string(),
    };
    if over.is_empty() {
        base
    } else {
        format!("{} (over {})", base, over.join(", "))
    }
}

/// Parse a status string into TaskStatus
pub fn parse_status(s: &str) -> Result<TaskStatus, String> {
    TaskStatus::parse(s)
        .ok_or_else(|| format!("unknown status '{}' (expected: todo, inprogress, done)", s))
}

/// Parse a priority string into Priority
pub fn parse_priority(s: &str) -> Result<Priority, String> {
    Priority::parse(s)
        .ok_or_else(|| format!("unknown priority '{}' (expected: low, medium, high)", s))
}
