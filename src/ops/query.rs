use std::ops::Range;

use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::model::criteria::FilterCriteria;
use crate::model::store::TaskStore;
use crate::model::task::{Task, TaskStatus};

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Does `task` satisfy every dimension of `criteria`?
pub fn matches(task: &Task, criteria: &FilterCriteria) -> bool {
    if let Some(query) = criteria.search_text() {
        let query = query.to_lowercase();
        if !task.title.to_lowercase().contains(&query)
            && !task.category.to_lowercase().contains(&query)
        {
            return false;
        }
    }
    if !criteria.statuses.is_empty() && !criteria.statuses.contains(&task.status) {
        return false;
    }
    if !criteria.priorities.is_empty() && !criteria.priorities.contains(&task.priority) {
        return false;
    }
    if !criteria.assignees.is_empty()
        && !task.assignees.iter().any(|a| criteria.assignees.contains(a))
    {
        return false;
    }
    true
}

/// The tasks that satisfy `criteria`, in their original order.
pub fn compute_filtered<'a, I>(tasks: I, criteria: &FilterCriteria) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks.into_iter().filter(|t| matches(t, criteria)).collect()
}

// ---------------------------------------------------------------------------
// Grouping and counts
// ---------------------------------------------------------------------------

/// Tasks partitioned into board columns, each in original relative order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Columns<'a> {
    pub todo: Vec<&'a Task>,
    pub inprogress: Vec<&'a Task>,
    pub done: Vec<&'a Task>,
}

impl<'a> Columns<'a> {
    pub fn get(&self, status: TaskStatus) -> &[&'a Task] {
        match status {
            TaskStatus::Todo => &self.todo,
            TaskStatus::InProgress => &self.inprogress,
            TaskStatus::Done => &self.done,
        }
    }

    /// `(status, tasks)` in column order
    pub fn iter(&self) -> impl Iterator<Item = (TaskStatus, &[&'a Task])> {
        TaskStatus::ALL.into_iter().map(move |s| (s, self.get(s)))
    }
}

pub fn group_by_status<'a, I>(tasks: I) -> Columns<'a>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut columns = Columns::default();
    for task in tasks {
        match task.status {
            TaskStatus::Todo => columns.todo.push(task),
            TaskStatus::InProgress => columns.inprogress.push(task),
            TaskStatus::Done => columns.done.push(task),
        }
    }
    columns
}

/// Total and per-status task counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskCounts {
    pub all: usize,
    pub todo: usize,
    pub inprogress: usize,
    pub done: usize,
}

impl TaskCounts {
    pub fn get(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Todo => self.todo,
            TaskStatus::InProgress => self.inprogress,
            TaskStatus::Done => self.done,
        }
    }
}

pub fn compute_counts<'a, I>(tasks: I) -> TaskCounts
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut counts = TaskCounts::default();
    for task in tasks {
        counts.all += 1;
        match task.status {
            TaskStatus::Todo => counts.todo += 1,
            TaskStatus::InProgress => counts.inprogress += 1,
            TaskStatus::Done => counts.done += 1,
        }
    }
    counts
}

// ---------------------------------------------------------------------------
// Store-facing queries
// ---------------------------------------------------------------------------

pub fn list_filtered<'a>(store: &'a TaskStore, criteria: &FilterCriteria) -> Vec<&'a Task> {
    compute_filtered(store.iter(), criteria)
}

pub fn grouped_by_status<'a>(store: &'a TaskStore, criteria: &FilterCriteria) -> Columns<'a> {
    group_by_status(list_filtered(store, criteria))
}

/// Counts over the whole board, independent of any active filter
pub fn counts(store: &TaskStore) -> TaskCounts {
    compute_counts(store.iter())
}

// ---------------------------------------------------------------------------
// Search highlighting
// ---------------------------------------------------------------------------

/// Which field of a task matched the search text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchField {
    Title,
    Category,
}

impl MatchField {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchField::Title => "title",
            MatchField::Category => "category",
        }
    }
}

/// Byte ranges of the search text within one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub field: MatchField,
    pub spans: Vec<Range<usize>>,
}

/// Case-insensitive literal matcher for `query`
pub fn search_regex(query: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
}

/// Collect all non-overlapping match byte-ranges for a regex in the given text.
fn find_matches(re: &Regex, text: &str) -> Vec<Range<usize>> {
    re.find_iter(text).map(|m| m.start()..m.end()).collect()
}

/// Where `re` matches in the task's title and category.
pub fn search_hits(task: &Task, re: &Regex) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    for (field, text) in [
        (MatchField::Title, task.title.as_str()),
        (MatchField::Category, task.category.as_str()),
    ] {
        let spans = find_matches(re, text);
        if !spans.is_empty() {
            hits.push(SearchHit { field, spans });
        }
    }
    hits
}

// ---------------------------------------------------------------------------
// Cached views
// ---------------------------------------------------------------------------

/// Everything a board render needs for one criteria value.
///
/// `counts` covers the whole board; `results` is the size of the filtered
/// set. The two are never merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub filtered: Vec<Task>,
    pub counts: TaskCounts,
    pub results: usize,
}

impl BoardView {
    pub fn compute(store: &TaskStore, criteria: &FilterCriteria) -> Self {
        let filtered: Vec<Task> = list_filtered(store, criteria).into_iter().cloned().collect();
        BoardView {
            results: filtered.len(),
            counts: counts(store),
            filtered,
        }
    }

    pub fn columns(&self) -> Columns<'_> {
        group_by_status(&self.filtered)
    }
}

/// Recomputes a `BoardView` only when the store version or the criteria change
#[derive(Debug, Default)]
pub struct ViewCache {
    key: Option<(u64, FilterCriteria)>,
    view: Option<BoardView>,
    recomputes: usize,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&mut self, store: &TaskStore, criteria: &FilterCriteria) -> &BoardView {
        let fresh = matches!(
            &self.key,
            Some((version, cached)) if *version == store.version() && cached == criteria
        );
        if !fresh {
            self.key = Some((store.version(), criteria.clone()));
            self.view = None;
        }
        self.view.get_or_insert_with(|| {
            self.recomputes += 1;
            tracing::trace!(version = store.version(), "recomputing board view");
            BoardView::compute(store, criteria)
        })
    }

    /// How many times the view has been rebuilt
    pub fn recomputes(&self) -> usize {
        self.recomputes
    }
}
