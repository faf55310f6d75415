use std::collections::BTreeSet;

use super::task::{Priority, TaskStatus};
use super::user::UserId;

/// User-selected constraints narrowing the visible task set.
///
/// Every dimension is optional: an empty set (or an empty/absent search
/// string) places no restriction on that dimension. Dimensions combine with
/// AND; values within one dimension combine with OR.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterCriteria {
    pub search: Option<String>,
    pub statuses: BTreeSet<TaskStatus>,
    pub priorities: BTreeSet<Priority>,
    pub assignees: BTreeSet<UserId>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.statuses.insert(status);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priorities.insert(priority);
        self
    }

    pub fn with_assignee(mut self, user: impl Into<UserId>) -> Self {
        self.assignees.insert(user.into());
        self
    }

    /// Number of selected filter values, not counting the search text
    pub fn active_filter_count(&self) -> usize {
        self.statuses.len() + self.priorities.len() + self.assignees.len()
    }

    /// The search text, if it restricts anything
    pub fn search_text(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }

    /// True when no dimension restricts the result
    pub fn is_empty(&self) -> bool {
        self.search_text().is_none()
            && self.statuses.is_empty()
            && self.priorities.is_empty()
            && self.assignees.is_empty()
    }
}
