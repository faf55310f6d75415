use indexmap::IndexMap;

use super::config::TaskDefaults;
use super::dataset::Dataset;
use super::task::{Task, TaskId};
use super::user::{Roster, UserId};
use crate::ops::task_ops::TaskError;

/// The authoritative, ordered collection of tasks on one board.
///
/// Construct one explicitly per session (or per test); there is no shared
/// global instance. All mutation goes through `ops::task_ops`.
#[derive(Debug, Clone)]
pub struct TaskStore {
    tasks: IndexMap<TaskId, Task>,
    roster: Roster,
    defaults: TaskDefaults,
    /// Bumped on every successful mutation
    version: u64,
    /// Next candidate for a generated numeric id; only ever increases.
    /// Seeded ids are read as `u64`, so stepping past `u64::MAX` still fits.
    next_seq: u128,
}

impl TaskStore {
    /// An empty board over the given roster
    pub fn new(roster: Roster, defaults: TaskDefaults) -> Self {
        TaskStore {
            tasks: IndexMap::new(),
            roster,
            defaults,
            version: 0,
            next_seq: 1,
        }
    }

    /// A board seeded from `dataset`. Fails on duplicate task ids.
    /// Assignee ids missing from the dataset's roster are dropped.
    pub fn seeded(dataset: Dataset, defaults: TaskDefaults) -> Result<Self, TaskError> {
        let mut store = TaskStore::new(Roster::new(dataset.users), defaults);
        for mut task in dataset.tasks {
            if store.tasks.contains_key(&task.id) {
                return Err(TaskError::DuplicateId(task.id));
            }
            task.assignees = store.known_assignees(task.assignees);
            task.progress = task.progress.min(100);
            if let Ok(n) = task.id.as_str().parse::<u64>() {
                store.next_seq = store.next_seq.max(u128::from(n) + 1);
            }
            store.tasks.insert(task.id.clone(), task);
        }
        tracing::debug!(tasks = store.tasks.len(), users = store.roster.len(), "seeded store");
        Ok(store)
    }

    /// Every task in board order
    pub fn list_all(&self) -> Vec<&Task> {
        self.tasks.values().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.tasks.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn defaults(&self) -> &TaskDefaults {
        &self.defaults
    }

    /// Invalidation key for derived views
    pub fn version(&self) -> u64 {
        self.version
    }

    // --- Mutation plumbing for ops::task_ops ---

    pub(crate) fn get_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.get_mut(id)
    }

    pub(crate) fn tasks_mut(&mut self) -> impl Iterator<Item = &mut Task> {
        self.tasks.values_mut()
    }

    pub(crate) fn push(&mut self, task: Task) {
        self.tasks.insert(task.id.clone(), task);
    }

    /// Order-preserving removal
    pub(crate) fn remove(&mut self, id: &TaskId) -> Option<Task> {
        self.tasks.shift_remove(id)
    }

    pub(crate) fn bump_version(&mut self) -> u64 {
        self.version += 1;
        self.version
    }

    /// A fresh id that has never been handed out by this store and does not
    /// collide with any seeded id.
    pub(crate) fn next_id(&mut self) -> TaskId {
        loop {
            let candidate = TaskId::new(self.next_seq.to_string());
            self.next_seq += 1;
            if !self.tasks.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// Keep only assignees present in the roster, preserving order.
    pub(crate) fn known_assignees(&self, ids: Vec<UserId>) -> Vec<UserId> {
        ids.into_iter()
            .filter(|id| {
                let known = self.roster.contains(id);
                if !known {
                    tracing::warn!(user = %id, "dropping unknown assignee");
                }
                known
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{Priority, TaskStatus};
    use crate::model::user::User;

    fn bare_task(id: &str) -> Task {
        Task {
            id: TaskId::from(id),
            title: format!("Task {}", id),
            category: String::new(),
            status: TaskStatus::Todo,
            priority: Priority::Medium,
            progress: 0,
            total_tasks: 10,
            completed_tasks: 0,
            date: String::new(),
            comments: 0,
            attachments: 0,
            assignees: Vec::new(),
        }
    }

    #[test]
    fn test_seeded_rejects_duplicate_ids() {
        let dataset = Dataset {
            users: Vec::new(),
            tasks: vec![bare_task("1"), bare_task("1")],
        };
        let err = TaskStore::seeded(dataset, TaskDefaults::default()).unwrap_err();
        assert!(matches!(err, TaskError::DuplicateId(id) if id.as_str() == "1"));
    }

    #[test]
    fn test_seeded_drops_unknown_assignees() {
        let mut task = bare_task("1");
        task.assignees = vec![UserId::from("a"), UserId::from("ghost")];
        let dataset = Dataset {
            users: vec![User {
                id: "a".into(),
                name: "Ann".into(),
                avatar: String::new(),
            }],
            tasks: vec![task],
        };
        let store = TaskStore::seeded(dataset, TaskDefaults::default()).unwrap();
        let task = store.get(&TaskId::from("1")).unwrap();
        assert_eq!(task.assignees, vec![UserId::from("a")]);
    }

    #[test]
    fn test_next_id_starts_above_seeded_ids() {
        let dataset = Dataset {
            users: Vec::new(),
            tasks: vec![bare_task("3"), bare_task("x"), bare_task("41")],
        };
        let mut store = TaskStore::seeded(dataset, TaskDefaults::default()).unwrap();
        assert_eq!(store.next_id().as_str(), "42");
        assert_eq!(store.next_id().as_str(), "43");
    }

    #[test]
    fn test_next_id_past_largest_u64_id() {
        let dataset = Dataset {
            users: Vec::new(),
            tasks: vec![bare_task("18446744073709551615")],
        };
        let mut store = TaskStore::seeded(dataset, TaskDefaults::default()).unwrap();
        assert_eq!(store.next_id().as_str(), "18446744073709551616");
        assert_eq!(store.next_id().as_str(), "18446744073709551617");
    }

    #[test]
    fn test_next_id_skips_collisions() {
        let mut store = TaskStore::new(Roster::default(), TaskDefaults::default());
        store.push(bare_task("1"));
        store.push(bare_task("2"));
        assert_eq!(store.next_id().as_str(), "3");
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut store = TaskStore::new(Roster::default(), TaskDefaults::default());
        for id in ["1", "2", "3"] {
            store.push(bare_task(id));
        }
        store.remove(&TaskId::from("2"));
        let ids: Vec<_> = store.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }
}
