use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        UserId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        UserId(s.to_string())
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        UserId(s)
    }
}

/// A person who can be assigned to tasks. Reference data, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Avatar image URI
    #[serde(default)]
    pub avatar: String,
}

/// The set of known users, in roster order
#[derive(Debug, Clone, Default)]
pub struct Roster {
    users: IndexMap<UserId, User>,
}

impl Roster {
    pub fn new(users: impl IntoIterator<Item = User>) -> Self {
        Roster {
            users: users.into_iter().map(|u| (u.id.clone(), u)).collect(),
        }
    }

    pub fn get(&self, id: &UserId) -> Option<&User> {
        self.users.get(id)
    }

    pub fn contains(&self, id: &UserId) -> bool {
        self.users.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Look up a user by id, falling back to a case-insensitive name match.
    pub fn resolve(&self, key: &str) -> Option<&User> {
        self.users
            .get(&UserId::from(key))
            .or_else(|| self.users.values().find(|u| u.name.eq_ignore_ascii_case(key)))
    }

    /// Names for a list of assignee ids. Unknown ids render as the raw id.
    pub fn names<'a>(&'a self, ids: &'a [UserId]) -> Vec<&'a str> {
        ids.iter()
            .map(|id| self.get(id).map(|u| u.name.as_str()).unwrap_or(id.as_str()))
            .collect()
    }
}
