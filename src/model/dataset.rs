use serde::{Deserialize, Serialize};

use super::task::{Priority, Task, TaskId, TaskStatus};
use super::user::{User, UserId};

/// Users and tasks to seed a store with
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

const AVATAR_BASE: &str = "https://images.unsplash.com/photo-";
const AVATAR_QUERY: &str = "?w=32&h=32&fit=crop&crop=face";

fn user(id: &str, name: &str, photo: &str) -> User {
    User {
        id: UserId::from(id),
        name: name.to_string(),
        avatar: format!("{}{}{}", AVATAR_BASE, photo, AVATAR_QUERY),
    }
}

#[allow(clippy::too_many_arguments)]
fn task(
    id: &str,
    title: &str,
    category: &str,
    (completed, total): (u32, u32),
    progress: u8,
    date: &str,
    (comments, attachments): (u32, u32),
    assignees: &[&str],
    status: TaskStatus,
    priority: Priority,
) -> Task {
    Task {
        id: TaskId::from(id),
        title: title.to_string(),
        category: category.to_string(),
        status,
        priority,
        progress,
        total_tasks: total,
        completed_tasks: completed,
        date: date.to_string(),
        comments,
        attachments,
        assignees: assignees.iter().map(|&a| UserId::from(a)).collect(),
    }
}

impl Dataset {
    /// The demo board: 4 users, 11 tasks (4 todo, 4 in progress, 3 done).
    pub fn mock() -> Self {
        use Priority::*;
        use TaskStatus::*;

        let users = vec![
            user("1", "Vincent", "1472099645785-5658abf4ff4e"),
            user("2", "Sarah", "1494790108755-2616b612cad5"),
            user("3", "John", "1507003211169-0a1dd7228f2d"),
            user("4", "Emma", "1438761681033-6461ffad8d80"),
        ];

        let tasks = vec![
            task(
                "1",
                "Design new ui presentation",
                "Dribbble marketing",
                (7, 10),
                70,
                "24 Aug 2022",
                (7, 2),
                &["1", "2"],
                Todo,
                Medium,
            ),
            task(
                "2",
                "Add more ui/ux mockups",
                "Pinterest promotion",
                (4, 10),
                40,
                "25 Aug 2022",
                (0, 0),
                &["1", "2", "3"],
                Todo,
                Medium,
            ),
            task(
                "3",
                "Design few mobile screens",
                "Dropbox mobile app",
                (3, 10),
                30,
                "26 Aug 2022",
                (6, 4),
                &["2"],
                Todo,
                High,
            ),
            task(
                "4",
                "Create a tweet and promote",
                "Twitter marketing",
                (2, 14),
                20,
                "27 Aug 2022",
                (0, 0),
                &["1", "2", "3"],
                Todo,
                High,
            ),
            task(
                "5",
                "Design system update",
                "Oreo website project",
                (3, 10),
                30,
                "12 Nov 2022",
                (0, 0),
                &["1", "2", "3"],
                InProgress,
                Medium,
            ),
            task(
                "6",
                "Create brand guideline",
                "Oreo branding project",
                (7, 10),
                70,
                "13 Nov 2022",
                (2, 13),
                &["2", "3"],
                InProgress,
                Medium,
            ),
            task(
                "7",
                "Create wireframe for ios app",
                "Oreo ios app project",
                (4, 10),
                40,
                "14 Nov 2022",
                (0, 0),
                &["1", "2", "3"],
                InProgress,
                High,
            ),
            task(
                "8",
                "Create ui kit for layout",
                "Crypto mobile app",
                (3, 10),
                30,
                "15 Nov 2022",
                (23, 12),
                &["3"],
                InProgress,
                High,
            ),
            task(
                "9",
                "Add product to the market",
                "Ui8 marketplace",
                (10, 10),
                100,
                "6 Jan 2022",
                (1, 5),
                &["1", "2", "3"],
                Done,
                Low,
            ),
            task(
                "10",
                "Launch product promotion",
                "Kickstarter campaign",
                (10, 10),
                100,
                "7 Jan 2022",
                (17, 3),
                &["2", "3"],
                Done,
                Low,
            ),
            task(
                "11",
                "Make twitter banner",
                "Twitter marketing",
                (10, 10),
                100,
                "8 Jan 2022",
                (0, 0),
                &["1", "2"],
                Done,
                Low,
            ),
        ];

        Dataset { users, tasks }
    }
}
