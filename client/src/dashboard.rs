use shared::types::{Task, User};

/// Rows shown in the "recent activity" card.
pub const RECENT_TASKS: usize = 5;

/// Admin landing-page stats.
#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub total_users: usize,
    pub total_tasks: usize,
    /// Newest first, capped at [`RECENT_TASKS`].
    pub recent_tasks: Vec<Task>,
}

/// Pure summary over already-loaded collections.
pub fn overview(users: &[User], tasks: &[Task]) -> Overview {
    let mut by_created: Vec<&Task> = tasks.iter().collect();
    // Stable: tasks sharing a timestamp (or lacking one) keep list order.
    by_created.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Overview {
        total_users: users.len(),
        total_tasks: tasks.len(),
        recent_tasks: by_created
            .into_iter()
            .take(RECENT_TASKS)
            .cloned()
            .collect(),
    }
}
