//! Backend route table.
//!
//! The exact paths are a compatibility surface shared with the deployed
//! backend — change them only in lockstep with it.  Note the historical
//! `/all-task` (singular, own tasks) vs `/all-tasks` (plural, admin) split.

pub const REGISTER: &str = "/register";
pub const LOGIN: &str = "/login";

/// The signed-in user's own tasks.
pub const ALL_TASK: &str = "/all-task";
/// Every task in the system (admin).
pub const ALL_TASKS: &str = "/all-tasks";
pub const ALL_USERS: &str = "/all-users";

pub const ADD_TASK: &str = "/add-task";
pub const EDIT_USER: &str = "/edit-user";

pub fn task(id: &str) -> String {
    format!("/tasks/{id}")
}

pub fn edit_task(id: &str) -> String {
    format!("/tasks/{id}/edit-task")
}

pub fn delete_task(id: &str) -> String {
    format!("/tasks/{id}/delete-task")
}

pub fn remove_user(id: &str) -> String {
    format!("/user/{id}/remove")
}
