use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use stored_rust::Storable;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Storable)]
pub struct TodoListItem {
    pub id: String,
    pub task: String,
    pub priority: u32,
    pub last_update: Option<SystemTime>,
}

impl TodoListItem {
    pub fn new(id: impl Into<String>, task: impl Into<String>, priority: u32) -> Self {
        TodoListItem {
            id: id.into(),
            task: task.into(),
            priority,
            last_update: None,
        }
    }
}

pub fn unique_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
