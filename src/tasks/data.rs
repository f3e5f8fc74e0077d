use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::data::{Priority, Reward, TaskID, UserProgress};

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AddTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SetTaskRequest {
    pub task_id: TaskID,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTaskRequest {
    pub task_id: TaskID,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CompleteTaskRequest {
    pub task_id: TaskID,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CompleteTaskResult {
    pub progress: UserProgress,
    pub leveled_up: bool,
    pub newly_unlocked: Vec<Reward>,
}
