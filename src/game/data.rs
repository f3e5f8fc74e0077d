use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type TaskID = String;
pub type RewardID = String;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn rank(self) -> u32 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskID,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub points: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: RewardID,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image: String,
    pub required_level: u32,
    pub unlocked: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub level: u32,
    pub points: u32,
    pub tasks_completed: u32,
    pub streak_days: u32,
    pub next_level_points: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Snapshot {
    pub progress: UserProgress,
    pub tasks: Vec<Task>,
    pub rewards: Vec<Reward>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AchievementStatus {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub completed: bool,
    pub progress: f64,
    pub target: u32,
    pub current: u32,
}
