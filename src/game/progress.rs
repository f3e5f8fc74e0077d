use super::data::{Task, UserProgress};
use super::rules::{level_for_points, next_level_threshold, POINTS_PER_LEVEL};

pub struct ProgressUpdate {
    pub progress: UserProgress,
    pub leveled_up: bool,
}

pub fn generate_initial_progress() -> UserProgress {
    UserProgress {
        level: 1,
        points: 0,
        tasks_completed: 0,
        streak_days: 0,
        next_level_points: POINTS_PER_LEVEL,
    }
}

/// Folds one task completion into the progress snapshot. Callers must only
/// invoke this once per task transition; the already-completed guard lives
/// at the API boundary.
pub fn apply_task_completion(progress: &UserProgress, task: &Task) -> ProgressUpdate {
    let new_points = progress.points + task.points;
    let new_level = level_for_points(new_points);
    // compared against the level before this completion
    let leveled_up = new_level > progress.level;

    ProgressUpdate {
        progress: UserProgress {
            level: new_level,
            points: new_points,
            tasks_completed: progress.tasks_completed + 1,
            // owned by the external day-boundary tracker, passed through
            streak_days: progress.streak_days,
            next_level_points: next_level_threshold(new_points),
        },
        leveled_up,
    }
}
