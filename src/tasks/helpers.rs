use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::game::data::{Snapshot, Task};
use crate::game::progress::{apply_task_completion, generate_initial_progress};
use crate::game::rewards::{default_rewards, recompute_unlocks};
use crate::game::rules::points_for_priority;
use crate::internal_error::{InternalError, InternalResult};

use super::data::*;

pub const SNAPSHOT_KEY: &str = "tasklevels-data";

pub fn read_snapshot(db_connection: &Connection) -> InternalResult<Option<Snapshot>> {
    let data = db_connection
        .query_row(
            "SELECT data FROM snapshots WHERE key = (?1)",
            params![SNAPSHOT_KEY],
            |row| row.get::<usize, String>(0),
        )
        .optional()?;

    match data {
        Some(data) => Ok(Some(serde_json::from_str(&data)?)),
        None => Ok(None),
    }
}

pub fn initial_snapshot() -> Snapshot {
    Snapshot {
        progress: generate_initial_progress(),
        tasks: vec![],
        rewards: default_rewards(),
    }
}

pub fn load_snapshot(db_connection: &Connection) -> InternalResult<Snapshot> {
    Ok(read_snapshot(db_connection)?.unwrap_or_else(initial_snapshot))
}

pub fn write_snapshot(db_connection: &Connection, snapshot: &Snapshot) -> InternalResult<()> {
    let data = serde_json::to_string(snapshot)?;
    db_connection.execute(
        "INSERT OR REPLACE INTO snapshots VALUES (?1, ?2)",
        params![SNAPSHOT_KEY, data],
    )?;

    Ok(())
}

pub fn build_task(request: AddTaskRequest) -> Task {
    let points = points_for_priority(request.priority);

    Task {
        id: Uuid::new_v4().to_string(),
        title: request.title,
        description: request.description,
        priority: request.priority,
        due_date: request.due_date,
        completed: false,
        created_at: Utc::now(),
        points,
    }
}

pub fn sort_tasks_for_display(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then(a.created_at.cmp(&b.created_at))
    });
}

fn find_task_mut<'a>(tasks: &'a mut [Task], task_id: &str) -> InternalResult<&'a mut Task> {
    tasks
        .iter_mut()
        .find(|task| task.id == task_id)
        .ok_or_else(|| InternalError::from("No task with the given id"))
}

pub fn update_task_in_snapshot(
    snapshot: &mut Snapshot,
    request: SetTaskRequest,
) -> InternalResult<()> {
    let task = find_task_mut(&mut snapshot.tasks, &request.task_id)?;

    task.title = request.title;
    task.description = request.description;
    task.priority = request.priority;
    task.due_date = request.due_date;
    // id, completed, created_at and points stay as they were; points were
    // assigned at creation and an edited priority does not recompute them

    Ok(())
}

pub fn delete_task_from_snapshot(snapshot: &mut Snapshot, task_id: &str) -> InternalResult<()> {
    let before = snapshot.tasks.len();
    snapshot.tasks.retain(|task| task.id != task_id);

    if snapshot.tasks.len() == before {
        return Err(InternalError::from("No task with the given id"));
    }

    Ok(())
}

/// The single mutation path into the progression engine: guard, fold the
/// completion into progress, recompute reward unlocks.
pub fn complete_task_in_snapshot(
    snapshot: &mut Snapshot,
    task_id: &str,
) -> InternalResult<CompleteTaskResult> {
    let task = find_task_mut(&mut snapshot.tasks, task_id)?;

    // completion is one-way; re-applying an already completed task must not
    // count its points a second time
    if task.completed {
        return Ok(CompleteTaskResult {
            progress: snapshot.progress.clone(),
            leveled_up: false,
            newly_unlocked: vec![],
        });
    }

    task.completed = true;
    let task = task.clone();

    let update = apply_task_completion(&snapshot.progress, &task);
    let (rewards, newly_unlocked) = recompute_unlocks(&snapshot.rewards, update.progress.level);

    snapshot.progress = update.progress.clone();
    snapshot.rewards = rewards;

    Ok(CompleteTaskResult {
        progress: update.progress,
        leveled_up: update.leveled_up,
        newly_unlocked,
    })
}
