use rocket::serde::json::Json;
use rocket::{get, post, State};

use crate::data::DBConnection;
use crate::game::achievements::evaluate_achievements;
use crate::game::data::{AchievementStatus, Reward, Snapshot, Task, UserProgress};
use crate::game::rules::level_progress_percent;
use crate::internal_error::InternalResult;
use crate::sync::{self, SyncClient};

use super::data::*;
use super::helpers::*;

#[get("/get_data")]
pub fn get_data(db_connection: &State<DBConnection>) -> InternalResult<Json<Snapshot>> {
    let db_connection = db_connection.lock()?;

    let snapshot = load_snapshot(&db_connection)?;

    Ok(Json(snapshot))
}

#[post("/set_data", format = "json", data = "<snapshot>")]
pub fn set_data(
    snapshot: Json<Snapshot>,
    db_connection: &State<DBConnection>,
    sync_client: &State<Option<SyncClient>>,
) -> InternalResult<()> {
    let db_connection = db_connection.lock()?;

    let snapshot = snapshot.into_inner();
    write_snapshot(&db_connection, &snapshot)?;
    sync::push_best_effort(sync_client, &snapshot);

    Ok(())
}

#[get("/get_tasks")]
pub fn get_tasks(db_connection: &State<DBConnection>) -> InternalResult<Json<Vec<Task>>> {
    let db_connection = db_connection.lock()?;

    let mut tasks = load_snapshot(&db_connection)?.tasks;
    sort_tasks_for_display(&mut tasks);

    Ok(Json(tasks))
}

#[post("/add_task", format = "json", data = "<add_task_request>")]
pub fn add_task(
    add_task_request: Json<AddTaskRequest>,
    db_connection: &State<DBConnection>,
    sync_client: &State<Option<SyncClient>>,
) -> InternalResult<Json<Task>> {
    let db_connection = db_connection.lock()?;

    let mut snapshot = load_snapshot(&db_connection)?;
    let task = build_task(add_task_request.into_inner());
    snapshot.tasks.push(task.clone());
    write_snapshot(&db_connection, &snapshot)?;
    sync::push_best_effort(sync_client, &snapshot);

    Ok(Json(task))
}

#[post("/set_task", format = "json", data = "<set_task_request>")]
pub fn set_task(
    set_task_request: Json<SetTaskRequest>,
    db_connection: &State<DBConnection>,
    sync_client: &State<Option<SyncClient>>,
) -> InternalResult<()> {
    let db_connection = db_connection.lock()?;

    let mut snapshot = load_snapshot(&db_connection)?;
    update_task_in_snapshot(&mut snapshot, set_task_request.into_inner())?;
    write_snapshot(&db_connection, &snapshot)?;
    sync::push_best_effort(sync_client, &snapshot);

    Ok(())
}

#[post("/delete_task", format = "json", data = "<delete_task_request>")]
pub fn delete_task(
    delete_task_request: Json<DeleteTaskRequest>,
    db_connection: &State<DBConnection>,
    sync_client: &State<Option<SyncClient>>,
) -> InternalResult<()> {
    let db_connection = db_connection.lock()?;

    let mut snapshot = load_snapshot(&db_connection)?;
    delete_task_from_snapshot(&mut snapshot, &delete_task_request.task_id)?;
    write_snapshot(&db_connection, &snapshot)?;
    sync::push_best_effort(sync_client, &snapshot);

    Ok(())
}

#[post("/complete_task", format = "json", data = "<complete_task_request>")]
pub fn complete_task(
    complete_task_request: Json<CompleteTaskRequest>,
    db_connection: &State<DBConnection>,
    sync_client: &State<Option<SyncClient>>,
) -> InternalResult<Json<CompleteTaskResult>> {
    let db_connection = db_connection.lock()?;

    let mut snapshot = load_snapshot(&db_connection)?;
    let result = complete_task_in_snapshot(&mut snapshot, &complete_task_request.task_id)?;
    write_snapshot(&db_connection, &snapshot)?;
    sync::push_best_effort(sync_client, &snapshot);

    log::info!(
        "task {} completed: {} points, level {} ({:.0}% into the band)",
        complete_task_request.task_id,
        result.progress.points,
        result.progress.level,
        level_progress_percent(result.progress.points)
    );

    Ok(Json(result))
}

#[get("/get_progress")]
pub fn get_progress(db_connection: &State<DBConnection>) -> InternalResult<Json<UserProgress>> {
    let db_connection = db_connection.lock()?;

    let snapshot = load_snapshot(&db_connection)?;

    Ok(Json(snapshot.progress))
}

#[get("/get_rewards")]
pub fn get_rewards(db_connection: &State<DBConnection>) -> InternalResult<Json<Vec<Reward>>> {
    let db_connection = db_connection.lock()?;

    let snapshot = load_snapshot(&db_connection)?;

    Ok(Json(snapshot.rewards))
}

#[get("/get_achievements")]
pub fn get_achievements(
    db_connection: &State<DBConnection>,
) -> InternalResult<Json<Vec<AchievementStatus>>> {
    let db_connection = db_connection.lock()?;

    let snapshot = load_snapshot(&db_connection)?;
    let achievements =
        evaluate_achievements(&snapshot.tasks, &snapshot.progress, &snapshot.rewards);

    Ok(Json(achievements))
}

#[cfg(test)]
mod tests {
    use rocket::http::{ContentType, Status};
    use rocket::local::blocking::Client;
    use rusqlite::Connection;
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    use crate::game::data::Task;

    fn test_client() -> Client {
        let connection = Connection::open_in_memory().unwrap();
        crate::data::init_schema(&connection).unwrap();
        let connection = Arc::new(Mutex::new(connection));

        Client::tracked(crate::rocket(connection, None)).unwrap()
    }

    fn add_task(client: &Client, title: &str, priority: &str) -> Task {
        let response = client
            .post("/api/add_task")
            .header(ContentType::JSON)
            .body(format!(
                r#"{{"title":"{}","priority":"{}"}}"#,
                title, priority
            ))
            .dispatch();
        assert_eq!(response.status(), Status::Ok);

        response.into_json().unwrap()
    }

    fn complete_task(client: &Client, task_id: &str) -> Value {
        let response = client
            .post("/api/complete_task")
            .header(ContentType::JSON)
            .body(format!(r#"{{"taskId":"{}"}}"#, task_id))
            .dispatch();
        assert_eq!(response.status(), Status::Ok);

        response.into_json().unwrap()
    }

    #[test]
    fn fresh_store_serves_the_initial_snapshot() {
        let client = test_client();

        let snapshot: Value = client
            .get("/api/get_data")
            .dispatch()
            .into_json()
            .unwrap();

        assert_eq!(snapshot["progress"]["level"], 1);
        assert_eq!(snapshot["progress"]["nextLevelPoints"], 100);
        assert_eq!(snapshot["tasks"].as_array().unwrap().len(), 0);
        assert_eq!(snapshot["rewards"].as_array().unwrap().len(), 8);
    }

    #[test]
    fn adding_a_task_assigns_points_at_creation() {
        let client = test_client();

        let task = add_task(&client, "Ship it", "high");

        assert_eq!(task.points, 30);
        assert!(!task.completed);
    }

    #[test]
    fn completing_a_task_flows_into_progress() {
        let client = test_client();
        let task = add_task(&client, "Ship it", "high");

        let result = complete_task(&client, &task.id);

        assert_eq!(result["progress"]["points"], 30);
        assert_eq!(result["progress"]["tasksCompleted"], 1);
        assert_eq!(result["leveledUp"], false);
    }

    #[test]
    fn completing_the_same_task_twice_counts_once() {
        let client = test_client();
        let task = add_task(&client, "Ship it", "high");

        complete_task(&client, &task.id);
        let second = complete_task(&client, &task.id);

        assert_eq!(second["progress"]["points"], 30);
        assert_eq!(second["progress"]["tasksCompleted"], 1);
        assert_eq!(second["newlyUnlocked"].as_array().unwrap().len(), 0);

        let progress: Value = client
            .get("/api/get_progress")
            .dispatch()
            .into_json()
            .unwrap();
        assert_eq!(progress["points"], 30);
    }

    #[test]
    fn level_up_unlocks_the_gated_reward() {
        let client = test_client();
        let ids: Vec<String> = (0..4)
            .map(|i| add_task(&client, &format!("task {}", i), "high").id)
            .collect();

        for id in &ids[..3] {
            let result = complete_task(&client, id);
            assert_eq!(result["leveledUp"], false);
        }

        let result = complete_task(&client, &ids[3]);

        assert_eq!(result["progress"]["points"], 120);
        assert_eq!(result["progress"]["level"], 2);
        assert_eq!(result["leveledUp"], true);
        let newly = result["newlyUnlocked"].as_array().unwrap();
        assert!(newly.iter().any(|r| r["requiredLevel"] == 2));

        let rewards: Value = client
            .get("/api/get_rewards")
            .dispatch()
            .into_json()
            .unwrap();
        let unlocked: Vec<&Value> = rewards
            .as_array()
            .unwrap()
            .iter()
            .filter(|r| r["unlocked"] == true)
            .collect();
        assert_eq!(unlocked.len(), 2);
    }

    #[test]
    fn tasks_come_back_sorted_by_priority() {
        let client = test_client();
        add_task(&client, "chores", "low");
        add_task(&client, "deadline", "high");
        add_task(&client, "errand", "medium");

        let tasks: Vec<Task> = client
            .get("/api/get_tasks")
            .dispatch()
            .into_json()
            .unwrap();

        let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["deadline", "errand", "chores"]);
    }

    #[test]
    fn achievements_recompute_from_the_snapshot() {
        let client = test_client();
        let task = add_task(&client, "first", "low");
        complete_task(&client, &task.id);

        let achievements: Value = client
            .get("/api/get_achievements")
            .dispatch()
            .into_json()
            .unwrap();
        let achievements = achievements.as_array().unwrap();

        assert_eq!(achievements.len(), 10);
        let task_master = achievements
            .iter()
            .find(|a| a["id"] == "task_master")
            .unwrap();
        assert_eq!(task_master["current"], 1);
        assert_eq!(task_master["completed"], false);
        assert_eq!(task_master["progress"], 10.0);
    }

    #[test]
    fn snapshot_can_be_replaced_wholesale() {
        let client = test_client();

        let mut snapshot: Value = client
            .get("/api/get_data")
            .dispatch()
            .into_json()
            .unwrap();
        snapshot["progress"]["points"] = Value::from(250);
        snapshot["progress"]["level"] = Value::from(3);
        snapshot["progress"]["nextLevelPoints"] = Value::from(300);

        let response = client
            .post("/api/set_data")
            .header(ContentType::JSON)
            .body(snapshot.to_string())
            .dispatch();
        assert_eq!(response.status(), Status::Ok);

        let progress: Value = client
            .get("/api/get_progress")
            .dispatch()
            .into_json()
            .unwrap();
        assert_eq!(progress["points"], 250);
        assert_eq!(progress["level"], 3);
    }

    #[test]
    fn deleting_an_unknown_task_reports_an_error() {
        let client = test_client();

        let response = client
            .post("/api/delete_task")
            .header(ContentType::JSON)
            .body(r#"{"taskId":"missing"}"#)
            .dispatch();

        assert_eq!(response.status(), Status::InternalServerError);
    }

    #[test]
    fn editing_a_task_keeps_its_creation_points() {
        let client = test_client();
        let task = add_task(&client, "deep work", "high");

        let response = client
            .post("/api/set_task")
            .header(ContentType::JSON)
            .body(format!(
                r#"{{"taskId":"{}","title":"shallow work","priority":"low"}}"#,
                task.id
            ))
            .dispatch();
        assert_eq!(response.status(), Status::Ok);

        let tasks: Vec<Task> = client
            .get("/api/get_tasks")
            .dispatch()
            .into_json()
            .unwrap();
        assert_eq!(tasks[0].title, "shallow work");
        assert_eq!(tasks[0].points, 30);
    }

    #[test]
    fn tasks_sort_in_one_fixed_display_order() {
        let client = test_client();
        for (title, priority) in [("a", "medium"), ("b", "high"), ("c", "high"), ("d", "low")] {
            add_task(&client, title, priority);
        }

        let tasks: Vec<Task> = client
            .get("/api/get_tasks")
            .dispatch()
            .into_json()
            .unwrap();

        let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
        // same priority keeps creation order
        assert_eq!(titles, vec!["b", "c", "a", "d"]);
    }
}
