use rusqlite::Connection;

use std::error::Error;
use std::sync::{Arc, Mutex};

mod data;
mod game;
mod internal_error;
mod sync;
mod tasks;

use data::DBConnection;
use sync::SyncClient;
use tasks::endpoints;
use tasks::helpers::write_snapshot;

#[macro_use]
extern crate rocket;

use rocket::{Build, Rocket};

fn rocket(connection: DBConnection, sync_client: Option<SyncClient>) -> Rocket<Build> {
    rocket::build()
        .manage(connection)
        .manage(sync_client)
        .mount(
            "/api",
            routes![
                endpoints::get_data,
                endpoints::set_data,
                endpoints::get_tasks,
                endpoints::add_task,
                endpoints::set_task,
                endpoints::delete_task,
                endpoints::complete_task,
                endpoints::get_progress,
                endpoints::get_rewards,
                endpoints::get_achievements,
            ],
        )
}

#[rocket::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let connection = Connection::open("tasklevels.db")?;
    data::init_schema(&connection)?;

    let sync_client = SyncClient::from_env();
    if let Some(client) = &sync_client {
        match client.fetch_snapshot() {
            Ok(snapshot) => write_snapshot(&connection, &snapshot)?,
            Err(e) => log::warn!(
                "remote sync unavailable, starting from the local snapshot: {}",
                e
            ),
        }
    }

    let connection = Arc::new(Mutex::new(connection));

    rocket(connection, sync_client).launch().await?;

    Ok(())
}
