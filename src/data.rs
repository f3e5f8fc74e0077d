use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

use crate::internal_error::InternalResult;

pub type DBConnection = Arc<Mutex<Connection>>;

pub fn init_schema(connection: &Connection) -> InternalResult<()> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS snapshots (key TEXT PRIMARY KEY, data TEXT)",
        params![],
    )?;

    Ok(())
}
