pub mod cron;
pub mod matches;
pub mod players;

use std::sync::Arc;

use rusqlite::Connection;

use crate::config::settings::AppConfig;
use crate::database::{self, DbPool};
use crate::engine::Caller;
use crate::errors::EngineError;
use crate::notify::Notifier;

pub struct AppState {
    pub pool: DbPool,
    pub config: AppConfig,
    pub notifier: Arc<dyn Notifier>,
}

/// Maps the caller id supplied by the (external) auth layer onto an engine
/// caller, resolving the admin flag from the player's stored role.
pub fn resolve_caller(conn: &Connection, caller_id: i64) -> Result<Caller, EngineError> {
    let player = database::players::get_by_id(conn, caller_id)?
        .ok_or_else(|| EngineError::NotFound(format!("Player {caller_id} not found")))?;
    Ok(Caller {
        id: player.id,
        is_admin: player.is_admin(),
    })
}
