use anyhow::Result;
use log::info;

use crate::config::settings::AppConfig;
use crate::database::{self, DbConn, PlayerRole};

/// Seeds a demo roster: a handful of players at the starting rating plus
/// one administrator. Intended for fresh local databases.
pub fn seed_players(conn: &DbConn, config: &AppConfig) -> Result<usize> {
    let roster = [
        ("Alice Johnson", "alice.johnson@example.com", PlayerRole::Player),
        ("Bob Smith", "bob.smith@example.com", PlayerRole::Player),
        ("Carol White", "carol.white@example.com", PlayerRole::Player),
        ("David Brown", "david.brown@example.com", PlayerRole::Player),
        ("Eve Davis", "eve.davis@example.com", PlayerRole::Player),
        ("Frank Miller", "frank.miller@example.com", PlayerRole::Player),
        ("Grace Admin", "grace.admin@example.com", PlayerRole::Admin),
    ];

    for (name, email, role) in &roster {
        database::players::insert_player(conn, name, email, *role, config.rating.starting_rating)?;
    }

    info!("Seeded {} players", roster.len());
    Ok(roster.len())
}
