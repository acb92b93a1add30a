use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{Player, PlayerRole, PlayerStanding};

pub fn insert_player(
    conn: &Connection,
    name: &str,
    email: &str,
    role: PlayerRole,
    rating: i32,
) -> Result<Player> {
    let sql = "INSERT INTO players (name, email, role, rating) VALUES (?1, ?2, ?3, ?4) RETURNING id, name, email, role, rating, created_at";

    conn.query_row(sql, params![name, email, role.as_str(), rating], parse_player_row)
        .context("Failed to insert player")
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    let role: String = row.get(3)?;
    Ok(Player {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        role: PlayerRole::parse(&role).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                3,
                rusqlite::types::Type::Text,
                format!("unknown player role: {role}").into(),
            )
        })?,
        rating: row.get(4)?,
        created_at: row.get(5)?,
    })
}

pub fn get_by_id(conn: &Connection, player_id: i64) -> Result<Option<Player>> {
    let sql = "SELECT id, name, email, role, rating, created_at FROM players WHERE id = ?1";

    conn.query_row(sql, params![player_id], parse_player_row)
        .optional()
        .context("Failed to get player by id")
}

pub fn update_rating(conn: &Connection, player_id: i64, rating: i32) -> Result<()> {
    let sql = "UPDATE players SET rating = ?1 WHERE id = ?2";

    let updated = conn
        .execute(sql, params![rating, player_id])
        .context("Failed to update player rating")?;
    anyhow::ensure!(updated == 1, "No player with id {player_id}");
    Ok(())
}

/// Leaderboard rows ordered by rating, with per-player confirmed match counts.
pub fn list_standings(conn: &Connection) -> Result<Vec<PlayerStanding>> {
    let sql = "
        SELECT
            p.id,
            p.name,
            p.rating,
            (SELECT COUNT(*) FROM matches m
             WHERE m.status = 'CONFIRMED'
               AND (m.side_a_player1 = p.id OR m.side_a_player2 = p.id
                 OR m.side_b_player1 = p.id OR m.side_b_player2 = p.id)) AS matches_played
        FROM players p
        ORDER BY p.rating DESC, p.name ASC
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(PlayerStanding {
                player_id: row.get(0)?,
                name: row.get(1)?,
                rating: row.get(2)?,
                matches_played: row.get(3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
