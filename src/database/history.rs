use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::models::RatingHistoryEntry;

pub fn insert_entry(
    conn: &Connection,
    player_id: i64,
    match_id: i64,
    rating: i32,
    change: i32,
) -> Result<RatingHistoryEntry> {
    let sql = "INSERT INTO rating_history (player_id, match_id, rating, change) VALUES (?1, ?2, ?3, ?4) RETURNING id, player_id, match_id, rating, change, created_at";

    conn.query_row(
        sql,
        params![player_id, match_id, rating, change],
        parse_history_row,
    )
    .context("Failed to insert rating history entry")
}

fn parse_history_row(row: &rusqlite::Row) -> rusqlite::Result<RatingHistoryEntry> {
    Ok(RatingHistoryEntry {
        id: row.get(0)?,
        player_id: row.get(1)?,
        match_id: row.get(2)?,
        rating: row.get(3)?,
        change: row.get(4)?,
        created_at: row.get(5)?,
    })
}

pub fn list_by_player(conn: &Connection, player_id: i64) -> Result<Vec<RatingHistoryEntry>> {
    let sql = "SELECT id, player_id, match_id, rating, change, created_at FROM rating_history WHERE player_id = ?1 ORDER BY id ASC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![player_id], parse_history_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_by_match(conn: &Connection, match_id: i64) -> Result<Vec<RatingHistoryEntry>> {
    let sql = "SELECT id, player_id, match_id, rating, change, created_at FROM rating_history WHERE match_id = ?1 ORDER BY id ASC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![match_id], parse_history_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Bulk removal used by revert; history rows are never mutated in place.
pub fn delete_by_match(conn: &Connection, match_id: i64) -> Result<usize> {
    conn.execute(
        "DELETE FROM rating_history WHERE match_id = ?1",
        params![match_id],
    )
    .context("Failed to delete rating history for match")
}

/// Net rating movement recorded for a player across all non-reverted matches.
pub fn sum_changes_for_player(conn: &Connection, player_id: i64) -> Result<i32> {
    let sql = "SELECT COALESCE(SUM(change), 0) FROM rating_history WHERE player_id = ?1";

    conn.query_row(sql, params![player_id], |row| row.get(0))
        .context("Failed to sum rating changes for player")
}
