use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{Match, MatchKind, MatchStatus};

const MATCH_COLUMNS: &str = "id, kind, side_a_player1, side_a_player2, side_b_player1, side_b_player2, games_won_a, games_won_b, status, submitted_by, confirm_deadline, confirmed_at, rating_change_a1, rating_change_a2, rating_change_b1, rating_change_b2, created_at";

/// Per-slot rating deltas stamped on the match row at settlement.
#[derive(Debug, Clone, Copy)]
pub struct SlotChanges {
    pub a1: i32,
    pub a2: Option<i32>,
    pub b1: i32,
    pub b2: Option<i32>,
}

#[allow(clippy::too_many_arguments)]
pub fn insert_pending(
    conn: &Connection,
    kind: MatchKind,
    side_a: &[i64],
    side_b: &[i64],
    games_won_a: i32,
    games_won_b: i32,
    submitted_by: i64,
    confirm_deadline: NaiveDateTime,
) -> Result<Match> {
    let sql = format!(
        "INSERT INTO matches (kind, side_a_player1, side_a_player2, side_b_player1, side_b_player2, games_won_a, games_won_b, status, submitted_by, confirm_deadline) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'PENDING', ?8, ?9) RETURNING {MATCH_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            kind.as_str(),
            side_a[0],
            side_a.get(1),
            side_b[0],
            side_b.get(1),
            games_won_a,
            games_won_b,
            submitted_by,
            confirm_deadline
        ],
        parse_match_row,
    )
    .context("Failed to insert match")
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<Match> {
    let kind: String = row.get(1)?;
    let status: String = row.get(8)?;
    Ok(Match {
        id: row.get(0)?,
        kind: MatchKind::parse(&kind).ok_or_else(|| conversion_error(1, &kind))?,
        side_a_player1: row.get(2)?,
        side_a_player2: row.get(3)?,
        side_b_player1: row.get(4)?,
        side_b_player2: row.get(5)?,
        games_won_a: row.get(6)?,
        games_won_b: row.get(7)?,
        status: MatchStatus::parse(&status).ok_or_else(|| conversion_error(8, &status))?,
        submitted_by: row.get(9)?,
        confirm_deadline: row.get(10)?,
        confirmed_at: row.get(11)?,
        rating_change_a1: row.get(12)?,
        rating_change_a2: row.get(13)?,
        rating_change_b1: row.get(14)?,
        rating_change_b2: row.get(15)?,
        created_at: row.get(16)?,
    })
}

fn conversion_error(index: usize, value: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        index,
        rusqlite::types::Type::Text,
        format!("unexpected enum value: {value}").into(),
    )
}

pub fn get_by_id(conn: &Connection, match_id: i64) -> Result<Option<Match>> {
    let sql = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = ?1");

    conn.query_row(&sql, params![match_id], parse_match_row)
        .optional()
        .context("Failed to get match by id")
}

/// Flips a PENDING match to CONFIRMED and stamps the settlement outcome.
/// The status guard in the WHERE clause is the compare-and-swap that keeps
/// two concurrent settlement attempts from both succeeding; returns false
/// when the match was no longer PENDING.
pub fn confirm_if_pending(
    conn: &Connection,
    match_id: i64,
    confirmed_at: NaiveDateTime,
    changes: &SlotChanges,
) -> Result<bool> {
    let sql = "UPDATE matches SET status = 'CONFIRMED', confirmed_at = ?1, rating_change_a1 = ?2, rating_change_a2 = ?3, rating_change_b1 = ?4, rating_change_b2 = ?5 WHERE id = ?6 AND status = 'PENDING'";

    let updated = conn
        .execute(
            sql,
            params![
                confirmed_at,
                changes.a1,
                changes.a2,
                changes.b1,
                changes.b2,
                match_id
            ],
        )
        .context("Failed to confirm match")?;
    Ok(updated == 1)
}

/// Same guard as `confirm_if_pending`; rejection stamps no outcome.
pub fn reject_if_pending(conn: &Connection, match_id: i64) -> Result<bool> {
    let sql = "UPDATE matches SET status = 'REJECTED' WHERE id = ?1 AND status = 'PENDING'";

    let updated = conn
        .execute(sql, params![match_id])
        .context("Failed to reject match")?;
    Ok(updated == 1)
}

pub fn delete(conn: &Connection, match_id: i64) -> Result<()> {
    conn.execute("DELETE FROM matches WHERE id = ?1", params![match_id])
        .context("Failed to delete match")
        .map(|_| ())
}

/// Ids of PENDING matches whose confirmation deadline has elapsed.
pub fn list_pending_past_deadline(conn: &Connection, now: NaiveDateTime) -> Result<Vec<i64>> {
    let sql = "SELECT id FROM matches WHERE status = 'PENDING' AND confirm_deadline <= ?1 ORDER BY confirm_deadline ASC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![now], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_for_player(conn: &Connection, player_id: i64, limit: usize) -> Result<Vec<Match>> {
    let sql = format!(
        "SELECT {MATCH_COLUMNS} FROM matches \
         WHERE side_a_player1 = ?1 OR side_a_player2 = ?1 OR side_b_player1 = ?1 OR side_b_player2 = ?1 \
         ORDER BY created_at DESC, id DESC LIMIT ?2"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![player_id, limit as i64], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
