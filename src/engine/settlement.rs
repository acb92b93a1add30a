use chrono::NaiveDateTime;
use rusqlite::Connection;

use crate::config::settings::RatingSettings;
use crate::database::matches::SlotChanges;
use crate::database::{history, matches, players, DbConn, Match, MatchStatus, Side};
use crate::errors::EngineError;
use crate::rating::{compute_ratings, SideOutcome};

/// Settles a PENDING match: computes the ELO outcome, flips the status,
/// overwrites participant ratings, and appends one rating-history row per
/// participant. Everything happens in a single transaction; any failure
/// rolls the whole unit back and leaves the match PENDING.
pub fn settle(
    conn: &mut DbConn,
    match_id: i64,
    now: NaiveDateTime,
    settings: &RatingSettings,
) -> Result<Match, EngineError> {
    let tx = conn.transaction().map_err(EngineError::from)?;
    let settled = settle_in_tx(&tx, match_id, now, settings)?;
    tx.commit().map_err(EngineError::from)?;
    log::info!(
        "Settled match {} ({} games to {})",
        settled.id,
        settled.games_won(settled.winning_side()),
        settled.games_won(settled.winning_side().other())
    );
    Ok(settled)
}

fn settle_in_tx(
    tx: &Connection,
    match_id: i64,
    now: NaiveDateTime,
    settings: &RatingSettings,
) -> Result<Match, EngineError> {
    let m = matches::get_by_id(tx, match_id)?
        .ok_or_else(|| EngineError::NotFound(format!("Match {match_id} not found")))?;

    if m.status != MatchStatus::Pending {
        return Err(EngineError::Conflict(format!(
            "Match {match_id} is not pending"
        )));
    }

    let winning = m.winning_side();
    let winner_ids = m.roster(winning);
    let loser_ids = m.roster(winning.other());

    let winner_ratings = fetch_ratings(tx, &winner_ids)?;
    let loser_ratings = fetch_ratings(tx, &loser_ids)?;

    let outcome = compute_ratings(
        &winner_ratings,
        &loser_ratings,
        m.games_won(winning),
        m.games_won(winning.other()),
        settings.k_factor,
    );

    let (side_a, side_b) = match winning {
        Side::A => (&outcome.winners, &outcome.losers),
        Side::B => (&outcome.losers, &outcome.winners),
    };
    let changes = SlotChanges {
        a1: side_a.deltas[0],
        a2: side_a.deltas.get(1).copied(),
        b1: side_b.deltas[0],
        b2: side_b.deltas.get(1).copied(),
    };

    // The status guard is the concurrency barrier: if another settlement
    // (participant confirm vs. sweeper) got here first, nothing is written.
    let flipped = matches::confirm_if_pending(tx, match_id, now, &changes)?;
    if !flipped {
        return Err(EngineError::Conflict(format!(
            "Match {match_id} is not pending"
        )));
    }

    apply_side(tx, match_id, &winner_ids, &outcome.winners)?;
    apply_side(tx, match_id, &loser_ids, &outcome.losers)?;

    matches::get_by_id(tx, match_id)?
        .ok_or_else(|| EngineError::Persistence(format!("Match {match_id} vanished mid-settlement")))
}

fn fetch_ratings(tx: &Connection, player_ids: &[i64]) -> Result<Vec<i32>, EngineError> {
    player_ids
        .iter()
        .map(|&id| {
            players::get_by_id(tx, id)?
                .map(|p| p.rating)
                .ok_or_else(|| EngineError::NotFound(format!("Player {id} not found")))
        })
        .collect()
}

fn apply_side(
    tx: &Connection,
    match_id: i64,
    player_ids: &[i64],
    outcome: &SideOutcome,
) -> Result<(), EngineError> {
    for (idx, &player_id) in player_ids.iter().enumerate() {
        players::update_rating(tx, player_id, outcome.new_ratings[idx])?;
        history::insert_entry(
            tx,
            player_id,
            match_id,
            outcome.new_ratings[idx],
            outcome.deltas[idx],
        )?;
    }
    Ok(())
}
