use std::collections::HashSet;

use chrono::{Duration, NaiveDateTime};

use crate::config::settings::RatingSettings;
use crate::database::{matches, players, DbConn, Match, MatchKind};
use crate::engine::{settlement, Caller};
use crate::errors::EngineError;

#[derive(Debug, Clone)]
pub struct SubmitParams {
    pub kind: MatchKind,
    pub side_a: Vec<i64>,
    pub side_b: Vec<i64>,
    pub games_won_a: i32,
    pub games_won_b: i32,
}

/// Records a reported series. Non-admin submitters must be on one of the
/// rosters and the match waits PENDING until a confirmation or the
/// deadline; admin submissions settle immediately.
pub fn submit(
    conn: &mut DbConn,
    params: &SubmitParams,
    caller: &Caller,
    now: NaiveDateTime,
    settings: &RatingSettings,
) -> Result<Match, EngineError> {
    validate(params)?;

    for &player_id in params.side_a.iter().chain(params.side_b.iter()) {
        players::get_by_id(conn, player_id)?
            .ok_or_else(|| EngineError::NotFound(format!("Player {player_id} not found")))?;
    }

    let is_participant = params
        .side_a
        .iter()
        .chain(params.side_b.iter())
        .any(|&id| id == caller.id);
    if !caller.is_admin && !is_participant {
        return Err(EngineError::Authorization(
            "You must be a participant in the match".to_string(),
        ));
    }

    let confirm_deadline = if caller.is_admin {
        now
    } else {
        now + Duration::hours(settings.confirm_window_hours)
    };

    let created = matches::insert_pending(
        conn,
        params.kind,
        &params.side_a,
        &params.side_b,
        params.games_won_a,
        params.games_won_b,
        caller.id,
        confirm_deadline,
    )?;
    log::info!(
        "Match {} submitted by player {} ({:?}, {}-{})",
        created.id,
        caller.id,
        params.kind,
        params.games_won_a,
        params.games_won_b
    );

    if caller.is_admin {
        return settlement::settle(conn, created.id, now, settings);
    }

    Ok(created)
}

fn validate(params: &SubmitParams) -> Result<(), EngineError> {
    if params.games_won_a < 0 || params.games_won_b < 0 {
        return Err(EngineError::Validation(
            "Game counts cannot be negative".to_string(),
        ));
    }
    if params.games_won_a == 0 && params.games_won_b == 0 {
        return Err(EngineError::Validation(
            "At least one game must be played".to_string(),
        ));
    }

    let per_side = params.kind.side_size();
    if params.side_a.len() != per_side || params.side_b.len() != per_side {
        return Err(EngineError::Validation(format!(
            "{} requires {} player(s) per side",
            params.kind.as_str(),
            per_side
        )));
    }

    let mut seen = HashSet::new();
    for &player_id in params.side_a.iter().chain(params.side_b.iter()) {
        if !seen.insert(player_id) {
            return Err(EngineError::Validation(
                "A player cannot fill two roster slots".to_string(),
            ));
        }
    }

    Ok(())
}
