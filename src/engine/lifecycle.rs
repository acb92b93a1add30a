//! Transition rules of the match state machine:
//! PENDING -> CONFIRMED (participant other than the submitter, admin, or
//! the sweeper), PENDING -> REJECTED (participant only). Both terminal
//! states refuse further transitions with a conflict.

use chrono::NaiveDateTime;

use crate::config::settings::RatingSettings;
use crate::database::{matches, DbConn, Match, MatchStatus};
use crate::engine::{settlement, Caller};
use crate::errors::EngineError;

pub fn confirm(
    conn: &mut DbConn,
    match_id: i64,
    caller: &Caller,
    now: NaiveDateTime,
    settings: &RatingSettings,
) -> Result<Match, EngineError> {
    let m = fetch(conn, match_id)?;
    require_pending(&m)?;

    if !caller.is_admin {
        if !m.is_participant(caller.id) {
            return Err(EngineError::Authorization(
                "You are not part of this match".to_string(),
            ));
        }
        if m.submitted_by == caller.id {
            return Err(EngineError::Authorization(
                "The submitter cannot confirm their own report".to_string(),
            ));
        }
    }

    settlement::settle(conn, match_id, now, settings)
}

pub fn reject(conn: &mut DbConn, match_id: i64, caller: &Caller) -> Result<(), EngineError> {
    let m = fetch(conn, match_id)?;

    if !m.is_participant(caller.id) {
        return Err(EngineError::Authorization(
            "You are not part of this match".to_string(),
        ));
    }
    require_pending(&m)?;

    let rejected = matches::reject_if_pending(conn, match_id)?;
    if !rejected {
        return Err(EngineError::Conflict(format!(
            "Match {match_id} is not pending"
        )));
    }
    log::info!("Match {} rejected by player {}", match_id, caller.id);
    Ok(())
}

fn fetch(conn: &mut DbConn, match_id: i64) -> Result<Match, EngineError> {
    matches::get_by_id(conn, match_id)?
        .ok_or_else(|| EngineError::NotFound(format!("Match {match_id} not found")))
}

fn require_pending(m: &Match) -> Result<(), EngineError> {
    match m.status {
        MatchStatus::Pending => Ok(()),
        MatchStatus::Confirmed => Err(EngineError::Conflict(format!(
            "Match {} is already confirmed",
            m.id
        ))),
        MatchStatus::Rejected => Err(EngineError::Conflict(format!(
            "Match {} is already rejected",
            m.id
        ))),
    }
}
