use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use rusqlite::Connection;
use std::sync::Arc;

use crate::api::models::{
    CallerRequest, MatchListParams, MatchView, StatusResponse, SubmitMatchRequest,
};
use crate::database::{self, Match, MatchKind, MatchStatus, Side};
use crate::engine::{self, SubmitParams};
use crate::errors::EngineError;
use crate::notify::MatchNotification;

use super::{resolve_caller, AppState};

const DEFAULT_MATCH_LIST_LIMIT: usize = 50;

pub async fn submit_match(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitMatchRequest>,
) -> Result<Json<MatchView>, EngineError> {
    let kind = MatchKind::parse(&req.match_kind)
        .ok_or_else(|| EngineError::Validation(format!("Unknown match kind: {}", req.match_kind)))?;

    let mut conn = state.pool.get()?;
    let caller = resolve_caller(&conn, req.caller_id)?;

    let params = SubmitParams {
        kind,
        side_a: req.side_a,
        side_b: req.side_b,
        games_won_a: req.games_won_a,
        games_won_b: req.games_won_b,
    };
    let now = Utc::now().naive_utc();
    let created = engine::submit(&mut conn, &params, &caller, now, &state.config.rating)?;

    // Committed; anything from here on is best-effort.
    if created.status == MatchStatus::Pending {
        notify_participants(&state, &conn, &created, caller.id);
    }

    Ok(Json(created.into()))
}

pub async fn confirm_match(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<i64>,
    Json(req): Json<CallerRequest>,
) -> Result<Json<MatchView>, EngineError> {
    let mut conn = state.pool.get()?;
    let caller = resolve_caller(&conn, req.caller_id)?;
    let now = Utc::now().naive_utc();
    let confirmed = engine::confirm(&mut conn, match_id, &caller, now, &state.config.rating)?;
    Ok(Json(confirmed.into()))
}

pub async fn reject_match(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<i64>,
    Json(req): Json<CallerRequest>,
) -> Result<Json<StatusResponse>, EngineError> {
    let mut conn = state.pool.get()?;
    let caller = resolve_caller(&conn, req.caller_id)?;
    engine::reject(&mut conn, match_id, &caller)?;
    Ok(Json(StatusResponse { success: true }))
}

pub async fn revert_match(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<i64>,
    Json(req): Json<CallerRequest>,
) -> Result<Json<StatusResponse>, EngineError> {
    let mut conn = state.pool.get()?;
    let caller = resolve_caller(&conn, req.caller_id)?;
    engine::revert(&mut conn, match_id, &caller)?;
    Ok(Json(StatusResponse { success: true }))
}

pub async fn list_matches(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MatchListParams>,
) -> Result<Json<Vec<MatchView>>, EngineError> {
    let conn = state.pool.get()?;
    let limit = params.limit.unwrap_or(DEFAULT_MATCH_LIST_LIMIT);
    let rows = database::matches::list_for_player(&conn, params.player_id, limit)?;
    Ok(Json(rows.into_iter().map(MatchView::from).collect()))
}

fn notify_participants(state: &AppState, conn: &Connection, m: &Match, submitter_id: i64) {
    let payload = match build_notification(conn, m, submitter_id) {
        Ok(payload) => payload,
        Err(err) => {
            log::warn!("Skipping match notification for match {}: {err}", m.id);
            return;
        }
    };

    let recipients: Vec<String> = m
        .participant_ids()
        .iter()
        .filter(|&&id| id != submitter_id)
        .filter_map(|&id| {
            database::players::get_by_id(conn, id)
                .ok()
                .flatten()
                .map(|p| p.email)
        })
        .collect();

    state.notifier.notify(&payload, &recipients);
}

fn build_notification(
    conn: &Connection,
    m: &Match,
    submitter_id: i64,
) -> anyhow::Result<MatchNotification> {
    let name_of = |id: i64| -> anyhow::Result<String> {
        Ok(database::players::get_by_id(conn, id)?
            .map(|p| p.name)
            .unwrap_or_else(|| format!("player {id}")))
    };

    let side_a_names = m
        .roster(Side::A)
        .into_iter()
        .map(name_of)
        .collect::<anyhow::Result<Vec<_>>>()?;
    let side_b_names = m
        .roster(Side::B)
        .into_iter()
        .map(name_of)
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(MatchNotification {
        kind: m.kind,
        submitter_name: name_of(submitter_id)?,
        side_a_names,
        side_b_names,
        games_won_a: m.games_won_a,
        games_won_b: m.games_won_b,
    })
}
