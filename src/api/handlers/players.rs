use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;

use crate::api::models::{PlayerDetail, PlayerListItem, PlayerListResponse, RatingHistoryItem};
use crate::database;
use crate::errors::EngineError;

use super::AppState;

pub async fn get_players(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PlayerListResponse>, EngineError> {
    let conn = state.pool.get()?;
    let standings = database::players::list_standings(&conn)?;

    let items: Vec<PlayerListItem> = standings
        .into_iter()
        .enumerate()
        .map(|(i, row)| PlayerListItem {
            rank: i + 1,
            player_id: row.player_id,
            name: row.name,
            rating: row.rating,
            matches_played: row.matches_played,
        })
        .collect();

    let total = items.len();
    Ok(Json(PlayerListResponse { items, total }))
}

pub async fn get_player_detail(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<i64>,
) -> Result<Json<PlayerDetail>, EngineError> {
    let conn = state.pool.get()?;

    let player = database::players::get_by_id(&conn, player_id)?
        .ok_or_else(|| EngineError::NotFound(format!("Player {player_id} not found")))?;
    let history = database::history::list_by_player(&conn, player_id)?;

    Ok(Json(PlayerDetail {
        player_id: player.id,
        name: player.name,
        email: player.email,
        rating: player.rating,
        history: history.into_iter().map(RatingHistoryItem::from).collect(),
    }))
}
