use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::cron::run_sweep;
use crate::api::handlers::matches::{
    confirm_match, list_matches, reject_match, revert_match, submit_match,
};
use crate::api::handlers::players::{get_player_detail, get_players};
use crate::api::handlers::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/players", get(get_players))
        .route("/api/players/:id", get(get_player_detail))
        .route("/api/matches", post(submit_match).get(list_matches))
        .route("/api/matches/:id/confirm", post(confirm_match))
        .route("/api/matches/:id/reject", post(reject_match))
        .route("/api/matches/:id/revert", post(revert_match))
        .route("/api/cron/sweep", post(run_sweep))
        .with_state(state)
}
