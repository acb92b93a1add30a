use axum::extract::State;
use axum::Json;
use chrono::Utc;
use std::sync::Arc;

use crate::engine::{self, SweepReport};
use crate::errors::EngineError;

use super::AppState;

/// Endpoint for the external scheduler (cron hitting it hourly). The
/// clock is read here, at the trigger boundary, never inside the sweep.
pub async fn run_sweep(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SweepReport>, EngineError> {
    let mut conn = state.pool.get()?;
    let now = Utc::now().naive_utc();
    let report = engine::sweep(&mut conn, now, &state.config.rating)?;
    Ok(Json(report))
}
