use crate::{AppState, error::AppError};
use analytics::nfl::NflTeamDetail;
use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};
use std::sync::Arc;

/// # GET /api/nfl-teams
pub async fn get_nfl_teams(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let history = state.snapshot().await?;
    let teams = state.engine.nfl_teams(&history);
    Ok(Json(json!({ "count": teams.len(), "teams": teams })))
}

/// # GET /api/nfl-teams/:abbr
pub async fn get_nfl_team(
    Path(abbr): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<NflTeamDetail>, AppError> {
    let history = state.snapshot().await?;
    Ok(Json(state.engine.nfl_team_detail(&history, &abbr)?))
}
