use crate::{AppState, error::AppError};
use analytics::league::{Champions, LeagueOverview, SeasonDetail, SeasonSummary};
use analytics::records::SeasonHighlights;
use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};
use std::sync::Arc;

/// # GET /api/leagues
pub async fn get_league(State(state): State<Arc<AppState>>) -> Result<Json<LeagueOverview>, AppError> {
    let history = state.snapshot().await?;
    Ok(Json(state.engine.league_overview(&history)?))
}

/// # GET /api/leagues/seasons
pub async fn get_seasons(State(state): State<Arc<AppState>>) -> Result<Json<Vec<SeasonSummary>>, AppError> {
    let history = state.snapshot().await?;
    Ok(Json(state.engine.seasons(&history)))
}

/// # GET /api/leagues/seasons/:year
pub async fn get_season(
    Path(year): Path<i32>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<SeasonDetail>, AppError> {
    let history = state.snapshot().await?;
    Ok(Json(state.engine.season_detail(&history, year)?))
}

/// # GET /api/leagues/seasons/:year/highlights
pub async fn get_season_highlights(
    Path(year): Path<i32>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<SeasonHighlights>, AppError> {
    let history = state.snapshot().await?;
    Ok(Json(state.engine.season_highlights(&history, year)?))
}

/// # GET /api/leagues/standings/:year
pub async fn get_standings(Path(year): Path<i32>, State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let history = state.snapshot().await?;
    let standings = state.engine.standings(&history, year)?;
    Ok(Json(json!({ "season": year, "standings": standings })))
}

/// # GET /api/leagues/champions
pub async fn get_champions(State(state): State<Arc<AppState>>) -> Result<Json<Champions>, AppError> {
    let history = state.snapshot().await?;
    Ok(Json(state.engine.champions(&history)))
}
