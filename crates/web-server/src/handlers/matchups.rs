use crate::{
    AppState,
    error::AppError,
    params::{ListingQuery, WeekQuery},
};
use analytics::matchups::{PlayoffBracket, SeasonMatchups};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::{Value, json};
use std::sync::Arc;

/// # GET /api/matchups/season/:year?week=
pub async fn get_season_matchups(
    Path(year): Path<i32>,
    Query(query): Query<WeekQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<SeasonMatchups>, AppError> {
    let history = state.snapshot().await?;
    Ok(Json(state.engine.season_matchups(&history, year, query.week)?))
}

/// # GET /api/matchups/week/:year/:week
pub async fn get_week_matchups(
    Path((year, week)): Path<(i32, i32)>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<SeasonMatchups>, AppError> {
    let history = state.snapshot().await?;
    Ok(Json(state.engine.season_matchups(&history, year, Some(week))?))
}

/// # GET /api/matchups/playoffs/:year
pub async fn get_playoff_bracket(
    Path(year): Path<i32>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<PlayoffBracket>, AppError> {
    let history = state.snapshot().await?;
    Ok(Json(state.engine.playoff_bracket(&history, year)?))
}

/// # GET /api/matchups/close-games?limit=
pub async fn get_close_games(
    Query(query): Query<ListingQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let history = state.snapshot().await?;
    let games = state.engine.close_games(&history, query.limit());
    Ok(Json(json!({ "title": "Closest Games in League History", "games": games })))
}

/// # GET /api/matchups/blowouts?limit=
pub async fn get_blowouts(
    Query(query): Query<ListingQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let history = state.snapshot().await?;
    let games = state.engine.blowouts(&history, query.limit());
    Ok(Json(json!({ "title": "Biggest Blowouts in League History", "games": games })))
}

/// # GET /api/matchups/highest-scores?limit=
pub async fn get_highest_scores(
    Query(query): Query<ListingQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let history = state.snapshot().await?;
    let scores = state.engine.highest_scores(&history, query.limit());
    Ok(Json(json!({ "title": "Highest Weekly Scores", "scores": scores })))
}

/// # GET /api/matchups/lowest-scores?limit=
pub async fn get_lowest_scores(
    Query(query): Query<ListingQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let history = state.snapshot().await?;
    let scores = state.engine.lowest_scores(&history, query.limit());
    Ok(Json(json!({ "title": "Lowest Weekly Scores", "scores": scores })))
}
