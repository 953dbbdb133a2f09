use crate::{
    AppState,
    error::AppError,
    params::{SearchQuery, bounded_limit},
};
use analytics::players::PlayerHistory;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::{Value, json};
use std::sync::Arc;

/// # GET /api/players/search?q=&limit=
pub async fn search_players(
    Query(query): Query<SearchQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let limit = bounded_limit(query.limit, 25, 100)?;
    if query.q.trim().chars().count() < 2 {
        return Err(AppError::BadRequest("q must be at least 2 characters".to_string()));
    }
    let history = state.snapshot().await?;
    let players = state.engine.search_players(&history, &query.q, limit)?;
    Ok(Json(json!({ "query": query.q, "count": players.len(), "players": players })))
}

/// # GET /api/players/history/*name
///
/// The wildcard keeps names containing `/` intact.
pub async fn get_player_history(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<PlayerHistory>, AppError> {
    let history = state.snapshot().await?;
    Ok(Json(state.engine.player_history(&history, &name)?))
}
