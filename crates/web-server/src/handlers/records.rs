use crate::{AppState, error::AppError};
use analytics::h2h::HeadToHeadMatrix;
use analytics::records::RecordBook;
use axum::{Json, extract::State};
use serde_json::{Value, json};
use std::sync::Arc;

/// # GET /api/records/all-time
pub async fn get_all_time(State(state): State<Arc<AppState>>) -> Result<Json<RecordBook>, AppError> {
    let history = state.snapshot().await?;
    Ok(Json(state.engine.all_time_records(&history)))
}

/// # GET /api/records/h2h-matrix
pub async fn get_h2h_matrix(State(state): State<Arc<AppState>>) -> Result<Json<HeadToHeadMatrix>, AppError> {
    let history = state.snapshot().await?;
    Ok(Json(state.engine.head_to_head_matrix(&history)))
}

/// # GET /api/records/luck-analysis
pub async fn get_luck_analysis(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let history = state.snapshot().await?;
    let analysis = state.engine.luck_analysis(&history);
    Ok(Json(json!({
        "title": "Luck Analysis",
        "description": "Compares actual wins to expected wins based on weekly scoring",
        "analysis": analysis,
    })))
}

/// # GET /api/records/power-rankings
pub async fn get_power_rankings(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let history = state.snapshot().await?;
    let rankings = state.engine.power_rankings(&history);
    Ok(Json(json!({ "title": "All-Time Power Rankings", "rankings": rankings })))
}
