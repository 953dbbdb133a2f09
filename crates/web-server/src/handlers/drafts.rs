use crate::{
    AppState,
    error::AppError,
    params::{LimitQuery, TransactionQuery, bounded_limit},
};
use analytics::draft::{DraftBoard, DraftTendencies, StealsAndBusts};
use analytics::transactions::{MemberActivity, SeasonTransactions, WaiverWireWins};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::{Value, json};
use std::sync::Arc;

/// # GET /api/drafts/seasons
pub async fn get_draft_seasons(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let history = state.snapshot().await?;
    Ok(Json(json!({ "seasons": state.engine.draft_seasons(&history) })))
}

/// # GET /api/drafts/board/:year
pub async fn get_draft_board(
    Path(year): Path<i32>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<DraftBoard>, AppError> {
    let history = state.snapshot().await?;
    Ok(Json(state.engine.draft_board(&history, year)?))
}

/// # GET /api/drafts/report-card/:year
pub async fn get_report_cards(Path(year): Path<i32>, State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let history = state.snapshot().await?;
    let report_cards = state.engine.draft_report_cards(&history, year)?;
    Ok(Json(json!({ "season": year, "report_cards": report_cards })))
}

/// # GET /api/drafts/steals-busts/:year?limit=
pub async fn get_steals_and_busts(
    Path(year): Path<i32>,
    Query(query): Query<LimitQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<StealsAndBusts>, AppError> {
    let limit = bounded_limit(query.limit, 10, 50)?;
    let history = state.snapshot().await?;
    Ok(Json(state.engine.steals_and_busts(&history, year, limit)?))
}

/// # GET /api/drafts/tendencies/:member_id
pub async fn get_tendencies(
    Path(member_id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<DraftTendencies>, AppError> {
    let history = state.snapshot().await?;
    Ok(Json(state.engine.draft_tendencies(&history, member_id)?))
}

/// # GET /api/drafts/transactions/:year?tx_type=
pub async fn get_transactions(
    Path(year): Path<i32>,
    Query(query): Query<TransactionQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<SeasonTransactions>, AppError> {
    let filter = query.filter()?;
    let history = state.snapshot().await?;
    Ok(Json(state.engine.season_transactions(&history, year, filter)?))
}

/// # GET /api/drafts/transactions/activity/:member_id
pub async fn get_member_activity(
    Path(member_id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<MemberActivity>, AppError> {
    let history = state.snapshot().await?;
    Ok(Json(state.engine.member_activity(&history, member_id)?))
}

/// # GET /api/drafts/waiver-wire-wins/:year?limit=
pub async fn get_waiver_wire_wins(
    Path(year): Path<i32>,
    Query(query): Query<LimitQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<WaiverWireWins>, AppError> {
    let limit = bounded_limit(query.limit, 15, 50)?;
    let history = state.snapshot().await?;
    Ok(Json(state.engine.waiver_wire_wins(&history, year, limit)?))
}
