use crate::{AppState, error::AppError};
use analytics::h2h::{MemberHeadToHead, MemberRivalries};
use analytics::members::{MemberProfile, MemberSummary};
use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

/// # GET /api/members
pub async fn get_members(State(state): State<Arc<AppState>>) -> Result<Json<Vec<MemberSummary>>, AppError> {
    let history = state.snapshot().await?;
    Ok(Json(state.engine.members(&history)))
}

/// # GET /api/members/:member_id
pub async fn get_member(
    Path(member_id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<MemberProfile>, AppError> {
    let history = state.snapshot().await?;
    Ok(Json(state.engine.member_profile(&history, member_id)?))
}

/// # GET /api/members/:member_id/head-to-head
pub async fn get_head_to_head(
    Path(member_id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<MemberHeadToHead>, AppError> {
    let history = state.snapshot().await?;
    Ok(Json(state.engine.member_head_to_head(&history, member_id)?))
}

/// # GET /api/members/:member_id/rivalries
pub async fn get_rivalries(
    Path(member_id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<MemberRivalries>, AppError> {
    let history = state.snapshot().await?;
    Ok(Json(state.engine.member_rivalries(&history, member_id)?))
}
