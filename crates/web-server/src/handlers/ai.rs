use crate::{AppState, error::AppError};
use axum::{Json, extract::State};
use narrative::{AiStatus, BatchResponse, BlockRequest, NarrativeResponse, Tone};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

fn default_tone() -> String {
    Tone::default().id().to_string()
}

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub page_type: String,
    #[serde(default)]
    pub context: Value,
    #[serde(default = "default_tone")]
    pub tone: String,
}

#[derive(Debug, Deserialize)]
pub struct BlockInsightRequest {
    pub block_type: String,
    #[serde(default)]
    pub context: Value,
    #[serde(default)]
    pub member_context: Option<Value>,
    #[serde(default = "default_tone")]
    pub tone: String,
}

#[derive(Debug, Deserialize)]
pub struct BatchInsightsRequest {
    pub blocks: Vec<BlockRequest>,
}

/// # GET /api/ai/status
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<AiStatus> {
    Json(state.narrator.status())
}

/// # GET /api/ai/tones
pub async fn get_tones() -> Json<Value> {
    Json(json!({ "tones": Tone::options(), "default": Tone::default() }))
}

/// # POST /api/ai/summary
pub async fn post_summary(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SummaryRequest>,
) -> Result<Json<NarrativeResponse>, AppError> {
    let response = state
        .narrator
        .summary(&request.page_type, &request.context, &request.tone)
        .await?;
    Ok(Json(response))
}

/// # POST /api/ai/block-insight
pub async fn post_block_insight(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BlockInsightRequest>,
) -> Result<Json<NarrativeResponse>, AppError> {
    let response = state
        .narrator
        .block_insight(
            &request.block_type,
            &request.context,
            request.member_context.as_ref(),
            &request.tone,
        )
        .await?;
    Ok(Json(response))
}

/// # POST /api/ai/batch-insights
pub async fn post_batch_insights(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BatchInsightsRequest>,
) -> Result<Json<BatchResponse>, AppError> {
    Ok(Json(state.narrator.batch_insights(&request.blocks).await?))
}

/// # DELETE /api/ai/cache/clear
pub async fn clear_cache(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let cleared = state.narrator.clear_cache().await?;
    Ok(Json(json!({ "cleared": cleared })))
}
