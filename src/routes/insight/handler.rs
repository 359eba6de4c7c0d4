use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::{
    AppState,
    error::AppError,
    utils::{AppJson, AppQuery},
};

use super::model::{DeleteInsightRequest, Insight, InsightPage, InsightPayload, InsightQuery};

pub async fn create_insight(
    State(state): State<AppState>,
    AppJson(payload): AppJson<InsightPayload>,
) -> Result<Json<Insight>, AppError> {
    payload.validate()?;
    Ok(Json(Insight::create(&state.pool, &payload).await?))
}

pub async fn get_insights(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<InsightQuery>,
) -> Result<Json<InsightPage>, AppError> {
    Ok(Json(Insight::find_page(&state.pool, &query).await?))
}

pub async fn update_insight(
    State(state): State<AppState>,
    AppJson(payload): AppJson<InsightPayload>,
) -> Result<Json<Insight>, AppError> {
    let id = payload
        .id
        .ok_or_else(|| AppError::InvalidInput("id is required".into()))?;
    payload.validate()?;

    Insight::update(&state.pool, id, &payload)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Insight {} not found", id)))
}

pub async fn delete_insight(
    State(state): State<AppState>,
    AppJson(req): AppJson<DeleteInsightRequest>,
) -> Result<Json<Value>, AppError> {
    Insight::delete(&state.pool, req.id).await?;
    Ok(Json(json!({ "result": true })))
}
