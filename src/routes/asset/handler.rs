use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::{AppState, error::AppError, utils::AppJson};

use super::model::{Asset, AssetPayload, DeleteAssetRequest};

pub async fn create_asset(
    State(state): State<AppState>,
    AppJson(payload): AppJson<AssetPayload>,
) -> Result<Json<Asset>, AppError> {
    payload.validate()?;
    Ok(Json(Asset::create(&state.pool, &payload).await?))
}

pub async fn get_assets(State(state): State<AppState>) -> Result<Json<Vec<Asset>>, AppError> {
    Ok(Json(Asset::find_all(&state.pool).await?))
}

pub async fn update_asset(
    State(state): State<AppState>,
    AppJson(payload): AppJson<AssetPayload>,
) -> Result<Json<Asset>, AppError> {
    payload.validate()?;
    Asset::update(&state.pool, &payload)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Asset {} not found", payload.asset_type)))
}

pub async fn delete_asset(
    State(state): State<AppState>,
    AppJson(req): AppJson<DeleteAssetRequest>,
) -> Result<Json<Value>, AppError> {
    let deleted = Asset::delete(&state.pool, &req.asset_type).await?;
    Ok(Json(json!({ "deleted": deleted })))
}
