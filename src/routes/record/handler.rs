use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::{AppState, error::AppError, utils::AppJson};

use super::model::{DeleteRecordRequest, Record, RecordPayload};

pub async fn get_records(State(state): State<AppState>) -> Result<Json<Vec<Record>>, AppError> {
    Ok(Json(Record::find_all(&state.pool).await?))
}

/// 带 `id` 时更新已有快照，否则新建
pub async fn save_record(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RecordPayload>,
) -> Result<Json<Record>, AppError> {
    payload.validate()?;

    let record = match payload.id {
        Some(id) => Record::update(&state.pool, id, &payload)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Record {} not found", id)))?,
        None => Record::insert(&state.pool, &payload).await?,
    };

    Ok(Json(record))
}

pub async fn delete_record(
    State(state): State<AppState>,
    AppJson(req): AppJson<DeleteRecordRequest>,
) -> Result<Json<Value>, AppError> {
    let deleted = Record::delete(&state.pool, req.id).await?;
    Ok(Json(json!({ "deleted": deleted })))
}
