use axum::{Json, extract::State};

use crate::{
    AppState,
    error::AppError,
    utils::{ApiResponse, AppJson, success_to_api_response},
};

use super::model::{SettingsPatch, UserSettings};

pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UserSettings>>, AppError> {
    let settings = UserSettings::get_or_create(&state.pool).await?;
    Ok(success_to_api_response(settings))
}

pub async fn update_settings(
    State(state): State<AppState>,
    AppJson(patch): AppJson<SettingsPatch>,
) -> Result<Json<ApiResponse<UserSettings>>, AppError> {
    if let Some(t) = patch.temperature {
        if !(0.0..=2.0).contains(&t) {
            return Err(AppError::InvalidInput("temperature must be between 0 and 2".into()));
        }
    }

    let settings = UserSettings::update(&state.pool, &patch).await?;
    tracing::info!("User settings updated");
    Ok(success_to_api_response(settings))
}
