use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState,
    error::AppError,
    utils::{ApiResponse, AppJson, message_to_api_response, success_to_api_response},
};

use super::model::{CurrencyPayload, CustomCurrency, normalize_code, validate_rate, validate_symbol};

async fn ensure_code_is_free(state: &AppState, code: &str) -> Result<(), AppError> {
    if CustomCurrency::find_by_code(&state.pool, code).await?.is_some() {
        return Err(AppError::InvalidInput("Currency code already exists".into()));
    }
    Ok(())
}

fn not_found() -> AppError {
    AppError::NotFound("Custom currency not found".into())
}

pub async fn get_active_currencies(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CustomCurrency>>>, AppError> {
    let currencies = CustomCurrency::find_all(&state.pool, true).await?;
    Ok(success_to_api_response(currencies))
}

pub async fn get_all_currencies(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CustomCurrency>>>, AppError> {
    let currencies = CustomCurrency::find_all(&state.pool, false).await?;
    Ok(success_to_api_response(currencies))
}

pub async fn create_currency(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CurrencyPayload>,
) -> Result<Json<ApiResponse<CustomCurrency>>, AppError> {
    let (Some(code), Some(symbol)) = (payload.code.as_deref(), payload.symbol.as_deref()) else {
        return Err(AppError::InvalidInput(
            "Currency code and symbol are required".into(),
        ));
    };

    let code = normalize_code(code)?;
    validate_symbol(symbol)?;
    if let Some(rate) = payload.exchange_rate {
        validate_rate(rate)?;
    }
    ensure_code_is_free(&state, &code).await?;

    let currency = CustomCurrency::create(&state.pool, &code, symbol, &payload).await?;
    tracing::info!("Created custom currency {}", currency.code);
    Ok(success_to_api_response(currency))
}

pub async fn update_currency(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<CurrencyPayload>,
) -> Result<Json<ApiResponse<CustomCurrency>>, AppError> {
    let existing = CustomCurrency::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;

    let code = match payload.code.as_deref() {
        Some(code) if code.trim().to_uppercase() != existing.code => {
            let code = normalize_code(code)?;
            ensure_code_is_free(&state, &code).await?;
            Some(code)
        }
        _ => None,
    };
    if let Some(symbol) = payload.symbol.as_deref() {
        validate_symbol(symbol)?;
    }
    if let Some(rate) = payload.exchange_rate {
        validate_rate(rate)?;
    }

    let currency = CustomCurrency::update(&state.pool, id, code.as_deref(), &payload)
        .await?
        .ok_or_else(not_found)?;
    Ok(success_to_api_response(currency))
}

pub async fn delete_currency(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    if CustomCurrency::delete(&state.pool, id).await? == 0 {
        return Err(not_found());
    }
    tracing::info!("Deleted custom currency {}", id);
    Ok(message_to_api_response("Custom currency deleted successfully"))
}
