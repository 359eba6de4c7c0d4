use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Query};
use bcrypt::{hash, verify};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::Serialize;

use crate::error::AppError;

/// JSON body extractor that reports malformed input as `AppError::InvalidInput`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub fn success_to_api_response<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        data: Some(data),
        message: None,
    })
}

pub fn message_to_api_response(message: &str) -> Json<ApiResponse<()>> {
    Json(ApiResponse {
        success: true,
        data: None,
        message: Some(message.to_string()),
    })
}

/// Hashes `password + pepper` with bcrypt on the blocking pool.
pub async fn hash_password(password: &str, pepper: &str, cost: u32) -> Result<String, AppError> {
    let peppered = format!("{}{}", password, pepper);
    tokio::task::spawn_blocking(move || hash(peppered.as_bytes(), cost))
        .await
        .map_err(|e| AppError::Internal(format!("hashing task failed: {}", e)))?
        .map_err(AppError::from)
}

/// Stored hashes may pick up surrounding whitespace when the database moves
/// between environments, so the hash is trimmed before comparison.
pub async fn verify_password(password: &str, pepper: &str, stored: &str) -> Result<bool, AppError> {
    let peppered = format!("{}{}", password, pepper);
    let stored = stored.trim().to_string();
    tokio::task::spawn_blocking(move || verify(peppered.as_bytes(), &stored))
        .await
        .map_err(|e| AppError::Internal(format!("verification task failed: {}", e)))?
        .map_err(AppError::from)
}

/// 256 bits from the OS RNG, hex encoded.
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
