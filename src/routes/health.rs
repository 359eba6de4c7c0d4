use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::{Value, json};

/// 健康检查
pub async fn heart() -> Json<Value> {
    Json(json!({ "hello": "world ! 🎉" }))
}

/// 未匹配的 API 路径
pub async fn api_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Oops , Page Not Found." })),
    )
}
