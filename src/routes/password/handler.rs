use axum::{Json, extract::State, http::HeaderMap};
use axum_extra::extract::CookieJar;

use crate::{
    AppState,
    database::Session,
    error::AppError,
    infrastructure::auth::{self, SESSION_COOKIE, is_request_secure, session_cookie},
    utils::AppJson,
};

use super::model::{PasswordRequest, PasswordStatusResponse, SuccessResponse};

fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

pub type LoginResponse = (CookieJar, Json<SuccessResponse>);

fn login_response(
    state: &AppState,
    session: &Session,
    headers: &HeaderMap,
    jar: CookieJar,
) -> LoginResponse {
    let secure = is_request_secure(headers);
    let cookie = session_cookie(session, state.config.session_ttl(), secure);
    (jar.add(cookie), Json(SuccessResponse { success: true }))
}

pub async fn check_password(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<PasswordStatusResponse>, AppError> {
    let token = session_token(&jar);
    let status = auth::check_status(&state.pool, &state.config, token.as_deref()).await?;
    Ok(Json(status.into()))
}

pub async fn set_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    AppJson(req): AppJson<PasswordRequest>,
) -> Result<LoginResponse, AppError> {
    let token = session_token(&jar);
    let session =
        auth::set_password(&state.pool, &state.config, &req.password, token.as_deref()).await?;
    Ok(login_response(&state, &session, &headers, jar))
}

pub async fn verify_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    AppJson(req): AppJson<PasswordRequest>,
) -> Result<LoginResponse, AppError> {
    let session = auth::verify_password_and_login(&state.pool, &state.config, &req.password).await?;
    tracing::info!("Password verified, session issued");
    Ok(login_response(&state, &session, &headers, jar))
}
