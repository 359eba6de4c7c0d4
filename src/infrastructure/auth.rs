use std::time::Duration;

use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, SameSite};
use sqlx::SqlitePool;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::database::{PasswordRepository, Session, SessionRepository};
use crate::error::AppError;
use crate::utils::{hash_password, verify_password};

pub const SESSION_COOKIE: &str = "sessionId";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordStatus {
    pub allow_password: bool,
    pub password_is_set: bool,
    pub session_is_valid: bool,
    pub reset_is_allowed: bool,
}

impl PasswordStatus {
    /// 功能开启、已设置密码、且没有有效会话时，才需要输入密码
    pub fn need_password(&self) -> bool {
        self.allow_password && self.password_is_set && !self.session_is_valid
    }
}

pub async fn check_status(
    pool: &SqlitePool,
    config: &Config,
    token: Option<&str>,
) -> Result<PasswordStatus, AppError> {
    let password_is_set = PasswordRepository::get_password(pool).await?.is_some();

    if !config.allow_password {
        return Ok(PasswordStatus {
            allow_password: false,
            password_is_set,
            session_is_valid: true,
            reset_is_allowed: config.can_be_reset,
        });
    }

    let session_is_valid = match token {
        Some(token) => SessionRepository::validate(pool, token).await?,
        None => false,
    };

    Ok(PasswordStatus {
        allow_password: true,
        password_is_set,
        session_is_valid,
        reset_is_allowed: config.can_be_reset,
    })
}

/// 设置密码；已有密码时必须持有有效会话才能修改
pub async fn set_password(
    pool: &SqlitePool,
    config: &Config,
    candidate: &str,
    token: Option<&str>,
) -> Result<Session, AppError> {
    if candidate.trim().is_empty() {
        return Err(AppError::InvalidInput("Password is required".into()));
    }

    if PasswordRepository::get_password(pool).await?.is_some() {
        let authorized = match token {
            Some(token) => SessionRepository::validate(pool, token).await?,
            None => false,
        };
        if !authorized {
            tracing::warn!("Rejected password change without a valid session");
            return Err(AppError::Unauthorized("Unauthorized".into()));
        }
    }

    let hash = hash_password(candidate, &config.pepper_secret, config.bcrypt_cost).await?;
    PasswordRepository::upsert_password(pool, &hash).await?;
    tracing::info!("Application password updated");

    Ok(SessionRepository::create(pool, config.session_ttl()).await?)
}

pub async fn verify_password_and_login(
    pool: &SqlitePool,
    config: &Config,
    candidate: &str,
) -> Result<Session, AppError> {
    let stored = PasswordRepository::get_password(pool)
        .await?
        .ok_or(AppError::NoPasswordSet)?;

    if !verify_password(candidate, &config.pepper_secret, &stored.hash).await? {
        tracing::warn!("Password verification failed");
        return Err(AppError::InvalidCredentials);
    }

    Ok(SessionRepository::create(pool, config.session_ttl()).await?)
}

/// 服务本身不终止 TLS，只认反向代理转发的 `X-Forwarded-Proto: https`
pub fn is_request_secure(headers: &HeaderMap) -> bool {
    headers
        .get("x-forwarded-proto")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|proto| proto.trim().eq_ignore_ascii_case("https"))
        .unwrap_or(false)
}

pub fn session_cookie(session: &Session, ttl: Duration, secure: bool) -> Cookie<'static> {
    let max_age = time::Duration::try_from(ttl).unwrap_or(time::Duration::MAX);
    Cookie::build((SESSION_COOKIE, session.id.clone()))
        .http_only(true)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(max_age)
        .secure(secure)
        .build()
}

/// 定期清理过期会话
pub fn spawn_session_sweeper(pool: SqlitePool, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            match SessionRepository::purge_expired(&pool).await {
                Ok(0) => {}
                Ok(n) => tracing::debug!("Purged {} expired sessions", n),
                Err(e) => tracing::warn!("Failed to purge expired sessions: {}", e),
            }
        }
    })
}
