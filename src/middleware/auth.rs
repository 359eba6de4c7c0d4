use axum::{
    body::Body,
    extract::State,
    http::{Method, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{
    AppState,
    error::AppError,
    infrastructure::auth::{SESSION_COOKIE, check_status},
};

const GATE_MESSAGE: &str = "You need to enter the password first to obtain the permission.";

/// 访问规则：按顺序匹配，第一条命中的规则生效
#[derive(Debug, Clone, Copy)]
pub struct AccessRule {
    /// `None` 匹配任意方法
    pub method: Option<&'static str>,
    /// 精确路径，或以 `/*` 结尾的前缀
    pub pattern: &'static str,
    pub requires_auth: bool,
}

impl AccessRule {
    const fn public(method: Option<&'static str>, pattern: &'static str) -> Self {
        Self {
            method,
            pattern,
            requires_auth: false,
        }
    }

    fn matches(&self, method: &Method, path: &str) -> bool {
        if let Some(m) = self.method {
            if m != method.as_str() {
                return false;
            }
        }

        match self.pattern.strip_suffix("/*") {
            Some(prefix) => path == prefix || path.starts_with(&format!("{}/", prefix)),
            None => path == self.pattern,
        }
    }
}

pub const ACCESS_RULES: &[AccessRule] = &[
    AccessRule::public(None, "/api/heart"),
    AccessRule::public(None, "/api/password/check"),
    AccessRule::public(None, "/api/password/verify"),
    AccessRule::public(None, "/api/password/set"),
    AccessRule::public(Some("GET"), "/api/settings"),
    AccessRule {
        method: None,
        pattern: "/api/*",
        requires_auth: true,
    },
];

/// 静态资源不拦截；未匹配的 `/api/` 路径默认需要认证
pub fn requires_auth(method: &Method, path: &str) -> bool {
    if !path.starts_with("/api/") {
        return false;
    }

    ACCESS_RULES
        .iter()
        .find(|rule| rule.matches(method, path))
        .map(|rule| rule.requires_auth)
        .unwrap_or(true)
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if !requires_auth(req.method(), req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let token = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());
    let status = check_status(&state.pool, &state.config, token.as_deref()).await?;

    if status.need_password() {
        tracing::debug!("Blocked {} {}: password required", req.method(), req.uri().path());
        return Err(AppError::Unauthorized(GATE_MESSAGE.into()));
    }

    Ok(next.run(req).await)
}
