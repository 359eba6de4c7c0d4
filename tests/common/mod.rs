#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use futures_util::stream;
use serde_json::Value;
use tower::ServiceExt;
use wealth_tracker::{
    AppState,
    config::Config,
    create_router, database,
    error::AppError,
    infrastructure::completion::{CompletionProvider, CompletionRequest, TokenStream},
};

pub const PEPPER: &str = "test-pepper";

pub fn test_config() -> Config {
    Config {
        allow_password: true,
        pepper_secret: PEPPER.into(),
        bcrypt_cost: 4,
        static_dir: "does-not-exist".into(),
        ..Config::default()
    }
}

/// 按脚本吐出片段的假上游，并记录收到的请求
#[derive(Default)]
pub struct ScriptedProvider {
    pub script: Vec<Result<String, String>>,
    pub reject_with: Option<String>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn tokens(tokens: &[&str]) -> Self {
        Self {
            script: tokens.iter().map(|t| Ok(t.to_string())).collect(),
            ..Self::default()
        }
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn stream_completion(&self, request: CompletionRequest) -> Result<TokenStream, AppError> {
        self.requests.lock().unwrap().push(request);
        if let Some(message) = &self.reject_with {
            return Err(AppError::Upstream(message.clone()));
        }

        let items: Vec<Result<String, AppError>> = self
            .script
            .iter()
            .map(|item| item.clone().map_err(AppError::Upstream))
            .collect();
        Ok(Box::pin(stream::iter(items)))
    }
}

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with(test_config(), Arc::new(ScriptedProvider::default())).await
    }

    pub async fn with(config: Config, advisor: Arc<dyn CompletionProvider>) -> Self {
        let pool = database::memory_pool().await.unwrap();
        let state = AppState {
            pool,
            config,
            advisor,
        };
        let router = create_router(state.clone());
        Self { state, router }
    }

    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        TestResponse {
            status,
            headers,
            body: String::from_utf8(body.to_vec()).unwrap(),
        }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.send(request("GET", uri, cookie, None)).await
    }

    pub async fn json(&self, method: &str, uri: &str, cookie: Option<&str>, body: Value) -> TestResponse {
        self.send(request(method, uri, cookie, Some(body))).await
    }
}

pub fn request(method: &str, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }

    /// `Set-Cookie` 中的 `name=value` 部分，可直接作为 `Cookie` 请求头
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("sessionId="))
            .and_then(|v| v.split(';').next())
            .map(str::to_string)
    }

    pub fn set_cookie_header(&self) -> Option<String> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}
