use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::State,
    http::HeaderName,
    response::{
        IntoResponse, Response,
        sse::{Event, Sse},
    },
};
use futures_util::{Stream, StreamExt};

use crate::{
    AppState,
    error::AppError,
    infrastructure::completion::{
        CompletionRequest, DEFAULT_BASE_URL, DEFAULT_MODEL, TokenStream,
    },
    utils::AppJson,
};

use super::model::{AdviceRequest, ErrorFrame, StreamFrame};

const MAX_TOKENS: u32 = 8192;
const TEMPERATURE: f32 = 0.7;
const RETRY_HINT: Duration = Duration::from_secs(5);

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// 把文本片段序列包装成 SSE 帧：一个片段一帧，正常结束时追加 `[DONE]`
pub fn advice_events(tokens: TokenStream) -> impl Stream<Item = Result<Event, Infallible>> {
    async_stream::stream! {
        yield Ok::<_, Infallible>(Event::default().retry(RETRY_HINT));

        let mut tokens = tokens;
        let mut failed = false;
        while let Some(item) = tokens.next().await {
            match item {
                Ok(fragment) => {
                    if fragment.is_empty() {
                        continue;
                    }
                    match Event::default().json_data(StreamFrame { stream: &fragment }) {
                        Ok(event) => {
                            yield Ok(event);
                        }
                        Err(e) => tracing::warn!("Dropping unserializable fragment: {}", e),
                    }
                }
                Err(e) => {
                    // 响应头已经发出，只能用一个错误帧告知客户端
                    tracing::error!("Advice stream failed mid-way: {}", e);
                    if let Ok(event) = Event::default().json_data(ErrorFrame { error: e.to_string() }) {
                        yield Ok(event);
                    }
                    failed = true;
                    break;
                }
            }
        }

        if !failed {
            yield Ok(Event::default().data("[DONE]"));
        }
        tracing::debug!("Advice stream closed");
    }
}

pub async fn generate_advice(
    State(state): State<AppState>,
    AppJson(req): AppJson<AdviceRequest>,
) -> Result<Response, AppError> {
    let settings = req.settings.unwrap_or_default();

    let api_key = non_empty(settings.api_key)
        .or_else(|| state.config.openai_api_key.clone())
        .ok_or(AppError::MissingApiKey)?;
    if req.prompt.trim().is_empty() {
        return Err(AppError::InvalidInput("Prompt is required".into()));
    }

    let request = CompletionRequest {
        api_key,
        base_url: non_empty(settings.base_url)
            .or_else(|| state.config.openai_base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        model: non_empty(settings.model).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        prompt: req.prompt,
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
    };
    tracing::info!("Generating advice with model {}", request.model);

    // 先建立上游连接，失败时还能返回 JSON 错误
    let tokens = state.advisor.stream_completion(request).await?;

    Ok((
        [(HeaderName::from_static("x-accel-buffering"), "no")],
        Sse::new(advice_events(tokens)),
    )
        .into_response())
}
