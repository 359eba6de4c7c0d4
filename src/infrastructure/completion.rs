use std::fmt::Display;
use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

// 上游错误页（如代理返回的 HTML）只保留开头部分
const MAX_ERROR_TEXT: usize = 2048;

/// 惰性、有限、不可重启的文本片段序列；丢弃即取消上游请求
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String, AppError>> + Send>>;

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Resolves once the upstream has accepted the request; errors before
    /// that point are reported here rather than inside the stream.
    async fn stream_completion(&self, request: CompletionRequest) -> Result<TokenStream, AppError>;
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChoiceChunk>,
    error: Option<UpstreamErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ChoiceChunk {
    delta: Option<Delta>,
}

#[derive(Debug, Deserialize)]
struct Delta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    message: String,
}

/// OpenAI 兼容的 chat-completions 流式客户端
#[derive(Clone)]
pub struct OpenAiProvider {
    client: Client,
    header_timeout: Duration,
}

impl OpenAiProvider {
    pub fn new(header_timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().build()?,
            header_timeout,
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn stream_completion(&self, request: CompletionRequest) -> Result<TokenStream, AppError> {
        let url = format!("{}/chat/completions", request.base_url.trim_end_matches('/'));
        tracing::info!("Opening completion stream: model={} url={}", request.model, url);

        let body = ChatCompletionRequest {
            model: &request.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream: true,
        };

        // 只限制等待响应头的时间，流本身不设上限
        let send = self
            .client
            .post(&url)
            .bearer_auth(&request.api_key)
            .json(&body)
            .send();
        let response = tokio::time::timeout(self.header_timeout, send)
            .await
            .map_err(|_| {
                AppError::Upstream(format!(
                    "Upstream did not respond within {}s",
                    self.header_timeout.as_secs()
                ))
            })?
            .map_err(|e| AppError::Upstream(format!("Failed to call completion API: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Completion API error: {} - {}",
                status,
                truncate_chars(text.trim(), MAX_ERROR_TEXT)
            )));
        }

        Ok(decode_event_stream(response.bytes_stream()))
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// 把上游 SSE 字节流拆成 `data:` 负载，按网络分块边界缓冲半行
#[derive(Debug, Default)]
pub struct EventStreamDecoder {
    buffer: Vec<u8>,
}

impl EventStreamDecoder {
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut payloads = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(payload) = data_payload(&line) {
                payloads.push(payload);
            }
        }
        payloads
    }

    /// 流结束时处理没有换行结尾的最后一行
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.buffer);
        data_payload(&rest)
    }
}

fn data_payload(line: &[u8]) -> Option<String> {
    let line = String::from_utf8_lossy(line);
    let line = line.trim_end_matches(['\r', '\n']);
    let value = line.strip_prefix("data:")?;
    Some(value.strip_prefix(' ').unwrap_or(value).to_string())
}

enum Payload {
    Token(String),
    Skip,
    Done,
}

fn parse_payload(payload: &str) -> Result<Payload, AppError> {
    if payload.trim() == "[DONE]" {
        return Ok(Payload::Done);
    }

    let chunk = match serde_json::from_str::<ChatCompletionChunk>(payload) {
        Ok(chunk) => chunk,
        Err(e) => {
            tracing::warn!("Skipping unparseable upstream event: {}", e);
            return Ok(Payload::Skip);
        }
    };

    if let Some(error) = chunk.error {
        return Err(AppError::Upstream(error.message));
    }

    let content = chunk
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta)
        .and_then(|d| d.content)
        .unwrap_or_default();

    if content.is_empty() {
        Ok(Payload::Skip)
    } else {
        Ok(Payload::Token(content))
    }
}

pub fn decode_event_stream<S, B, E>(body: S) -> TokenStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    Box::pin(async_stream::try_stream! {
        let mut body = Box::pin(body);
        let mut decoder = EventStreamDecoder::default();
        let mut done = false;

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| AppError::Upstream(format!("Stream error: {}", e)))?;
            for payload in decoder.push(chunk.as_ref()) {
                match parse_payload(&payload)? {
                    Payload::Token(token) => {
                        yield token;
                    }
                    Payload::Skip => {}
                    Payload::Done => {
                        done = true;
                        break;
                    }
                }
            }
            if done {
                break;
            }
        }

        if !done {
            if let Some(payload) = decoder.finish() {
                if let Payload::Token(token) = parse_payload(&payload)? {
                    yield token;
                }
            }
        }
    })
}
