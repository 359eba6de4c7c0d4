use serde::{Deserialize, Serialize};

/// 前端把整份设置传过来，这里只取 AI 相关字段
#[derive(Debug, Default, Deserialize)]
pub struct AdviceSettings {
    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,
    #[serde(rename = "baseURL")]
    pub base_url: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdviceRequest {
    #[serde(default)]
    pub settings: Option<AdviceSettings>,
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub(super) struct StreamFrame<'a> {
    pub stream: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct ErrorFrame {
    pub error: String,
}
