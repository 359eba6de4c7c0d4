use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// 单用户应用，设置表只有一行
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub theme: String,
    pub language: String,
    pub target_currency: String,
    pub exchange_rate_api_key: String,
    pub bitcoin_api_key: String,
    pub api_key: String,
    #[serde(rename = "baseURL")]
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            theme: "light".into(),
            language: "zh-CN".into(),
            target_currency: "CNY".into(),
            exchange_rate_api_key: String::new(),
            bitcoin_api_key: String::new(),
            api_key: String::new(),
            base_url: "https://api.x.ai/v1/".into(),
            model: "grok-beta".into(),
            temperature: 0.7,
        }
    }
}

/// 部分更新：缺省字段保持原值
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub theme: Option<String>,
    pub language: Option<String>,
    pub target_currency: Option<String>,
    pub exchange_rate_api_key: Option<String>,
    pub bitcoin_api_key: Option<String>,
    pub api_key: Option<String>,
    #[serde(rename = "baseURL")]
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
}

const COLUMNS: &str = "theme, language, target_currency, exchange_rate_api_key, bitcoin_api_key, \
                       api_key, base_url, model, temperature";

impl UserSettings {
    async fn ensure_row(pool: &SqlitePool) -> Result<(), sqlx::Error> {
        let defaults = UserSettings::default();
        sqlx::query(&format!(
            "INSERT OR IGNORE INTO user_settings (id, {COLUMNS}) VALUES (1, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(defaults.theme)
        .bind(defaults.language)
        .bind(defaults.target_currency)
        .bind(defaults.exchange_rate_api_key)
        .bind(defaults.bitcoin_api_key)
        .bind(defaults.api_key)
        .bind(defaults.base_url)
        .bind(defaults.model)
        .bind(defaults.temperature)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// 读取设置，不存在时按默认值创建
    pub async fn get_or_create(pool: &SqlitePool) -> Result<Self, sqlx::Error> {
        Self::ensure_row(pool).await?;
        sqlx::query_as::<_, UserSettings>(&format!("SELECT {COLUMNS} FROM user_settings WHERE id = 1"))
            .fetch_one(pool)
            .await
    }

    pub async fn update(pool: &SqlitePool, patch: &SettingsPatch) -> Result<Self, sqlx::Error> {
        Self::ensure_row(pool).await?;
        sqlx::query_as::<_, UserSettings>(&format!(
            r#"
            UPDATE user_settings
            SET theme = COALESCE(?, theme),
                language = COALESCE(?, language),
                target_currency = COALESCE(?, target_currency),
                exchange_rate_api_key = COALESCE(?, exchange_rate_api_key),
                bitcoin_api_key = COALESCE(?, bitcoin_api_key),
                api_key = COALESCE(?, api_key),
                base_url = COALESCE(?, base_url),
                model = COALESCE(?, model),
                temperature = COALESCE(?, temperature)
            WHERE id = 1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&patch.theme)
        .bind(&patch.language)
        .bind(&patch.target_currency)
        .bind(&patch.exchange_rate_api_key)
        .bind(&patch.bitcoin_api_key)
        .bind(&patch.api_key)
        .bind(&patch.base_url)
        .bind(&patch.model)
        .bind(patch.temperature)
        .fetch_one(pool)
        .await
    }
}
