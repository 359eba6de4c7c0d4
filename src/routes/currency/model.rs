use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use crate::error::AppError;

/// 内置货币，自定义货币不能与之重名
pub const SYSTEM_CURRENCIES: &[&str] = &[
    "CNY", "USD", "HKD", "BTC", "EUR", "JPY", "GBP", "TWD", "KRW", "AUD", "CAD", "SGD", "CHF",
];

const MAX_LEN: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CustomCurrency {
    pub id: i64,
    pub code: String,
    pub symbol: String,
    pub name: String,
    /// 1 CNY = exchange_rate 单位的自定义货币
    pub exchange_rate: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyPayload {
    pub code: Option<String>,
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub exchange_rate: Option<f64>,
    pub is_active: Option<bool>,
}

/// 转大写并校验长度和系统货币冲突
pub fn normalize_code(code: &str) -> Result<String, AppError> {
    let code = code.trim().to_uppercase();
    if code.is_empty() || code.chars().count() > MAX_LEN {
        return Err(AppError::InvalidInput(format!(
            "Currency code must be 1 to {} characters",
            MAX_LEN
        )));
    }
    if SYSTEM_CURRENCIES.contains(&code.as_str()) {
        return Err(AppError::InvalidInput(
            "Currency code conflicts with system currency".into(),
        ));
    }
    Ok(code)
}

pub fn validate_symbol(symbol: &str) -> Result<(), AppError> {
    let len = symbol.chars().count();
    if len == 0 || len > MAX_LEN {
        return Err(AppError::InvalidInput(format!(
            "Currency symbol must be 1 to {} characters",
            MAX_LEN
        )));
    }
    Ok(())
}

pub fn validate_rate(rate: f64) -> Result<(), AppError> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(AppError::InvalidInput("Exchange rate must be positive".into()));
    }
    Ok(())
}

const COLUMNS: &str = "id, code, symbol, name, exchange_rate, is_active, created_at, updated_at";

impl CustomCurrency {
    pub async fn find_all(pool: &SqlitePool, active_only: bool) -> Result<Vec<Self>, sqlx::Error> {
        let filter = if active_only { "WHERE is_active = 1" } else { "" };
        sqlx::query_as::<_, CustomCurrency>(&format!(
            "SELECT {COLUMNS} FROM custom_currencies {filter} ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, CustomCurrency>(&format!(
            "SELECT {COLUMNS} FROM custom_currencies WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_code(pool: &SqlitePool, code: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, CustomCurrency>(&format!(
            "SELECT {COLUMNS} FROM custom_currencies WHERE code = ?"
        ))
        .bind(code)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        code: &str,
        symbol: &str,
        payload: &CurrencyPayload,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now();
        sqlx::query_as::<_, CustomCurrency>(&format!(
            r#"
            INSERT INTO custom_currencies (code, symbol, name, exchange_rate, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(code)
        .bind(symbol)
        .bind(payload.name.as_deref().unwrap_or(""))
        .bind(payload.exchange_rate.unwrap_or(1.0))
        .bind(payload.is_active.unwrap_or(true))
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
    }

    /// `code` 已经过规范化；其余字段为 `None` 时保持原值
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        code: Option<&str>,
        payload: &CurrencyPayload,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, CustomCurrency>(&format!(
            r#"
            UPDATE custom_currencies
            SET code = COALESCE(?, code),
                symbol = COALESCE(?, symbol),
                name = COALESCE(?, name),
                exchange_rate = COALESCE(?, exchange_rate),
                is_active = COALESCE(?, is_active),
                updated_at = ?
            WHERE id = ?
            RETURNING {COLUMNS}
            "#
        ))
        .bind(code)
        .bind(&payload.symbol)
        .bind(&payload.name)
        .bind(payload.exchange_rate)
        .bind(payload.is_active)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM custom_currencies WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
