use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteExecutor, SqlitePool};

use crate::error::AppError;

/// 资产在某个时间点的快照
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Record {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub asset_type: String,
    pub alias: Option<String>,
    pub amount: f64,
    pub note: Option<String>,
    pub risk: String,
    pub liquidity: String,
    pub currency: String,
    pub datetime: NaiveDate,
    pub created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordPayload {
    pub id: Option<i64>,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub alias: Option<String>,
    pub amount: f64,
    pub note: Option<String>,
    pub risk: Option<String>,
    pub liquidity: Option<String>,
    pub currency: String,
    pub datetime: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRecordRequest {
    pub id: i64,
}

impl RecordPayload {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.asset_type.trim().is_empty() {
            return Err(AppError::InvalidInput("type is required".into()));
        }
        if self.currency.trim().is_empty() {
            return Err(AppError::InvalidInput("currency is required".into()));
        }
        if !self.amount.is_finite() {
            return Err(AppError::InvalidInput("amount must be a number".into()));
        }
        Ok(())
    }

    fn risk(&self) -> &str {
        self.risk.as_deref().unwrap_or("LOW")
    }

    fn liquidity(&self) -> &str {
        self.liquidity.as_deref().unwrap_or("GOOD")
    }
}

impl Record {
    /// 写入一条快照；事务内外都可以调用
    pub async fn insert<'e, E: SqliteExecutor<'e>>(
        executor: E,
        payload: &RecordPayload,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Record>(
            r#"
            INSERT INTO record (type, alias, amount, note, risk, liquidity, currency, datetime, created)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, type, alias, amount, note, risk, liquidity, currency, datetime, created
            "#,
        )
        .bind(&payload.asset_type)
        .bind(&payload.alias)
        .bind(payload.amount)
        .bind(payload.note.as_deref().unwrap_or(""))
        .bind(payload.risk())
        .bind(payload.liquidity())
        .bind(&payload.currency)
        .bind(payload.datetime)
        .bind(Utc::now())
        .fetch_one(executor)
        .await
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Record>(
            r#"
            SELECT id, type, alias, amount, note, risk, liquidity, currency, datetime, created
            FROM record
            ORDER BY datetime ASC, id ASC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        payload: &RecordPayload,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Record>(
            r#"
            UPDATE record
            SET type = ?, alias = ?, amount = ?, note = ?, risk = ?, liquidity = ?,
                currency = ?, datetime = ?
            WHERE id = ?
            RETURNING id, type, alias, amount, note, risk, liquidity, currency, datetime, created
            "#,
        )
        .bind(&payload.asset_type)
        .bind(&payload.alias)
        .bind(payload.amount)
        .bind(payload.note.as_deref().unwrap_or(""))
        .bind(payload.risk())
        .bind(payload.liquidity())
        .bind(&payload.currency)
        .bind(payload.datetime)
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM record WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
