use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use crate::error::AppError;
use crate::routes::record::{Record, RecordPayload};

/// 每类资产的当前余额；每次新增或修改都会写一条 `record` 快照
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Asset {
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub asset_type: String,
    pub amount: f64,
    pub note: Option<String>,
    pub risk: String,
    pub liquidity: String,
    pub currency: String,
    pub datetime: NaiveDate,
    pub created: Option<DateTime<Utc>>,
    pub updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetPayload {
    #[serde(rename = "type")]
    pub asset_type: String,
    pub amount: f64,
    pub currency: String,
    pub note: Option<String>,
    pub risk: Option<String>,
    pub liquidity: Option<String>,
    pub datetime: NaiveDate,
    pub created: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAssetRequest {
    #[serde(rename = "type")]
    pub asset_type: String,
}

impl AssetPayload {
    pub fn validate(&self) -> Result<(), AppError> {
        self.snapshot().validate()
    }

    fn snapshot(&self) -> RecordPayload {
        RecordPayload {
            id: None,
            asset_type: self.asset_type.clone(),
            alias: None,
            amount: self.amount,
            note: self.note.clone(),
            risk: self.risk.clone(),
            liquidity: self.liquidity.clone(),
            currency: self.currency.clone(),
            datetime: self.datetime,
        }
    }
}

const COLUMNS: &str = "type, amount, note, risk, liquidity, currency, datetime, created, updated";

impl Asset {
    /// 新增资产并写入首条快照
    pub async fn create(pool: &SqlitePool, payload: &AssetPayload) -> Result<Self, sqlx::Error> {
        let now = Utc::now();
        let mut tx = pool.begin().await?;

        let asset = sqlx::query_as::<_, Asset>(&format!(
            r#"
            INSERT INTO assets ({COLUMNS})
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&payload.asset_type)
        .bind(payload.amount)
        .bind(payload.note.as_deref().unwrap_or(""))
        .bind(payload.risk.as_deref().unwrap_or("LOW"))
        .bind(payload.liquidity.as_deref().unwrap_or("GOOD"))
        .bind(&payload.currency)
        .bind(payload.datetime)
        .bind(payload.created.unwrap_or(now))
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        Record::insert(&mut *tx, &payload.snapshot()).await?;
        tx.commit().await?;

        tracing::info!("Created asset {}", asset.asset_type);
        Ok(asset)
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Asset>(&format!("SELECT {COLUMNS} FROM assets ORDER BY type"))
            .fetch_all(pool)
            .await
    }

    /// 按类型更新；不存在时返回 `None` 且不写快照
    pub async fn update(
        pool: &SqlitePool,
        payload: &AssetPayload,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let asset = sqlx::query_as::<_, Asset>(&format!(
            r#"
            UPDATE assets
            SET amount = ?, note = ?, risk = ?, liquidity = ?, currency = ?, datetime = ?,
                created = COALESCE(?, created), updated = ?
            WHERE type = ?
            RETURNING {COLUMNS}
            "#
        ))
        .bind(payload.amount)
        .bind(payload.note.as_deref().unwrap_or(""))
        .bind(payload.risk.as_deref().unwrap_or("LOW"))
        .bind(payload.liquidity.as_deref().unwrap_or("GOOD"))
        .bind(&payload.currency)
        .bind(payload.datetime)
        .bind(payload.created)
        .bind(Utc::now())
        .bind(&payload.asset_type)
        .fetch_optional(&mut *tx)
        .await?;

        if asset.is_some() {
            Record::insert(&mut *tx, &payload.snapshot()).await?;
        }
        tx.commit().await?;

        Ok(asset)
    }

    pub async fn delete(pool: &SqlitePool, asset_type: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assets WHERE type = ?")
            .bind(asset_type)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
