use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Insight {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub tags: Option<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct InsightPayload {
    pub id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub tags: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteInsightRequest {
    pub id: i64,
}

/// `size = 0` 表示不分页
#[derive(Debug, Default, Deserialize)]
pub struct InsightQuery {
    #[serde(default)]
    pub size: u32,
    #[serde(default = "first_page")]
    pub page: u32,
}

fn first_page() -> u32 {
    1
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InsightPage {
    pub total: i64,
    pub page: u32,
    pub size: u32,
    pub data: Vec<Insight>,
}

impl InsightPayload {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::InvalidInput("title is required".into()));
        }
        if self.content.trim().is_empty() {
            return Err(AppError::InvalidInput("content is required".into()));
        }
        Ok(())
    }
}

impl Insight {
    pub async fn create(pool: &SqlitePool, payload: &InsightPayload) -> Result<Self, sqlx::Error> {
        let now = Utc::now();
        sqlx::query_as::<_, Insight>(
            r#"
            INSERT INTO insights (title, content, tags, created, updated)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, title, content, tags, created, updated
            "#,
        )
        .bind(&payload.title)
        .bind(&payload.content)
        .bind(payload.tags.as_deref().unwrap_or(""))
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
    }

    /// 按创建时间倒序分页
    pub async fn find_page(pool: &SqlitePool, query: &InsightQuery) -> Result<InsightPage, sqlx::Error> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM insights")
            .fetch_one(pool)
            .await?;

        let page = query.page.max(1);
        // SQLite 中 LIMIT -1 表示不限制
        let limit = if query.size == 0 { -1 } else { i64::from(query.size) };
        let offset = if query.size == 0 {
            0
        } else {
            i64::from(page - 1) * i64::from(query.size)
        };

        let data = sqlx::query_as::<_, Insight>(
            r#"
            SELECT id, title, content, tags, created, updated
            FROM insights
            ORDER BY created DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(InsightPage {
            total,
            page,
            size: query.size,
            data,
        })
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        payload: &InsightPayload,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Insight>(
            r#"
            UPDATE insights
            SET title = ?, content = ?, tags = ?, updated = ?
            WHERE id = ?
            RETURNING id, title, content, tags, created, updated
            "#,
        )
        .bind(&payload.title)
        .bind(&payload.content)
        .bind(payload.tags.as_deref().unwrap_or(""))
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM insights WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
