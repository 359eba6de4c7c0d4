use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::utils::generate_session_token;

#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: String,
    /// 过期时间（Unix 毫秒）
    pub expires_at: i64,
}

impl Session {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() <= self.expires_at
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.expires_at)
    }
}

/// 会话存储库
pub struct SessionRepository;

impl SessionRepository {
    /// 创建会话，从现在起 `ttl` 后过期
    pub async fn create(pool: &SqlitePool, ttl: Duration) -> Result<Session, sqlx::Error> {
        Self::create_at(pool, Utc::now(), ttl).await
    }

    pub async fn create_at(
        pool: &SqlitePool,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Session, sqlx::Error> {
        let session = Session {
            id: generate_session_token(),
            expires_at: now.timestamp_millis() + ttl.as_millis() as i64,
        };

        sqlx::query("INSERT INTO sessions (id, expires_at) VALUES (?, ?)")
            .bind(&session.id)
            .bind(session.expires_at)
            .execute(pool)
            .await?;

        tracing::debug!("Created session expiring at {:?}", session.expires_at());
        Ok(session)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Session>, sqlx::Error> {
        sqlx::query_as::<_, Session>("SELECT id, expires_at FROM sessions WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// 校验会话；不续期，过期的会话顺带删除
    pub async fn validate(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
        Self::validate_at(pool, id, Utc::now()).await
    }

    pub async fn validate_at(
        pool: &SqlitePool,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let Some(session) = Self::find_by_id(pool, id).await? else {
            return Ok(false);
        };

        if session.is_valid_at(now) {
            return Ok(true);
        }

        Self::destroy(pool, &session.id).await?;
        Ok(false)
    }

    /// 删除会话
    pub async fn destroy(pool: &SqlitePool, id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// 清理所有已过期的会话，返回删除数量
    pub async fn purge_expired(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < ?")
            .bind(Utc::now().timestamp_millis())
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
