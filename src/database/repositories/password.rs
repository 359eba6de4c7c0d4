use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, FromRow)]
pub struct PasswordRecord {
    pub hash: String,
}

/// 密码存储库
///
/// `passwords` 表最多只有一行（`id = 1`），由 CHECK 约束保证。
pub struct PasswordRepository;

impl PasswordRepository {
    /// 读取当前密码
    pub async fn get_password(pool: &SqlitePool) -> Result<Option<PasswordRecord>, sqlx::Error> {
        sqlx::query_as::<_, PasswordRecord>("SELECT hash FROM passwords WHERE id = 1")
            .fetch_optional(pool)
            .await
    }

    /// 创建或替换密码
    pub async fn upsert_password(pool: &SqlitePool, hash: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO passwords (id, hash)
            VALUES (1, ?)
            ON CONFLICT(id) DO UPDATE SET hash = excluded.hash
            "#,
        )
        .bind(hash)
        .execute(pool)
        .await?;

        Ok(())
    }
}
