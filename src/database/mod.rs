// 数据库模块
// 连接池、表结构初始化以及各个存储库

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub mod repositories;

pub use repositories::password::{PasswordRecord, PasswordRepository};
pub use repositories::session::{Session, SessionRepository};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS sessions (
        id TEXT PRIMARY KEY NOT NULL,
        expires_at INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS passwords (
        id INTEGER PRIMARY KEY CHECK (id = 1),
        hash TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS assets (
        type TEXT PRIMARY KEY NOT NULL,
        amount REAL NOT NULL,
        note TEXT DEFAULT '',
        risk TEXT NOT NULL DEFAULT 'LOW',
        liquidity TEXT NOT NULL DEFAULT 'GOOD',
        currency TEXT NOT NULL,
        datetime TEXT NOT NULL,
        created TEXT,
        updated TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS record (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        type TEXT NOT NULL,
        alias TEXT,
        amount REAL NOT NULL,
        note TEXT DEFAULT '',
        risk TEXT NOT NULL DEFAULT 'LOW',
        liquidity TEXT NOT NULL DEFAULT 'GOOD',
        currency TEXT NOT NULL,
        datetime TEXT NOT NULL,
        created TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS insights (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        tags TEXT DEFAULT '',
        created TEXT NOT NULL,
        updated TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_settings (
        id INTEGER PRIMARY KEY CHECK (id = 1),
        theme TEXT NOT NULL,
        language TEXT NOT NULL,
        target_currency TEXT NOT NULL,
        exchange_rate_api_key TEXT NOT NULL,
        bitcoin_api_key TEXT NOT NULL,
        api_key TEXT NOT NULL,
        base_url TEXT NOT NULL,
        model TEXT NOT NULL,
        temperature REAL NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS custom_currencies (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        code TEXT NOT NULL UNIQUE,
        symbol TEXT NOT NULL,
        name TEXT NOT NULL DEFAULT '',
        exchange_rate REAL NOT NULL DEFAULT 1,
        is_active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
];

/// 打开连接池；内存数据库只保留一个永不回收的连接，否则每个连接都是一个新库
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
    } else {
        SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
    }
}

/// 建表（幂等）
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::debug!("Schema ready ({} tables)", SCHEMA.len());
    Ok(())
}

/// 测试用：打开内存数据库并建表
pub async fn memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let pool = connect("sqlite::memory:").await?;
    init_schema(&pool).await?;
    Ok(pool)
}
