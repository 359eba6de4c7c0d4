use std::error::Error;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wealth_tracker::{
    AppState,
    config::Config,
    create_router, database,
    infrastructure::{auth::spawn_session_sweeper, completion::OpenAiProvider},
};

const SESSION_SWEEP_PERIOD: Duration = Duration::from_secs(5 * 60);

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!("Server failed: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    // 加载配置
    let config = Config::from_env()?;

    #[cfg(debug_assertions)]
    tracing::info!("Running in debug mode with CORS enabled");

    if config.allow_password && config.pepper_secret.is_empty() {
        tracing::warn!("Password gate enabled without PEPPER_SECRET");
    }

    // 打开数据库并建表
    let pool = database::connect(&config.database_url).await?;
    database::init_schema(&pool).await?;
    tracing::info!("Database synced");

    spawn_session_sweeper(pool.clone(), SESSION_SWEEP_PERIOD);

    let advisor = Arc::new(OpenAiProvider::new(config.upstream_timeout())?);
    let state = AppState {
        pool,
        config: config.clone(),
        advisor,
    };

    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to 0.0.0.0");
            IpAddr::from([0, 0, 0, 0])
        }),
        config.server_port,
    );

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
