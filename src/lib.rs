use std::sync::Arc;

use config::Config;
use infrastructure::completion::CompletionProvider;
use sqlx::SqlitePool;

pub mod config;
pub mod database;
pub mod error;
pub mod infrastructure;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod utils;

pub use router::create_router;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub advisor: Arc<dyn CompletionProvider>,
}
