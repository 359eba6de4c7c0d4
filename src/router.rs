use std::path::PathBuf;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
};
#[cfg(debug_assertions)]
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};

use crate::{
    AppState,
    middleware::{auth_middleware, log_errors},
    routes::{advice, asset, currency, health, insight, password, record, settings},
};

// 认证相关路由
fn password_routes() -> Router<AppState> {
    Router::new()
        .route("/password/check", get(password::check_password))
        .route("/password/set", post(password::set_password))
        .route("/password/verify", post(password::verify_password))
}

// 资产、快照、笔记
fn ledger_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/assets",
            get(asset::get_assets)
                .post(asset::create_asset)
                .put(asset::update_asset)
                .delete(asset::delete_asset),
        )
        .route(
            "/records",
            get(record::get_records)
                .post(record::save_record)
                .delete(record::delete_record),
        )
        .route(
            "/insights",
            get(insight::get_insights)
                .post(insight::create_insight)
                .put(insight::update_insight)
                .delete(insight::delete_insight),
        )
}

// 用户设置与自定义货币
fn settings_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        .route(
            "/currencies",
            get(currency::get_active_currencies).post(currency::create_currency),
        )
        .route("/currencies/all", get(currency::get_all_currencies))
        .route(
            "/currencies/{id}",
            put(currency::update_currency).delete(currency::delete_currency),
        )
}

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/heart", get(health::heart))
        .route("/generate-advice", post(advice::generate_advice))
        .merge(password_routes())
        .merge(ledger_routes())
        .merge(settings_routes())
        .fallback(health::api_not_found)
}

/// 创建主路由：`/api` 下是接口，其余路径交给前端静态文件
pub fn create_router(state: AppState) -> Router {
    let static_dir = PathBuf::from(&state.config.static_dir);
    let client = ServeDir::new(&static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    let router = Router::new()
        .nest("/api", api_routes())
        .fallback_service(client)
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .layer(from_fn(log_errors));

    // 开发模式下允许跨域
    #[cfg(debug_assertions)]
    let router = router.layer(CorsLayer::permissive());

    router.with_state(state)
}
