//! 电商服务入口

use std::sync::Arc;

use anyhow::Context;
use ecommerce::api::http::{AppState, router};
use ecommerce::infrastructure::persistence::{
    MIGRATOR, PostgresOrderRepository, PostgresProductRepository, PostgresReadiness,
    PostgresUserRepository,
};
use secrecy::ExposeSecret;
use shop_adapter_postgres::{PostgresConfig, create_pool, run_migrations};
use shop_bootstrap::{init_runtime, shutdown_signal};
use shop_config::AppConfig;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // 加载配置
    let config_dir = std::env::var("APP_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let config = AppConfig::load(&config_dir).context("Failed to load configuration")?;

    init_runtime(&config);

    let metrics = if config.telemetry.metrics_enabled {
        Some(shop_telemetry::init_metrics()?)
    } else {
        None
    };

    // 初始化数据库连接池
    let db = &config.database;
    let pg_config = PostgresConfig::new(db.url.expose_secret().as_str())
        .with_max_connections(db.max_connections)
        .with_min_connections(db.min_connections)
        .with_connect_timeout(db.connect_timeout());
    let pool = create_pool(&pg_config).await?;

    if db.run_migrations {
        run_migrations(&pool, &MIGRATOR).await?;
    }

    // 组装 Repositories
    let mut state = AppState::new(
        Arc::new(PostgresUserRepository::new(pool.clone())),
        Arc::new(PostgresProductRepository::new(pool.clone())),
        Arc::new(PostgresOrderRepository::new(pool.clone())),
    )
    .with_readiness(Arc::new(PostgresReadiness::new(pool.clone())));
    if let Some(handle) = metrics {
        state = state.with_metrics(handle);
    }

    let app = router(state, &config.server);

    // 启动服务器
    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(%addr, "Starting ecommerce service");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("Server stopped");
    Ok(())
}
