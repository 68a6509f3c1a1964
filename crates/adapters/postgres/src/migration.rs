//! PostgreSQL 迁移管理

use shop_errors::{AppError, AppResult};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

/// 执行内嵌迁移
///
/// 迁移脚本由调用方通过 `sqlx::migrate!` 在编译期嵌入。
pub async fn run_migrations(pool: &PgPool, migrator: &Migrator) -> AppResult<()> {
    migrator
        .run(pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to run migrations: {}", e)))?;

    info!(count = migrator.iter().count(), "Migrations applied");
    Ok(())
}
