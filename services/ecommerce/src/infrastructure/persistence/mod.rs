//! PostgreSQL 持久化实现

mod postgres_order_repository;
mod postgres_product_repository;
mod postgres_user_repository;
mod readiness;

pub use postgres_order_repository::PostgresOrderRepository;
pub use postgres_product_repository::PostgresProductRepository;
pub use postgres_user_repository::PostgresUserRepository;
pub use readiness::PostgresReadiness;

use sqlx::migrate::Migrator;

/// 内嵌的数据库迁移
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");
